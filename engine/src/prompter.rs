//! Confirm/alert capability and its modal-backed implementation.

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use tokio::sync::{mpsc, oneshot};

/// Asks the user things on behalf of an in-flight action.
///
/// `confirm` resolves once the user has answered; an action awaiting it holds
/// no lock on the session, so the screen stays live while the question is up.
pub trait Prompter: Send + Sync {
    fn confirm(&self, text: String) -> BoxFuture<'static, bool>;

    /// Show a message the user has to acknowledge.
    fn alert(&self, text: String);
}

#[derive(Debug)]
enum ModalKind {
    Confirm(oneshot::Sender<bool>),
    Alert,
}

/// A question or notice waiting on screen.
#[derive(Debug)]
pub struct ModalRequest {
    text: String,
    kind: ModalKind,
}

impl ModalRequest {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_confirm(&self) -> bool {
        matches!(self.kind, ModalKind::Confirm(_))
    }

    /// Resolve the request. Alerts ignore the answer.
    pub(crate) fn answer(self, accepted: bool) {
        if let ModalKind::Confirm(reply) = self.kind {
            // The asking task may already be gone (aborted or superseded).
            let _ = reply.send(accepted);
        }
    }
}

/// Prompter that queues requests for the UI to show as modals.
///
/// A confirm whose modal is dropped unanswered resolves to `false`.
#[derive(Debug, Clone)]
pub struct ModalPrompter {
    tx: mpsc::UnboundedSender<ModalRequest>,
}

impl ModalPrompter {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ModalRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Prompter for ModalPrompter {
    fn confirm(&self, text: String) -> BoxFuture<'static, bool> {
        let (reply, answer) = oneshot::channel();
        let request = ModalRequest {
            text,
            kind: ModalKind::Confirm(reply),
        };
        if self.tx.send(request).is_err() {
            tracing::debug!("Modal queue closed; treating confirm as declined");
            return future::ready(false).boxed();
        }
        answer.map(|answer| answer.unwrap_or(false)).boxed()
    }

    fn alert(&self, text: String) {
        let request = ModalRequest {
            text,
            kind: ModalKind::Alert,
        };
        if self.tx.send(request).is_err() {
            tracing::warn!("Modal queue closed; alert dropped");
        }
    }
}
