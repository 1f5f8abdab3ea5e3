//! Phonebook engine: application state machine and request orchestration.
//!
//! [`App`] owns the [`Session`] and is driven from a single UI loop. Remote
//! calls run as abortable tokio tasks that report back over a channel;
//! [`App::process_completions`] folds their results into the session between
//! frames. Nothing here knows about terminals.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use futures_util::future::{AbortHandle, Abortable};
use tokio::sync::mpsc;

use phonebook_client::ClientError;
use phonebook_core::{Effect, RequestKey, RequestTracker, SubmitPlan, Ticket, messages};

pub use phonebook_client::PersonsClient;
pub use phonebook_core::{Completion, LoadState, MESSAGE_TTL, RemoteFailure, Session};
pub use phonebook_types::ui::{DraftInput, Focus, UiOptions};
pub use phonebook_types::{Contact, ContactId, sanitize_display_text};

mod prompter;
pub use prompter::{ModalPrompter, ModalRequest, Prompter};

type CompletionEvent = (Ticket, Completion);

/// The phonebook application.
pub struct App {
    session: Session,
    client: Arc<PersonsClient>,
    prompter: Arc<dyn Prompter>,
    requests: RequestTracker,
    completion_tx: mpsc::UnboundedSender<CompletionEvent>,
    completion_rx: mpsc::UnboundedReceiver<CompletionEvent>,
    /// Abort handles of spawned requests, keyed by ticket sequence.
    tasks: HashMap<u64, AbortHandle>,
    modal_rx: Option<mpsc::UnboundedReceiver<ModalRequest>>,
    modals: VecDeque<ModalRequest>,
    focus: Focus,
    selected: usize,
    ui_options: UiOptions,
    should_quit: bool,
}

impl App {
    /// Build an app around an injected prompter.
    #[must_use]
    pub fn new(client: PersonsClient, prompter: Arc<dyn Prompter>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(),
            client: Arc::new(client),
            prompter,
            requests: RequestTracker::new(),
            completion_tx,
            completion_rx,
            tasks: HashMap::new(),
            modal_rx: None,
            modals: VecDeque::new(),
            focus: Focus::default(),
            selected: 0,
            ui_options: UiOptions::default(),
            should_quit: false,
        }
    }

    /// Build an app whose confirms and alerts show up as on-screen modals.
    #[must_use]
    pub fn with_modal_prompter(client: PersonsClient) -> Self {
        let (prompter, modal_rx) = ModalPrompter::channel();
        let mut app = Self::new(client, Arc::new(prompter));
        app.modal_rx = Some(modal_rx);
        app
    }

    /// Modal-backed app talking to the collection at `base_url`.
    pub fn connect(base_url: &str, ui_options: UiOptions) -> anyhow::Result<Self> {
        let client = PersonsClient::new(base_url)
            .with_context(|| format!("Cannot use {base_url} as the phonebook collection"))?;
        Ok(Self::with_modal_prompter(client).with_ui_options(ui_options))
    }

    #[must_use]
    pub fn with_ui_options(mut self, ui_options: UiOptions) -> Self {
        self.ui_options = ui_options;
        self
    }

    // ------------------------------------------------------------------
    // Read access for rendering
    // ------------------------------------------------------------------

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.client.base_url().as_str()
    }

    /// Requests dispatched and not yet completed.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.requests.in_flight()
    }

    /// Index into the visible contacts of the selected row.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        let len = self.session.visible_contacts().len();
        (len > 0).then(|| self.selected.min(len - 1))
    }

    #[must_use]
    pub fn selected_contact(&self) -> Option<&Contact> {
        let index = self.selected_index()?;
        self.session.visible_contacts().get(index).copied()
    }

    /// The modal currently on screen, if any.
    #[must_use]
    pub fn active_modal(&self) -> Option<&ModalRequest> {
        self.modals.front()
    }

    // ------------------------------------------------------------------
    // Focus, selection and editing
    // ------------------------------------------------------------------

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn select_next(&mut self) {
        let len = self.session.visible_contacts().len();
        if len > 0 {
            self.selected = (self.selected.min(len - 1) + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(index) = self.selected_index() {
            self.selected = index.saturating_sub(1);
        }
    }

    /// Buffer behind the focused widget; `None` when the list has focus.
    pub fn focused_input_mut(&mut self) -> Option<&mut DraftInput> {
        self.session.input_mut(self.focus)
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.session.set_filter(text);
    }

    pub fn set_draft_name(&mut self, text: impl Into<String>) {
        self.session.set_draft_name(text);
    }

    pub fn set_draft_number(&mut self, text: impl Into<String>) {
        self.session.set_draft_number(text);
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Fetch the whole collection, replacing the list when it arrives.
    pub fn load_all(&mut self) {
        self.session.begin_load();
        let client = Arc::clone(&self.client);
        self.dispatch(RequestKey::All, async move {
            Completion::Loaded(client.get_all().await.map_err(|e| remote_failure(&e)))
        });
    }

    /// Submit the add form: create a new contact or, after confirmation,
    /// replace the number of the one with the same name.
    pub fn submit(&mut self) {
        let now = Instant::now();
        let Ok(plan) = self.session.take_submission(now) else {
            tracing::debug!("Submit rejected: empty name");
            return;
        };
        let name = plan.name().to_string();

        match plan {
            SubmitPlan::Create(new_contact) => {
                let key = RequestKey::Name(name.clone());
                if self.requests.is_in_flight(&key) {
                    self.session.show_error(messages::already_saving(&name), now);
                    return;
                }
                let client = Arc::clone(&self.client);
                self.dispatch(key, async move {
                    let result = client
                        .create(&new_contact)
                        .await
                        .map_err(|e| remote_failure(&e));
                    Completion::Created { name, result }
                });
            }
            SubmitPlan::Replace {
                existing,
                replacement,
            } => {
                let id = existing.id;
                if self.refuse_if_busy(&id, &name, now) {
                    return;
                }
                let prompt = messages::replace_prompt(&existing.name);
                let client = Arc::clone(&self.client);
                let prompter = Arc::clone(&self.prompter);
                self.dispatch(RequestKey::Id(id.clone()), async move {
                    if !prompter.confirm(prompt).await {
                        return Completion::Declined;
                    }
                    let result = client
                        .update(&id, &replacement)
                        .await
                        .map_err(|e| remote_failure(&e));
                    Completion::Updated { name, id, result }
                });
            }
        }
    }

    /// Delete a contact after the user confirms.
    ///
    /// Refused while another update or delete for the same id is pending.
    pub fn remove(&mut self, id: ContactId, name: impl Into<String>) {
        let name = name.into();
        if self.refuse_if_busy(&id, &name, Instant::now()) {
            return;
        }
        let prompt = messages::delete_prompt(&name);
        let client = Arc::clone(&self.client);
        let prompter = Arc::clone(&self.prompter);
        self.dispatch(RequestKey::Id(id.clone()), async move {
            if !prompter.confirm(prompt).await {
                return Completion::Declined;
            }
            let result = client
                .delete_item(&id)
                .await
                .map_err(|e| remote_failure(&e));
            Completion::Deleted { name, id, result }
        });
    }

    pub fn remove_selected(&mut self) {
        if let Some(contact) = self.selected_contact().cloned() {
            self.remove(contact.id, contact.name);
        }
    }

    // ------------------------------------------------------------------
    // Modals
    // ------------------------------------------------------------------

    /// Answer the modal on screen. Alerts are dismissed whatever the answer.
    pub fn answer_modal(&mut self, accepted: bool) {
        if let Some(request) = self.modals.pop_front() {
            request.answer(accepted);
        }
    }

    pub fn dismiss_modal(&mut self) {
        self.answer_modal(false);
    }

    /// Wait until a modal is on screen.
    pub async fn wait_for_modal(&mut self) -> bool {
        self.drain_modal_requests();
        if !self.modals.is_empty() {
            return true;
        }
        let Some(rx) = self.modal_rx.as_mut() else {
            return false;
        };
        match rx.recv().await {
            Some(request) => {
                self.modals.push_back(request);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Loop hooks
    // ------------------------------------------------------------------

    /// Expire timed messages. Call once per frame.
    pub fn tick(&mut self) {
        self.session.tick(Instant::now());
    }

    /// Apply every completion that has arrived. Returns how many were applied.
    pub fn process_completions(&mut self) -> usize {
        let now = Instant::now();
        let mut applied = 0;
        while let Ok(event) = self.completion_rx.try_recv() {
            if self.handle_completion(event, now) {
                applied += 1;
            }
        }
        self.drain_modal_requests();
        applied
    }

    /// Wait for the next completion and handle it. Returns whether it was
    /// applied (`false` when it had been superseded).
    pub async fn wait_for_completion(&mut self) -> bool {
        let Some(event) = self.completion_rx.recv().await else {
            return false;
        };
        let applied = self.handle_completion(event, Instant::now());
        self.drain_modal_requests();
        applied
    }

    /// Abort every in-flight request; nothing dispatched so far will be
    /// applied afterwards.
    pub fn shutdown(&mut self) {
        let aborted = self.tasks.len();
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
        self.requests.clear();
        self.modals.clear();
        while self.completion_rx.try_recv().is_ok() {}
        if aborted > 0 {
            tracing::debug!(aborted, "Aborted in-flight requests");
        }
        self.should_quit = true;
    }

    /// Mutations are never superseded: a second one on the same contact is
    /// refused until the first completes.
    fn refuse_if_busy(&mut self, id: &ContactId, name: &str, now: Instant) -> bool {
        if !self.requests.is_in_flight(&RequestKey::Id(id.clone())) {
            return false;
        }
        tracing::debug!(%id, "Refusing overlapping change");
        self.session.show_error(messages::change_pending(name), now);
        true
    }

    fn dispatch<F>(&mut self, key: RequestKey, request: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let ticket = self.requests.issue(key);
        tracing::debug!(key = ?ticket.key(), seq = ticket.seq(), "Dispatching request");

        let (abort_handle, abort_registration) = AbortHandle::new_pair();
        self.tasks.insert(ticket.seq(), abort_handle);

        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            if let Ok(completion) = Abortable::new(request, abort_registration).await {
                if tx.send((ticket, completion)).is_err() {
                    tracing::debug!("Completion receiver gone; dropping result");
                }
            }
        });
    }

    fn handle_completion(&mut self, (ticket, completion): CompletionEvent, now: Instant) -> bool {
        self.tasks.remove(&ticket.seq());
        if !self.requests.finish(&ticket) {
            tracing::debug!(key = ?ticket.key(), seq = ticket.seq(), "Dropping superseded completion");
            return false;
        }
        match self.session.apply(completion, now) {
            Effect::None => {}
            Effect::Alert(text) => self.prompter.alert(text),
        }
        true
    }

    fn drain_modal_requests(&mut self) {
        if let Some(rx) = self.modal_rx.as_mut() {
            while let Ok(request) = rx.try_recv() {
                self.modals.push_back(request);
            }
        }
    }
}

fn remote_failure(err: &ClientError) -> RemoteFailure {
    tracing::warn!(error = %err, "Remote call failed");
    let failure = RemoteFailure::new(err.to_string());
    match err.server_message() {
        Some(message) => failure.with_server_message(message),
        None => failure,
    }
}
