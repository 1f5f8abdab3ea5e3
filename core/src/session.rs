//! The owned application-state record and its completion reducer.

use std::time::Instant;

use phonebook_types::ui::{DraftInput, Focus};
use phonebook_types::{Contact, ContactId, EmptyNameError};

use crate::plan::{SubmitPlan, plan_submit};
use crate::slot::MessageSlot;
use crate::{filter, messages};

/// Lifecycle of the contact list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

/// Why a remote call failed, reduced to what the session needs to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    /// Short description of the failure (status line or transport error).
    pub reason: String,
    /// The `error` field from the failure payload, when there was one.
    pub server_message: Option<String>,
}

impl RemoteFailure {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            server_message: None,
        }
    }

    #[must_use]
    pub fn with_server_message(mut self, message: impl Into<String>) -> Self {
        self.server_message = Some(message.into());
        self
    }
}

/// Result of a remote call, delivered back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Loaded(Result<Vec<Contact>, RemoteFailure>),
    Created {
        name: String,
        result: Result<Contact, RemoteFailure>,
    },
    Updated {
        name: String,
        id: ContactId,
        result: Result<Contact, RemoteFailure>,
    },
    Deleted {
        name: String,
        id: ContactId,
        result: Result<(), RemoteFailure>,
    },
    /// The user declined a confirmation; nothing was sent.
    Declined,
}

/// Follow-up the caller must perform after applying a completion.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Show a blocking alert with this text.
    Alert(String),
}

/// A mutation the server acknowledged while a load was in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Acknowledged {
    Created(Contact),
    Updated(ContactId, Contact),
    Deleted(ContactId),
}

/// Everything the phonebook screen shows, owned in one place.
#[derive(Debug, Default)]
pub struct Session {
    contacts: Vec<Contact>,
    load_state: LoadState,
    /// Replayed over the next loaded snapshot, which may predate them.
    acknowledged: Vec<Acknowledged>,
    filter: DraftInput,
    draft_name: DraftInput,
    draft_number: DraftInput,
    notification: MessageSlot,
    error: MessageSlot,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[must_use]
    pub fn visible_contacts(&self) -> Vec<&Contact> {
        filter::visible_contacts(&self.contacts, self.filter.text())
    }

    #[must_use]
    pub fn filter(&self) -> &DraftInput {
        &self.filter
    }

    #[must_use]
    pub fn draft_name(&self) -> &DraftInput {
        &self.draft_name
    }

    #[must_use]
    pub fn draft_number(&self) -> &DraftInput {
        &self.draft_number
    }

    #[must_use]
    pub fn notification(&self) -> Option<&str> {
        self.notification.text()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.text()
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter.set_text(text);
    }

    pub fn set_draft_name(&mut self, text: impl Into<String>) {
        self.draft_name.set_text(text);
    }

    pub fn set_draft_number(&mut self, text: impl Into<String>) {
        self.draft_number.set_text(text);
    }

    /// The editable buffer behind a focus, if it has one.
    pub fn input_mut(&mut self, focus: Focus) -> Option<&mut DraftInput> {
        match focus {
            Focus::Filter => Some(&mut self.filter),
            Focus::Name => Some(&mut self.draft_name),
            Focus::Number => Some(&mut self.draft_number),
            Focus::List => None,
        }
    }

    #[must_use]
    pub fn input(&self, focus: Focus) -> Option<&DraftInput> {
        match focus {
            Focus::Filter => Some(&self.filter),
            Focus::Name => Some(&self.draft_name),
            Focus::Number => Some(&self.draft_number),
            Focus::List => None,
        }
    }

    pub fn notify(&mut self, text: impl Into<String>, now: Instant) {
        self.notification.set(text, now);
    }

    pub fn show_error(&mut self, text: impl Into<String>, now: Instant) {
        self.error.set(text, now);
    }

    pub fn begin_load(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Consume the drafts and decide what the submit should do.
    ///
    /// Drafts are cleared whatever the outcome. A blank name shows an error
    /// and yields `Err`.
    pub fn take_submission(&mut self, now: Instant) -> Result<SubmitPlan, EmptyNameError> {
        let name = self.draft_name.take_text();
        let number = self.draft_number.take_text();
        let plan = plan_submit(&self.contacts, &name, &number);
        if let Err(err) = &plan {
            self.error.set(err.to_string(), now);
        }
        plan
    }

    /// Expire messages whose deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        self.notification.expire(now);
        self.error.expire(now);
    }

    /// Fold a remote outcome into the session.
    pub fn apply(&mut self, completion: Completion, now: Instant) -> Effect {
        match completion {
            Completion::Loaded(Ok(contacts)) => {
                tracing::debug!(count = contacts.len(), "Contacts loaded");
                self.contacts = contacts;
                self.load_state = LoadState::Loaded;
                self.replay_acknowledged();
            }
            Completion::Loaded(Err(failure)) => {
                self.acknowledged.clear();
                let message = messages::load_failed(&failure);
                self.load_state = LoadState::Failed(message.clone());
                self.error.set(message, now);
            }
            Completion::Created {
                name,
                result: Ok(contact),
            } => {
                self.record(Acknowledged::Created(contact.clone()));
                self.insert_created(contact);
                self.notification.set(messages::added(&name), now);
            }
            Completion::Created {
                name,
                result: Err(failure),
            } => {
                self.error.set(messages::add_failed(&name, &failure), now);
            }
            Completion::Updated {
                name,
                id,
                result: Ok(contact),
            } => {
                self.record(Acknowledged::Updated(id.clone(), contact.clone()));
                self.replace_updated(&id, contact);
                self.notification.set(messages::number_changed(&name), now);
            }
            Completion::Updated {
                name,
                result: Err(_),
                ..
            } => {
                self.error.set(messages::change_failed(&name), now);
            }
            Completion::Deleted {
                name,
                id,
                result: Ok(()),
            } => {
                self.contacts.retain(|c| c.id != id);
                self.record(Acknowledged::Deleted(id));
                self.notification.set(messages::deleted(&name), now);
            }
            Completion::Deleted {
                name,
                result: Err(_),
                ..
            } => {
                return Effect::Alert(messages::delete_failed(&name));
            }
            Completion::Declined => {}
        }
        Effect::None
    }

    fn record(&mut self, change: Acknowledged) {
        if self.load_state == LoadState::Loading {
            self.acknowledged.push(change);
        }
    }

    fn replay_acknowledged(&mut self) {
        let changes = std::mem::take(&mut self.acknowledged);
        if !changes.is_empty() {
            tracing::debug!(count = changes.len(), "Replaying changes over loaded list");
        }
        for change in changes {
            match change {
                Acknowledged::Created(contact) => self.insert_created(contact),
                Acknowledged::Updated(id, contact) => self.replace_updated(&id, contact),
                Acknowledged::Deleted(id) => self.contacts.retain(|c| c.id != id),
            }
        }
    }

    fn replace_updated(&mut self, id: &ContactId, contact: Contact) {
        match self.contacts.iter_mut().find(|c| &c.id == id) {
            Some(slot) => *slot = contact,
            None => tracing::debug!(%id, "Updated contact no longer in list"),
        }
    }

    /// Append a created contact, unless a reload already brought it in.
    fn insert_created(&mut self, contact: Contact) {
        if let Some(slot) = self.contacts.iter_mut().find(|c| c.id == contact.id) {
            *slot = contact;
        } else {
            self.contacts.push(contact);
        }
    }
}
