//! User-facing texts for action outcomes.
//!
//! One place for the wording so the reducer, the engine and the tests agree.

use crate::RemoteFailure;

pub const EMPTY_NAME: &str = "Name must not be empty";

#[must_use]
pub fn replace_prompt(name: &str) -> String {
    format!("{name} is already added to phonebook, replace the old number with a new one?")
}

#[must_use]
pub fn delete_prompt(name: &str) -> String {
    format!("delete {name}?")
}

#[must_use]
pub fn added(name: &str) -> String {
    format!("{name} added!")
}

#[must_use]
pub fn number_changed(name: &str) -> String {
    format!("{name} number changed!")
}

#[must_use]
pub fn deleted(name: &str) -> String {
    format!("{name} deleted!")
}

/// Create failures show the server's own `error` text when it sent one.
#[must_use]
pub fn add_failed(name: &str, failure: &RemoteFailure) -> String {
    match failure.server_message.as_deref() {
        Some(message) if !message.trim().is_empty() => message.to_string(),
        _ => format!("Couldn't add {name}: {}", failure.reason),
    }
}

#[must_use]
pub fn change_failed(name: &str) -> String {
    format!("Couldn't change {name}'s number")
}

#[must_use]
pub fn delete_failed(name: &str) -> String {
    format!("couldn't delete {name}")
}

#[must_use]
pub fn load_failed(failure: &RemoteFailure) -> String {
    format!("Couldn't load contacts: {}", failure.reason)
}

#[must_use]
pub fn already_saving(name: &str) -> String {
    format!("{name} is already being saved")
}

/// An update or delete for this contact has not finished yet.
#[must_use]
pub fn change_pending(name: &str) -> String {
    format!("{name} has a change in progress")
}
