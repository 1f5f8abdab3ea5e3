//! Core domain types for the phonebook.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! The client, the state core, the engine and the TUI all speak these types.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod sanitize;
pub mod ui;

pub use sanitize::sanitize_display_text;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Contact identity
// ============================================================================

/// Identifier assigned by the remote collection.
///
/// Opaque to the client: json-server style backends hand out numbers, document
/// stores hand out strings. Either way it is only compared for equality and
/// rendered verbatim into a resource path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ContactId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ContactId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ContactId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// Contact name
// ============================================================================

/// A contact name guaranteed to be non-empty (after trimming).
///
/// The original text is kept verbatim: duplicate detection is an exact string
/// comparison, so trimming here would change which contact a submit targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactName(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Name must not be empty")]
pub struct EmptyNameError;

impl ContactName {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyNameError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyNameError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContactName {
    type Error = EmptyNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ContactName {
    type Error = EmptyNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContactName> for String {
    fn from(value: ContactName) -> Self {
        value.0
    }
}

impl std::ops::Deref for ContactName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ContactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Records
// ============================================================================

/// One phonebook entry as stored by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    #[serde(default)]
    pub number: String,
}

impl Contact {
    #[must_use]
    pub fn new(id: impl Into<ContactId>, name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            number: number.into(),
        }
    }

    /// Full-replace payload for this contact with a different number.
    ///
    /// Every other field is carried over unchanged.
    #[must_use]
    pub fn with_number(&self, number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            ..self.clone()
        }
    }
}

/// Body of a create request; the remote collection assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: ContactName,
    pub number: String,
}

impl NewContact {
    #[must_use]
    pub fn new(name: ContactName, number: impl Into<String>) -> Self {
        Self {
            name,
            number: number.into(),
        }
    }
}
