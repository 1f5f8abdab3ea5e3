//! Client error taxonomy and failure-payload parsing.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Upper bound on how much of a failure body is kept.
pub(crate) const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid collection URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connect, timeout or IO failure before a status arrived.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The collection answered with a non-2xx status.
    #[error("HTTP {status}")]
    Status { status: StatusCode, body: ErrorBody },

    /// A 2xx answer whose body was not the expected JSON.
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    /// The `error` string from the failure payload, if the server sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => body.error(),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Body of a failed response.
///
/// The payload is only *optionally* `{"error": "..."}`; anything else (HTML
/// error pages, empty bodies, other JSON shapes) leaves [`ErrorBody::error`]
/// as `None` instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorBody {
    raw: String,
    error: Option<String>,
}

impl ErrorBody {
    #[must_use]
    pub fn parse(raw: String) -> Self {
        let error = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|payload| {
                payload
                    .get("error")
                    .and_then(Value::as_str)
                    .map(ToString::to_string)
            });
        Self { raw, error }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
