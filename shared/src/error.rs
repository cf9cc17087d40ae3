//! Classified service errors and their wire envelope.
//!
//! Every failure that leaves the service boundary is a [`ServiceError`]:
//! an HTTP status code plus a human message. On the wire it is always the
//! single-field object `{"error": "<message>"}`; internal failures are
//! redacted to [`INTERNAL_ERROR_MESSAGE`] so storage details stay in the
//! server logs.

use serde::{Deserialize, Serialize};

/// Message sent in place of the real text of any internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL: u16 = 500;

/// Machine-checkable classification of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something invalid (400)
    BadRequest,
    /// Unexpected failure on the server side (500)
    Internal,
    /// Any other status decoded from a remote response
    Other(u16),
}

/// A classified error carrying a status code and a message.
///
/// Two errors are equal when both code and message match, so a decoded
/// error compares equal to the one the server produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status {code}: {message}")]
pub struct ServiceError {
    code: u16,
    message: String,
}

impl ServiceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::from_status(STATUS_BAD_REQUEST, message)
    }

    /// The message is kept for local logs and never sent to callers.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::from_status(STATUS_INTERNAL, message)
    }

    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code {
            STATUS_BAD_REQUEST => ErrorKind::BadRequest,
            STATUS_INTERNAL => ErrorKind::Internal,
            other => ErrorKind::Other(other),
        }
    }

    /// The text that may be shown to a remote caller.
    pub fn wire_message(&self) -> &str {
        match self.kind() {
            ErrorKind::Internal => INTERNAL_ERROR_MESSAGE,
            _ => &self.message,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.wire_message().to_string(),
        }
    }
}

/// JSON envelope of every failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
