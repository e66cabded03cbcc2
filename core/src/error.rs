//! Error types for the finance API client.
//!
//! # Design
//! Every call can fail in one of three ways that callers care about: the
//! transport could not deliver a readable envelope (`Transport`), the server
//! rejected the request through the envelope (`Domain`), or the input was
//! incomplete before anything was sent (`Validation`). They share one
//! `ApiError` so call sites need a single failure path, and `kind()` tells
//! them apart when a caller needs to. `Session` covers the local persistence
//! medium behind the credential.

use thiserror::Error;

/// Message shown when the server rejects a request without saying why.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Message shown when required form fields are blank.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";

/// Errors returned by the request pipeline and the domain clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with `success: false`. Displays exactly the
    /// server's message.
    #[error("{message}")]
    Domain { message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Coarse classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Domain,
    Validation,
    Session,
}

impl ApiError {
    pub fn domain(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            ApiError::Domain {
                message: DEFAULT_ERROR_MESSAGE.to_string(),
            }
        } else {
            ApiError::Domain { message }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Domain { .. } => ErrorKind::Domain,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Session(_) => ErrorKind::Session,
        }
    }
}

/// The round-trip did not produce a usable envelope.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS, TLS or body-read failure.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx status whose body is not an envelope.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx reply that is not an envelope, or whose `data` has the wrong shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request: {0}")]
    Encode(String),
}

/// Input rejected locally; no request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required fields were blank. Holds their wire names in form order.
    #[error("{}", REQUIRED_FIELDS_MESSAGE)]
    MissingFields(Vec<&'static str>),

    #[error("Nothing to update")]
    EmptyUpdate,
}

impl ValidationError {
    pub fn missing(&self) -> &[&'static str] {
        match self {
            ValidationError::MissingFields(fields) => fields,
            ValidationError::EmptyUpdate => &[],
        }
    }
}

/// Collects blank required fields and turns them into a `ValidationError`.
#[derive(Debug, Default)]
pub(crate) struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(mut self, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.missing.push(field);
        }
        self
    }

    pub(crate) fn present<T>(mut self, field: &'static str, value: Option<&T>) -> Self {
        if value.is_none() {
            self.missing.push(field);
        }
        self
    }

    pub(crate) fn check(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(self.missing))
        }
    }
}

/// The credential's persistence medium could not be read or written.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage is corrupt: {0}")]
    Format(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_displays_server_message() {
        let err = ApiError::domain("Not found");
        assert_eq!(err.to_string(), "Not found");
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn blank_domain_message_falls_back() {
        let err = ApiError::domain("  ");
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn required_collects_blank_fields_in_order() {
        let err = Required::new()
            .text("category", "")
            .text("name", "Ann")
            .present::<u32>("amount", None)
            .check()
            .unwrap_err();
        assert_eq!(err.missing(), &["category", "amount"]);
        assert_eq!(err.to_string(), REQUIRED_FIELDS_MESSAGE);
    }

    #[test]
    fn validation_converts_into_api_error() {
        let err: ApiError = ValidationError::MissingFields(vec!["email"]).into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn transport_status_mentions_code() {
        let err: ApiError = TransportError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
    }
}
