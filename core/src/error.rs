//! Error types for the nutrition API client.
//!
//! # Design
//! Each stage of a request has its own error type so callers can tell a
//! rejected precondition from a network failure or a malformed payload.
//! `RequestError` is the umbrella returned by `Request::fetch` and friends;
//! every stage error converts into it with `?`.

use std::path::PathBuf;

use thiserror::Error;

/// An endpoint precondition failed before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Raised by a `Transport` implementation. Propagated unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, IO, timeout).
    #[error("network error: {message}")]
    Network { message: String },

    /// The server answered with a status the transport refuses to pass on.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// The response body is not valid JSON.
#[derive(Debug, Error)]
#[error("response body is not valid JSON: {source}")]
pub struct DecodeError {
    #[from]
    source: serde_json::Error,
}

/// A raw value could not be turned into a model field.
#[derive(Debug, Error)]
pub enum HydrateError {
    #[error("field `{field}` expects an object")]
    NotAnObject { field: String },

    #[error("field `{field}` expects a list")]
    NotAList { field: String },

    #[error("field `{field}` has an incompatible value: {source}")]
    InvalidField {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while loading credentials or client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{name}` is not set")]
    MissingVariable { name: String },

    #[error("config read error: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {reason}")]
    Parse { reason: String },
}

/// Errors returned by `Request` operations.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Hydrate(#[from] HydrateError),
}
