//! Error types for the API client and the stores built on it.
//!
//! # Design
//! `NotFound` and `Unauthorized` get dedicated variants because callers
//! branch on them: the HTTP client tears the session down on 401 and views
//! show a different message for a missing record. Every HTTP failure keeps
//! the server's envelope message, when there was one, for display.

use thiserror::Error;

/// Errors returned by `ApiClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound { message: Option<String> },

    /// The server returned 401.
    #[error("unauthorized")]
    Unauthorized { message: Option<String> },

    /// The server returned a non-2xx status other than 401 or 404.
    #[error("HTTP {status}: {body}")]
    HttpError {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connection, timeout, ...).
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// The `message` (or `error`) field of the server's envelope, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { message }
            | ApiError::Unauthorized { message }
            | ApiError::HttpError { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Failure of a store action, carrying a message ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ActionError {
    pub message: String,
}

impl ActionError {
    /// Prefer the server's message; fall back to `fallback`.
    pub fn from_api(error: &ApiError, fallback: &str) -> Self {
        Self {
            message: error.server_message().unwrap_or(fallback).to_string(),
        }
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
