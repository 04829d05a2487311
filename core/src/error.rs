//! Error types for the platform API clients.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the status
//! code and the platform's error message. `ApiError::kind` maps every variant
//! onto the platform's error classification so callers can branch on it.

use std::fmt;

/// Errors returned by every client operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found: {message}")]
    NotFound { message: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The round-trip itself failed (connection refused, timeout, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request could not be assembled, e.g. an upload file is unreadable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Classification of an [`ApiError`], derived from the HTTP status where one
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ContractInvalid,
    Unauthorized,
    Forbidden,
    EntityDoesNotExist,
    NotAllowed,
    Conflict,
    LimitExceeded,
    RangeNotSatisfiable,
    ServiceLocked,
    ServerError,
    ServiceUnavailable,
    Communication,
    Serialization,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::ContractInvalid,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::EntityDoesNotExist,
            405 => ErrorKind::NotAllowed,
            409 => ErrorKind::Conflict,
            413 => ErrorKind::LimitExceeded,
            416 => ErrorKind::RangeNotSatisfiable,
            423 => ErrorKind::ServiceLocked,
            500 => ErrorKind::ServerError,
            503 => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::Unknown,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ContractInvalid => "ContractInvalid",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::EntityDoesNotExist => "EntityDoesNotExist",
            ErrorKind::NotAllowed => "NotAllowed",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::LimitExceeded => "LimitExceeded",
            ErrorKind::RangeNotSatisfiable => "RangeNotSatisfiable",
            ErrorKind::ServiceLocked => "ServiceLocked",
            ErrorKind::ServerError => "ServerError",
            ErrorKind::ServiceUnavailable => "ServiceUnavailable",
            ErrorKind::Communication => "Communication",
            ErrorKind::Serialization => "Serialization",
            ErrorKind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

impl ApiError {
    /// Build the error for a non-2xx response.
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 404 {
            ApiError::NotFound { message }
        } else {
            ApiError::HttpError { status, message }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound { .. } => ErrorKind::EntityDoesNotExist,
            ApiError::HttpError { status, .. } => ErrorKind::from_status(*status),
            ApiError::Transport(_) => ErrorKind::Communication,
            ApiError::DeserializationError(_) | ApiError::SerializationError(_) => {
                ErrorKind::Serialization
            }
            ApiError::InvalidRequest(_) => ErrorKind::ContractInvalid,
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while loading [`crate::config::ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
