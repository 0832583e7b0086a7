//! Failure taxonomy for callable operations.
//!
//! Every operation fails with a [`CallError`] carrying one of six kinds.
//! Clients switch on the kind; the message is display text. Infrastructure
//! failures are folded into `Internal` so storage details never leak into
//! responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use doc_store::StoreError;

use crate::directory::DirectoryError;

pub type Result<T> = std::result::Result<T, CallError>;

/// The closed set of error codes operations can return.
///
/// Serialized as the kebab-case code itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Unauthenticated,
    InvalidArgument,
    NotFound,
    PermissionDenied,
    AlreadyExists,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::InvalidArgument => "invalid-argument",
            ErrorKind::NotFound => "not-found",
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::AlreadyExists => "already-exists",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failed callable operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct CallError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CallError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl From<StoreError> for CallError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => CallError::not_found(err.to_string()),
            other => CallError::internal(other.to_string()),
        }
    }
}

impl From<DirectoryError> for CallError {
    fn from(err: DirectoryError) -> Self {
        CallError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for CallError {
    fn from(err: serde_json::Error) -> Self {
        CallError::internal(err.to_string())
    }
}
