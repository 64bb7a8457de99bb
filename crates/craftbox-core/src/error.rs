//! Unified application error types for CraftBox.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;

use thiserror::Error;

use crate::types::id::NodeId;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested node or resource was not found.
    NotFound,
    /// Input validation failed (empty name, name containing the separator).
    Validation,
    /// A structurally illegal move (into itself, into a descendant, no-op).
    InvalidMove,
    /// A conflict occurred (duplicate sibling name).
    Conflict,
    /// A subtree operation partially completed; `AppError::remaining` names
    /// the nodes not yet processed.
    PartialFailure,
    /// The record store is unreachable or returned an error.
    Database,
    /// The binary content store is unreachable or returned an error.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::InvalidMove => write!(f, "INVALID_MOVE"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::PartialFailure => write!(f, "PARTIAL_FAILURE"),
            Self::Database => write!(f, "DATABASE"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout CraftBox.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. Subtree operations that stop partway
/// additionally record the ids of the nodes they did not reach in
/// [`AppError::remaining`], so a caller can retry exactly the remainder.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Ids of nodes an interrupted subtree operation has not processed.
    /// Empty for every other error kind.
    pub remaining: Vec<NodeId>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            remaining: Vec::new(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            remaining: Vec::new(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an invalid-move error.
    pub fn invalid_move(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidMove, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a partial-failure error naming the nodes still unprocessed.
    pub fn partial_failure(message: impl Into<String>, remaining: Vec<NodeId>) -> Self {
        Self {
            kind: ErrorKind::PartialFailure,
            message: message.into(),
            remaining,
            source: None,
        }
    }

    /// Create a database (record store) error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a storage (content store) error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is retryable by re-running the same operation.
    ///
    /// Partial failures and backend errors converge under retry because the
    /// recursive routines are idempotent per node; validation and structural
    /// rejections do not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::PartialFailure | ErrorKind::Database | ErrorKind::Storage
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            remaining: self.remaining.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
