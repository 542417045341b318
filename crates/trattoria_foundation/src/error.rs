//! Error types for the Trattoria system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Operations check before they mutate, so an `Err` leaves the entity graph
//! unchanged unless the operation documents otherwise.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// Result type for Trattoria operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Trattoria operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a validation error for a scalar or conditional attribute.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation {
            field: field.into(),
            message: message.into(),
        })
    }

    /// Creates an association error.
    #[must_use]
    pub fn association(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Association(message.into()))
    }

    /// Creates an internal error for a misconfigured store.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Creates an identity conflict error.
    #[must_use]
    pub fn identity_conflict(kind: &str, id: EntityId) -> Self {
        Self::new(ErrorKind::IdentityConflict {
            kind: kind.to_string(),
            id,
        })
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(kind: &str, id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound {
            kind: kind.to_string(),
            id,
        })
    }

    /// Creates a missing persistence source error.
    #[must_use]
    pub fn not_found(source: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound(source.into()))
    }

    /// Creates a corrupt persisted data error.
    #[must_use]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CorruptData(message.into()))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation { .. })
    }

    /// Returns true if this is an association error.
    #[must_use]
    pub fn is_association(&self) -> bool {
        matches!(self.kind, ErrorKind::Association(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A scalar or conditional attribute is invalid.
    #[error("validation failed for {field}: {message}")]
    Validation {
        /// The attribute that failed validation.
        field: String,
        /// Why it failed.
        message: String,
    },

    /// A link could not be created, removed, or reassigned.
    #[error("association error: {0}")]
    Association(String),

    /// An entity with the same identity already exists in its extent.
    #[error("identity conflict: {kind} {id} already exists")]
    IdentityConflict {
        /// Kind name of the extent.
        kind: String,
        /// The conflicting identity.
        id: EntityId,
    },

    /// No live entity has the given identity.
    #[error("entity not found: {kind} {id}")]
    EntityNotFound {
        /// Kind name of the extent that was searched.
        kind: String,
        /// The identity that was not found.
        id: EntityId,
    },

    /// A persistence source does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Persisted content could not be reconstructed.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// Encoding to or decoding from bytes failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File system access failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The public operation that failed.
    pub operation: Option<String>,
    /// Nested steps leading to the failure, outermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
        }
        for frame in &self.stack {
            write!(f, "\n  at {frame}")?;
        }
        Ok(())
    }
}
