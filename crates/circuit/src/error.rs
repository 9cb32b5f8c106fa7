//! Error types for the store and the circuit service

use std::fmt;
use thiserror::Error;

/// Failures raised by the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(e: rusqlite::Error) -> Self {
        DatabaseError::QueryFailed(e.to_string())
    }
}

/// What a not-found error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Tournament,
    Stage,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Player => write!(f, "Player"),
            EntityKind::Tournament => write!(f, "Tournament"),
            EntityKind::Stage => write!(f, "Stage"),
        }
    }
}

/// Errors returned by [`crate::Circuit`] operations
#[derive(Debug, Error)]
pub enum CircuitError {
    /// Submission rejected; nothing was written
    #[error("Invalid stage results: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("Unique identifier already in use: {0}")]
    DuplicateIdentifier(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No fields to update")]
    NothingToUpdate,

    /// Store failure, tagged with the operation that was attempted. Never
    /// retried automatically.
    #[error("Failed to {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: DatabaseError,
    },
}

impl CircuitError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        CircuitError::NotFound { kind, id }
    }

    /// Wrap a store error; use as `.map_err(CircuitError::storage("..."))`
    pub fn storage(operation: &'static str) -> impl FnOnce(DatabaseError) -> CircuitError {
        move |source| CircuitError::Storage { operation, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CircuitError::NotFound { .. })
    }
}

pub type CircuitResult<T> = Result<T, CircuitError>;
