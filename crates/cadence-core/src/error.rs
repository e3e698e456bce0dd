//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Operation, PostStatus};

/// Domain errors - business logic failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation is not legal from the post's current status.
    #[error("Cannot {operation} a post in status {current}")]
    InvalidState {
        current: PostStatus,
        operation: Operation,
        target: Option<PostStatus>,
    },

    /// The transition is legal from this status but its precondition failed.
    #[error("Cannot {operation} a post in status {current}: {reason}")]
    GuardFailed {
        current: PostStatus,
        operation: Operation,
        target: Option<PostStatus>,
        reason: String,
    },

    /// Another writer committed a change to the same post first.
    #[error("Concurrent modification of post {id}")]
    Conflict { id: Uuid },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }

    /// Map a storage failure for the post with the given id.
    pub fn from_repo(err: RepoError, id: Uuid) -> Self {
        match err {
            RepoError::NotFound => Self::post_not_found(id),
            RepoError::Conflict { .. } => Self::Conflict { id },
            RepoError::Duplicate(dup) => Self::Internal(format!("duplicate post id {dup}")),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoError {
    #[error("Entity not found")]
    NotFound,

    #[error("Duplicate entity: {0}")]
    Duplicate(Uuid),

    /// Compare-and-swap failed: the stored revision moved on.
    #[error("Version conflict: expected {expected}, found {actual}")]
    Conflict { expected: u64, actual: u64 },
}
