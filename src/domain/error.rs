//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent violations of the class/tree model.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NotFound(NodeId),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("class {class}: leader {leader} is not a member")]
    MissingLeader { class: String, leader: String },

    #[error("class not found: {0}")]
    MissingClass(String),

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("invalid class {class}: {reason}")]
    InvalidClass { class: String, reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
