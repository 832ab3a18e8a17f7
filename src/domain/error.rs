//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::NodeId;

/// Message shown to the user when a submission carries no areas.
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one neighborhood";

/// A node whose `parent_id` resolves to neither a node nor a root sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DanglingParent {
    pub id: NodeId,
    pub parent_id: NodeId,
}

/// Domain errors represent violations of the selection model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("malformed catalog: {} dangling parent reference(s), {} duplicate id(s)", .dangling.len(), .duplicates.len())]
    MalformedCatalog {
        dangling: Vec<DanglingParent>,
        duplicates: Vec<NodeId>,
    },

    #[error("cycle detected in area hierarchy at node {0}")]
    CycleDetected(NodeId),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{}", EMPTY_SELECTION_MESSAGE)]
    EmptySelection,

    #[error("invalid {field} token: {value:?}")]
    InvalidToken { field: &'static str, value: String },

    #[error("invalid bedroom bucket: {0} (expected 0..=4)")]
    InvalidBedroomBucket(u8),

    #[error("invalid price range: min {min} > max {max}")]
    InvalidPriceRange { min: u32, max: u32 },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
