//! Domain layer: the hierarchical selection model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod filters;
pub mod node;
pub mod payload;
pub mod reconciler;
pub mod search;
pub mod selection;
pub mod store;
pub mod tree_view;

pub use error::{DanglingParent, DomainError, DomainResult, EMPTY_SELECTION_MESSAGE};
pub use filters::{
    parse_bathroom_token, BedroomSelection, DefaultsConfig, ScalarFilters, ANY_TOKEN,
    BEDROOM_CEILING, BEDROOM_TOP_BUCKET,
};
pub use node::{Node, NodeId, DEFAULT_HIDDEN_ROOT, MERGED_ROOT_SENTINEL, ROOT_SENTINEL};
pub use payload::SubmissionPayload;
pub use reconciler::DefaultsReconciler;
pub use search::{SearchIndex, SearchOutcome, SearchResult};
pub use selection::{Anchor, SelectionSet};
pub use store::NodeStore;
pub use tree_view::TreeView;
