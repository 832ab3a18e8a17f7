//! Catalog node and the sentinel parent ids.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog node.
pub type NodeId = i64;

/// `parent_id` meaning "no parent".
pub const ROOT_SENTINEL: NodeId = 0;

/// `parent_id` of the alternate top-level root that merges two forests.
pub const MERGED_ROOT_SENTINEL: NodeId = 1;

/// Name of the synthetic merged root, hidden from the displayed tree.
pub const DEFAULT_HIDDEN_ROOT: &str = "NYC and NJ";

/// One named area in the flat catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub parent_id: NodeId,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, parent_id: NodeId) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
        }
    }

    /// True when the parent id is one of the root sentinels.
    pub fn is_top_level(&self) -> bool {
        is_root_sentinel(self.parent_id)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub fn is_root_sentinel(id: NodeId) -> bool {
    id == ROOT_SENTINEL || id == MERGED_ROOT_SENTINEL
}
