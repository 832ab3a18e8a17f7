//! Arena-backed node catalog with parent/child indices built once at load.

use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DanglingParent, DomainError, DomainResult};
use crate::domain::node::{is_root_sentinel, Node, NodeId, DEFAULT_HIDDEN_ROOT, ROOT_SENTINEL};

/// Immutable node catalog.
///
/// Nodes are stored in a generational arena; `order` keeps catalog order and the
/// maps resolve ids, parent ids and names to arena indices.
#[derive(Debug)]
pub struct NodeStore {
    arena: Arena<Node>,
    order: Vec<Index>,
    by_id: HashMap<NodeId, Index>,
    by_parent: HashMap<NodeId, Vec<Index>>,
    by_name: HashMap<String, Index>,
    hidden_root_name: String,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl NodeStore {
    /// Store without any nodes ("catalog unavailable").
    pub fn empty() -> Self {
        Self {
            arena: Arena::new(),
            order: Vec::new(),
            by_id: HashMap::new(),
            by_parent: HashMap::new(),
            by_name: HashMap::new(),
            hidden_root_name: DEFAULT_HIDDEN_ROOT.to_string(),
        }
    }

    /// Build a store, failing if any parent reference dangles or an id repeats.
    pub fn load(nodes: Vec<Node>) -> DomainResult<Self> {
        match Self::load_best_effort(nodes) {
            (store, None) => Ok(store),
            (_, Some(err)) => Err(err),
        }
    }

    /// Build a store from whatever is usable.
    ///
    /// Duplicate ids keep their first record. The malformed condition, if any,
    /// is returned alongside the store so the caller can report it.
    pub fn load_best_effort(nodes: Vec<Node>) -> (Self, Option<DomainError>) {
        let mut store = Self::empty();
        let mut duplicates = Vec::new();

        for node in nodes {
            if store.by_id.contains_key(&node.id) {
                duplicates.push(node.id);
                continue;
            }
            let (id, parent_id, name) = (node.id, node.parent_id, node.name.clone());
            let idx = store.arena.insert(node);
            store.order.push(idx);
            store.by_id.insert(id, idx);
            store.by_parent.entry(parent_id).or_default().push(idx);
            store.by_name.entry(name).or_insert(idx);
        }

        let dangling: Vec<DanglingParent> = store
            .iter()
            .filter(|n| !is_root_sentinel(n.parent_id) && !store.by_id.contains_key(&n.parent_id))
            .map(|n| DanglingParent {
                id: n.id,
                parent_id: n.parent_id,
            })
            .collect();

        debug!(
            "load: {} nodes, {} dangling, {} duplicates",
            store.len(),
            dangling.len(),
            duplicates.len()
        );

        let problem = if dangling.is_empty() && duplicates.is_empty() {
            None
        } else {
            Some(DomainError::MalformedCatalog {
                dangling,
                duplicates,
            })
        };
        (store, problem)
    }

    /// Replace the name of the top-level node hidden from display.
    pub fn with_hidden_root(mut self, name: impl Into<String>) -> Self {
        self.hidden_root_name = name.into();
        self
    }

    pub fn hidden_root_name(&self) -> &str {
        &self.hidden_root_name
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All nodes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(move |&idx| self.arena.get(idx))
    }

    pub fn find_by_id(&self, id: NodeId) -> DomainResult<&Node> {
        self.by_id
            .get(&id)
            .and_then(|&idx| self.arena.get(idx))
            .ok_or_else(|| DomainError::NotFound(format!("node id {id}")))
    }

    pub fn find_by_name(&self, name: &str) -> DomainResult<&Node> {
        self.by_name
            .get(name)
            .and_then(|&idx| self.arena.get(idx))
            .ok_or_else(|| DomainError::NotFound(format!("area {name:?}")))
    }

    /// Direct children in catalog order.
    pub fn children_of(&self, id: NodeId) -> Vec<&Node> {
        self.by_parent
            .get(&id)
            .map(|children| {
                children
                    .iter()
                    .filter_map(|&idx| self.arena.get(idx))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.by_parent.get(&id).is_some_and(|c| !c.is_empty())
    }

    /// All transitive children, parent-first, each subtree in catalog order.
    #[instrument(level = "trace", skip(self))]
    pub fn descendants_of(&self, id: NodeId) -> DomainResult<Vec<&Node>> {
        let mut result = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut stack: Vec<&Node> = self.children_of(id).into_iter().rev().collect();

        while let Some(node) = stack.pop() {
            if !visited.insert(node.id) {
                return Err(DomainError::CycleDetected(node.id));
            }
            result.push(node);
            // Reverse push keeps catalog order on pop
            for child in self.children_of(node.id).into_iter().rev() {
                stack.push(child);
            }
        }

        Ok(result)
    }

    /// Ancestor ids from the immediate parent upwards, excluding the root sentinel.
    ///
    /// The walk stops at `ROOT_SENTINEL` or at a parent id that resolves to no
    /// node, so a catalog without a node 1 ends chains at `MERGED_ROOT_SENTINEL`.
    #[instrument(level = "trace", skip(self))]
    pub fn ancestor_chain(&self, id: NodeId) -> DomainResult<Vec<NodeId>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut current = self.find_by_id(id)?.parent_id;

        while current != ROOT_SENTINEL {
            let Ok(parent) = self.find_by_id(current) else {
                break;
            };
            if !visited.insert(parent.id) {
                return Err(DomainError::CycleDetected(parent.id));
            }
            chain.push(parent.id);
            current = parent.parent_id;
        }

        Ok(chain)
    }

    /// Top-level nodes shown in the tree, in catalog order, without the hidden merged root.
    pub fn roots(&self) -> Vec<&Node> {
        self.iter()
            .filter(|n| n.is_top_level() && n.name != self.hidden_root_name)
            .collect()
    }
}
