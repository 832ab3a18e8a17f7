//! Name search that keeps each match reachable from the displayed roots.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::domain::node::{Node, NodeId};
use crate::domain::store::NodeStore;

/// Matches for one search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub term: String,
    /// Nodes whose name contains the term, in catalog order.
    pub matches: Vec<Node>,
    /// Union of the ancestor chains of all matches.
    pub visible_ancestor_ids: BTreeSet<NodeId>,
}

impl SearchResult {
    /// True for a match or an ancestor of one.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.visible_ancestor_ids.contains(&id) || self.matches.iter().any(|m| m.id == id)
    }

    pub fn is_match(&self, id: NodeId) -> bool {
        self.matches.iter().any(|m| m.id == id)
    }
}

/// Outcome of a query: either no filtering or a filtered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank term, show the unfiltered tree.
    Inactive,
    Filtered(SearchResult),
}

impl SearchOutcome {
    pub fn result(&self) -> Option<&SearchResult> {
        match self {
            SearchOutcome::Inactive => None,
            SearchOutcome::Filtered(r) => Some(r),
        }
    }
}

/// Read-only search view over a [`NodeStore`].
#[derive(Debug, Clone, Copy)]
pub struct SearchIndex<'a> {
    store: &'a NodeStore,
}

impl<'a> SearchIndex<'a> {
    pub fn new(store: &'a NodeStore) -> Self {
        Self { store }
    }

    /// Case-insensitive substring search over every node name.
    ///
    /// Descendants of a match are not part of the result.
    pub fn query(&self, term: &str) -> SearchOutcome {
        if term.trim().is_empty() {
            return SearchOutcome::Inactive;
        }

        let needle = term.to_lowercase();
        let matches: Vec<Node> = self
            .store
            .iter()
            .filter(|n| n.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let mut visible_ancestor_ids = BTreeSet::new();
        for m in &matches {
            match self.store.ancestor_chain(m.id) {
                Ok(chain) => visible_ancestor_ids.extend(chain),
                Err(e) => warn!("query: no ancestor path for {}: {}", m.name, e),
            }
        }

        debug!(
            "query {:?}: {} matches, {} ancestors",
            term,
            matches.len(),
            visible_ancestor_ids.len()
        );
        SearchOutcome::Filtered(SearchResult {
            term: term.to_string(),
            matches,
            visible_ancestor_ids,
        })
    }
}
