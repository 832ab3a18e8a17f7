//! Ordered set of selected areas with cascade semantics.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::domain::node::{Node, NodeId};
use crate::domain::store::NodeStore;

/// A node the user chose explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub id: NodeId,
    pub name: String,
    /// Descendants that entered the set with this anchor and are still selected.
    pub descendant_count: usize,
}

/// Selected areas in user-action order, unique by id.
///
/// Selecting a node pulls in its whole subtree; only the chosen node becomes an
/// [`Anchor`]. Removing an anchor removes its subtree as a unit. There is no
/// reference counting: a descendant shared with another anchor goes too.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    members: Vec<Node>,
    ids: HashSet<NodeId>,
    anchors: Vec<Anchor>,
    /// Derived member id to the anchor that pulled it in.
    owners: HashMap<NodeId, NodeId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set by selecting each resolvable name in order.
    pub fn from_names<S: AsRef<str>>(store: &NodeStore, names: &[S]) -> Self {
        let mut set = Self::new();
        for name in names {
            match store.find_by_name(name.as_ref()) {
                Ok(node) => {
                    set.select(store, node);
                }
                Err(e) => debug!("from_names: skipping {}: {}", name.as_ref(), e),
            }
        }
        set
    }

    /// Select `node` and every descendant not yet present.
    ///
    /// Returns `None` if the node is already a member, otherwise the descendants
    /// added by this call (empty for leaves). Its length is the anchor's badge.
    pub fn select(&mut self, store: &NodeStore, node: &Node) -> Option<Vec<Node>> {
        if self.ids.contains(&node.id) {
            debug!("select: {} already selected", node.name);
            return None;
        }

        // A cycle below the node leaves it childless
        let descendants = store.descendants_of(node.id).unwrap_or_else(|e| {
            warn!("select: treating {} as childless: {}", node.name, e);
            Vec::new()
        });

        self.push(node.clone());
        let added: Vec<Node> = descendants
            .into_iter()
            .filter(|d| !self.ids.contains(&d.id))
            .cloned()
            .collect();
        for d in &added {
            self.push(d.clone());
            self.owners.insert(d.id, node.id);
        }

        self.anchors.push(Anchor {
            id: node.id,
            name: node.name.clone(),
            descendant_count: added.len(),
        });
        debug!("select: {} (+{})", node.name, added.len());
        Some(added)
    }

    /// Remove `id`; an anchor takes its whole subtree with it.
    ///
    /// Returns the removed ids in set order.
    pub fn deselect(&mut self, store: &NodeStore, id: NodeId) -> Vec<NodeId> {
        if !self.ids.contains(&id) {
            return Vec::new();
        }

        let mut doomed = HashSet::from([id]);
        if self.is_anchor(id) {
            match store.descendants_of(id) {
                Ok(descendants) => doomed.extend(descendants.iter().map(|d| d.id)),
                Err(e) => warn!("deselect: removing {} alone: {}", id, e),
            }
        }

        let removed: Vec<NodeId> = self
            .members
            .iter()
            .map(|m| m.id)
            .filter(|m| doomed.contains(m))
            .collect();

        self.members.retain(|m| !doomed.contains(&m.id));
        self.anchors.retain(|a| !doomed.contains(&a.id));
        for r in &removed {
            self.ids.remove(r);
            // Surviving anchors keep a live badge
            if let Some(owner) = self.owners.remove(r) {
                if let Some(anchor) = self.anchors.iter_mut().find(|a| a.id == owner) {
                    anchor.descendant_count = anchor.descendant_count.saturating_sub(1);
                }
            }
        }
        debug!("deselect: {} removed {} node(s)", id, removed.len());
        removed
    }

    /// Replace the whole set with a fresh selection of `names`.
    pub fn reset<S: AsRef<str>>(&mut self, store: &NodeStore, names: &[S]) {
        *self = Self::from_names(store, names);
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_anchor(&self, id: NodeId) -> bool {
        self.anchors.iter().any(|a| a.id == id)
    }

    /// Anchors in selection order, the removable units.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn members(&self) -> &[Node] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Names of all members in order; this is the submission payload.
    pub fn to_name_list(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    fn push(&mut self, node: Node) {
        self.ids.insert(node.id);
        self.members.push(node);
    }
}
