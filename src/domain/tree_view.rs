/*
The displayed tree starts at `NodeStore::roots()`, so the hidden merged root
never shows up even when a search result lists it as an ancestor.
 */
use std::collections::HashSet;

use termtree::Tree;

use crate::domain::node::{Node, NodeId};
use crate::domain::search::SearchResult;
use crate::domain::selection::SelectionSet;
use crate::domain::store::NodeStore;

pub trait TreeView {
    /// Render the area tree, optionally narrowed to a search result and
    /// annotated with the current selection.
    fn to_display_tree(
        &self,
        filter: Option<&SearchResult>,
        selection: Option<&SelectionSet>,
    ) -> Tree<String>;
}

impl TreeView for NodeStore {
    fn to_display_tree(
        &self,
        filter: Option<&SearchResult>,
        selection: Option<&SelectionSet>,
    ) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("No areas loaded".to_string());
        }

        fn label(node: &Node, selection: Option<&SelectionSet>) -> String {
            let Some(sel) = selection else {
                return node.name.clone();
            };
            if let Some(anchor) = sel.anchors().iter().find(|a| a.id == node.id) {
                if anchor.descendant_count > 0 {
                    return format!("[x] {} (+{})", node.name, anchor.descendant_count);
                }
                return format!("[x] {}", node.name);
            }
            if sel.is_selected(node.id) {
                format!("[x] {}", node.name)
            } else {
                format!("[ ] {}", node.name)
            }
        }

        fn build_tree(
            store: &NodeStore,
            node: &Node,
            filter: Option<&SearchResult>,
            selection: Option<&SelectionSet>,
            visited: &mut HashSet<NodeId>,
        ) -> Tree<String> {
            let mut tree = Tree::new(label(node, selection));
            if !visited.insert(node.id) {
                return tree;
            }
            for child in store.children_of(node.id) {
                if filter.is_some_and(|f| !f.is_visible(child.id)) {
                    continue;
                }
                tree.push(build_tree(store, child, filter, selection, visited));
            }
            tree
        }

        let title = match filter {
            Some(f) => format!("Areas matching {:?}", f.term),
            None => "Areas".to_string(),
        };
        let mut root = Tree::new(title);
        let mut visited = HashSet::new();
        for node in self.roots() {
            if filter.is_some_and(|f| !f.is_visible(node.id)) {
                continue;
            }
            root.push(build_tree(self, node, filter, selection, &mut visited));
        }
        root
    }
}
