//! Catalog loading service
//!
//! Reads the flat area catalog and builds a [`NodeStore`] in best-effort mode.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Node, NodeStore};
use crate::infrastructure::traits::FileSystem;

/// Service for loading the area catalog.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Parse the JSON catalog at `path`.
    pub fn read_nodes(&self, path: &Path) -> ApplicationResult<Vec<Node>> {
        debug!("read_nodes: path={}", path.display());
        let content = self.fs.read_to_string(path).or_catalog_unavailable(path)?;
        serde_json::from_str(&content).map_err(|e| ApplicationError::CatalogUnavailable {
            path: path.to_path_buf(),
            message: format!("parse catalog: {e}"),
        })
    }

    /// Load the catalog into a store.
    ///
    /// Dangling parents and duplicate ids are logged and the store is kept,
    /// since partial coverage beats an empty picker.
    pub fn load(&self, path: &Path, hidden_root_name: &str) -> ApplicationResult<NodeStore> {
        let nodes = self.read_nodes(path)?;
        let (store, problem) = NodeStore::load_best_effort(nodes);
        if let Some(problem) = problem {
            warn!("catalog {}: {}", path.display(), problem);
        }
        debug!("load: {} areas from {}", store.len(), path.display());
        Ok(store.with_hidden_root(hidden_root_name))
    }

    /// Like [`load`](Self::load) but an unavailable catalog yields an empty store.
    pub fn load_or_empty(&self, path: &Path, hidden_root_name: &str) -> NodeStore {
        self.load(path, hidden_root_name).unwrap_or_else(|e| {
            warn!("{}", e);
            NodeStore::empty().with_hidden_root(hidden_root_name)
        })
    }
}
