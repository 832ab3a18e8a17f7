//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::CatalogService;
use crate::config::Settings;
use crate::infrastructure::traits::{
    FileSystem, HttpScoringClient, RealFileSystem, ScoringClient, Selector, SkimSelector,
};
use crate::infrastructure::InfraResult;

/// Container holding the boundary implementations and settings.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Scoring service client
    pub scoring: Arc<dyn ScoringClient>,

    /// Interactive picker
    pub selector: Arc<dyn Selector>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let scoring = HttpScoringClient::new(settings.api_url.clone(), settings.timeout_ms)?;
        debug!("ServiceContainer: scoring endpoint {}", scoring.api_url());
        Ok(Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(scoring),
            Arc::new(SkimSelector),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        scoring: Arc<dyn ScoringClient>,
        selector: Arc<dyn Selector>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            scoring,
            selector,
        }
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.fs.clone())
    }
}
