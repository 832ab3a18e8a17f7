//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with fake implementations.

use std::io;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::domain::SubmissionPayload;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Outbound scoring service.
pub trait ScoringClient: Send + Sync {
    /// Post the payload and return the raw response body.
    fn submit(&self, payload: &SubmissionPayload) -> Result<String, String>;
}

/// Item for FZF-style selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    /// Display text shown in selector
    pub display: String,
    /// Actual value (area name)
    pub value: String,
}

/// Interactive FZF-style selector abstraction.
pub trait Selector: Send + Sync {
    /// Present items to user and return selected one.
    /// Returns None if user cancels (Esc/Ctrl-C).
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Scoring client posting JSON over blocking HTTP.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    api_url: String,
    http: Client,
}

impl HttpScoringClient {
    pub fn new(api_url: impl Into<String>, timeout_ms: u64) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            api_url: api_url.into(),
            http,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl ScoringClient for HttpScoringClient {
    fn submit(&self, payload: &SubmissionPayload) -> Result<String, String> {
        debug!("submit: POST {} ({} areas)", self.api_url, payload.neighborhood_names.len());
        let resp = self
            .http
            .post(&self.api_url)
            .json(payload)
            .send()
            .map_err(|e| format!("send request: {e}"))?;

        let status = resp.status();
        debug!("submit: status {}", status);
        if !status.is_success() {
            return Err(format!("API error ({})", status.as_u16()));
        }
        resp.text().map_err(|e| format!("read response: {e}"))
    }
}

/// Real selector implementation using skim (FZF-like).
#[derive(Debug, Default)]
pub struct SkimSelector;

impl Selector for SkimSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        use skim::prelude::*;
        use std::io::Cursor;

        if items.is_empty() {
            return Ok(None);
        }

        let input = items
            .iter()
            .map(|i| i.display.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let options = SkimOptionsBuilder::default()
            .prompt(Some(prompt))
            .height(Some("50%"))
            .multi(false)
            .build()
            .map_err(|e| format!("failed to build skim options: {e}"))?;

        let item_reader = SkimItemReader::default();
        let items_arc = item_reader.of_bufread(Cursor::new(input));

        match Skim::run_with(&options, Some(items_arc)) {
            Some(out) if out.is_abort => Ok(None),
            Some(out) => Ok(out.selected_items.first().and_then(|selected| {
                let display = selected.output().to_string();
                items.iter().find(|i| i.display == display).cloned()
            })),
            None => Ok(None),
        }
    }
}
