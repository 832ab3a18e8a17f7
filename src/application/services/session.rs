//! Selector session service
//!
//! Single owner of the selection state. Every user action goes through a
//! `&mut SelectorSession`; mutations re-run the defaults check unless a batch
//! is open.

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    parse_bathroom_token, DefaultsConfig, DefaultsReconciler, DomainError, Node, NodeId,
    NodeStore, ScalarFilters, SearchIndex, SearchOutcome, SelectionSet, SubmissionPayload,
};
use crate::infrastructure::traits::ScoringClient;

/// Live form state: catalog, selection, scalar filters and the reset signal.
#[derive(Debug)]
pub struct SelectorSession {
    store: NodeStore,
    selection: SelectionSet,
    scalars: ScalarFilters,
    default_scalars: ScalarFilters,
    reconciler: DefaultsReconciler,
    batch_depth: usize,
    reset_visible: bool,
}

impl SelectorSession {
    /// Create a session over a loaded store and populate the defaults.
    ///
    /// The default selection is complete before the session is handed out.
    pub fn new(store: NodeStore, defaults: DefaultsConfig) -> ApplicationResult<Self> {
        let default_scalars = ScalarFilters::from_defaults(&defaults)?;
        let reconciler = DefaultsReconciler::new(&store, &defaults);
        let mut session = Self {
            store,
            selection: SelectionSet::new(),
            scalars: default_scalars.clone(),
            default_scalars,
            reconciler,
            batch_depth: 0,
            reset_visible: false,
        };
        session.reset();
        Ok(session)
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn scalars(&self) -> &ScalarFilters {
        &self.scalars
    }

    pub fn defaults(&self) -> &DefaultsConfig {
        self.reconciler.defaults()
    }

    /// Whether the reset control should be shown.
    pub fn reset_visible(&self) -> bool {
        self.reset_visible
    }

    pub fn is_default(&self) -> bool {
        self.reconciler.is_default(&self.selection, &self.scalars)
    }

    // ---------------------------------------------------------------
    // Batching
    // ---------------------------------------------------------------

    /// Defer the defaults check until the matching [`end_batch`](Self::end_batch).
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    pub fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 {
            self.reconcile();
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    /// Run `f` as one batch.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_batch();
        let result = f(self);
        self.end_batch();
        result
    }

    fn after_mutation(&mut self) {
        if !self.in_batch() {
            self.reconcile();
        }
    }

    fn reconcile(&mut self) {
        self.reset_visible = !self.is_default();
        debug!("reconcile: reset_visible={}", self.reset_visible);
    }

    // ---------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------

    /// Select an area and its subtree. See [`SelectionSet::select`].
    #[instrument(level = "debug", skip(self))]
    pub fn select(&mut self, id: NodeId) -> ApplicationResult<Option<Vec<Node>>> {
        let node = self.store.find_by_id(id)?;
        let added = self.selection.select(&self.store, node);
        self.after_mutation();
        Ok(added)
    }

    pub fn select_by_name(&mut self, name: &str) -> ApplicationResult<Option<Vec<Node>>> {
        let id = self.store.find_by_name(name)?.id;
        self.select(id)
    }

    /// Remove an area; anchors take their subtree with them.
    #[instrument(level = "debug", skip(self))]
    pub fn deselect(&mut self, id: NodeId) -> Vec<NodeId> {
        let removed = self.selection.deselect(&self.store, id);
        self.after_mutation();
        removed
    }

    pub fn deselect_by_name(&mut self, name: &str) -> ApplicationResult<Vec<NodeId>> {
        let id = self.store.find_by_name(name)?.id;
        Ok(self.deselect(id))
    }

    /// Filtered view for `term`; selection goes through [`select`](Self::select).
    pub fn search(&self, term: &str) -> SearchOutcome {
        SearchIndex::new(&self.store).query(term)
    }

    // ---------------------------------------------------------------
    // Scalar filters
    // ---------------------------------------------------------------

    /// Set the minimum price; a higher minimum drags the maximum along.
    pub fn set_min_price(&mut self, value: u32) {
        self.scalars.min_price = value;
        if value > self.scalars.max_price {
            self.scalars.max_price = value;
        }
        self.after_mutation();
    }

    /// Set the maximum price; a lower maximum drags the minimum along.
    pub fn set_max_price(&mut self, value: u32) {
        self.scalars.max_price = value;
        if value < self.scalars.min_price {
            self.scalars.min_price = value;
        }
        self.after_mutation();
    }

    /// Click a bedroom button; `None` is "any".
    pub fn toggle_bedroom(&mut self, bucket: Option<u8>) -> ApplicationResult<()> {
        self.scalars.bedrooms.toggle(bucket)?;
        self.after_mutation();
        Ok(())
    }

    pub fn set_bathroom(&mut self, token: &str) -> ApplicationResult<()> {
        parse_bathroom_token(token)?;
        self.scalars.bathroom_token = token.trim().to_string();
        self.after_mutation();
        Ok(())
    }

    pub fn set_fee(&mut self, token: &str) -> ApplicationResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::InvalidToken {
                field: "broker fees",
                value: token.to_string(),
            }
            .into());
        }
        self.scalars.fee_token = token.to_string();
        self.after_mutation();
        Ok(())
    }

    // ---------------------------------------------------------------
    // Reset and submit
    // ---------------------------------------------------------------

    /// Restore selection and scalars to the defaults as one batch.
    pub fn reset(&mut self) {
        self.batch(|s| {
            s.selection
                .reset(&s.store, &s.reconciler.defaults().neighborhoods);
            s.scalars = s.default_scalars.clone();
        });
        debug!("reset: {} areas selected", self.selection.len());
    }

    /// Payload for the current state; refuses an empty selection.
    pub fn payload(&self) -> ApplicationResult<SubmissionPayload> {
        Ok(SubmissionPayload::build(&self.selection, &self.scalars)?)
    }

    /// Build the payload and hand it to the scoring client.
    ///
    /// Returns the raw response body.
    pub fn submit(&self, client: &dyn ScoringClient) -> ApplicationResult<String> {
        let payload = self.payload()?;
        debug!("submit: {:?}", payload);
        client.submit(&payload).map_err(|message| {
            warn!("submit failed: {}", message);
            ApplicationError::Transport { message }
        })
    }
}
