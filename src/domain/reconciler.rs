//! Decides whether the form still sits at its defaults.

use std::collections::HashSet;

use crate::domain::filters::{DefaultsConfig, ScalarFilters};
use crate::domain::selection::SelectionSet;
use crate::domain::store::NodeStore;

/// Compares live state against the defaults baseline.
///
/// The baseline name set is what a reset with `defaults.neighborhoods`
/// produces against the store: cascaded descendants included, names missing
/// from the catalog left out.
#[derive(Debug, Clone)]
pub struct DefaultsReconciler {
    defaults: DefaultsConfig,
    baseline: HashSet<String>,
}

impl DefaultsReconciler {
    pub fn new(store: &NodeStore, defaults: &DefaultsConfig) -> Self {
        let baseline = SelectionSet::from_names(store, &defaults.neighborhoods)
            .to_name_list()
            .into_iter()
            .collect();
        Self {
            defaults: defaults.clone(),
            baseline,
        }
    }

    pub fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }

    pub fn is_default(&self, selection: &SelectionSet, scalars: &ScalarFilters) -> bool {
        let names: HashSet<String> = selection.to_name_list().into_iter().collect();
        names.len() == self.baseline.len()
            && names == self.baseline
            && scalars.matches_defaults(&self.defaults)
    }
}
