//! areapick: hierarchical area selection for listing-score queries.
//!
//! A flat catalog of `{id, name, parent_id}` records becomes a [`domain::NodeStore`];
//! a [`application::services::SelectorSession`] owns the selection, the scalar
//! filters and the defaults check, and builds the payload for the scoring service.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
