//! Tests for argument parsing and filter application

use std::sync::{Arc, Mutex};

use clap::{CommandFactory, Parser};

use areapick::application::services::SelectorSession;
use areapick::cli::args::{Cli, Commands, FilterArgs};
use areapick::cli::commands::{apply_filters, cmd_pick, pick_items};
use areapick::config::Settings;
use areapick::domain::{DefaultsConfig, SubmissionPayload};
use areapick::exitcode;
use areapick::infrastructure::di::ServiceContainer;
use areapick::infrastructure::traits::{RealFileSystem, ScoringClient, SelectionItem, Selector};
use areapick::util::testing::sample_store;

/// Picks the entry whose display text matches, recording what was offered.
struct FakeSelector {
    pick: Option<String>,
    offered: Mutex<Vec<SelectionItem>>,
}

impl FakeSelector {
    fn picking(display: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            pick: display.map(str::to_string),
            offered: Mutex::new(Vec::new()),
        })
    }
}

impl Selector for FakeSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        _prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        *self.offered.lock().unwrap() = items.to_vec();
        Ok(self
            .pick
            .as_ref()
            .and_then(|d| items.iter().find(|i| &i.display == d).cloned()))
    }
}

struct UnusedScoringClient;

impl ScoringClient for UnusedScoringClient {
    fn submit(&self, _payload: &SubmissionPayload) -> Result<String, String> {
        Err("not expected in these tests".to_string())
    }
}

fn container_with(selector: Arc<FakeSelector>) -> ServiceContainer {
    ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(RealFileSystem),
        Arc::new(UnusedScoringClient),
        selector,
    )
}

fn session() -> SelectorSession {
    SelectorSession::new(sample_store(), DefaultsConfig::default()).unwrap()
}

fn filters_of(args: &[&str]) -> FilterArgs {
    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Some(Commands::Payload { filters }) => filters,
        other => panic!("expected payload command, got {other:?}"),
    }
}

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn given_filter_flags_when_parsed_then_collected() {
    let filters = filters_of(&[
        "areapick", "payload", "--area", "Soho", "-a", "Brooklyn", "-b", "1", "-b", "any",
        "--min-price", "3000", "--fees", "no_fee",
    ]);

    assert_eq!(filters.areas, vec!["Soho", "Brooklyn"]);
    assert_eq!(filters.bedrooms, vec!["1", "any"]);
    assert_eq!(filters.min_price, Some(3000));
    assert_eq!(filters.fees.as_deref(), Some("no_fee"));
    assert!(!filters.is_empty());
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_accepted() {
    let cli = Cli::try_parse_from(["areapick", "tree", "-dd", "-C", "/tmp"]).unwrap();

    assert_eq!(cli.debug, 2);
    assert_eq!(cli.config_dir.as_deref(), Some(std::path::Path::new("/tmp")));
}

#[test]
fn given_no_defaults_and_area_when_applied_then_only_that_area() {
    // Arrange
    let mut session = session();
    let filters = filters_of(&["areapick", "payload", "--no-defaults", "--area", "Soho"]);

    // Act
    apply_filters(&mut session, &filters).unwrap();

    // Assert
    assert_eq!(session.selection().to_name_list(), vec!["Soho"]);
    assert!(session.reset_visible());
}

#[test]
fn given_bedroom_toggles_when_applied_then_last_state_wins() {
    let mut session = session();
    let filters = filters_of(&["areapick", "payload", "-b", "2", "-b", "4"]);

    apply_filters(&mut session, &filters).unwrap();

    assert_eq!(session.payload().unwrap().bedrooms, (2..=10).collect::<Vec<u8>>());
}

#[test]
fn given_deselect_when_applied_then_area_removed() {
    let mut session = session();
    let filters = filters_of(&["areapick", "payload", "--deselect", "Tribeca"]);

    apply_filters(&mut session, &filters).unwrap();

    assert_eq!(
        session.selection().to_name_list(),
        vec!["Kips Bay", "Gramercy Park"]
    );
}

#[test]
fn given_unknown_area_when_applied_then_data_error() {
    let mut session = session();
    let filters = filters_of(&["areapick", "payload", "--area", "Atlantis"]);

    let err = apply_filters(&mut session, &filters).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_bad_bedroom_arg_when_applied_then_usage_error() {
    let mut session = session();
    let filters = filters_of(&["areapick", "payload", "-b", "lots"]);

    let err = apply_filters(&mut session, &filters).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_everything_deselected_when_payload_then_empty_selection_message() {
    let mut session = session();
    let filters = filters_of(&["areapick", "payload", "--no-defaults"]);
    apply_filters(&mut session, &filters).unwrap();

    let err = session.payload().unwrap_err();

    assert_eq!(err.user_message(), "Please select at least one neighborhood");
}

// ============================================================
// pick
// ============================================================

#[test]
fn given_catalog_when_pick_items_then_paths_skip_hidden_root() {
    let session = session();

    let items = pick_items(&session);

    let tribeca = items.iter().find(|i| i.value == "100").unwrap();
    assert_eq!(tribeca.display, "Manhattan / Downtown Manhattan / Tribeca");
    assert_eq!(items.len(), 9, "hidden root is not offered");
    assert!(items.iter().all(|i| !i.display.contains("NYC and NJ")));
}

#[test]
fn given_picked_area_when_pick_then_selection_replaces_defaults() {
    // Arrange
    let selector = FakeSelector::picking(Some("Manhattan / Downtown Manhattan / Soho"));
    let container = container_with(selector.clone());
    let mut session = session();

    // Act
    cmd_pick(&container, &mut session, false).unwrap();

    // Assert
    assert_eq!(session.selection().to_name_list(), vec!["Soho"]);
    assert_eq!(selector.offered.lock().unwrap().len(), 9);
    assert!(session.reset_visible());
}

#[test]
fn given_keep_defaults_when_pick_then_area_and_subtree_added() {
    let selector = FakeSelector::picking(Some("Manhattan / Downtown Manhattan"));
    let container = container_with(selector);
    let mut session = session();

    cmd_pick(&container, &mut session, true).unwrap();

    assert_eq!(
        session.selection().to_name_list(),
        vec!["Tribeca", "Kips Bay", "Gramercy Park", "Downtown Manhattan", "Soho"]
    );
}

#[test]
fn given_cancelled_picker_when_pick_then_ok_and_nothing_selected() {
    let container = container_with(FakeSelector::picking(None));
    let mut session = session();

    cmd_pick(&container, &mut session, false).unwrap();

    assert!(session.selection().is_empty());
}
