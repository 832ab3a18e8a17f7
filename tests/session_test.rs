//! Tests for SelectorSession: defaults, reconciliation, batching, submit

use std::sync::Mutex;

use areapick::application::services::SelectorSession;
use areapick::application::{ApplicationError, TRANSPORT_FAILURE_MESSAGE};
use areapick::domain::{
    DefaultsConfig, DomainError, Node, NodeStore, SubmissionPayload, EMPTY_SELECTION_MESSAGE,
};
use areapick::infrastructure::traits::ScoringClient;
use areapick::util::testing::{init_test_setup, sample_store};

/// Records payloads and answers with a fixed result.
struct FakeScoringClient {
    response: Result<String, String>,
    calls: Mutex<Vec<SubmissionPayload>>,
}

impl FakeScoringClient {
    fn answering(response: Result<&str, &str>) -> Self {
        Self {
            response: response.map(str::to_string).map_err(str::to_string),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<SubmissionPayload> {
        self.calls.lock().unwrap().clone()
    }
}

impl ScoringClient for FakeScoringClient {
    fn submit(&self, payload: &SubmissionPayload) -> Result<String, String> {
        self.calls.lock().unwrap().push(payload.clone());
        self.response.clone()
    }
}

fn default_session() -> SelectorSession {
    init_test_setup();
    SelectorSession::new(sample_store(), DefaultsConfig::default()).unwrap()
}

fn clear(session: &mut SelectorSession) {
    let ids: Vec<i64> = session.selection().members().iter().map(|m| m.id).collect();
    for id in ids {
        session.deselect(id);
    }
}

// ============================================================
// construction and defaults
// ============================================================

#[test]
fn given_new_session_when_created_then_defaults_selected_and_reset_hidden() {
    let session = default_session();

    assert_eq!(
        session.selection().to_name_list(),
        vec!["Tribeca", "Kips Bay", "Gramercy Park"]
    );
    assert!(session.is_default());
    assert!(!session.reset_visible());
}

#[test]
fn given_default_name_missing_from_catalog_when_created_then_skipped() {
    let defaults = DefaultsConfig {
        neighborhoods: vec!["Atlantis".into(), "Soho".into()],
        ..DefaultsConfig::default()
    };

    let session = SelectorSession::new(sample_store(), defaults).unwrap();

    assert_eq!(session.selection().to_name_list(), vec!["Soho"]);
    assert!(!session.reset_visible());
}

#[test]
fn given_invalid_defaults_when_created_then_error() {
    let defaults = DefaultsConfig {
        min_price: 9000,
        ..DefaultsConfig::default()
    };

    let result = SelectorSession::new(sample_store(), defaults);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidPriceRange { .. }))
    ));
}

// ============================================================
// reconciliation
// ============================================================

#[test]
fn given_defaults_when_select_extra_area_then_reset_visible() {
    let mut session = default_session();

    session.select_by_name("Soho").unwrap();

    assert!(session.reset_visible());
}

#[test]
fn given_extra_area_when_deselected_again_then_reset_hidden() {
    let mut session = default_session();
    session.select_by_name("Soho").unwrap();

    session.deselect_by_name("Soho").unwrap();

    assert!(!session.reset_visible());
}

#[test]
fn given_modified_session_when_reset_then_back_to_defaults() {
    // Arrange
    let mut session = default_session();
    session.select_by_name("Brooklyn").unwrap();
    session.deselect_by_name("Tribeca").unwrap();
    session.set_min_price(3000);
    session.toggle_bedroom(Some(2)).unwrap();
    session.set_bathroom("2").unwrap();
    session.set_fee("no_fee").unwrap();
    assert!(session.reset_visible());

    // Act
    session.reset();

    // Assert
    assert!(session.is_default());
    assert!(!session.reset_visible());
    assert_eq!(
        session.selection().to_name_list(),
        vec!["Tribeca", "Kips Bay", "Gramercy Park"]
    );
}

#[test]
fn given_default_with_descendants_when_reset_then_is_default() {
    let defaults = DefaultsConfig {
        neighborhoods: vec!["Midtown".into(), "Soho".into()],
        ..DefaultsConfig::default()
    };
    let mut session = SelectorSession::new(sample_store(), defaults).unwrap();
    assert!(session.is_default());

    session.deselect_by_name("Kips Bay").unwrap();
    assert!(session.reset_visible());

    session.reset();
    assert!(!session.reset_visible());
    assert_eq!(
        session.selection().to_name_list(),
        vec!["Midtown", "Kips Bay", "Gramercy Park", "Soho"]
    );
}

#[test]
fn given_same_names_in_other_order_when_reconciled_then_default() {
    let mut session = default_session();
    session.deselect_by_name("Tribeca").unwrap();

    session.select_by_name("Tribeca").unwrap();

    assert_eq!(
        session.selection().to_name_list(),
        vec!["Kips Bay", "Gramercy Park", "Tribeca"]
    );
    assert!(!session.reset_visible());
}

#[test]
fn given_bedroom_toggled_twice_when_reconciled_then_default() {
    let mut session = default_session();

    session.toggle_bedroom(Some(1)).unwrap();
    assert!(session.reset_visible());
    session.toggle_bedroom(Some(1)).unwrap();

    assert!(!session.reset_visible());
}

// ============================================================
// batching
// ============================================================

#[test]
fn given_open_batch_when_mutating_then_reconcile_deferred() {
    let mut session = default_session();

    session.begin_batch();
    session.select_by_name("Soho").unwrap();
    assert!(session.in_batch());
    assert!(!session.reset_visible(), "not reconciled inside a batch");
    session.end_batch();

    assert!(!session.in_batch());
    assert!(session.reset_visible());
}

#[test]
fn given_scoped_batch_when_closed_then_result_returned_and_reconciled() {
    let mut session = default_session();

    let added = session.batch(|s| {
        s.set_max_price(4000);
        s.select_by_name("Downtown Manhattan").unwrap()
    });

    assert_eq!(added.map(|a| a.len()), Some(1), "Tribeca already present");
    assert!(session.reset_visible());
}

// ============================================================
// scalar filters
// ============================================================

#[test]
fn given_min_above_max_when_set_min_price_then_max_follows() {
    let mut session = default_session();

    session.set_min_price(6000);

    assert_eq!(session.scalars().min_price, 6000);
    assert_eq!(session.scalars().max_price, 6000);
}

#[test]
fn given_max_below_min_when_set_max_price_then_min_follows() {
    let mut session = default_session();

    session.set_max_price(1000);

    assert_eq!(session.scalars().min_price, 1000);
    assert_eq!(session.scalars().max_price, 1000);
}

#[test]
fn given_invalid_tokens_when_set_then_rejected_and_state_kept() {
    let mut session = default_session();

    assert!(session.toggle_bedroom(Some(7)).is_err());
    assert!(session.set_bathroom("plenty").is_err());
    assert!(session.set_fee("  ").is_err());

    assert!(session.is_default());
}

#[test]
fn given_unknown_id_when_select_then_not_found() {
    let mut session = default_session();

    let err = session.select(4242).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NotFound(_))
    ));
}

// ============================================================
// payload / submit
// ============================================================

#[test]
fn given_default_leaf_selection_when_payload_then_full_bedroom_range() {
    // Arrange
    let store = NodeStore::load(vec![
        Node::new(1, "NYC and NJ", 0),
        Node::new(2, "Manhattan", 1),
        Node::new(3, "Tribeca", 2),
    ])
    .unwrap();
    let defaults = DefaultsConfig {
        neighborhoods: vec!["Tribeca".into()],
        ..DefaultsConfig::default()
    };
    let mut session = SelectorSession::new(store, defaults).unwrap();

    // Act
    session.reset();
    let payload = session.payload().unwrap();

    // Assert
    assert_eq!(payload.neighborhood_names, vec!["Tribeca"]);
    assert_eq!(payload.min_price, 2500);
    assert_eq!(payload.max_price, 5000);
    assert_eq!(payload.bedrooms, (0..=10).collect::<Vec<u8>>());
    assert_eq!(payload.min_bathroom, 0.0);
    assert_eq!(payload.broker_fees, "fees_ok_if_10pct_cheaper");
}

#[test]
fn given_empty_selection_when_submit_then_blocked_before_transport() {
    let mut session = default_session();
    clear(&mut session);
    let client = FakeScoringClient::answering(Ok("{}"));

    let err = session.submit(&client).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::EmptySelection)
    ));
    assert_eq!(err.user_message(), EMPTY_SELECTION_MESSAGE);
    assert!(client.calls().is_empty());
}

#[test]
fn given_selection_when_submit_then_payload_posted_and_body_returned() {
    let mut session = default_session();
    session.toggle_bedroom(Some(4)).unwrap();
    session.set_bathroom("1.5").unwrap();
    let client = FakeScoringClient::answering(Ok(r#"{"avg": 4100}"#));

    let body = session.submit(&client).unwrap();

    assert_eq!(body, r#"{"avg": 4100}"#);
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].neighborhood_names,
        vec!["Tribeca", "Kips Bay", "Gramercy Park"]
    );
    assert_eq!(calls[0].bedrooms, (4..=10).collect::<Vec<u8>>());
    assert_eq!(calls[0].min_bathroom, 1.5);
}

#[test]
fn given_transport_failure_when_submit_then_generic_message() {
    let session = default_session();
    let client = FakeScoringClient::answering(Err("API error (502)"));

    let err = session.submit(&client).unwrap_err();

    assert!(matches!(err, ApplicationError::Transport { .. }));
    assert_eq!(err.user_message(), TRANSPORT_FAILURE_MESSAGE);
    assert!(session.selection().len() == 3, "state untouched");
}

#[test]
fn given_payload_when_serialized_then_expected_json_keys() {
    let session = default_session();

    let json = serde_json::to_value(session.payload().unwrap()).unwrap();

    for key in [
        "neighborhood_names",
        "min_price",
        "max_price",
        "bedrooms",
        "min_bathroom",
        "broker_fees",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}
