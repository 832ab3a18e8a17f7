use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Node, NodeStore};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Small catalog shared by the integration tests.
///
/// ```text
/// 1 NYC and NJ
/// ├── 2 Manhattan
/// │   ├── 10 Downtown Manhattan
/// │   │   ├── 100 Tribeca
/// │   │   └── 101 Soho
/// │   └── 11 Midtown
/// │       ├── 110 Kips Bay
/// │       └── 111 Gramercy Park
/// └── 3 Brooklyn
///     └── 20 Park Slope
/// ```
pub fn sample_nodes() -> Vec<Node> {
    vec![
        Node::new(1, "NYC and NJ", 0),
        Node::new(2, "Manhattan", 1),
        Node::new(3, "Brooklyn", 1),
        Node::new(10, "Downtown Manhattan", 2),
        Node::new(11, "Midtown", 2),
        Node::new(100, "Tribeca", 10),
        Node::new(101, "Soho", 10),
        Node::new(110, "Kips Bay", 11),
        Node::new(111, "Gramercy Park", 11),
        Node::new(20, "Park Slope", 3),
    ]
}

pub fn sample_store() -> NodeStore {
    NodeStore::load(sample_nodes()).unwrap_or_else(|e| panic!("sample catalog is valid: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_sample_nodes_when_loading_then_store_is_complete() {
        let store = sample_store();
        assert_eq!(store.len(), 10);
    }
}
