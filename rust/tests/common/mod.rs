//! Shared test utilities.
//!
//! Call [`init_tracing`] at the start of a test to see the tree's `debug` and
//! `trace` events. Filtering follows `RUST_LOG`, e.g.
//! `RUST_LOG=bplus_index=trace cargo test -- --nocapture`.

#![allow(dead_code)]

use std::sync::Once;

use bplus_index::BPlusTree;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize a test-friendly tracing subscriber.
///
/// Safe to call multiple times - only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Keys inserted by the reference scenario, in insertion order.
pub const SCENARIO_KEYS: [i32; 10] = [10, 20, 5, 15, 25, 3, 7, 12, 17, 22];

/// Degree-3 tree holding the scenario keys, each mapped to its string form.
pub fn scenario_tree() -> BPlusTree<i32, String> {
    let mut tree = BPlusTree::new(3);
    for key in SCENARIO_KEYS {
        tree.insert(key, key.to_string());
    }
    tree
}

/// Tree of the given degree holding `keys`, each mapped to `key * 10`.
pub fn tree_with(degree: usize, keys: impl IntoIterator<Item = i32>) -> BPlusTree<i32, i32> {
    keys.into_iter().fold(BPlusTree::new(degree), |mut tree, key| {
        tree.insert(key, key * 10);
        tree
    })
}
