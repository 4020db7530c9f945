//! In-memory B+ tree index with a dict-like API.
//!
//! Keys are kept in sorted order in leaf nodes that are chained left to
//! right, so point lookups descend once and range scans walk the chain.
//! Nodes live in two arenas and refer to each other by [`NodeId`].
//!
//! # Examples
//!
//! ```
//! use bplus_index::BPlusTree;
//!
//! let mut tree = BPlusTree::new(3);
//! for key in [10, 20, 5, 15, 25, 3, 7, 12, 17, 22] {
//!     tree.insert(key, key.to_string());
//! }
//!
//! assert_eq!(tree.find(&15).map(String::as_str), Some("15"));
//! assert_eq!(tree.height(), 2);
//! assert!(tree.validate());
//!
//! let scanned: Vec<_> = tree.range_query(&10, &20).cloned().collect();
//! assert_eq!(scanned, ["10", "12", "15", "17", "20"]);
//! ```

mod compact_arena;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod range_queries;
mod tree_structure;
mod types;
mod validation;

pub use compact_arena::{CompactArena, CompactArenaStats};
pub use construction::recommended_degree;
pub use error::{BPlusTreeError, BTreeResult, BTreeResultExt, KeyResult, ModifyResult};
pub use iteration::{
    ItemIterator, KeyIterator, LeafIterator, RangeIterator, RangeQuery, ValueIterator,
};
pub use node::NodeSize;
pub use types::{
    BPlusTree, BranchNode, LeafNode, NodeId, NodeRef, DEFAULT_DEGREE, MIN_DEGREE, NULL_NODE,
};
pub use validation::Violation;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_tree_is_send_and_sync() {
        assert_send_sync::<BPlusTree<String, Vec<u8>>>();
    }

    #[test]
    fn test_mixed_workload_stays_consistent() {
        let mut tree = BPlusTree::new(MIN_DEGREE);
        let mut reference = std::collections::BTreeMap::new();

        for i in 0..200 {
            let key = (i * 37) % 101;
            assert_eq!(tree.insert(key, i), reference.insert(key, i));
        }
        for key in (0..101).step_by(3) {
            assert_eq!(tree.remove(&key), reference.remove(&key));
        }

        assert_eq!(tree.size(), reference.len());
        assert!(tree.items().eq(reference.iter()));
    }
}
