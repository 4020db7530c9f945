//! Core types and data structures for BPlusTree.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the B+ tree implementation.

use crate::compact_arena::CompactArena;
use std::marker::PhantomData;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest minimum branching factor a tree will accept.
pub const MIN_DEGREE: usize = 2;

/// Minimum branching factor used when none is given.
pub const DEFAULT_DEGREE: usize = 3;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node ID type for arena-based allocation
pub use crate::compact_arena::{NodeId, NULL_NODE};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// In-memory B+ tree index mapping unique keys to values.
///
/// Values live only in leaves. Leaves are chained in ascending key order, so a
/// range scan descends once and then walks the chain. Internal (branch) nodes
/// hold separator keys that route a search to exactly one child.
///
/// All size bounds derive from the minimum branching factor `t` (the degree):
/// every node holds at most `2t - 1` keys and every non-root node at least
/// `t - 1` keys while only insertions have happened.
///
/// # Examples
///
/// ```
/// use bplus_index::BPlusTree;
///
/// let mut tree = BPlusTree::new(3);
/// tree.insert(10, "ten");
/// tree.insert(20, "twenty");
/// tree.insert(5, "five");
///
/// assert_eq!(tree.find(&20), Some(&"twenty"));
/// assert_eq!(tree.size(), 3);
///
/// let values: Vec<_> = tree.range_query(&5, &10).collect();
/// assert_eq!(values, [&"five", &"ten"]);
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion**: O(log n)
/// - **Lookup**: O(log n)
/// - **Deletion**: O(log n)
/// - **Range queries**: O(log n + k) where k is the number of items in range
/// - **Size**: O(number of leaves), it walks the leaf chain
#[derive(Debug)]
pub struct BPlusTree<K, V> {
    /// Minimum branching factor, already clamped.
    pub(crate) degree: usize,
    /// The root node of the tree, `None` while the tree is empty.
    pub(crate) root: Option<NodeRef<K, V>>,
    /// Head of the leaf chain.
    pub(crate) first_leaf: NodeId,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: CompactArena<LeafNode<K, V>>,
    /// Arena storage for branch nodes.
    pub(crate) branch_arena: CompactArena<BranchNode<K, V>>,
}

/// Leaf node containing key-value pairs.
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    /// Minimum branching factor of the owning tree.
    pub(crate) degree: usize,
    /// Sorted list of keys.
    pub(crate) keys: Vec<K>,
    /// List of values corresponding to keys.
    pub(crate) values: Vec<V>,
    /// Next leaf node in the chain. Never owns the target.
    pub(crate) next: NodeId,
}

/// Internal (branch) node containing separator keys and child references.
#[derive(Debug, Clone)]
pub struct BranchNode<K, V> {
    /// Minimum branching factor of the owning tree.
    pub(crate) degree: usize,
    /// Sorted list of separator keys.
    pub(crate) keys: Vec<K>,
    /// Child nodes, always one more than `keys`.
    pub(crate) children: Vec<NodeRef<K, V>>,
}

// ============================================================================
// ENUMS AND RESULT TYPES
// ============================================================================

/// Node reference that can be either a leaf or branch node
#[derive(Debug, PartialEq, Eq)]
pub enum NodeRef<K, V> {
    Leaf(NodeId, PhantomData<(K, V)>),
    Branch(NodeId, PhantomData<(K, V)>),
}

impl<K, V> Clone for NodeRef<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<K, V> {}

impl<K, V> NodeRef<K, V> {
    /// Reference to the leaf stored under `id`.
    pub fn leaf(id: NodeId) -> Self {
        NodeRef::Leaf(id, PhantomData)
    }

    /// Reference to the branch stored under `id`.
    pub fn branch(id: NodeId) -> Self {
        NodeRef::Branch(id, PhantomData)
    }

    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id, _) => id,
            NodeRef::Branch(id, _) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_, _))
    }
}

/// Right half produced by splitting a node, not yet allocated in an arena.
pub(crate) enum SplitNodeData<K, V> {
    Leaf(LeafNode<K, V>),
    Branch(BranchNode<K, V>),
}
