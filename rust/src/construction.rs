//! Construction and initialization logic for BPlusTree and nodes.
//!
//! This module contains the construction logic for the tree and its nodes,
//! including degree clamping and default implementations.

use crate::compact_arena::CompactArena;
use crate::types::{BPlusTree, BranchNode, LeafNode, DEFAULT_DEGREE, MIN_DEGREE, NULL_NODE};

impl<K, V> BPlusTree<K, V> {
    /// Create an empty B+ tree with the given minimum branching factor.
    ///
    /// A degree below 2 is clamped up to 2 rather than rejected. Every node
    /// holds at most `2 * degree - 1` keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let tree = BPlusTree::<i32, String>::new(4);
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.degree(), 4);
    ///
    /// let clamped = BPlusTree::<i32, String>::new(0);
    /// assert_eq!(clamped.degree(), 2);
    /// ```
    pub fn new(degree: usize) -> Self {
        Self {
            degree: degree.max(MIN_DEGREE),
            root: None,
            first_leaf: NULL_NODE,
            leaf_arena: CompactArena::new(),
            branch_arena: CompactArena::new(),
        }
    }

    /// Create a B+ tree with the default degree.
    ///
    /// This is equivalent to calling `new(DEFAULT_DEGREE)`.
    pub fn with_default_degree() -> Self {
        Self::new(DEFAULT_DEGREE)
    }

    /// Returns the minimum branching factor after clamping.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Maximum number of keys any node may hold.
    pub fn node_capacity(&self) -> usize {
        2 * self.degree - 1
    }
}

impl<K, V> LeafNode<K, V> {
    /// Creates a new, empty leaf node for a tree of the given degree.
    pub fn new(degree: usize) -> Self {
        let capacity = 2 * degree - 1;
        Self {
            degree,
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            next: NULL_NODE,
        }
    }
}

impl<K, V> BranchNode<K, V> {
    /// Creates a new, empty branch node for a tree of the given degree.
    pub fn new(degree: usize) -> Self {
        let capacity = 2 * degree - 1;
        Self {
            degree,
            keys: Vec::with_capacity(capacity),
            children: Vec::with_capacity(capacity + 1),
        }
    }
}

impl<K, V> Default for BPlusTree<K, V> {
    /// Create a B+ tree with the default degree.
    fn default() -> Self {
        Self::with_default_degree()
    }
}

// Freed arena slots are filled with these, so they allocate nothing.
impl<K, V> Default for LeafNode<K, V> {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            keys: Vec::new(),
            values: Vec::new(),
            next: NULL_NODE,
        }
    }
}

impl<K, V> Default for BranchNode<K, V> {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Get the recommended degree for a given expected number of elements.
///
/// Small trees stay shallow with small nodes; larger trees use wider nodes
/// to cut the number of levels a lookup walks.
pub fn recommended_degree(expected_elements: usize) -> usize {
    if expected_elements < 100 {
        DEFAULT_DEGREE
    } else if expected_elements < 10_000 {
        8
    } else if expected_elements < 1_000_000 {
        16
    } else {
        32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_construction() {
        let tree = BPlusTree::<i32, String>::new(16);
        assert_eq!(tree.degree, 16);
        assert_eq!(tree.node_capacity(), 31);
        assert!(tree.root.is_none());
        assert_eq!(tree.first_leaf, NULL_NODE);
    }

    #[test]
    fn test_degree_is_clamped() {
        assert_eq!(BPlusTree::<i32, i32>::new(0).degree(), MIN_DEGREE);
        assert_eq!(BPlusTree::<i32, i32>::new(1).degree(), MIN_DEGREE);
        assert_eq!(BPlusTree::<i32, i32>::new(2).degree(), 2);
    }

    #[test]
    fn test_tree_default() {
        let tree = BPlusTree::<i32, String>::default();
        assert_eq!(tree.degree, DEFAULT_DEGREE);
    }

    #[test]
    fn test_node_construction() {
        let leaf = LeafNode::<i32, String>::new(3);
        assert_eq!(leaf.degree, 3);
        assert!(leaf.keys.is_empty());
        assert_eq!(leaf.next, NULL_NODE);

        let branch = BranchNode::<i32, String>::new(3);
        assert!(branch.keys.is_empty());
        assert!(branch.children.is_empty());
    }

    #[test]
    fn test_recommended_degree() {
        assert_eq!(recommended_degree(50), DEFAULT_DEGREE);
        assert_eq!(recommended_degree(5000), 8);
        assert_eq!(recommended_degree(500_000), 16);
        assert_eq!(recommended_degree(5_000_000), 32);
    }
}
