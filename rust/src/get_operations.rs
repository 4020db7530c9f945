//! GET operations for BPlusTree.
//!
//! This module contains the read operations for the B+ tree: point lookup,
//! the shared root-to-leaf descent, and arena access helpers.

use crate::error::{BPlusTreeError, KeyResult};
use crate::types::{BPlusTree, BranchNode, LeafNode, NodeId, NodeRef, NULL_NODE};

impl<K: Ord, V> BPlusTree<K, V> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Get a reference to the value associated with a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3);
    /// tree.insert(1, "one");
    /// assert_eq!(tree.find(&1), Some(&"one"));
    /// assert_eq!(tree.find(&2), None);
    /// ```
    pub fn find(&self, key: &K) -> Option<&V> {
        let leaf_id = self.find_leaf(key)?;
        self.get_leaf(leaf_id)?.get(key)
    }

    /// Check if key exists in the tree.
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Get value for a key, returning an error if the key doesn't exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::{BPlusTree, BPlusTreeError};
    ///
    /// let mut tree = BPlusTree::new(3);
    /// tree.insert(1, "one");
    /// assert_eq!(tree.get_item(&1), Ok(&"one"));
    /// assert_eq!(tree.get_item(&2), Err(BPlusTreeError::KeyNotFound));
    /// ```
    pub fn get_item(&self, key: &K) -> KeyResult<&V> {
        self.find(key).ok_or(BPlusTreeError::KeyNotFound)
    }

    /// Get a mutable reference to the value for a key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let leaf_id = self.find_leaf(key)?;
        self.get_leaf_mut(leaf_id)?.get_mut(key)
    }

    // ============================================================================
    // DESCENT
    // ============================================================================

    /// Walk from the root to the leaf whose key range covers `key`.
    ///
    /// At each branch the child is chosen by the first separator strictly
    /// greater than `key`. Returns `None` only for an empty tree.
    pub(crate) fn find_leaf(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root?;

        loop {
            match current {
                NodeRef::Leaf(leaf_id, _) => return Some(leaf_id),
                NodeRef::Branch(branch_id, _) => {
                    current = *self.get_branch(branch_id)?.get_child(key)?;
                }
            }
        }
    }
}

impl<K, V> BPlusTree<K, V> {
    // ============================================================================
    // ARENA ACCESS METHODS
    // ============================================================================

    /// Get a reference to a leaf node in the arena.
    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.leaf_arena.get(id)
    }

    /// Get a mutable reference to a leaf node in the arena.
    pub(crate) fn get_leaf_mut(&mut self, id: NodeId) -> Option<&mut LeafNode<K, V>> {
        self.leaf_arena.get_mut(id)
    }

    /// Get the next pointer of a leaf node in the arena.
    pub fn get_leaf_next(&self, id: NodeId) -> Option<NodeId> {
        self.get_leaf(id)
            .map(|leaf| leaf.next)
            .filter(|&next| next != NULL_NODE)
    }

    /// Get a reference to a branch node in the arena.
    pub fn get_branch(&self, id: NodeId) -> Option<&BranchNode<K, V>> {
        self.branch_arena.get(id)
    }

    /// Get a mutable reference to a branch node in the arena.
    pub(crate) fn get_branch_mut(&mut self, id: NodeId) -> Option<&mut BranchNode<K, V>> {
        self.branch_arena.get_mut(id)
    }
}
