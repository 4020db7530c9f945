//! Node implementations for BPlusTree.
//!
//! This module contains the implementations for LeafNode and BranchNode:
//! the shared size predicates, ordered insertion and removal, and splitting.
//! Nodes never touch the arenas; allocating a split-off half and linking it
//! into the tree is the tree driver's job.

use crate::types::{BranchNode, LeafNode, NodeRef};

// ============================================================================
// SIZE PREDICATES
// ============================================================================

/// Size bounds shared by leaf and branch nodes.
///
/// All bounds are pure functions of the tree degree `t` and the number of
/// keys currently held.
pub trait NodeSize {
    /// Minimum branching factor of the tree this node belongs to.
    fn degree(&self) -> usize;

    /// Number of keys currently held.
    fn key_count(&self) -> usize;

    /// Maximum number of keys (`2t - 1`).
    fn max_keys(&self) -> usize {
        2 * self.degree() - 1
    }

    /// Minimum number of keys for a non-root node (`t - 1`).
    fn min_keys(&self) -> usize {
        self.degree() - 1
    }

    /// True once the node holds `2t - 1` keys and must be split before an
    /// insertion descends into it.
    fn is_full(&self) -> bool {
        self.key_count() >= self.max_keys()
    }

    /// True when a non-root node holds fewer than `t - 1` keys.
    fn is_underflow(&self) -> bool {
        self.key_count() < self.min_keys()
    }

    /// True when the node holds more than the minimum and could give up a key.
    fn can_borrow(&self) -> bool {
        self.key_count() > self.min_keys()
    }
}

impl<K, V> NodeSize for LeafNode<K, V> {
    fn degree(&self) -> usize {
        self.degree
    }

    fn key_count(&self) -> usize {
        self.keys.len()
    }
}

impl<K, V> NodeSize for BranchNode<K, V> {
    fn degree(&self) -> usize {
        self.degree
    }

    fn key_count(&self) -> usize {
        self.keys.len()
    }
}

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<K, V> LeafNode<K, V> {
    /// Returns the number of key-value pairs in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this leaf node is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sorted keys held by this leaf.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Values held by this leaf, parallel to `keys()`.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn first_key(&self) -> Option<&K> {
        self.keys.first()
    }

    pub fn last_key(&self) -> Option<&K> {
        self.keys.last()
    }
}

impl<K: Ord, V> LeafNode<K, V> {
    /// Get a value by key from this leaf node.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &self.values[index])
    }

    /// Get a mutable reference to a value by key from this leaf node.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &mut self.values[index])
    }

    /// Insert a key-value pair in key order.
    ///
    /// An existing equal key has its value replaced and the old value is
    /// returned. The caller guarantees the leaf is not full.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.keys.binary_search(&key) {
            Ok(index) => Some(std::mem::replace(&mut self.values[index], value)),
            Err(index) => {
                self.keys.insert(index, key);
                self.values.insert(index, value);
                None
            }
        }
    }

    /// Remove a key-value pair from this leaf node.
    /// Returns the removed value if the key existed, and whether the node is now underfull.
    pub(crate) fn remove(&mut self, key: &K) -> (Option<V>, bool) {
        match self.keys.binary_search(key) {
            Ok(index) => {
                self.keys.remove(index);
                let removed_value = self.values.remove(index);
                (Some(removed_value), self.is_underflow())
            }
            Err(_) => (None, false),
        }
    }
}

impl<K: Clone, V> LeafNode<K, V> {
    /// Split this leaf node, returning the new right node and its separator.
    ///
    /// Keys from `len / 2` onward move right; the separator is the right
    /// node's first key and stays stored in the right node. The right node
    /// inherits this leaf's `next`; the caller links this leaf to the right
    /// node once it has an ID.
    pub fn split(&mut self) -> (LeafNode<K, V>, K) {
        let mid = self.keys.len() / 2;

        let mut new_right = LeafNode::new(self.degree);
        new_right.keys = self.keys.split_off(mid);
        new_right.values = self.values.split_off(mid);
        new_right.next = self.next;

        let separator = new_right.keys[0].clone();
        (new_right, separator)
    }
}

// ============================================================================
// BRANCH NODE IMPLEMENTATION
// ============================================================================

impl<K, V> BranchNode<K, V> {
    /// Returns the number of separator keys in this branch node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this branch node holds no separator keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sorted separator keys held by this branch.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child references, one more than `keys()`.
    pub fn children(&self) -> &[NodeRef<K, V>] {
        &self.children
    }

    /// Insert a separator and the child to its right, after `child_index`.
    pub fn insert_child(&mut self, child_index: usize, separator: K, new_child: NodeRef<K, V>) {
        self.keys.insert(child_index, separator);
        self.children.insert(child_index + 1, new_child);
    }

    /// Detach the child at `child_index` together with one adjacent separator:
    /// the one to its left, or the leftmost separator for the first child.
    pub fn remove_child(&mut self, child_index: usize) -> NodeRef<K, V> {
        let child = self.children.remove(child_index);
        if child_index > 0 {
            self.keys.remove(child_index - 1);
        } else if !self.keys.is_empty() {
            self.keys.remove(0);
        }
        child
    }

    /// Split this branch node, returning the new right node and the promoted key.
    ///
    /// Keys and children after `len / 2` move right. The key at `len / 2` is
    /// promoted and kept in neither half.
    pub fn split(&mut self) -> (BranchNode<K, V>, K) {
        let mid = self.keys.len() / 2;

        let mut new_right = BranchNode::new(self.degree);
        new_right.keys = self.keys.split_off(mid + 1);
        new_right.children = self.children.split_off(mid + 1);

        let promoted_key = self.keys.remove(mid);

        (new_right, promoted_key)
    }
}

impl<K: Ord, V> BranchNode<K, V> {
    /// Find the index of the child that should contain the given key.
    ///
    /// This is the position of the first separator strictly greater than
    /// `key`, so a key equal to a separator routes right.
    pub fn find_child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Get the child node for a given key.
    pub fn get_child(&self, key: &K) -> Option<&NodeRef<K, V>> {
        self.children.get(self.find_child_index(key))
    }
}
