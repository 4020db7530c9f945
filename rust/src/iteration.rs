//! Iterator implementations for BPlusTree.
//!
//! Every iterator here walks the leaf chain: it starts at some leaf and
//! position, then follows `next` links. The tree is borrowed for the
//! iterator's lifetime, so it cannot be mutated mid-scan.

use crate::types::{BPlusTree, LeafNode, NodeId};
use std::ops::Bound;

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over key-value pairs in the B+ tree using the leaf linked list.
pub struct ItemIterator<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    current_leaf_ref: Option<&'a LeafNode<K, V>>,
    current_leaf_index: usize,
    end_bound: Bound<K>,
    finished: bool,
}

/// Iterator over keys in the B+ tree.
pub struct KeyIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over values in the B+ tree.
pub struct ValueIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over key-value pairs within a range, see [`BPlusTree::range`].
pub struct RangeIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Values whose keys fall within an inclusive range, see
/// [`BPlusTree::range_query`].
pub struct RangeQuery<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over the key slice of every leaf, in chain order.
pub struct LeafIterator<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    current_leaf_ref: Option<&'a LeafNode<K, V>>,
}

// ============================================================================
// BPLUSTREE ITERATOR METHODS
// ============================================================================

impl<K, V> BPlusTree<K, V> {
    /// Returns an iterator over all key-value pairs in sorted order.
    pub fn items(&self) -> ItemIterator<'_, K, V> {
        ItemIterator::new(self)
    }

    /// Returns an iterator over all keys in sorted order.
    pub fn keys(&self) -> KeyIterator<'_, K, V> {
        KeyIterator {
            items: self.items(),
        }
    }

    /// Returns an iterator over all values in key order.
    pub fn values(&self) -> ValueIterator<'_, K, V> {
        ValueIterator {
            items: self.items(),
        }
    }

    /// Returns the keys of each leaf in chain order, starting at the chain head.
    pub fn leaves(&self) -> LeafIterator<'_, K, V> {
        LeafIterator {
            tree: self,
            current_leaf_ref: self.get_first_leaf_id().and_then(|id| self.get_leaf(id)),
        }
    }
}

// ============================================================================
// ITEMITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K, V> ItemIterator<'a, K, V> {
    pub fn new(tree: &'a BPlusTree<K, V>) -> Self {
        let first_leaf = tree.get_first_leaf_id();
        Self::from_position(tree, first_leaf, 0, Bound::Unbounded)
    }

    /// Start at `index` within leaf `leaf_id` and stop once `end_bound` is passed.
    pub(crate) fn from_position(
        tree: &'a BPlusTree<K, V>,
        leaf_id: Option<NodeId>,
        index: usize,
        end_bound: Bound<K>,
    ) -> Self {
        Self {
            tree,
            current_leaf_ref: leaf_id.and_then(|id| tree.get_leaf(id)),
            current_leaf_index: index,
            end_bound,
            finished: false,
        }
    }

    /// Move to the next leaf in the chain. Returns false at the end of the chain.
    fn advance_to_next_leaf(&mut self, leaf: &'a LeafNode<K, V>) -> bool {
        self.current_leaf_ref = self.tree.get_leaf(leaf.next);
        self.current_leaf_index = 0;
        self.current_leaf_ref.is_some()
    }
}

impl<K: Ord, V> ItemIterator<'_, K, V> {
    fn is_beyond_end(&self, key: &K) -> bool {
        match &self.end_bound {
            Bound::Included(end) => key > end,
            Bound::Excluded(end) => key >= end,
            Bound::Unbounded => false,
        }
    }
}

impl<'a, K: Ord, V> Iterator for ItemIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let Some(leaf) = self.current_leaf_ref else {
                self.finished = true;
                return None;
            };

            let index = self.current_leaf_index;
            if let (Some(key), Some(value)) = (leaf.keys.get(index), leaf.values.get(index)) {
                // Keys only grow along the chain, so the first key past the
                // end bound ends the whole scan.
                if self.is_beyond_end(key) {
                    self.finished = true;
                    return None;
                }
                self.current_leaf_index += 1;
                return Some((key, value));
            }

            if !self.advance_to_next_leaf(leaf) {
                self.finished = true;
                return None;
            }
        }
    }
}

impl<K: Ord, V> std::iter::FusedIterator for ItemIterator<'_, K, V> {}

// ============================================================================
// ADAPTER IMPLEMENTATIONS
// ============================================================================

impl<'a, K: Ord, V> Iterator for KeyIterator<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(k, _)| k)
    }
}

impl<'a, K: Ord, V> Iterator for ValueIterator<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, v)| v)
    }
}

impl<'a, K, V> RangeIterator<'a, K, V> {
    pub(crate) fn new(items: ItemIterator<'a, K, V>) -> Self {
        Self { items }
    }
}

impl<'a, K: Ord, V> Iterator for RangeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }
}

impl<'a, K, V> RangeQuery<'a, K, V> {
    pub(crate) fn new(items: ItemIterator<'a, K, V>) -> Self {
        Self { items }
    }
}

impl<'a, K: Ord, V> Iterator for RangeQuery<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, v)| v)
    }
}

impl<K: Ord, V> std::iter::FusedIterator for RangeQuery<'_, K, V> {}

// ============================================================================
// LEAFITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K, V> Iterator for LeafIterator<'a, K, V> {
    type Item = &'a [K];

    fn next(&mut self) -> Option<Self::Item> {
        let leaf = self.current_leaf_ref?;
        self.current_leaf_ref = self.tree.get_leaf(leaf.next);
        Some(&leaf.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(degree: usize, count: i32) -> BPlusTree<i32, i32> {
        let mut tree = BPlusTree::new(degree);
        for i in 0..count {
            tree.insert(i, i * 100);
        }
        tree
    }

    #[test]
    fn test_items_cross_leaf_boundaries() {
        let tree = tree_with(2, 20);
        assert!(tree.leaf_count() > 1);

        let mut count = 0;
        for (k, v) in tree.items() {
            assert_eq!(*k, count);
            assert_eq!(*v, count * 100);
            count += 1;
        }
        assert_eq!(count, 20);
    }

    #[test]
    fn test_keys_and_values() {
        let tree = tree_with(3, 5);
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_eq!(
            tree.values().copied().collect::<Vec<_>>(),
            vec![0, 100, 200, 300, 400]
        );
    }

    #[test]
    fn test_empty_tree_iterators() {
        let tree = BPlusTree::<i32, i32>::new(3);
        assert_eq!(tree.items().next(), None);
        assert_eq!(tree.leaves().count(), 0);
    }

    #[test]
    fn test_leaves_follow_chain() {
        let tree = tree_with(2, 10);
        let flattened: Vec<i32> = tree.leaves().flatten().copied().collect();
        assert_eq!(flattened, (0..10).collect::<Vec<_>>());
        assert_eq!(tree.leaves().count(), tree.leaf_count());
    }

    #[test]
    fn test_item_iterator_is_fused() {
        let tree = tree_with(2, 3);
        let mut items = tree.items();
        assert_eq!(items.by_ref().count(), 3);
        assert_eq!(items.next(), None);
        assert_eq!(items.next(), None);
    }
}
