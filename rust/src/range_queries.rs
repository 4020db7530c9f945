//! Range query operations for BPlusTree.
//!
//! A range scan descends once to the leaf that would hold the start key and
//! then walks the leaf chain, stopping at the first key past the end bound.

use crate::iteration::{ItemIterator, RangeIterator, RangeQuery};
use crate::types::{BPlusTree, NodeId};
use std::ops::{Bound, RangeBounds};

// ============================================================================
// RANGE QUERY OPERATIONS
// ============================================================================

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Returns the values of every key in `[start, end]`, in ascending key order.
    ///
    /// Both ends are inclusive. An empty tree, or `start > end`, yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3);
    /// for key in [10, 20, 5, 15, 25, 3, 7, 12, 17, 22] {
    ///     tree.insert(key, key * 100);
    /// }
    ///
    /// let values: Vec<_> = tree.range_query(&10, &20).copied().collect();
    /// assert_eq!(values, [1000, 1200, 1500, 1700, 2000]);
    ///
    /// assert_eq!(tree.range_query(&20, &10).count(), 0);
    /// ```
    pub fn range_query(&self, start: &K, end: &K) -> RangeQuery<'_, K, V> {
        let (leaf_id, index) = self.locate(start, false);
        RangeQuery::new(ItemIterator::from_position(
            self,
            leaf_id,
            index,
            Bound::Included(end.clone()),
        ))
    }

    /// Returns an iterator over key-value pairs in a range using Rust's range syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3);
    /// for i in 0..10 {
    ///     tree.insert(i, format!("value{}", i));
    /// }
    ///
    /// let range1: Vec<_> = tree.range(3..7).map(|(k, _)| *k).collect();
    /// assert_eq!(range1, vec![3, 4, 5, 6]);
    ///
    /// let range2: Vec<_> = tree.range(3..=7).map(|(k, _)| *k).collect();
    /// assert_eq!(range2, vec![3, 4, 5, 6, 7]);
    ///
    /// let range3: Vec<_> = tree.range(5..).map(|(k, _)| *k).collect();
    /// assert_eq!(range3, vec![5, 6, 7, 8, 9]);
    ///
    /// let range4: Vec<_> = tree.range(..5).map(|(k, _)| *k).collect();
    /// assert_eq!(range4, vec![0, 1, 2, 3, 4]);
    ///
    /// assert_eq!(tree.range(..).count(), 10);
    /// ```
    pub fn range<R>(&self, range: R) -> RangeIterator<'_, K, V>
    where
        R: RangeBounds<K>,
    {
        let (leaf_id, index) = match range.start_bound() {
            Bound::Included(key) => self.locate(key, false),
            Bound::Excluded(key) => self.locate(key, true),
            Bound::Unbounded => (self.get_first_leaf_id(), 0),
        };

        RangeIterator::new(ItemIterator::from_position(
            self,
            leaf_id,
            index,
            range.end_bound().cloned(),
        ))
    }

    /// Returns the first key-value pair in the tree.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.items().next()
    }

    /// Returns the last key-value pair in the tree.
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = self.get_leaf(self.rightmost_leaf(self.root?)?)?;
        Some((leaf.keys.last()?, leaf.values.last()?))
    }

    // ============================================================================
    // RANGE QUERY HELPERS
    // ============================================================================

    /// Find the leaf that would hold `key` and the first position in it whose
    /// key is `>= key`, or `> key` when `exclusive` is set.
    ///
    /// The position may be one past the leaf's last key; the iterator then
    /// moves on along the chain.
    fn locate(&self, key: &K, exclusive: bool) -> (Option<NodeId>, usize) {
        let Some(leaf_id) = self.find_leaf(key) else {
            return (None, 0);
        };

        let index = self
            .get_leaf(leaf_id)
            .map(|leaf| match leaf.keys.binary_search(key) {
                Ok(index) if exclusive => index + 1,
                Ok(index) => index,
                Err(index) => index,
            })
            .unwrap_or(0);

        (Some(leaf_id), index)
    }
}
