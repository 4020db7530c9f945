//! INSERT operations for BPlusTree.
//!
//! Insertion splits top-down: a full root is split before descending, and a
//! full child is split before it is entered. Every node the descent reaches
//! therefore has room for one more key, and no split ever has to travel
//! back up the tree.

use crate::error::{BPlusTreeError, BTreeResultExt, ModifyResult};
use crate::node::NodeSize;
use crate::types::{BPlusTree, BranchNode, LeafNode, NodeId, NodeRef, SplitNodeData};

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Insert a key-value pair into the tree.
    ///
    /// If the key is already present its value is replaced and the previous
    /// value is returned; the tree never holds two equal keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3);
    /// assert_eq!(tree.insert(1, "one"), None);
    /// assert_eq!(tree.insert(1, "uno"), Some("one"));
    /// assert_eq!(tree.find(&1), Some(&"uno"));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.insert_entry(key, value) {
            Ok(old_value) => old_value,
            Err(error) => {
                tracing::error!(%error, "insert abandoned");
                None
            }
        }
    }

    /// Insert after checking the tree structure, and check it again afterwards.
    ///
    /// The check tolerates the underfull nodes that removals leave behind but
    /// rejects every other violation with [`BPlusTreeError::CorruptedTree`].
    /// A node reference that no longer resolves during the descent is
    /// reported as [`BPlusTreeError::DataIntegrityError`].
    pub fn try_insert(&mut self, key: K, value: V) -> ModifyResult<Option<V>> {
        self.validate_structure()
            .map_err(BPlusTreeError::from)
            .with_operation("insert")?;

        let old_value = self.insert_entry(key, value)?;

        self.validate_structure()
            .map_err(BPlusTreeError::from)
            .with_operation("insert")?;

        Ok(old_value)
    }

    fn insert_entry(&mut self, key: K, value: V) -> ModifyResult<Option<V>> {
        let Some(root) = self.root else {
            let mut leaf = LeafNode::new(self.degree);
            leaf.insert(key, value);
            let leaf_id = self.allocate_leaf(leaf);
            self.root = Some(NodeRef::leaf(leaf_id));
            self.first_leaf = leaf_id;
            return Ok(None);
        };

        let mut current = if self.is_node_full(root) {
            self.split_root(root)
                .ok_or_else(|| BPlusTreeError::missing_node("insert", root.id()))?
        } else {
            root
        };

        loop {
            match current {
                NodeRef::Leaf(leaf_id, _) => {
                    let leaf = self
                        .get_leaf_mut(leaf_id)
                        .ok_or_else(|| BPlusTreeError::missing_node("insert", leaf_id))?;
                    return Ok(leaf.insert(key, value));
                }
                NodeRef::Branch(branch_id, _) => {
                    let branch = self
                        .get_branch(branch_id)
                        .ok_or_else(|| BPlusTreeError::missing_node("insert", branch_id))?;
                    let mut child_index = branch.find_child_index(&key);
                    let child = branch.children[child_index];

                    if !self.is_node_full(child) {
                        current = child;
                        continue;
                    }

                    let (separator, new_child) = self
                        .split_child(child)
                        .ok_or_else(|| BPlusTreeError::missing_node("insert", child.id()))?;
                    let goes_right = key >= separator;

                    let branch = self
                        .get_branch_mut(branch_id)
                        .ok_or_else(|| BPlusTreeError::missing_node("insert", branch_id))?;
                    branch.insert_child(child_index, separator, new_child);
                    if goes_right {
                        child_index += 1;
                    }
                    current = branch.children[child_index];
                }
            }
        }
    }

    // ============================================================================
    // SPLITTING
    // ============================================================================

    /// Split the current root and grow the tree by one level.
    ///
    /// Returns the new root. This is the only place the tree gets taller.
    fn split_root(&mut self, old_root: NodeRef<K, V>) -> Option<NodeRef<K, V>> {
        let (separator, right) = self.split_child(old_root)?;

        let mut new_root = BranchNode::new(self.degree);
        new_root.keys.push(separator);
        new_root.children.push(old_root);
        new_root.children.push(right);

        let root = NodeRef::branch(self.allocate_branch(new_root));
        self.root = Some(root);

        tracing::debug!(height = self.height(), "root split");
        Some(root)
    }

    /// Split a full node in place, allocating its new right sibling.
    ///
    /// Returns the separator to promote and the reference to the new sibling.
    /// A split leaf is linked to its new sibling in the leaf chain.
    fn split_child(&mut self, child: NodeRef<K, V>) -> Option<(K, NodeRef<K, V>)> {
        let (separator, new_node_data) = match child {
            NodeRef::Leaf(leaf_id, _) => {
                let (right, separator) = self.get_leaf_mut(leaf_id)?.split();
                (separator, SplitNodeData::Leaf(right))
            }
            NodeRef::Branch(branch_id, _) => {
                let (right, promoted) = self.get_branch_mut(branch_id)?.split();
                (promoted, SplitNodeData::Branch(right))
            }
        };

        let new_child = match new_node_data {
            SplitNodeData::Leaf(right) => {
                let right_id = self.allocate_leaf(right);
                self.get_leaf_mut(child.id())?.next = right_id;
                NodeRef::leaf(right_id)
            }
            SplitNodeData::Branch(right) => NodeRef::branch(self.allocate_branch(right)),
        };

        tracing::trace!(
            node = child.id(),
            sibling = new_child.id(),
            leaf = child.is_leaf(),
            "node split"
        );
        Some((separator, new_child))
    }

    fn is_node_full(&self, node: NodeRef<K, V>) -> bool {
        match node {
            NodeRef::Leaf(id, _) => self.get_leaf(id).is_some_and(|leaf| leaf.is_full()),
            NodeRef::Branch(id, _) => self.get_branch(id).is_some_and(|branch| branch.is_full()),
        }
    }
}

impl<K, V> BPlusTree<K, V> {
    /// Allocate a new leaf node in the arena and return its ID.
    #[inline]
    pub(crate) fn allocate_leaf(&mut self, leaf: LeafNode<K, V>) -> NodeId {
        self.leaf_arena.allocate(leaf)
    }

    /// Allocate a new branch node in the arena and return its ID.
    #[inline]
    pub(crate) fn allocate_branch(&mut self, branch: BranchNode<K, V>) -> NodeId {
        self.branch_arena.allocate(branch)
    }
}

impl<K: Ord + Clone, V> Extend<(K, V)> for BPlusTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord + Clone, V> FromIterator<(K, V)> for BPlusTree<K, V> {
    /// Build a tree with the default degree from key-value pairs.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = BPlusTree::with_default_degree();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_creates_root_leaf_and_chain_head() {
        let mut tree = BPlusTree::new(3);
        tree.insert(10, "ten");

        let root = tree.root.unwrap();
        assert!(root.is_leaf());
        assert_eq!(tree.first_leaf, root.id());
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_root_split_grows_height() {
        let mut tree = BPlusTree::new(3);
        for key in [10, 20, 5, 15, 25] {
            tree.insert(key, ());
        }
        assert_eq!(tree.height(), 1);
        assert!(tree.root.unwrap().is_leaf());

        tree.insert(3, ());
        assert_eq!(tree.height(), 2);

        let root = tree.get_branch(tree.root.unwrap().id()).unwrap();
        assert_eq!(root.keys(), &[15]);
        assert_eq!(tree.leaf_keys(), vec![vec![3, 5, 10], vec![15, 20, 25]]);
    }

    #[test]
    fn test_split_child_links_leaf_chain() {
        let mut tree = BPlusTree::new(2);
        for key in 0..20 {
            tree.insert(key, key);
        }

        let chained: Vec<i32> = tree.keys().copied().collect();
        assert_eq!(chained, (0..20).collect::<Vec<_>>());
        assert!(tree.validate());
    }

    #[test]
    fn test_insert_duplicate_updates_in_place() {
        let mut tree = BPlusTree::new(2);
        for key in 0..10 {
            tree.insert(key, key);
        }
        let height = tree.height();

        assert_eq!(tree.insert(4, 400), Some(4));
        assert_eq!(tree.find(&4), Some(&400));
        assert_eq!(tree.size(), 10);
        assert_eq!(tree.height(), height);
        assert!(tree.validate());
    }

    #[test]
    fn test_descending_inserts_stay_valid() {
        let mut tree = BPlusTree::new(2);
        for key in (0..100).rev() {
            tree.insert(key, key * 2);
            assert!(tree.validate(), "invalid after inserting {}", key);
        }
        assert_eq!(tree.size(), 100);
    }

    #[test]
    fn test_try_insert() {
        let mut tree = BPlusTree::new(3);
        assert_eq!(tree.try_insert(1, "one"), Ok(None));
        assert_eq!(tree.try_insert(1, "uno"), Ok(Some("one")));
    }

    #[test]
    fn test_try_insert_accepts_underfull_leaves() {
        let mut tree = BPlusTree::new(3);
        for key in [10, 20, 5, 15, 25, 3, 7, 12, 17, 22] {
            tree.insert(key, key);
        }
        for key in [15, 17, 20, 22] {
            tree.remove(&key);
        }
        assert_eq!(tree.leaf_keys(), vec![vec![3, 5, 7, 10, 12], vec![25]]);
        assert!(!tree.validate());

        assert_eq!(tree.try_insert(30, 30), Ok(None));
        assert!(tree.contains(&30));
        assert_eq!(tree.try_insert(30, 31), Ok(Some(30)));
        assert_eq!(tree.validate_structure(), Ok(()));
    }

    #[test]
    fn test_try_insert_rejects_corrupted_tree() {
        let mut tree = BPlusTree::new(3);
        for key in 0..10 {
            tree.insert(key, key);
        }
        let root_id = tree.root.unwrap().id();
        tree.get_branch_mut(root_id).unwrap().keys[0] = 100;

        let err = tree.try_insert(50, 50).unwrap_err();
        assert!(matches!(err, BPlusTreeError::CorruptedTree(_)), "{:?}", err);
        assert!(!tree.contains(&50));
    }

    #[test]
    fn test_insert_into_missing_leaf_is_reported() {
        let mut tree = BPlusTree::new(3);
        for key in [10, 20, 5, 15, 25, 3] {
            tree.insert(key, key);
        }
        // Free the right leaf out from under the root.
        let root_id = tree.root.unwrap().id();
        let right = tree.get_branch(root_id).unwrap().children()[1].id();
        tree.leaf_arena.deallocate(right);

        assert_eq!(tree.insert(30, 30), None);
        assert_eq!(tree.size(), 3);
        assert!(tree.find(&30).is_none());
        assert!(tree.get_leaf(right).is_none());
    }

    #[test]
    fn test_from_iterator_and_extend() {
        let mut tree: BPlusTree<i32, i32> = (0..10).map(|k| (k, k)).collect();
        assert_eq!(tree.degree(), crate::types::DEFAULT_DEGREE);
        tree.extend((10..20).map(|k| (k, k)));
        assert_eq!(tree.size(), 20);
        assert!(tree.validate());
    }
}
