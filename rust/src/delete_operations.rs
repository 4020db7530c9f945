//! DELETE operations for BPlusTree.
//!
//! Removal uses a deliberately partial rebalancing policy. A node left with
//! no keys at all (an emptied leaf, or a branch whose last child was just
//! detached) is detached from its parent along with one adjacent separator.
//! Nodes that are merely below the minimum occupancy stay as they are: there
//! is no borrowing from or merging with siblings. After each removal an
//! empty root clears the tree and a single-child root is replaced by its
//! child.

use crate::error::{BPlusTreeError, BTreeResultExt, ModifyResult};
use crate::node::NodeSize;
use crate::types::{BPlusTree, NodeId, NodeRef, NULL_NODE};

impl<K: Ord, V> BPlusTree<K, V> {
    /// Remove a key from the tree, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3);
    /// tree.insert(1, "one");
    /// tree.insert(2, "two");
    ///
    /// assert_eq!(tree.remove(&1), Some("one"));
    /// assert_eq!(tree.remove(&1), None);
    /// assert!(!tree.contains(&1));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self.remove_entry(key) {
            Ok(removed) => removed,
            Err(error) => {
                tracing::error!(%error, "remove abandoned");
                None
            }
        }
    }

    /// Remove a key, reporting a missing key as [`BPlusTreeError::KeyNotFound`].
    ///
    /// A node reference that no longer resolves during the descent is
    /// reported as [`BPlusTreeError::DataIntegrityError`].
    pub fn try_remove(&mut self, key: &K) -> ModifyResult<V> {
        self.remove_entry(key)
            .and_then(|removed| removed.ok_or(BPlusTreeError::KeyNotFound))
            .with_operation("remove")
    }

    fn remove_entry(&mut self, key: &K) -> ModifyResult<Option<V>> {
        let Some(mut current) = self.root else {
            return Ok(None);
        };
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        // Left sibling subtree at the deepest level where the path does not
        // take the first child. Its rightmost leaf precedes the target leaf.
        let mut left_neighbor = None;

        let leaf_id = loop {
            match current {
                NodeRef::Leaf(id, _) => break id,
                NodeRef::Branch(id, _) => {
                    let branch = self
                        .get_branch(id)
                        .ok_or_else(|| BPlusTreeError::missing_node("remove", id))?;
                    let child_index = branch.find_child_index(key);
                    let child = *branch.children.get(child_index).ok_or_else(|| {
                        BPlusTreeError::corrupted_tree("branch", "child index out of range")
                    })?;
                    if child_index > 0 {
                        left_neighbor = Some(branch.children[child_index - 1]);
                    }
                    path.push((id, child_index));
                    current = child;
                }
            }
        };

        let (removed, underflow) = self
            .get_leaf_mut(leaf_id)
            .ok_or_else(|| BPlusTreeError::missing_node("remove", leaf_id))?
            .remove(key);
        let Some(removed) = removed else {
            return Ok(None);
        };

        if underflow && !path.is_empty() {
            self.detach_emptied_nodes(leaf_id, &path, left_neighbor);
        }
        self.collapse_root();

        Ok(Some(removed))
    }
}

impl<K, V> BPlusTree<K, V> {
    // ============================================================================
    // HELPERS FOR DELETE OPERATIONS
    // ============================================================================

    /// Walk back up `path` from an underfull leaf, detaching every node that
    /// has been left empty.
    fn detach_emptied_nodes(
        &mut self,
        leaf_id: NodeId,
        path: &[(NodeId, usize)],
        left_neighbor: Option<NodeRef<K, V>>,
    ) {
        if !self.get_leaf(leaf_id).is_some_and(|leaf| leaf.is_empty()) {
            return;
        }
        self.unlink_leaf(leaf_id, left_neighbor);

        for &(branch_id, child_index) in path.iter().rev() {
            let Some(branch) = self.get_branch_mut(branch_id) else {
                return;
            };

            let child = branch.remove_child(child_index);
            let branch_emptied = branch.children.is_empty();
            let branch_underflow = branch.is_underflow();
            self.free_node(child);

            tracing::trace!(
                parent = branch_id,
                child = child.id(),
                leaf = child.is_leaf(),
                parent_underflow = branch_underflow,
                "detached empty node"
            );

            if !branch_emptied {
                return;
            }
        }
    }

    /// Take an emptied leaf out of the chain before it is freed.
    fn unlink_leaf(&mut self, leaf_id: NodeId, left_neighbor: Option<NodeRef<K, V>>) {
        let next = self.get_leaf(leaf_id).map_or(NULL_NODE, |leaf| leaf.next);

        match left_neighbor.and_then(|node| self.rightmost_leaf(node)) {
            Some(previous_id) => {
                if let Some(previous) = self.get_leaf_mut(previous_id) {
                    previous.next = next;
                }
            }
            None => self.first_leaf = next,
        }
    }

    /// Shrink the root after a removal.
    ///
    /// An empty root leaf or a childless root branch empties the tree. A root
    /// branch with a single child is replaced by that child, repeatedly.
    fn collapse_root(&mut self) {
        while let Some(root) = self.root {
            match root {
                NodeRef::Leaf(id, _) => {
                    if self.get_leaf(id).is_some_and(|leaf| leaf.is_empty()) {
                        self.free_node(root);
                        self.root = None;
                        self.first_leaf = NULL_NODE;
                        tracing::debug!("last key removed, tree is empty");
                    }
                    return;
                }
                NodeRef::Branch(id, _) => {
                    let replacement = match self.get_branch(id).map(|branch| branch.children()) {
                        Some([]) => None,
                        Some([only_child]) => Some(*only_child),
                        _ => return,
                    };

                    self.free_node(root);
                    self.root = replacement;
                    if replacement.is_none() {
                        self.first_leaf = NULL_NODE;
                    }
                    tracing::debug!(height = self.height(), "root collapsed");
                }
            }
        }
    }

    /// Return a detached node's slot to its arena.
    fn free_node(&mut self, node: NodeRef<K, V>) {
        match node {
            NodeRef::Leaf(id, _) => {
                self.leaf_arena.deallocate(id);
            }
            NodeRef::Branch(id, _) => {
                self.branch_arena.deallocate(id);
            }
        }
    }
}
