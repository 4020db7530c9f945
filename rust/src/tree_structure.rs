//! Tree structure management operations for BPlusTree.
//!
//! This module contains tree-level operations over the overall shape:
//! size and height queries, clearing, node counting, and the per-node key
//! data that external dump routines print.

use crate::types::{BPlusTree, NodeId, NodeRef, NULL_NODE};

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K, V> BPlusTree<K, V> {
    /// Returns the number of stored keys, summed along the leaf chain.
    pub fn size(&self) -> usize {
        self.leaves().map(<[K]>::len).sum()
    }

    /// Returns the number of elements in the tree. Same as [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels from the root down to the leaves, inclusive.
    ///
    /// Every leaf sits at the same depth, so following the leftmost child
    /// is enough. An empty tree reports 1, the same as a lone root leaf.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;

        while let Some(NodeRef::Branch(id, _)) = current {
            height += 1;
            current = self
                .get_branch(id)
                .and_then(|branch| branch.children.first().copied());
        }

        height
    }

    /// Returns true if the root is a leaf node.
    pub fn is_leaf_root(&self) -> bool {
        self.root.is_some_and(|root| root.is_leaf())
    }

    /// Returns the number of leaf nodes reachable from the root.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Clear all items from the tree.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.branch_arena.clear();
        self.root = None;
        self.first_leaf = NULL_NODE;
        tracing::debug!("tree cleared");
    }

    /// Count the leaf and branch nodes actually reachable from the root.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        match self.root {
            Some(root) => self.count_nodes_recursive(root),
            None => (0, 0),
        }
    }

    fn count_nodes_recursive(&self, node: NodeRef<K, V>) -> (usize, usize) {
        match node {
            NodeRef::Leaf(_, _) => (1, 0),
            NodeRef::Branch(id, _) => {
                let Some(branch) = self.get_branch(id) else {
                    return (0, 0);
                };

                branch
                    .children
                    .iter()
                    .map(|&child| self.count_nodes_recursive(child))
                    .fold((0, 1), |(leaves, branches), (l, b)| {
                        (leaves + l, branches + b)
                    })
            }
        }
    }

    // ============================================================================
    // TREE NAVIGATION HELPERS
    // ============================================================================

    /// Get the ID of the first leaf in the chain.
    pub fn get_first_leaf_id(&self) -> Option<NodeId> {
        (self.first_leaf != NULL_NODE).then_some(self.first_leaf)
    }

    /// Descend along the last child of every branch under `node`.
    pub(crate) fn rightmost_leaf(&self, node: NodeRef<K, V>) -> Option<NodeId> {
        let mut current = node;

        loop {
            match current {
                NodeRef::Leaf(id, _) => return Some(id),
                NodeRef::Branch(id, _) => {
                    current = *self.get_branch(id)?.children.last()?;
                }
            }
        }
    }
}

impl<K: Clone, V> BPlusTree<K, V> {
    /// Keys of every leaf, in chain order.
    pub fn leaf_keys(&self) -> Vec<Vec<K>> {
        self.leaves().map(<[K]>::to_vec).collect()
    }

    /// Keys of every node, grouped by level from the root down, each level
    /// listed left to right.
    pub fn level_keys(&self) -> Vec<Vec<Vec<K>>> {
        let mut levels = Vec::new();
        let mut frontier: Vec<NodeRef<K, V>> = self.root.into_iter().collect();

        while !frontier.is_empty() {
            let mut level = Vec::with_capacity(frontier.len());
            let mut next_frontier = Vec::new();

            for node in frontier {
                match node {
                    NodeRef::Leaf(id, _) => {
                        if let Some(leaf) = self.get_leaf(id) {
                            level.push(leaf.keys.clone());
                        }
                    }
                    NodeRef::Branch(id, _) => {
                        if let Some(branch) = self.get_branch(id) {
                            level.push(branch.keys.clone());
                            next_frontier.extend_from_slice(&branch.children);
                        }
                    }
                }
            }

            levels.push(level);
            frontier = next_frontier;
        }

        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_tree() -> BPlusTree<i32, &'static str> {
        let mut tree = BPlusTree::new(3);
        for key in [10, 20, 5, 15, 25, 3, 7, 12, 17, 22] {
            tree.insert(key, "v");
        }
        tree
    }

    #[test]
    fn test_empty_tree_structure() {
        let tree = BPlusTree::<i32, i32>::new(3);
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.height(), 1);
        assert!(tree.is_empty());
        assert!(!tree.is_leaf_root());
        assert_eq!(tree.count_nodes_in_tree(), (0, 0));
        assert_eq!(tree.get_first_leaf_id(), None);
        assert!(tree.level_keys().is_empty());
    }

    #[test]
    fn test_size_and_counts() {
        let tree = scenario_tree();
        assert_eq!(tree.size(), 10);
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.count_nodes_in_tree(), (2, 1));
    }

    #[test]
    fn test_level_keys() {
        let tree = scenario_tree();
        assert_eq!(
            tree.level_keys(),
            vec![
                vec![vec![15]],
                vec![vec![3, 5, 7, 10, 12], vec![15, 17, 20, 22, 25]],
            ]
        );
    }

    #[test]
    fn test_rightmost_leaf() {
        let tree = scenario_tree();
        let leaf_id = tree.rightmost_leaf(tree.root.unwrap()).unwrap();
        assert_eq!(tree.get_leaf(leaf_id).unwrap().keys(), &[15, 17, 20, 22, 25]);
    }

    #[test]
    fn test_clear() {
        let mut tree = scenario_tree();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.find(&10), None);

        tree.insert(1, "one");
        assert_eq!(tree.size(), 1);
        assert!(tree.validate());
    }
}
