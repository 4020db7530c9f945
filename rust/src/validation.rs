//! Validation utilities for BPlusTree.
//!
//! The validator is a read-only recursive walk. No mutation path depends on
//! it; it exists so tests and callers can check the structural invariants
//! after arbitrary operation histories.

use crate::node::NodeSize;
use crate::types::{BPlusTree, NodeId, NodeRef, NULL_NODE};
use std::fmt;

/// A broken invariant found by [`BPlusTree::validate_detailed`].
///
/// `depth` counts edges from the root, so the root is at depth 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The root holds no keys.
    RootSize { keys: usize },
    /// A non-root leaf holds no keys.
    EmptyLeaf { depth: usize },
    /// Leaf keys are not strictly increasing.
    UnsortedLeaf { depth: usize },
    /// A leaf's key and value sequences differ in length.
    KeyValueMismatch { depth: usize, keys: usize, values: usize },
    /// A leaf's first key does not follow the previous leaf's last key.
    OverlappingLeaves { depth: usize },
    /// A node holds more than `2t - 1` keys, or a non-root node fewer than `t - 1`.
    NodeSize { depth: usize, keys: usize, min: usize, max: usize },
    /// A branch does not hold exactly one more child than keys.
    KeyChildrenMismatch { depth: usize, keys: usize, children: usize },
    /// Keys under a branch fall outside the separators bounding them.
    SeparatorViolation { depth: usize },
    /// Leaves sit at different depths.
    UnbalancedDepth { expected: usize, found: usize },
    /// The leaf chain does not visit exactly the tree's leaves in order.
    BrokenLeafChain,
    /// A node reference points at a freed arena slot.
    MissingNode { id: NodeId },
    /// The arenas hold nodes that are not reachable from the root.
    ArenaLeak { in_tree: usize, allocated: usize },
}

impl Violation {
    /// Short name of the invariant family this violation belongs to.
    pub fn category(&self) -> &'static str {
        match self {
            Violation::RootSize { .. } => "root size",
            Violation::EmptyLeaf { .. } => "empty leaf",
            Violation::UnsortedLeaf { .. } => "unsorted leaf",
            Violation::KeyValueMismatch { .. } => "key/value mismatch",
            Violation::OverlappingLeaves { .. } => "overlapping ranges",
            Violation::NodeSize { .. } => "node size",
            Violation::KeyChildrenMismatch { .. } => "key/children mismatch",
            Violation::SeparatorViolation { .. } => "separator violation",
            Violation::UnbalancedDepth { .. } => "unbalanced depth",
            Violation::BrokenLeafChain => "leaf chain",
            Violation::MissingNode { .. } => "missing node",
            Violation::ArenaLeak { .. } => "arena leak",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RootSize { keys } => write!(f, "root holds {} keys", keys),
            Violation::EmptyLeaf { depth } => write!(f, "empty leaf at depth {}", depth),
            Violation::UnsortedLeaf { depth } => {
                write!(f, "leaf keys not sorted at depth {}", depth)
            }
            Violation::KeyValueMismatch { depth, keys, values } => write!(
                f,
                "leaf at depth {} has {} keys but {} values",
                depth, keys, values
            ),
            Violation::OverlappingLeaves { depth } => {
                write!(f, "leaf key range overlaps its predecessor at depth {}", depth)
            }
            Violation::NodeSize {
                depth,
                keys,
                min,
                max,
            } => write!(
                f,
                "node at depth {} holds {} keys, allowed {}..={}",
                depth, keys, min, max
            ),
            Violation::KeyChildrenMismatch {
                depth,
                keys,
                children,
            } => write!(
                f,
                "branch at depth {} has {} keys and {} children",
                depth, keys, children
            ),
            Violation::SeparatorViolation { depth } => {
                write!(f, "keys outside separator bounds at depth {}", depth)
            }
            Violation::UnbalancedDepth { expected, found } => write!(
                f,
                "leaf found at depth {}, expected depth {}",
                found, expected
            ),
            Violation::BrokenLeafChain => write!(f, "leaf chain does not match tree leaves"),
            Violation::MissingNode { id } => write!(f, "node {} is not allocated", id),
            Violation::ArenaLeak {
                in_tree,
                allocated,
            } => write!(
                f,
                "{} nodes reachable from the root but {} allocated",
                in_tree, allocated
            ),
        }
    }
}

impl std::error::Error for Violation {}

/// How strictly node occupancy is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeCheck {
    Strict,
    AllowUnderflow,
}

/// State threaded through the recursive walk, in left-to-right leaf order.
struct LeafWalk<'a, K> {
    previous_last_key: Option<&'a K>,
    leaf_depth: Option<usize>,
    leaf_ids: Vec<NodeId>,
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord, V> BPlusTree<K, V> {
    /// Check if the tree maintains its B+ tree invariants.
    ///
    /// Any violation found is logged at `warn` level.
    pub fn validate(&self) -> bool {
        match self.validate_detailed() {
            Ok(()) => true,
            Err(violation) => {
                tracing::warn!(
                    category = violation.category(),
                    %violation,
                    "tree validation failed"
                );
                false
            }
        }
    }

    /// Check invariants, reporting the first violation found.
    pub fn validate_detailed(&self) -> Result<(), Violation> {
        self.check_tree(SizeCheck::Strict)
    }

    /// Check every invariant except the minimum occupancy of non-root nodes.
    ///
    /// Removals leave underfull nodes in place, so this is the check that
    /// holds across any mix of insertions and removals. Overfull nodes and
    /// empty non-root leaves are still reported.
    pub fn validate_structure(&self) -> Result<(), Violation> {
        self.check_tree(SizeCheck::AllowUnderflow)
    }

    fn check_tree(&self, size_check: SizeCheck) -> Result<(), Violation> {
        let Some(root) = self.root else {
            if self.first_leaf != NULL_NODE {
                return Err(Violation::BrokenLeafChain);
            }
            return self.check_arena_tree_consistency();
        };

        let mut walk = LeafWalk {
            previous_last_key: None,
            leaf_depth: None,
            leaf_ids: Vec::new(),
        };
        self.check_node(root, None, None, 0, size_check, &mut walk)?;
        self.check_leaf_chain(&walk.leaf_ids)?;
        self.check_arena_tree_consistency()
    }

    /// Recursively check a node and its subtree.
    ///
    /// Every key under `node` must satisfy `lower <= key < upper`.
    fn check_node<'a>(
        &'a self,
        node: NodeRef<K, V>,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        depth: usize,
        size_check: SizeCheck,
        walk: &mut LeafWalk<'a, K>,
    ) -> Result<(), Violation> {
        let is_root = depth == 0;
        let within_bounds = |key: &K| {
            lower.map_or(true, |lower| key >= lower) && upper.map_or(true, |upper| key < upper)
        };

        match node {
            NodeRef::Leaf(id, _) => {
                let leaf = self.get_leaf(id).ok_or(Violation::MissingNode { id })?;

                if leaf.keys.len() != leaf.values.len() {
                    return Err(Violation::KeyValueMismatch {
                        depth,
                        keys: leaf.keys.len(),
                        values: leaf.values.len(),
                    });
                }
                if leaf.is_empty() {
                    return Err(if is_root {
                        Violation::RootSize { keys: 0 }
                    } else {
                        Violation::EmptyLeaf { depth }
                    });
                }
                self.check_size(leaf, is_root, depth, size_check)?;

                if leaf.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
                    return Err(Violation::UnsortedLeaf { depth });
                }
                if !leaf.keys.iter().all(within_bounds) {
                    return Err(Violation::SeparatorViolation { depth });
                }

                let (first, last) = (&leaf.keys[0], &leaf.keys[leaf.keys.len() - 1]);
                if walk.previous_last_key.is_some_and(|previous| previous >= first) {
                    return Err(Violation::OverlappingLeaves { depth });
                }
                match walk.leaf_depth {
                    Some(expected) if expected != depth => {
                        return Err(Violation::UnbalancedDepth {
                            expected,
                            found: depth,
                        });
                    }
                    _ => walk.leaf_depth = Some(depth),
                }

                walk.previous_last_key = Some(last);
                walk.leaf_ids.push(id);
                Ok(())
            }
            NodeRef::Branch(id, _) => {
                let branch = self.get_branch(id).ok_or(Violation::MissingNode { id })?;

                if branch.keys.len() + 1 != branch.children.len() {
                    return Err(Violation::KeyChildrenMismatch {
                        depth,
                        keys: branch.keys.len(),
                        children: branch.children.len(),
                    });
                }
                if is_root && branch.is_empty() {
                    return Err(Violation::RootSize { keys: 0 });
                }
                self.check_size(branch, is_root, depth, size_check)?;

                if branch.keys.windows(2).any(|pair| pair[0] >= pair[1])
                    || !branch.keys.iter().all(within_bounds)
                {
                    return Err(Violation::SeparatorViolation { depth });
                }

                for (i, &child) in branch.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(&branch.keys[i - 1]) };
                    let child_upper = branch.keys.get(i).or(upper);
                    self.check_node(
                        child,
                        child_lower,
                        child_upper,
                        depth + 1,
                        size_check,
                        walk,
                    )?;
                }

                Ok(())
            }
        }
    }

    fn check_size(
        &self,
        node: &impl NodeSize,
        is_root: bool,
        depth: usize,
        size_check: SizeCheck,
    ) -> Result<(), Violation> {
        let keys = node.key_count();
        let underflow = !is_root && size_check == SizeCheck::Strict && node.is_underflow();
        if keys > node.max_keys() || underflow {
            return Err(Violation::NodeSize {
                depth,
                keys,
                min: node.min_keys(),
                max: node.max_keys(),
            });
        }
        Ok(())
    }
}

impl<K, V> BPlusTree<K, V> {
    /// Check that the chain from the head visits exactly `expected`, in order.
    fn check_leaf_chain(&self, expected: &[NodeId]) -> Result<(), Violation> {
        let mut current = self.get_first_leaf_id();

        for &id in expected {
            if current != Some(id) {
                return Err(Violation::BrokenLeafChain);
            }
            current = self.get_leaf_next(id);
        }

        match current {
            None => Ok(()),
            Some(_) => Err(Violation::BrokenLeafChain),
        }
    }

    /// Check that every allocated node is reachable from the root.
    fn check_arena_tree_consistency(&self) -> Result<(), Violation> {
        let (tree_leaves, tree_branches) = self.count_nodes_in_tree();
        let in_tree = tree_leaves + tree_branches;
        let allocated =
            self.leaf_arena.stats().allocated_count + self.branch_arena.stats().allocated_count;

        if in_tree != allocated {
            return Err(Violation::ArenaLeak {
                in_tree,
                allocated,
            });
        }
        Ok(())
    }
}
