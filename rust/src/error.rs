//! Error handling and result types for BPlusTree operations.
//!
//! The core operations never fail: absence is reported through `Option` and
//! empty iterators. These types back the checked convenience wrappers
//! (`get_item`, `try_insert`, `try_remove`) that surface missing keys and
//! structural corruption as values.

use crate::types::NodeId;
use crate::validation::Violation;

/// Error type for B+ tree operations.
#[derive(Debug, Clone, PartialEq)]
pub enum BPlusTreeError {
    /// Key not found in the tree.
    KeyNotFound,
    /// Internal data structure integrity violation.
    DataIntegrityError(String),
    /// Tree corruption detected by the validator.
    CorruptedTree(String),
}

impl BPlusTreeError {
    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create a DataIntegrityError for a node reference that no longer
    /// resolves in its arena.
    pub fn missing_node(operation: &str, id: NodeId) -> Self {
        Self::data_integrity(operation, &format!("node {} missing from arena", id))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Check if this error reports a structural problem rather than a lookup miss
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, Self::DataIntegrityError(_) | Self::CorruptedTree(_))
    }
}

impl std::fmt::Display for BPlusTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BPlusTreeError::KeyNotFound => write!(f, "Key not found in tree"),
            BPlusTreeError::DataIntegrityError(msg) => write!(f, "Data integrity error: {}", msg),
            BPlusTreeError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
        }
    }
}

impl std::error::Error for BPlusTreeError {}

impl From<Violation> for BPlusTreeError {
    fn from(violation: Violation) -> Self {
        BPlusTreeError::corrupted_tree(violation.category(), &violation.to_string())
    }
}

/// Public result type for tree operations that may fail
pub type BTreeResult<T> = Result<T, BPlusTreeError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, BPlusTreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, BPlusTreeError>;

/// Result extension trait for attaching context to errors
pub trait BTreeResultExt<T> {
    /// Convert to a BTreeResult with additional context
    fn with_context(self, context: &str) -> BTreeResult<T>;

    /// Convert to a BTreeResult with operation context
    fn with_operation(self, operation: &str) -> BTreeResult<T>;
}

impl<T> BTreeResultExt<T> for Result<T, BPlusTreeError> {
    fn with_context(self, context: &str) -> BTreeResult<T> {
        self.map_err(|e| match e {
            BPlusTreeError::KeyNotFound => BPlusTreeError::KeyNotFound,
            BPlusTreeError::DataIntegrityError(msg) => {
                BPlusTreeError::data_integrity(context, &msg)
            }
            BPlusTreeError::CorruptedTree(msg) => {
                BPlusTreeError::CorruptedTree(format!("{}: {}", context, msg))
            }
        })
    }

    fn with_operation(self, operation: &str) -> BTreeResult<T> {
        self.with_context(&format!("Operation '{}'", operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(BPlusTreeError::KeyNotFound.to_string(), "Key not found in tree");
        assert_eq!(
            BPlusTreeError::data_integrity("insert", "bad leaf").to_string(),
            "Data integrity error: insert: bad leaf"
        );
    }

    #[test]
    fn test_missing_node_is_integrity_error() {
        let err = BPlusTreeError::missing_node("remove", 7);
        assert_eq!(
            err,
            BPlusTreeError::DataIntegrityError("remove: node 7 missing from arena".to_string())
        );
        assert!(err.is_integrity_error());
    }

    #[test]
    fn test_with_operation_keeps_key_not_found() {
        let result: BTreeResult<()> = Err(BPlusTreeError::KeyNotFound);
        assert_eq!(result.with_operation("remove"), Err(BPlusTreeError::KeyNotFound));
    }

    #[test]
    fn test_with_operation_adds_context() {
        let result: BTreeResult<()> = Err(BPlusTreeError::corrupted_tree("Leaf", "empty"));
        match result.with_operation("insert") {
            Err(BPlusTreeError::CorruptedTree(msg)) => {
                assert_eq!(msg, "Operation 'insert': Leaf corruption: empty");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_violation_conversion() {
        let err: BPlusTreeError = Violation::EmptyLeaf { depth: 1 }.into();
        assert!(err.is_integrity_error());
        assert!(!BPlusTreeError::KeyNotFound.is_integrity_error());
    }
}
