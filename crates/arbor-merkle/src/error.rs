//! Merkle error types

use thiserror::Error;

use crate::HashValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// `build` was handed no values. A tree always has a root.
    #[error("Cannot build a merkle tree from an empty value list")]
    EmptyInput,

    /// An operation was attempted without a tree.
    #[error("Empty tree")]
    EmptyTree,

    #[error("No leaf with digest {0}")]
    LeafNotFound(HashValue),

    #[error("Invalid hash length: expected {expected}, got {got}")]
    InvalidHashLength { expected: usize, got: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type MerkleResult<T> = std::result::Result<T, MerkleError>;
