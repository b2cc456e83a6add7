//! Error types for merkle tree operations.

use thiserror::Error;

use crate::HashValue;

/// Errors produced while building trees, deriving proofs or verifying them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    #[error("Invalid hash length: expected {expected} bytes, got {got}")]
    InvalidHashLength { expected: usize, got: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested leaf is not part of the canonical leaf layer.
    #[error("Leaf {0} does not exist in merkle tree")]
    LeafNotFound(HashValue),

    #[error("Invalid proof: {0}")]
    InvalidProof(String),
}

pub type MerkleResult<T> = Result<T, MerkleError>;
