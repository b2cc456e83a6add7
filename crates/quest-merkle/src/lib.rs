//! # quest-merkle
//!
//! Keccak-256 Merkle commitments whose proofs an EVM contract can verify.
//!
//! - [`tree::MerkleTree`]: builds every layer over a canonical (sorted,
//!   deduplicated) leaf set and derives inclusion proofs.
//! - [`proof::MerkleProof`]: an ordered list of sibling hashes, verified by
//!   folding with [`hash::combined_hash`].
//!
//! ## Hashing convention
//!
//! Parents are `keccak256(min(a, b) ‖ max(a, b))`. Because the pair is sorted
//! before hashing, proofs carry no left/right flags and the root is a function
//! of the leaf set alone. An empty set commits to 32 zero bytes.

pub mod error;
pub mod hash;
pub mod proof;
pub mod tree;

pub use error::{MerkleError, MerkleResult};
pub use hash::{combined_hash, keccak256, HashValue};
pub use proof::{verify_proof, MerkleProof};
pub use tree::MerkleTree;

/// The length of hash digests used in merkle trees (32 bytes = 256 bits)
pub const HASH_LENGTH: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_basic() {
        let leaves: Vec<HashValue> = [b"leaf0", b"leaf1", b"leaf2", b"leaf3"]
            .iter()
            .map(|data| keccak256(*data))
            .collect();

        let tree = MerkleTree::build(leaves.clone());
        let root = tree.root();

        // Verify all proofs
        for leaf in &leaves {
            let proof = tree.proof(leaf).unwrap();
            assert!(proof.verify(&root, leaf).is_ok());
        }
    }

    #[test]
    fn test_unknown_leaf() {
        let tree = MerkleTree::build(vec![keccak256(b"present")]);
        let missing = keccak256(b"missing");
        assert_eq!(tree.proof(&missing), Err(MerkleError::LeafNotFound(missing)));
    }
}
