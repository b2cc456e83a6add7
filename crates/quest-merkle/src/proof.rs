//! Inclusion proofs and verification.
//!
//! Verification folds the leaf with each sibling using [`combined_hash`], in
//! proof order, and compares the result with the claimed root. This is the
//! same procedure the on-chain verifier runs, so a proof accepted here is
//! accepted there.

use serde::{Deserialize, Serialize};

use crate::error::{MerkleError, MerkleResult};
use crate::hash::{combined_hash, HashValue};

/// Sibling hashes from the leaf layer up to just below the root.
///
/// Serialized as a plain array of `0x`-prefixed hex strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerkleProof {
    siblings: Vec<HashValue>,
}

impl MerkleProof {
    pub fn new(siblings: Vec<HashValue>) -> Self {
        Self { siblings }
    }

    pub fn siblings(&self) -> &[HashValue] {
        &self.siblings
    }

    pub fn into_siblings(self) -> Vec<HashValue> {
        self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.siblings.iter().map(HashValue::to_hex).collect()
    }

    /// Recompute the root implied by this proof for `leaf`.
    pub fn compute_root(&self, leaf: &HashValue) -> HashValue {
        self.siblings
            .iter()
            .fold(*leaf, |running, sibling| combined_hash(&running, sibling))
    }

    /// Verify that `leaf` is included under `root`.
    pub fn verify(&self, root: &HashValue, leaf: &HashValue) -> MerkleResult<()> {
        let computed = self.compute_root(leaf);
        if &computed == root {
            Ok(())
        } else {
            Err(MerkleError::InvalidProof(format!(
                "Root mismatch: expected {}, computed {}",
                root, computed
            )))
        }
    }
}

impl From<Vec<HashValue>> for MerkleProof {
    fn from(siblings: Vec<HashValue>) -> Self {
        Self::new(siblings)
    }
}

/// Verify a proof given as a bare sibling list.
pub fn verify_proof(root: &HashValue, leaf: &HashValue, siblings: &[HashValue]) -> bool {
    let computed = siblings
        .iter()
        .fold(*leaf, |running, sibling| combined_hash(&running, sibling));
    &computed == root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::keccak256;
    use crate::tree::MerkleTree;

    fn sample_tree() -> (MerkleTree, Vec<HashValue>) {
        let leaves: Vec<_> = (0u8..7).map(|i| keccak256(&[i])).collect();
        (MerkleTree::build(leaves.clone()), leaves)
    }

    fn flip(h: &HashValue, byte: usize) -> HashValue {
        let mut bytes = *h.as_bytes();
        bytes[byte] ^= 0x01;
        HashValue::new(bytes)
    }

    #[test]
    fn test_verify_ok() {
        let (tree, leaves) = sample_tree();
        for l in &leaves {
            let proof = tree.proof(l).unwrap();
            assert!(proof.verify(&tree.root(), l).is_ok());
            assert_eq!(proof.compute_root(l), tree.root());
        }
    }

    #[test]
    fn test_tampered_leaf_rejected() {
        let (tree, leaves) = sample_tree();
        let proof = tree.proof(&leaves[3]).unwrap();
        for byte in [0, 15, 31] {
            let bad = flip(&leaves[3], byte);
            assert!(matches!(
                proof.verify(&tree.root(), &bad),
                Err(MerkleError::InvalidProof(_))
            ));
        }
    }

    #[test]
    fn test_tampered_sibling_rejected() {
        let (tree, leaves) = sample_tree();
        let proof = tree.proof(&leaves[0]).unwrap();
        for i in 0..proof.len() {
            let mut siblings = proof.siblings().to_vec();
            siblings[i] = flip(&siblings[i], 31);
            assert!(!verify_proof(&tree.root(), &leaves[0], &siblings));
        }
    }

    #[test]
    fn test_tampered_root_rejected() {
        let (tree, leaves) = sample_tree();
        let proof = tree.proof(&leaves[5]).unwrap();
        let bad_root = flip(&tree.root(), 0);
        assert!(proof.verify(&bad_root, &leaves[5]).is_err());
    }

    #[test]
    fn test_reordered_siblings_rejected() {
        let (tree, leaves) = sample_tree();
        let proof = tree.proof(&leaves[0]).unwrap();
        assert!(proof.len() >= 2);
        let mut siblings = proof.siblings().to_vec();
        siblings.reverse();
        assert!(!verify_proof(&tree.root(), &leaves[0], &siblings));
    }

    #[test]
    fn test_proof_from_other_root_rejected() {
        let (tree, leaves) = sample_tree();
        let other = MerkleTree::build(leaves[..6].to_vec());
        let proof = other.proof(&leaves[0]).unwrap();
        assert!(proof.verify(&tree.root(), &leaves[0]).is_err());
    }

    #[test]
    fn test_serde_transparent_hex_array() {
        let proof = MerkleProof::new(vec![HashValue::new([0x02; 32])]);
        let json = serde_json::to_string(&proof).unwrap();
        assert_eq!(json, format!("[\"0x{}\"]", "02".repeat(32)));
        let back: MerkleProof = serde_json::from_str(&json).unwrap();
        assert_eq!(back, proof);
    }
}
