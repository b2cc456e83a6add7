//! Sorted-pair binary Merkle tree.
//!
//! The tree is a pure function of its leaf *set*: leaves are sorted by byte
//! value and deduplicated before the first layer is formed, and every parent is
//! computed with [`combined_hash`], which orders its two children before
//! hashing. Two consequences follow:
//!
//! - The root does not depend on the order leaves were supplied in.
//! - A proof is just a list of sibling hashes. The verifier never needs to
//!   know whether its running hash is a left or a right child.
//!
//! When a layer has an odd number of nodes, the last one is promoted to the
//! next layer unchanged. It is never hashed against padding.
//!
//! # Example
//!
//! ```
//! use quest_merkle::{keccak256, MerkleTree};
//!
//! let leaves: Vec<_> = [b"a", b"b", b"c"].iter().map(|d| keccak256(*d)).collect();
//! let tree = MerkleTree::build(leaves.clone());
//!
//! let proof = tree.proof(&leaves[0]).unwrap();
//! assert!(proof.verify(&tree.root(), &leaves[0]).is_ok());
//! ```

use tracing::debug;

use crate::error::{MerkleError, MerkleResult};
use crate::hash::{combined_hash, HashValue};
use crate::proof::MerkleProof;

/// An immutable Merkle tree holding every layer from the leaves up to the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    /// `layers[0]` is the canonical leaf set, the last layer holds the root.
    /// An empty tree has a single empty layer standing in for the sentinel.
    layers: Vec<Vec<HashValue>>,
}

impl MerkleTree {
    /// Build a tree from a list of leaves.
    ///
    /// Input order and duplicate leaves have no effect on the result.
    pub fn build<I>(leaves: I) -> Self
    where
        I: IntoIterator<Item = HashValue>,
    {
        let mut elements: Vec<HashValue> = leaves.into_iter().collect();
        let supplied = elements.len();

        elements.sort_unstable();
        elements.dedup();

        let layers = Self::build_layers(elements);
        let tree = Self { layers };

        debug!(
            leaves = tree.len(),
            duplicates_dropped = supplied - tree.len(),
            depth = tree.depth(),
            root = %tree.root(),
            "Merkle tree built"
        );

        tree
    }

    /// Build a tree from raw byte buffers.
    ///
    /// Empty buffers are skipped. Any other buffer must be exactly 32 bytes.
    pub fn build_from_bytes<I, B>(leaves: I) -> MerkleResult<Self>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let elements = leaves
            .into_iter()
            .filter(|bytes| !bytes.as_ref().is_empty())
            .map(|bytes| HashValue::from_slice(bytes.as_ref()))
            .collect::<MerkleResult<Vec<_>>>()?;
        Ok(Self::build(elements))
    }

    fn build_layers(elements: Vec<HashValue>) -> Vec<Vec<HashValue>> {
        let mut layers = vec![elements];

        while layers[layers.len() - 1].len() > 1 {
            let next = Self::next_layer(&layers[layers.len() - 1]);
            layers.push(next);
        }

        layers
    }

    fn next_layer(layer: &[HashValue]) -> Vec<HashValue> {
        layer
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => combined_hash(left, right),
                [odd] => *odd,
                _ => unreachable!("chunks(2) yields one or two elements"),
            })
            .collect()
    }

    /// The root hash.
    ///
    /// An empty tree has the all-zero root rather than the hash of nothing.
    pub fn root(&self) -> HashValue {
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or(HashValue::ZERO)
    }

    /// The root as `0x`-prefixed hex.
    pub fn hex_root(&self) -> String {
        self.root().to_hex()
    }

    /// All layers, leaves first.
    pub fn layers(&self) -> &[Vec<HashValue>] {
        &self.layers
    }

    /// The canonical (sorted, deduplicated) leaf layer.
    pub fn leaves(&self) -> &[HashValue] {
        &self.layers[0]
    }

    /// Number of distinct leaves.
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// Number of layers above the leaf layer, which is also the maximum
    /// proof length.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn contains(&self, leaf: &HashValue) -> bool {
        self.position(leaf).is_some()
    }

    /// Index of the first occurrence of `leaf` in the canonical leaf layer.
    pub fn position(&self, leaf: &HashValue) -> Option<usize> {
        self.layers[0].iter().position(|candidate| candidate == leaf)
    }

    /// Derive the inclusion proof for `leaf`.
    ///
    /// Siblings are listed from the leaf layer upwards. A layer where the
    /// node was promoted without a partner contributes nothing.
    pub fn proof(&self, leaf: &HashValue) -> MerkleResult<MerkleProof> {
        let mut index = self
            .position(leaf)
            .ok_or(MerkleError::LeafNotFound(*leaf))?;

        let mut siblings = Vec::with_capacity(self.depth());
        for layer in &self.layers[..self.depth()] {
            let pair = if index % 2 == 0 { index + 1 } else { index - 1 };
            if let Some(sibling) = layer.get(pair) {
                siblings.push(*sibling);
            }
            index /= 2;
        }

        Ok(MerkleProof::new(siblings))
    }

    /// Derive the inclusion proof for `leaf` as `0x`-prefixed hex strings.
    pub fn hex_proof(&self, leaf: &HashValue) -> MerkleResult<Vec<String>> {
        Ok(self.proof(leaf)?.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::keccak256;
    use crate::proof::verify_proof;

    fn leaf(byte: u8) -> HashValue {
        let mut bytes = [0u8; 32];
        bytes[0] = byte;
        HashValue::new(bytes)
    }

    #[test]
    fn test_empty_tree() {
        let tree = MerkleTree::build(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.root(), HashValue::zero());
        assert_eq!(tree.hex_root(), format!("0x{}", "0".repeat(64)));
        assert_eq!(tree.layers().len(), 1);
        assert_eq!(tree.depth(), 0);
        assert!(matches!(
            tree.proof(&leaf(1)),
            Err(MerkleError::LeafNotFound(_))
        ));
    }

    #[test]
    fn test_single_leaf_is_root() {
        let tree = MerkleTree::build(vec![leaf(7)]);
        assert_eq!(tree.root(), leaf(7));
        assert!(tree.proof(&leaf(7)).unwrap().is_empty());
    }

    #[test]
    fn test_three_leaf_vector() {
        let (l0, l1, l2) = (leaf(1), leaf(2), leaf(3));
        let tree = MerkleTree::build(vec![l2, l0, l1]);

        assert_eq!(tree.leaves(), &[l0, l1, l2]);

        let h01 = combined_hash(&l0, &l1);
        assert_eq!(tree.layers()[1], vec![h01, l2]);
        assert_eq!(tree.root(), combined_hash(&h01, &l2));

        assert_eq!(tree.proof(&l0).unwrap().siblings(), &[l1, l2]);
        assert_eq!(tree.proof(&l1).unwrap().siblings(), &[l0, l2]);
        assert_eq!(tree.proof(&l2).unwrap().siblings(), &[h01]);
    }

    #[test]
    fn test_odd_node_promoted_at_every_odd_layer() {
        // 5 leaves: widths 5 -> 3 -> 2 -> 1
        let leaves: Vec<_> = (1..=5).map(leaf).collect();
        let tree = MerkleTree::build(leaves.clone());

        let widths: Vec<_> = tree.layers().iter().map(|l| l.len()).collect();
        assert_eq!(widths, vec![5, 3, 2, 1]);
        assert_eq!(tree.layers()[1][2], leaves[4]);
        assert_eq!(tree.layers()[2][1], leaves[4]);

        // The promoted leaf only picks up a sibling at the top layer
        assert_eq!(tree.proof(&leaves[4]).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicates_collapse() {
        let (a, b) = (leaf(0xAA), leaf(0xBB));
        assert_eq!(MerkleTree::build(vec![a, a, b]), MerkleTree::build(vec![a, b]));
    }

    #[test]
    fn test_zero_leaf_is_a_real_leaf() {
        let tree = MerkleTree::build(vec![HashValue::zero(), leaf(1)]);
        assert_eq!(tree.len(), 2);
        assert!(tree.contains(&HashValue::zero()));
    }

    #[test]
    fn test_build_from_bytes_skips_empty() {
        let raw: Vec<Vec<u8>> = vec![vec![], leaf(1).to_vec(), vec![], leaf(2).to_vec()];
        let tree = MerkleTree::build_from_bytes(raw).unwrap();
        assert_eq!(tree, MerkleTree::build(vec![leaf(1), leaf(2)]));

        let all_empty: Vec<Vec<u8>> = vec![vec![], vec![]];
        assert!(MerkleTree::build_from_bytes(all_empty).unwrap().is_empty());
    }

    #[test]
    fn test_build_from_bytes_rejects_short_buffers() {
        let raw = vec![vec![1u8; 31]];
        assert!(matches!(
            MerkleTree::build_from_bytes(raw),
            Err(MerkleError::InvalidHashLength { expected: 32, got: 31 })
        ));
    }

    #[test]
    fn test_every_leaf_verifies() {
        for count in 1..=33u32 {
            let leaves: Vec<_> = (0..count).map(|i| keccak256(&i.to_be_bytes())).collect();
            let tree = MerkleTree::build(leaves.clone());
            let root = tree.root();
            for l in &leaves {
                let proof = tree.proof(l).unwrap();
                assert!(proof.len() <= tree.depth());
                assert!(verify_proof(&root, l, proof.siblings()), "count {count}");
            }
        }
    }

    #[test]
    fn test_hex_proof() {
        let tree = MerkleTree::build(vec![leaf(1), leaf(2)]);
        assert_eq!(tree.hex_proof(&leaf(1)).unwrap(), vec![leaf(2).to_hex()]);
    }
}
