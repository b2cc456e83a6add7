//! Property tests for the merkle tree

use proptest::prelude::*;
use quest_merkle::{verify_proof, HashValue, MerkleTree};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

fn arb_leaves() -> impl Strategy<Value = Vec<HashValue>> {
    prop::collection::vec(prop::array::uniform32(any::<u8>()), 0..64)
        .prop_map(|raw| raw.into_iter().map(HashValue::new).collect())
}

proptest! {
    #[test]
    fn root_is_independent_of_input_order(leaves in arb_leaves(), seed in any::<u64>()) {
        let mut shuffled = leaves.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let a = MerkleTree::build(leaves);
        let b = MerkleTree::build(shuffled);
        prop_assert_eq!(a.root(), b.root());
        prop_assert_eq!(a.layers(), b.layers());
    }

    #[test]
    fn every_leaf_proves_against_root(leaves in arb_leaves()) {
        let tree = MerkleTree::build(leaves.clone());
        let root = tree.root();
        for leaf in &leaves {
            let proof = tree.proof(leaf).unwrap();
            prop_assert!(verify_proof(&root, leaf, proof.siblings()));
        }
    }

    #[test]
    fn repeated_leaves_do_not_change_root(leaves in arb_leaves()) {
        let mut doubled = leaves.clone();
        doubled.extend(leaves.iter().copied());
        prop_assert_eq!(MerkleTree::build(leaves).root(), MerkleTree::build(doubled).root());
    }

    #[test]
    fn tampered_leaf_never_verifies(
        leaves in prop::collection::vec(prop::array::uniform32(any::<u8>()), 1..32),
        pick in any::<prop::sample::Index>(),
        byte in 0usize..32,
    ) {
        let leaves: Vec<HashValue> = leaves.into_iter().map(HashValue::new).collect();
        let tree = MerkleTree::build(leaves.clone());
        let target = leaves[pick.index(leaves.len())];
        let proof = tree.proof(&target).unwrap();

        let mut bytes = *target.as_bytes();
        bytes[byte] ^= 0xFF;
        let tampered = HashValue::new(bytes);
        prop_assert!(!verify_proof(&tree.root(), &tampered, proof.siblings()));
    }
}

#[test]
fn layer_widths_depend_only_on_leaf_count() {
    let widths = |tree: &MerkleTree| tree.layers().iter().map(Vec::len).collect::<Vec<_>>();

    let a = MerkleTree::build((0u8..11).map(|i| HashValue::new([i; 32])));
    let b = MerkleTree::build((100u8..111).map(|i| HashValue::new([i; 32])));
    assert_eq!(widths(&a), widths(&b));
    assert_eq!(widths(&a), vec![11, 6, 3, 2, 1]);
}
