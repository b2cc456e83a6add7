//! Hash utilities and types for merkle trees.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

use crate::{MerkleError, MerkleResult, HASH_LENGTH};

/// A 256-bit hash value used as leaves and node hashes in merkle trees.
///
/// The derived ordering compares the underlying bytes as unsigned values,
/// most significant byte first, which is the canonical order of the tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct HashValue([u8; HASH_LENGTH]);

impl HashValue {
    /// The zero hash (all zeros)
    pub const ZERO: HashValue = HashValue([0u8; HASH_LENGTH]);

    /// Create a new HashValue from a fixed-size array
    pub fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create a HashValue from a slice
    pub fn from_slice(bytes: &[u8]) -> MerkleResult<Self> {
        if bytes.len() != HASH_LENGTH {
            return Err(MerkleError::InvalidHashLength {
                expected: HASH_LENGTH,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; HASH_LENGTH];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Create a HashValue from a hex string, with or without the `0x` prefix
    pub fn from_hex(hex_str: &str) -> MerkleResult<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(hex_str)
            .map_err(|e| MerkleError::InvalidInput(format!("Invalid hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    /// Returns the zero hash
    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Check if this is the zero hash
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LENGTH]
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Convert to a Vec<u8>
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// `0x`-prefixed lowercase hex, the form published to the verifier
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({})", self)
    }
}

impl FromStr for HashValue {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for HashValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_LENGTH]> for HashValue {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl Serialize for HashValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HashValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash data using Keccak-256
pub fn keccak256(data: &[u8]) -> HashValue {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut bytes = [0u8; HASH_LENGTH];
    bytes.copy_from_slice(&result);
    HashValue(bytes)
}

/// Hash two nodes into their parent.
///
/// The pair is ordered by byte value before concatenation, so the result does
/// not depend on which child is on the left: `combined_hash(a, b) ==
/// combined_hash(b, a)`.
pub fn combined_hash(a: &HashValue, b: &HashValue) -> HashValue {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Keccak256::new();
    hasher.update(low.as_bytes());
    hasher.update(high.as_bytes());
    let result = hasher.finalize();
    let mut bytes = [0u8; HASH_LENGTH];
    bytes.copy_from_slice(&result);
    HashValue(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty_vector() {
        // Well-known Keccak-256 of the empty string
        let expected = HashValue::from_hex(
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
        )
        .unwrap();
        assert_eq!(keccak256(&[]), expected);
    }

    #[test]
    fn test_combined_hash_is_commutative() {
        let a = HashValue::new([0x11; 32]);
        let b = HashValue::new([0xEE; 32]);
        assert_eq!(combined_hash(&a, &b), combined_hash(&b, &a));

        let mut concat = Vec::with_capacity(64);
        concat.extend_from_slice(a.as_bytes());
        concat.extend_from_slice(b.as_bytes());
        assert_eq!(combined_hash(&b, &a), keccak256(&concat));
    }

    #[test]
    fn test_ordering_is_unsigned_big_endian() {
        let mut low = [0u8; 32];
        low[31] = 0xFF;
        let mut high = [0u8; 32];
        high[0] = 0x80;
        // 0x80 would be negative as a signed byte
        assert!(HashValue::new(low) < HashValue::new(high));
    }

    #[test]
    fn test_hex_round_trip_and_errors() {
        let h = HashValue::new([0xAB; 32]);
        assert_eq!(HashValue::from_hex(&h.to_hex()).unwrap(), h);
        assert_eq!(h.to_string(), h.to_hex());

        assert!(matches!(
            HashValue::from_hex("0x1234"),
            Err(MerkleError::InvalidHashLength { expected: 32, got: 2 })
        ));
        assert!(matches!(
            HashValue::from_hex("0xzz"),
            Err(MerkleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let h = HashValue::new([0x01; 32]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(32)));
        let back: HashValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
