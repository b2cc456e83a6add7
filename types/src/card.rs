//! Game card records keyed by token id

use quest_merkle::HashValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::leaf::{card_leaf, LeafEncoder};
use crate::{QuestError, QuestResult};

/// One generated card as written by card generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEntry {
    /// `0x` + 64 hex digits, computed upstream
    pub hash: String,
    pub ipfs_uri: String,
    pub dna: u64,
}

/// The card input file: token id → card.
pub type CardFile = BTreeMap<String, CardEntry>;

/// Fields carried next to each proof in the output mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFields {
    pub ipfs_uri: String,
    pub dna: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub token_id: String,
    pub hash: String,
    pub ipfs_uri: String,
    pub dna: u64,
}

impl CardRecord {
    pub fn new(token_id: impl Into<String>, entry: CardEntry) -> Self {
        Self {
            token_id: token_id.into(),
            hash: entry.hash,
            ipfs_uri: entry.ipfs_uri,
            dna: entry.dna,
        }
    }

    pub fn fields(&self) -> CardFields {
        CardFields {
            ipfs_uri: self.ipfs_uri.clone(),
            dna: self.dna,
        }
    }
}

impl LeafEncoder for CardRecord {
    fn leaf(&self) -> QuestResult<HashValue> {
        card_leaf(&self.hash).map_err(|e| QuestError::InvalidHash {
            id: self.token_id.clone(),
            reason: e.to_string(),
        })
    }
}

/// Turn a parsed card file into records, in token id order.
pub fn card_records(file: CardFile) -> Vec<CardRecord> {
    file.into_iter()
        .map(|(token_id, entry)| CardRecord::new(token_id, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_card_file() {
        let json = format!(
            r#"{{"1":{{"hash":"0x{}","ipfsUri":"ipfs://a","dna":42}},"2":{{"hash":"0x{}","ipfsUri":"ipfs://b","dna":7}}}}"#,
            "11".repeat(32),
            "22".repeat(32)
        );
        let file: CardFile = serde_json::from_str(&json).unwrap();
        let records = card_records(file);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].token_id, "1");
        assert_eq!(records[0].leaf().unwrap(), HashValue::new([0x11; 32]));
        assert_eq!(
            records[1].fields(),
            CardFields { ipfs_uri: "ipfs://b".into(), dna: 7 }
        );
    }

    #[test]
    fn test_malformed_hash() {
        let record = CardRecord::new(
            "9",
            CardEntry { hash: "0xdead".into(), ipfs_uri: String::new(), dna: 0 },
        );
        match record.leaf() {
            Err(QuestError::InvalidHash { id, .. }) => assert_eq!(id, "9"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
