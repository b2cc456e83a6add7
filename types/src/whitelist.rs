//! Whitelist records: wallet addresses with purchase caps

use quest_merkle::HashValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::address::{Address, ChainId};
use crate::leaf::{whitelist_leaf, LeafEncoder};
use crate::{QuestError, QuestResult};

/// One row of the whitelist input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub address: String,
    pub cap: u64,
    pub partner: bool,
}

/// The whitelist input file: `{ "addresses": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhitelistFile {
    pub addresses: Vec<WhitelistEntry>,
}

/// Fields carried next to each proof in the output mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistFields {
    pub cap: u64,
    pub partner: bool,
}

/// A validated whitelist row bound to a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistRecord {
    /// The address exactly as it appeared in the input
    pub id: String,
    pub address: Address,
    pub chain_id: ChainId,
    pub cap: u64,
    pub partner: bool,
}

impl WhitelistRecord {
    pub fn new(id: impl Into<String>, address: Address, chain_id: ChainId, fields: WhitelistFields) -> Self {
        Self {
            id: id.into(),
            address,
            chain_id,
            cap: fields.cap,
            partner: fields.partner,
        }
    }

    pub fn fields(&self) -> WhitelistFields {
        WhitelistFields {
            cap: self.cap,
            partner: self.partner,
        }
    }
}

impl LeafEncoder for WhitelistRecord {
    fn leaf(&self) -> QuestResult<HashValue> {
        Ok(whitelist_leaf(&self.address, self.chain_id, self.cap, self.partner))
    }
}

/// Validate raw whitelist rows before any tree is built.
///
/// Every malformed address is reported at once. Only when all addresses parse
/// are duplicates checked; two spellings of the same account (for example
/// lowercase and checksummed) count as the same identifier.
pub fn validate_whitelist(entries: &[WhitelistEntry], chain_id: ChainId) -> QuestResult<Vec<WhitelistRecord>> {
    let mut invalid = Vec::new();
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry.address.parse::<Address>() {
            Ok(address) => records.push(WhitelistRecord {
                id: entry.address.clone(),
                address,
                chain_id,
                cap: entry.cap,
                partner: entry.partner,
            }),
            Err(_) => invalid.push(entry.address.clone()),
        }
    }

    if !invalid.is_empty() {
        return Err(QuestError::InvalidIdentifier(invalid));
    }

    let mut counts: HashMap<Address, (usize, &str)> = HashMap::new();
    for record in &records {
        counts.entry(record.address).or_insert((0, record.id.as_str())).0 += 1;
    }

    let mut duplicates: Vec<(String, usize)> = counts
        .into_values()
        .filter(|(count, _)| *count > 1)
        .map(|(count, id)| (id.to_string(), count))
        .collect();

    if !duplicates.is_empty() {
        duplicates.sort();
        return Err(QuestError::DuplicateIdentifier(duplicates));
    }

    Ok(records)
}
