// ========== Core Modules ==========
pub mod address; // Account addresses and chain ids
pub mod card; // Game card records
pub mod leaf; // Leaf encodings shared with the contract verifier
pub mod whitelist; // Whitelist records and validation

pub use address::{Address, AddressParseError, ChainId};
pub use card::{card_records, CardEntry, CardFields, CardFile, CardRecord};
pub use leaf::{card_leaf, whitelist_leaf, whitelist_preimage, LeafEncoder};
pub use whitelist::{validate_whitelist, WhitelistEntry, WhitelistFields, WhitelistFile, WhitelistRecord};

// Error types
pub type QuestResult<T> = Result<T, QuestError>;

#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    #[error("Invalid identifier(s): {}", .0.join(", "))]
    InvalidIdentifier(Vec<String>),

    #[error("Duplicate identifier(s): {}", format_duplicates(.0))]
    DuplicateIdentifier(Vec<(String, usize)>),

    #[error("Invalid leaf hash for {id}: {reason}")]
    InvalidHash { id: String, reason: String },
}

fn format_duplicates(dups: &[(String, usize)]) -> String {
    dups.iter()
        .map(|(id, count)| format!("{} has {} entries", id, count))
        .collect::<Vec<_>>()
        .join(", ")
}
