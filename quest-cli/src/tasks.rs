//! Proof generation and verification tasks behind the CLI subcommands.
//!
//! Every task reads its whole input, validates it, and only writes output once
//! the complete batch has been produced.

use anyhow::{Context, Result};
use quest_merkle::{HashValue, MerkleProof};
use quest_proofgen::{verify_entries, ProofEntry, ProofGenerator};
use quest_types::{
    card_records, validate_whitelist, Address, CardFields, CardFile, CardRecord, ChainId,
    WhitelistFields, WhitelistFile, WhitelistRecord,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::io;

/// Name of the root file written next to a card proof mapping.
pub const ROOT_FILE_NAME: &str = "merkle_root.txt";

pub type WhitelistMapping = BTreeMap<String, ProofEntry<WhitelistFields>>;
pub type CardMapping = BTreeMap<String, ProofEntry<CardFields>>;

/// Outcome of a generation task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub root: String,
    pub entries: usize,
    pub output: PathBuf,
    pub root_file: Option<PathBuf>,
}

/// Outcome of a verification task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub checked: usize,
    pub failed: Vec<String>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// `merkle_root.txt` in the same directory as `output`.
pub fn default_root_file(output: &Path) -> PathBuf {
    output
        .parent()
        .map(|dir| dir.join(ROOT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(ROOT_FILE_NAME))
}

pub async fn generate_whitelist(
    input: &Path,
    output: &Path,
    root_file: Option<&Path>,
    chain_id: ChainId,
    generator: ProofGenerator,
) -> Result<Summary> {
    let file: WhitelistFile = io::read_json(input).await?;
    info!(rows = file.addresses.len(), chain_id = %chain_id, "Whitelist loaded");

    let records = validate_whitelist(&file.addresses, chain_id)?;
    let batch = generator.generate(records).await?;

    let failed = batch.verify_all();
    if !failed.is_empty() {
        anyhow::bail!("Generated proofs do not verify for: {}", failed.join(", "));
    }

    let root = batch.hex_root();
    let entries = batch.len();
    io::write_json(output, batch.entries()).await?;
    if let Some(path) = root_file {
        io::write_root(path, &root).await?;
    }

    Ok(Summary {
        root,
        entries,
        output: output.to_path_buf(),
        root_file: root_file.map(Path::to_path_buf),
    })
}

pub async fn generate_cards(
    input: &Path,
    output: &Path,
    root_file: Option<&Path>,
    generator: ProofGenerator,
) -> Result<Summary> {
    let file: CardFile = io::read_json(input).await?;
    info!(cards = file.len(), "Card info loaded");

    let batch = generator.generate(card_records(file)).await?;

    let failed = batch.verify_all();
    if !failed.is_empty() {
        anyhow::bail!("Generated proofs do not verify for: {}", failed.join(", "));
    }

    let root = batch.hex_root();
    let entries = batch.len();
    let root_file = root_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_root_file(output));

    io::write_json(output, batch.entries()).await?;
    io::write_root(&root_file, &root).await?;

    Ok(Summary {
        root,
        entries,
        output: output.to_path_buf(),
        root_file: Some(root_file),
    })
}

/// Re-encode every whitelist entry of a published mapping and check its proof.
pub async fn verify_whitelist(mapping: &Path, root: HashValue, chain_id: ChainId) -> Result<VerifyReport> {
    let mapping: WhitelistMapping = io::read_json(mapping).await?;

    let mut pairs: Vec<(WhitelistRecord, MerkleProof)> = Vec::with_capacity(mapping.len());
    for (id, entry) in mapping {
        let address: Address = id
            .parse()
            .with_context(|| format!("Mapping key {} is not an address", id))?;
        pairs.push((WhitelistRecord::new(id, address, chain_id, entry.fields), entry.merkle_proof));
    }

    let checked = pairs.len();
    let failed = verify_entries(&root, pairs)?;
    Ok(VerifyReport { checked, failed })
}

/// Check a card mapping against the card info it was generated from.
///
/// The mapping does not carry card hashes, so leaves are recomputed from the
/// card info file. Cards missing from either side, or whose published fields
/// differ from the card info, are reported as failures.
pub async fn verify_cards(cards: &Path, mapping: &Path, root: HashValue) -> Result<VerifyReport> {
    let mut cards: CardFile = io::read_json(cards).await?;
    let mapping: CardMapping = io::read_json(mapping).await?;

    let mut failed = Vec::new();
    let mut pairs: Vec<(CardRecord, MerkleProof)> = Vec::with_capacity(mapping.len());
    for (token_id, entry) in mapping {
        let Some(card) = cards.remove(&token_id) else {
            warn!(token_id = %token_id, "Token in mapping but not in card info");
            failed.push(token_id);
            continue;
        };
        let record = CardRecord::new(token_id, card);
        if record.fields() != entry.fields {
            warn!(token_id = %record.token_id, "Published fields differ from card info");
            failed.push(record.token_id);
            continue;
        }
        pairs.push((record, entry.merkle_proof));
    }

    for token_id in cards.into_keys() {
        warn!(token_id = %token_id, "Token in card info but missing from mapping");
        failed.push(token_id);
    }

    let checked = pairs.len() + failed.len();
    failed.extend(verify_entries(&root, pairs)?);
    failed.sort();
    Ok(VerifyReport { checked, failed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_root_file() {
        assert_eq!(
            default_root_file(Path::new("/out/gen_card_info_proofs.json")),
            PathBuf::from("/out/merkle_root.txt")
        );
        assert_eq!(
            default_root_file(Path::new("proofs.json")),
            PathBuf::from("merkle_root.txt")
        );
    }
}
