//! Batch proof pipeline.
//!
//! The tree is built once from every record's leaf. Proofs are then derived
//! per record on the blocking pool with a bounded number in flight, all
//! reading the same immutable tree. The whole batch succeeds or nothing is
//! returned: a mapping with a missing record must never be published under a
//! root that commits to it.

use futures::{stream, StreamExt, TryStreamExt};
use quest_merkle::{HashValue, MerkleProof, MerkleTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info, trace};

use crate::error::{ProofGenError, ProofGenResult};
use crate::record::ProofRecord;

/// Default number of proofs derived concurrently.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// One value of the output mapping: `{ <fields>, "merkleProof": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofEntry<F> {
    #[serde(flatten)]
    pub fields: F,
    #[serde(rename = "merkleProof")]
    pub merkle_proof: MerkleProof,
}

/// The result of a successful batch: the published root and one entry per record.
#[derive(Debug, Clone)]
pub struct ProofBatch<F> {
    root: HashValue,
    entries: BTreeMap<String, ProofEntry<F>>,
    leaves: BTreeMap<String, HashValue>,
}

impl<F> ProofBatch<F> {
    pub fn root(&self) -> HashValue {
        self.root
    }

    pub fn hex_root(&self) -> String {
        self.root.to_hex()
    }

    /// Output mapping keyed by record identifier.
    pub fn entries(&self) -> &BTreeMap<String, ProofEntry<F>> {
        &self.entries
    }

    pub fn into_entries(self) -> BTreeMap<String, ProofEntry<F>> {
        self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ProofEntry<F>> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-check every entry against the root. Returns the failing identifiers.
    pub fn verify_all(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(id, entry)| match self.leaves.get(*id) {
                Some(leaf) => entry.merkle_proof.verify(&self.root, leaf).is_err(),
                None => true,
            })
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// Derives a proof for every record of a batch.
#[derive(Debug, Clone, Copy)]
pub struct ProofGenerator {
    concurrency: usize,
}

impl Default for ProofGenerator {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

struct Derived<R: ProofRecord> {
    id: String,
    leaf: HashValue,
    fields: R::Fields,
    proof: MerkleProof,
}

impl ProofGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of proofs derived at once. Zero is treated as one.
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Build the tree over `records` and derive every record's proof.
    ///
    /// An empty batch is not an error: it yields the all-zero root and an
    /// empty mapping.
    pub async fn generate<R: ProofRecord>(&self, records: Vec<R>) -> ProofGenResult<ProofBatch<R::Fields>> {
        info!(
            records = records.len(),
            concurrency = self.concurrency,
            "Generating merkle proofs"
        );

        let leaves = records
            .iter()
            .map(|record| record.leaf())
            .collect::<Result<Vec<_>, _>>()?;
        let tree = Arc::new(MerkleTree::build(leaves));
        let root = tree.root();

        debug!(
            leaves = tree.len(),
            depth = tree.depth(),
            root = %root,
            "Tree built, deriving proofs"
        );

        let derived: Vec<Derived<R>> = stream::iter(records)
            .map(|record| {
                let tree = Arc::clone(&tree);
                task::spawn_blocking(move || derive_proof(&tree, record))
            })
            .buffered(self.concurrency)
            .map(|joined| {
                joined
                    .map_err(|e| ProofGenError::Task(e.to_string()))
                    .and_then(|derived| derived)
            })
            .try_collect()
            .await?;

        let mut entries = BTreeMap::new();
        let mut leaves = BTreeMap::new();
        for item in derived {
            trace!(id = %item.id, "Constructing proof mapping item");
            if leaves.insert(item.id.clone(), item.leaf).is_some() {
                return Err(ProofGenError::DuplicateRecord(item.id));
            }
            entries.insert(
                item.id,
                ProofEntry {
                    fields: item.fields,
                    merkle_proof: item.proof,
                },
            );
        }

        info!(entries = entries.len(), root = %root, "Proof mapping complete");

        Ok(ProofBatch { root, entries, leaves })
    }
}

fn derive_proof<R: ProofRecord>(tree: &MerkleTree, record: R) -> ProofGenResult<Derived<R>> {
    let id = record.id();
    let leaf = record.leaf()?;
    let proof = tree
        .proof(&leaf)
        .map_err(|_| ProofGenError::LeafNotFound { id: id.clone(), leaf })?;

    trace!(id = %id, siblings = proof.len(), "Derived proof");

    Ok(Derived {
        id,
        leaf,
        fields: record.fields(),
        proof,
    })
}

/// Check proofs read back from a published mapping against `root`.
///
/// Each record is re-encoded with its own leaf encoder. Returns the
/// identifiers whose proof does not reproduce the root.
pub fn verify_entries<R, I>(root: &HashValue, entries: I) -> ProofGenResult<Vec<String>>
where
    R: ProofRecord,
    I: IntoIterator<Item = (R, MerkleProof)>,
{
    let mut failed = Vec::new();
    for (record, proof) in entries {
        let leaf = record.leaf()?;
        if proof.verify(root, &leaf).is_err() {
            failed.push(record.id());
        }
    }
    Ok(failed)
}
