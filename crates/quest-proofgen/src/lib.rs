//! # quest-proofgen
//!
//! Turns a set of domain records into a published root and a mapping from
//! record identifier to inclusion proof.
//!
//! ```no_run
//! # async fn run(records: Vec<quest_types::CardRecord>) -> quest_proofgen::ProofGenResult<()> {
//! use quest_proofgen::ProofGenerator;
//!
//! let batch = ProofGenerator::default().generate(records).await?;
//! println!("root: {}", batch.hex_root());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod error;
pub mod record;

pub use batch::{verify_entries, ProofBatch, ProofEntry, ProofGenerator, DEFAULT_CONCURRENCY};
pub use error::{ProofGenError, ProofGenResult};
pub use record::ProofRecord;
