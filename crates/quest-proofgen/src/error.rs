use quest_merkle::HashValue;
use quest_types::QuestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProofGenError {
    #[error("Failed to encode leaf: {0}")]
    Encoding(#[from] QuestError),

    /// The leaf re-encoded for a record is absent from the tree built from the
    /// same records. This means the encoders disagree and is never retried.
    #[error("Leaf {leaf} for record {id} does not exist in merkle tree")]
    LeafNotFound { id: String, leaf: HashValue },

    #[error("Record {0} appears more than once")]
    DuplicateRecord(String),

    #[error("Proof task failed: {0}")]
    Task(String),
}

pub type ProofGenResult<T> = Result<T, ProofGenError>;
