//! Records that can carry an inclusion proof

use quest_types::{CardFields, CardRecord, LeafEncoder, WhitelistFields, WhitelistRecord};
use serde::Serialize;

/// A domain record with a stable identifier and the fields published next to
/// its proof.
pub trait ProofRecord: LeafEncoder + Send + Sync + 'static {
    type Fields: Serialize + Send + 'static;

    /// Key of this record in the output mapping.
    fn id(&self) -> String;

    fn fields(&self) -> Self::Fields;
}

impl ProofRecord for WhitelistRecord {
    type Fields = WhitelistFields;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn fields(&self) -> WhitelistFields {
        WhitelistRecord::fields(self)
    }
}

impl ProofRecord for CardRecord {
    type Fields = CardFields;

    fn id(&self) -> String {
        self.token_id.clone()
    }

    fn fields(&self) -> CardFields {
        CardRecord::fields(self)
    }
}
