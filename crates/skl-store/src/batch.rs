use serde::{Deserialize, Serialize};
use skl_types::{DeveloperId, SequenceMarker};

use crate::records::{
    DeveloperProfile, ProfilePatch, ReceiptKey, SkillKey, SkillPatch, SkillRecord,
    VerificationReceipt,
};

/// A single mutation of one relation entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreWrite {
    SetSkill {
        key: SkillKey,
        record: SkillRecord,
    },
    MergeSkill {
        key: SkillKey,
        patch: SkillPatch,
    },
    SetProfile {
        developer: DeveloperId,
        profile: DeveloperProfile,
    },
    MergeProfile {
        developer: DeveloperId,
        patch: ProfilePatch,
    },
    PutReceipt {
        key: ReceiptKey,
        receipt: VerificationReceipt,
    },
}

/// All writes produced by one ledger operation.
///
/// A batch is applied as a unit: the operations layer only builds one after
/// every precondition has passed, and backends apply it under a single
/// exclusive borrow (and, for the journal, a single framed entry).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteBatch {
    /// Marker of the operation that produced these writes.
    pub sequence: SequenceMarker,
    pub writes: Vec<StoreWrite>,
}

impl WriteBatch {
    pub fn new(sequence: SequenceMarker) -> Self {
        Self {
            sequence,
            writes: Vec::new(),
        }
    }

    pub fn push(&mut self, write: StoreWrite) -> &mut Self {
        self.writes.push(write);
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}
