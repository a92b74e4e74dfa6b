//! Durable ledger store: an in-memory mirror rebuilt from a journal.

use std::path::Path;

use skl_types::{DeveloperId, SequenceMarker};
use tracing::info;

use crate::batch::{StoreWrite, WriteBatch};
use crate::error::StoreResult;
use crate::journal::{Journal, JournalConfig};
use crate::memory::InMemoryLedgerStore;
use crate::records::{DeveloperProfile, ReceiptKey, SkillKey, SkillRecord, VerificationReceipt};
use crate::traits::LedgerStore;

/// A [`LedgerStore`] that journals every batch before applying it.
///
/// Reads are served from the mirror. Writes go to the journal first, so a
/// batch that fails to persist is never visible in memory.
pub struct JournaledStore {
    journal: Journal,
    mirror: InMemoryLedgerStore,
    last_sequence: SequenceMarker,
    batches: u64,
}

impl JournaledStore {
    /// Open the journal at `path` and replay it into a fresh mirror.
    ///
    /// Fails with [`StoreError::Corrupt`](crate::StoreError::Corrupt) if any
    /// frame before the tail is damaged; the ledger is never rebuilt from a
    /// journal with a gap.
    pub fn open(path: &Path, config: JournalConfig) -> StoreResult<Self> {
        let (journal, recovered) = Journal::open(path, config)?;
        let mut mirror = InMemoryLedgerStore::new();
        let mut last_sequence = SequenceMarker::genesis();
        for batch in &recovered {
            mirror.apply(batch)?;
            last_sequence = last_sequence.max(batch.sequence);
        }

        info!(
            path = %path.display(),
            batches = recovered.len(),
            bytes = journal.len(),
            last_sequence = %last_sequence,
            "journal replayed"
        );

        Ok(Self {
            journal,
            mirror,
            last_sequence,
            batches: recovered.len() as u64,
        })
    }

    /// Highest sequence marker seen in any applied batch.
    pub fn last_sequence(&self) -> SequenceMarker {
        self.last_sequence
    }

    /// Number of batches in the journal.
    pub fn batch_count(&self) -> u64 {
        self.batches
    }

    /// Read-only view of the replayed state.
    pub fn mirror(&self) -> &InMemoryLedgerStore {
        &self.mirror
    }

    fn write_one(&mut self, write: StoreWrite) -> StoreResult<()> {
        let mut batch = WriteBatch::new(self.last_sequence);
        batch.push(write);
        self.apply(&batch)
    }
}

impl LedgerStore for JournaledStore {
    fn get_skill(&self, key: &SkillKey) -> StoreResult<Option<SkillRecord>> {
        self.mirror.get_skill(key)
    }

    fn set_skill(&mut self, key: SkillKey, record: SkillRecord) -> StoreResult<()> {
        self.write_one(StoreWrite::SetSkill { key, record })
    }

    fn get_profile(&self, developer: &DeveloperId) -> StoreResult<Option<DeveloperProfile>> {
        self.mirror.get_profile(developer)
    }

    fn set_profile(
        &mut self,
        developer: DeveloperId,
        profile: DeveloperProfile,
    ) -> StoreResult<()> {
        self.write_one(StoreWrite::SetProfile { developer, profile })
    }

    fn get_receipt(&self, key: &ReceiptKey) -> StoreResult<Option<VerificationReceipt>> {
        self.mirror.get_receipt(key)
    }

    fn set_receipt(&mut self, key: ReceiptKey, receipt: VerificationReceipt) -> StoreResult<()> {
        self.write_one(StoreWrite::PutReceipt { key, receipt })
    }

    fn skills(&self) -> StoreResult<Vec<(SkillKey, SkillRecord)>> {
        self.mirror.skills()
    }

    fn profiles(&self) -> StoreResult<Vec<(DeveloperId, DeveloperProfile)>> {
        self.mirror.profiles()
    }

    fn receipts(&self) -> StoreResult<Vec<(ReceiptKey, VerificationReceipt)>> {
        self.mirror.receipts()
    }

    fn apply(&mut self, batch: &WriteBatch) -> StoreResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.journal.append(batch)?;
        self.mirror.apply(batch)?;
        self.last_sequence = self.last_sequence.max(batch.sequence);
        self.batches += 1;
        Ok(())
    }
}
