//! In-memory ledger store for tests, embedding, and journal replay.
//!
//! [`InMemoryLedgerStore`] keeps each relation in its own `BTreeMap`. It is
//! also the mirror that [`crate::JournaledStore`] rebuilds on open.

use std::collections::BTreeMap;

use skl_types::DeveloperId;

use crate::error::StoreResult;
use crate::records::{DeveloperProfile, ReceiptKey, SkillKey, SkillRecord, VerificationReceipt};
use crate::traits::LedgerStore;

/// An in-memory implementation of [`LedgerStore`].
///
/// Data is lost when the store is dropped. Equality compares all three
/// relations, which makes "nothing was written" easy to assert.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryLedgerStore {
    skills: BTreeMap<SkillKey, SkillRecord>,
    profiles: BTreeMap<DeveloperId, DeveloperProfile>,
    receipts: BTreeMap<ReceiptKey, VerificationReceipt>,
}

impl InMemoryLedgerStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn receipt_count(&self) -> usize {
        self.receipts.len()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn get_skill(&self, key: &SkillKey) -> StoreResult<Option<SkillRecord>> {
        Ok(self.skills.get(key).cloned())
    }

    fn set_skill(&mut self, key: SkillKey, record: SkillRecord) -> StoreResult<()> {
        self.skills.insert(key, record);
        Ok(())
    }

    fn get_profile(&self, developer: &DeveloperId) -> StoreResult<Option<DeveloperProfile>> {
        Ok(self.profiles.get(developer).cloned())
    }

    fn set_profile(
        &mut self,
        developer: DeveloperId,
        profile: DeveloperProfile,
    ) -> StoreResult<()> {
        self.profiles.insert(developer, profile);
        Ok(())
    }

    fn get_receipt(&self, key: &ReceiptKey) -> StoreResult<Option<VerificationReceipt>> {
        Ok(self.receipts.get(key).cloned())
    }

    fn set_receipt(&mut self, key: ReceiptKey, receipt: VerificationReceipt) -> StoreResult<()> {
        self.receipts.insert(key, receipt);
        Ok(())
    }

    fn skills(&self) -> StoreResult<Vec<(SkillKey, SkillRecord)>> {
        Ok(self
            .skills
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn profiles(&self) -> StoreResult<Vec<(DeveloperId, DeveloperProfile)>> {
        Ok(self
            .profiles
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn receipts(&self) -> StoreResult<Vec<(ReceiptKey, VerificationReceipt)>> {
        Ok(self
            .receipts
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
