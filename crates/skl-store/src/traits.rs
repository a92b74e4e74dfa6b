//! The [`LedgerStore`] trait defining the storage interface.
//!
//! Any backend (in-memory, journaled, database) implements this trait to
//! hold the three ledger relations.

use skl_types::DeveloperId;

use crate::batch::{StoreWrite, WriteBatch};
use crate::error::StoreResult;
use crate::records::{
    DeveloperProfile, ProfilePatch, ReceiptKey, SkillKey, SkillPatch, SkillRecord,
    VerificationReceipt,
};

/// Storage backend for the skill, profile and verification relations.
///
/// The store is a plain associative container. It never validates
/// categories, checks reputation, or rejects duplicates; callers do that
/// before writing. Reads return owned copies, never references into live
/// storage.
///
/// Mutating methods take `&mut self`, so a backend never has to provide
/// its own locking: whoever owns the store serializes writers.
pub trait LedgerStore: Send + Sync {
    /// Read a skill record. Returns `Ok(None)` if none exists.
    fn get_skill(&self, key: &SkillKey) -> StoreResult<Option<SkillRecord>>;

    /// Create or fully replace a skill record.
    fn set_skill(&mut self, key: SkillKey, record: SkillRecord) -> StoreResult<()>;

    /// Read a developer profile. Returns `Ok(None)` if none exists.
    fn get_profile(&self, developer: &DeveloperId) -> StoreResult<Option<DeveloperProfile>>;

    /// Create or fully replace a developer profile.
    fn set_profile(
        &mut self,
        developer: DeveloperId,
        profile: DeveloperProfile,
    ) -> StoreResult<()>;

    /// Read a verification receipt. Returns `Ok(None)` if none exists.
    fn get_receipt(&self, key: &ReceiptKey) -> StoreResult<Option<VerificationReceipt>>;

    /// Store a verification receipt at the given key.
    ///
    /// Receipts have no partial-update form; they are written once and
    /// never changed.
    fn set_receipt(&mut self, key: ReceiptKey, receipt: VerificationReceipt) -> StoreResult<()>;

    /// All skill records, ordered by key.
    fn skills(&self) -> StoreResult<Vec<(SkillKey, SkillRecord)>>;

    /// All developer profiles, ordered by developer id.
    fn profiles(&self) -> StoreResult<Vec<(DeveloperId, DeveloperProfile)>>;

    /// All verification receipts, ordered by key.
    fn receipts(&self) -> StoreResult<Vec<(ReceiptKey, VerificationReceipt)>>;

    /// Update a subset of a skill record's fields.
    ///
    /// Returns `Ok(false)` and writes nothing if the record does not exist.
    fn merge_skill(&mut self, key: &SkillKey, patch: &SkillPatch) -> StoreResult<bool> {
        let Some(mut record) = self.get_skill(key)? else {
            return Ok(false);
        };
        patch.apply_to(&mut record);
        self.set_skill(key.clone(), record)?;
        Ok(true)
    }

    /// Update a subset of a profile's fields.
    ///
    /// Returns `Ok(false)` and writes nothing if the profile does not exist.
    fn merge_profile(
        &mut self,
        developer: &DeveloperId,
        patch: &ProfilePatch,
    ) -> StoreResult<bool> {
        let Some(mut profile) = self.get_profile(developer)? else {
            return Ok(false);
        };
        patch.apply_to(&mut profile);
        self.set_profile(developer.clone(), profile)?;
        Ok(true)
    }

    /// Apply every write of a batch, in order.
    ///
    /// Backends with their own durability (see `JournaledStore`) override
    /// this to persist the batch as one unit before applying it.
    fn apply(&mut self, batch: &WriteBatch) -> StoreResult<()> {
        for write in &batch.writes {
            match write {
                StoreWrite::SetSkill { key, record } => {
                    self.set_skill(key.clone(), record.clone())?;
                }
                StoreWrite::MergeSkill { key, patch } => {
                    self.merge_skill(key, patch)?;
                }
                StoreWrite::SetProfile { developer, profile } => {
                    self.set_profile(developer.clone(), profile.clone())?;
                }
                StoreWrite::MergeProfile { developer, patch } => {
                    self.merge_profile(developer, patch)?;
                }
                StoreWrite::PutReceipt { key, receipt } => {
                    self.set_receipt(key.clone(), receipt.clone())?;
                }
            }
        }
        Ok(())
    }
}
