use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use skl_store::{
    DeveloperProfile, LedgerStore, ProfilePatch, ReceiptKey, SkillKey, SkillPatch, SkillRecord,
    StoreError, StoreWrite, VerificationReceipt, WriteBatch,
};
use skl_types::{DeveloperId, SequenceMarker, SkillCategory, SkillLevel};
use tracing::debug;

use crate::audit::{AuditReport, LedgerAuditor};
use crate::config::LedgerConfig;
use crate::context::CallContext;
use crate::error::{LedgerError, LedgerResult};

/// A skill record together with its derived level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillView {
    pub category: SkillCategory,
    pub points: u64,
    pub self_reported_count: u64,
    pub verified_count: u64,
    pub last_updated: SequenceMarker,
    pub level: SkillLevel,
}

impl SkillView {
    fn new(category: SkillCategory, record: SkillRecord) -> Self {
        Self {
            category,
            level: SkillLevel::from_points(record.points),
            points: record.points,
            self_reported_count: record.self_reported_count,
            verified_count: record.verified_count,
            last_updated: record.last_updated,
        }
    }
}

/// The skill ledger state machine.
///
/// Owns its store behind a single `RwLock`: each mutating operation holds
/// the write guard from its first precondition check until its batch is
/// applied, so concurrent callers observe operations as indivisible.
pub struct SkillLedger<S: LedgerStore> {
    store: RwLock<S>,
    config: LedgerConfig,
}

impl<S: LedgerStore> SkillLedger<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self {
            store: RwLock::new(store),
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Consume the ledger and hand back its store.
    pub fn into_store(self) -> LedgerResult<S> {
        self.store
            .into_inner()
            .map_err(|_| StoreError::LockPoisoned.into())
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, S>> {
        self.store
            .read()
            .map_err(|_| StoreError::LockPoisoned.into())
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, S>> {
        self.store
            .write()
            .map_err(|_| StoreError::LockPoisoned.into())
    }

    // ---- Mutating operations ----

    /// Register the caller.
    ///
    /// Idempotent: an existing profile is left exactly as it is. Returns
    /// `true` if a profile was created by this call.
    pub fn initialize_profile(&self, ctx: &CallContext) -> LedgerResult<bool> {
        let mut store = self.write()?;
        if store.get_profile(&ctx.caller)?.is_some() {
            debug!(developer = %ctx.caller, "profile already initialized");
            return Ok(false);
        }

        let mut batch = WriteBatch::new(ctx.sequence);
        batch.push(StoreWrite::SetProfile {
            developer: ctx.caller.clone(),
            profile: DeveloperProfile::new(ctx.sequence),
        });
        store.apply(&batch)?;

        debug!(developer = %ctx.caller, sequence = %ctx.sequence, "profile initialized");
        Ok(true)
    }

    /// Record a self-reported achievement for the caller.
    ///
    /// Returns the points awarded. The description is only length-checked;
    /// it is not stored.
    pub fn report_achievement(
        &self,
        ctx: &CallContext,
        category: u32,
        description: &str,
    ) -> LedgerResult<u64> {
        let category = validate_category(category)?;
        let len = description.chars().count();
        if len > self.config.max_description_len {
            return Err(LedgerError::DescriptionTooLong {
                len,
                max: self.config.max_description_len,
            });
        }

        let mut store = self.write()?;
        let profile = store
            .get_profile(&ctx.caller)?
            .ok_or(LedgerError::NotAuthorized)?;

        let award = self.config.self_report_points;
        let key = SkillKey::new(ctx.caller.clone(), category);
        let mut record = store.get_skill(&key)?.unwrap_or_default();
        record.points = record.points.saturating_add(award);
        record.self_reported_count = record.self_reported_count.saturating_add(1);
        record.last_updated = ctx.sequence;
        let points = record.points;

        let mut batch = WriteBatch::new(ctx.sequence);
        batch
            .push(StoreWrite::SetSkill { key, record })
            .push(StoreWrite::MergeProfile {
                developer: ctx.caller.clone(),
                patch: ProfilePatch {
                    total_reputation: Some(profile.total_reputation.saturating_add(award)),
                    ..Default::default()
                },
            });
        store.apply(&batch)?;

        debug!(
            developer = %ctx.caller,
            category = category.code(),
            award,
            points,
            "achievement reported"
        );
        Ok(award)
    }

    /// Attest another developer's skill in one category.
    ///
    /// Preconditions are checked in a fixed order and the first failure is
    /// returned. The verifier's own reputation does not change; only its
    /// `verifications_given` count does.
    pub fn verify_peer_skill(
        &self,
        ctx: &CallContext,
        developer: &DeveloperId,
        category: u32,
    ) -> LedgerResult<u64> {
        let category = validate_category(category)?;
        if &ctx.caller == developer {
            return Err(LedgerError::CannotVerifySelf);
        }

        let mut store = self.write()?;
        let caller_profile = store.get_profile(&ctx.caller)?;
        let have = caller_profile
            .as_ref()
            .map(|p| p.total_reputation)
            .unwrap_or(0);
        let need = self.config.min_verifier_reputation;
        if have < need {
            return Err(LedgerError::InsufficientReputation { have, need });
        }

        let receipt_key = ReceiptKey::new(ctx.caller.clone(), developer.clone(), category);
        if store.get_receipt(&receipt_key)?.is_some() {
            return Err(LedgerError::AlreadyVerified);
        }

        let skill_key = receipt_key.skill_key();
        let skill = store
            .get_skill(&skill_key)?
            .ok_or(LedgerError::SkillNotFound)?;

        let target_profile = store
            .get_profile(developer)?
            .ok_or(LedgerError::NotAuthorized)?;
        let caller_profile = caller_profile.ok_or(LedgerError::NotAuthorized)?;

        let bonus = self.config.verification_bonus;
        let mut batch = WriteBatch::new(ctx.sequence);
        batch
            .push(StoreWrite::PutReceipt {
                key: receipt_key,
                receipt: VerificationReceipt {
                    verification_sequence: ctx.sequence,
                    points_awarded: bonus,
                },
            })
            .push(StoreWrite::MergeSkill {
                key: skill_key,
                patch: SkillPatch {
                    points: Some(skill.points.saturating_add(bonus)),
                    verified_count: Some(skill.verified_count.saturating_add(1)),
                    last_updated: Some(ctx.sequence),
                    ..Default::default()
                },
            })
            .push(StoreWrite::MergeProfile {
                developer: developer.clone(),
                patch: ProfilePatch {
                    total_reputation: Some(target_profile.total_reputation.saturating_add(bonus)),
                    ..Default::default()
                },
            })
            .push(StoreWrite::MergeProfile {
                developer: ctx.caller.clone(),
                patch: ProfilePatch {
                    verifications_given: Some(
                        caller_profile.verifications_given.saturating_add(1),
                    ),
                    ..Default::default()
                },
            });
        store.apply(&batch)?;

        debug!(
            verifier = %ctx.caller,
            developer = %developer,
            category = category.code(),
            bonus,
            "peer skill verified"
        );
        Ok(bonus)
    }

    // ---- Queries ----

    /// A developer's record in one category, with its level.
    ///
    /// Invalid categories read as `None`.
    pub fn get_skill(
        &self,
        developer: &DeveloperId,
        category: u32,
    ) -> LedgerResult<Option<SkillView>> {
        let Ok(category) = SkillCategory::new(category) else {
            return Ok(None);
        };
        let store = self.read()?;
        let record = store.get_skill(&SkillKey::new(developer.clone(), category))?;
        Ok(record.map(|r| SkillView::new(category, r)))
    }

    /// Every skill a developer holds, in category order.
    pub fn skills_of(&self, developer: &DeveloperId) -> LedgerResult<Vec<SkillView>> {
        let store = self.read()?;
        let mut views = Vec::new();
        for category in SkillCategory::all() {
            if let Some(record) = store.get_skill(&SkillKey::new(developer.clone(), category))? {
                views.push(SkillView::new(category, record));
            }
        }
        Ok(views)
    }

    pub fn get_profile(&self, developer: &DeveloperId) -> LedgerResult<Option<DeveloperProfile>> {
        Ok(self.read()?.get_profile(developer)?)
    }

    /// The receipt for a (verifier, developer, category) triple, if any.
    ///
    /// Advisory: `verify_peer_skill` re-checks under the write lock.
    pub fn get_peer_verification(
        &self,
        verifier: &DeveloperId,
        developer: &DeveloperId,
        category: u32,
    ) -> LedgerResult<Option<VerificationReceipt>> {
        let Ok(category) = SkillCategory::new(category) else {
            return Ok(None);
        };
        let key = ReceiptKey::new(verifier.clone(), developer.clone(), category);
        Ok(self.read()?.get_receipt(&key)?)
    }

    pub fn skill_level_name(&self, level: u8) -> &'static str {
        skl_types::level_name(level)
    }

    pub fn skill_category_name(&self, category: u32) -> &'static str {
        skl_types::category_name(category)
    }

    /// Check the ledger-wide invariants over the current state.
    pub fn audit(&self) -> LedgerResult<AuditReport> {
        LedgerAuditor::audit(&*self.read()?)
    }
}

fn validate_category(raw: u32) -> LedgerResult<SkillCategory> {
    SkillCategory::new(raw).map_err(|_| LedgerError::InvalidSkillCategory(raw))
}
