//! Record, key and patch types for the three ledger relations.
//!
//! Each relation has its own key type so the uniqueness constraint of one
//! relation can never be confused with another's.

use serde::{Deserialize, Serialize};
use skl_types::{DeveloperId, SequenceMarker, SkillCategory};

/// Key of the skill relation: one record per (developer, category).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillKey {
    pub developer: DeveloperId,
    pub category: SkillCategory,
}

impl SkillKey {
    pub fn new(developer: DeveloperId, category: SkillCategory) -> Self {
        Self {
            developer,
            category,
        }
    }
}

/// Key of the verification relation: at most one receipt per
/// (verifier, verified developer, category) for the life of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReceiptKey {
    pub verifier: DeveloperId,
    pub developer: DeveloperId,
    pub category: SkillCategory,
}

impl ReceiptKey {
    pub fn new(verifier: DeveloperId, developer: DeveloperId, category: SkillCategory) -> Self {
        Self {
            verifier,
            developer,
            category,
        }
    }

    /// The skill record this receipt attests to.
    pub fn skill_key(&self) -> SkillKey {
        SkillKey::new(self.developer.clone(), self.category)
    }
}

/// Accumulated standing of one developer in one category.
///
/// `points` never decreases. Records are created on the first self-report
/// and never deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub points: u64,
    pub self_reported_count: u64,
    pub verified_count: u64,
    pub last_updated: SequenceMarker,
}

/// A registered developer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperProfile {
    /// Sum of `points` over all of this developer's skill records,
    /// maintained incrementally.
    pub total_reputation: u64,
    /// Number of verifications this developer has granted to others.
    pub verifications_given: u64,
    pub join_sequence: SequenceMarker,
    /// Reserved. Always `true`; no operation clears or reads it.
    pub active: bool,
}

impl DeveloperProfile {
    /// A freshly registered profile.
    pub fn new(join_sequence: SequenceMarker) -> Self {
        Self {
            total_reputation: 0,
            verifications_given: 0,
            join_sequence,
            active: true,
        }
    }
}

/// Proof that a verifier attested a developer's skill. Never updated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReceipt {
    pub verification_sequence: SequenceMarker,
    pub points_awarded: u64,
}

/// Partial update of a [`SkillRecord`]. `None` fields are preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPatch {
    pub points: Option<u64>,
    pub self_reported_count: Option<u64>,
    pub verified_count: Option<u64>,
    pub last_updated: Option<SequenceMarker>,
}

impl SkillPatch {
    pub fn apply_to(&self, record: &mut SkillRecord) {
        if let Some(points) = self.points {
            record.points = points;
        }
        if let Some(count) = self.self_reported_count {
            record.self_reported_count = count;
        }
        if let Some(count) = self.verified_count {
            record.verified_count = count;
        }
        if let Some(seq) = self.last_updated {
            record.last_updated = seq;
        }
    }
}

/// Partial update of a [`DeveloperProfile`].
///
/// `join_sequence` is fixed at registration and has no patch field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub total_reputation: Option<u64>,
    pub verifications_given: Option<u64>,
    pub active: Option<bool>,
}

impl ProfilePatch {
    pub fn apply_to(&self, profile: &mut DeveloperProfile) {
        if let Some(total) = self.total_reputation {
            profile.total_reputation = total;
        }
        if let Some(given) = self.verifications_given {
            profile.verifications_given = given;
        }
        if let Some(active) = self.active {
            profile.active = active;
        }
    }
}
