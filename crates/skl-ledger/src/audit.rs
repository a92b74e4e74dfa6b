use std::collections::BTreeMap;

use serde::Serialize;
use skl_store::{LedgerStore, SkillKey};
use skl_types::DeveloperId;

use crate::error::LedgerResult;

/// Result of a whole-ledger audit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub profiles_checked: usize,
    pub skills_checked: usize,
    pub receipts_checked: usize,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// Returns `true` if no invariant is violated.
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub developer: DeveloperId,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    /// Profile total differs from the sum of its skill points.
    ReputationMismatch,
    /// Skill record whose developer has no profile.
    OrphanSkill,
    /// Receipt pointing at a skill record that does not exist.
    DanglingReceipt,
    /// Receipt whose verifier and developer are the same identity.
    SelfVerification,
    /// Skill `verified_count` differs from the number of receipts for it.
    VerificationCountMismatch,
}

/// Checks the invariants every ledger operation is supposed to preserve.
///
/// Operations never need this; it exists to vet a store that was restored
/// from a journal or populated by other means.
pub struct LedgerAuditor;

impl LedgerAuditor {
    pub fn audit<S: LedgerStore + ?Sized>(store: &S) -> LedgerResult<AuditReport> {
        let profiles = store.profiles()?;
        let skills = store.skills()?;
        let receipts = store.receipts()?;
        let mut violations = Vec::new();

        let mut points_by_developer: BTreeMap<&DeveloperId, u64> = BTreeMap::new();
        for (key, record) in &skills {
            let sum = points_by_developer.entry(&key.developer).or_insert(0);
            *sum = sum.saturating_add(record.points);
        }

        for (developer, profile) in &profiles {
            let sum = points_by_developer.get(developer).copied().unwrap_or(0);
            if profile.total_reputation != sum {
                violations.push(Violation {
                    developer: developer.clone(),
                    kind: ViolationKind::ReputationMismatch,
                    description: format!(
                        "total reputation {} but skill points sum to {sum}",
                        profile.total_reputation
                    ),
                });
            }
        }

        let registered: BTreeMap<&DeveloperId, ()> =
            profiles.iter().map(|(id, _)| (id, ())).collect();
        for (key, _) in &skills {
            if !registered.contains_key(&key.developer) {
                violations.push(Violation {
                    developer: key.developer.clone(),
                    kind: ViolationKind::OrphanSkill,
                    description: format!("skill in {} without a profile", key.category),
                });
            }
        }

        let mut receipts_per_skill: BTreeMap<SkillKey, u64> = BTreeMap::new();
        for (key, _) in &receipts {
            if key.verifier == key.developer {
                violations.push(Violation {
                    developer: key.developer.clone(),
                    kind: ViolationKind::SelfVerification,
                    description: format!("self-issued receipt in {}", key.category),
                });
            }
            *receipts_per_skill.entry(key.skill_key()).or_insert(0) += 1;
        }

        let skill_index: BTreeMap<&SkillKey, u64> = skills
            .iter()
            .map(|(key, record)| (key, record.verified_count))
            .collect();

        for (skill_key, count) in &receipts_per_skill {
            match skill_index.get(skill_key) {
                None => violations.push(Violation {
                    developer: skill_key.developer.clone(),
                    kind: ViolationKind::DanglingReceipt,
                    description: format!(
                        "{count} receipt(s) for missing skill in {}",
                        skill_key.category
                    ),
                }),
                Some(verified) if verified != count => violations.push(Violation {
                    developer: skill_key.developer.clone(),
                    kind: ViolationKind::VerificationCountMismatch,
                    description: format!(
                        "verified_count {verified} but {count} receipt(s) in {}",
                        skill_key.category
                    ),
                }),
                Some(_) => {}
            }
        }

        for (key, record) in &skills {
            if record.verified_count > 0 && !receipts_per_skill.contains_key(key) {
                violations.push(Violation {
                    developer: key.developer.clone(),
                    kind: ViolationKind::VerificationCountMismatch,
                    description: format!(
                        "verified_count {} but no receipts in {}",
                        record.verified_count, key.category
                    ),
                });
            }
        }

        Ok(AuditReport {
            profiles_checked: profiles.len(),
            skills_checked: skills.len(),
            receipts_checked: receipts.len(),
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skl_store::{
        DeveloperProfile, InMemoryLedgerStore, ReceiptKey, SkillRecord, VerificationReceipt,
    };
    use skl_types::{SequenceMarker, SkillCategory};

    fn dev(handle: &str) -> DeveloperId {
        DeveloperId::from_handle(handle)
    }

    fn profile(total: u64) -> DeveloperProfile {
        DeveloperProfile {
            total_reputation: total,
            ..DeveloperProfile::new(SequenceMarker::new(1))
        }
    }

    fn skill(points: u64, verified: u64) -> SkillRecord {
        SkillRecord {
            points,
            self_reported_count: 1,
            verified_count: verified,
            last_updated: SequenceMarker::new(2),
        }
    }

    fn receipt() -> VerificationReceipt {
        VerificationReceipt {
            verification_sequence: SequenceMarker::new(3),
            points_awarded: 5,
        }
    }

    #[test]
    fn empty_store_is_consistent() {
        let report = LedgerAuditor::audit(&InMemoryLedgerStore::new()).unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.profiles_checked, 0);
    }

    #[test]
    fn consistent_store_passes() {
        let mut store = InMemoryLedgerStore::new();
        store.set_profile(dev("v"), profile(0)).unwrap();
        store.set_profile(dev("d"), profile(15)).unwrap();
        store
            .set_skill(SkillKey::new(dev("d"), SkillCategory::DEFI_PROTOCOLS), skill(15, 1))
            .unwrap();
        store
            .set_receipt(
                ReceiptKey::new(dev("v"), dev("d"), SkillCategory::DEFI_PROTOCOLS),
                receipt(),
            )
            .unwrap();

        let report = LedgerAuditor::audit(&store).unwrap();
        assert!(report.is_consistent(), "{:?}", report.violations);
        assert_eq!(report.receipts_checked, 1);
    }

    #[test]
    fn detects_reputation_mismatch() {
        let mut store = InMemoryLedgerStore::new();
        store.set_profile(dev("d"), profile(30)).unwrap();
        store
            .set_skill(SkillKey::new(dev("d"), SkillCategory::CLARITY_FUNDAMENTALS), skill(10, 0))
            .unwrap();

        let report = LedgerAuditor::audit(&store).unwrap();
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::ReputationMismatch);
    }

    #[test]
    fn detects_orphan_and_dangling_records() {
        let mut store = InMemoryLedgerStore::new();
        store
            .set_skill(SkillKey::new(dev("o"), SkillCategory::TOKEN_STANDARDS), skill(10, 0))
            .unwrap();
        store
            .set_receipt(
                ReceiptKey::new(dev("v"), dev("x"), SkillCategory::TOKEN_STANDARDS),
                receipt(),
            )
            .unwrap();

        let kinds: Vec<ViolationKind> = LedgerAuditor::audit(&store)
            .unwrap()
            .violations
            .into_iter()
            .map(|v| v.kind)
            .collect();
        assert!(kinds.contains(&ViolationKind::OrphanSkill));
        assert!(kinds.contains(&ViolationKind::DanglingReceipt));
    }

    #[test]
    fn detects_self_receipt_and_count_mismatch() {
        let mut store = InMemoryLedgerStore::new();
        store.set_profile(dev("d"), profile(20)).unwrap();
        store
            .set_skill(SkillKey::new(dev("d"), SkillCategory::SECURITY_MULTISIG), skill(20, 3))
            .unwrap();
        store
            .set_receipt(
                ReceiptKey::new(dev("d"), dev("d"), SkillCategory::SECURITY_MULTISIG),
                receipt(),
            )
            .unwrap();

        let kinds: Vec<ViolationKind> = LedgerAuditor::audit(&store)
            .unwrap()
            .violations
            .into_iter()
            .map(|v| v.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::SelfVerification,
                ViolationKind::VerificationCountMismatch
            ]
        );
    }
}
