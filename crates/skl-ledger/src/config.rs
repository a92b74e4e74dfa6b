use serde::{Deserialize, Serialize};

/// Point values and thresholds applied by [`crate::SkillLedger`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Points awarded for each self-reported achievement.
    pub self_report_points: u64,
    /// Points awarded to the verified developer per peer verification.
    pub verification_bonus: u64,
    /// Minimum total reputation required to verify others.
    pub min_verifier_reputation: u64,
    /// Maximum achievement description length, in characters.
    pub max_description_len: usize,
    /// Reserved for project deployment rewards. Not awarded by any operation yet.
    pub project_deployment_points: u64,
    /// Reserved for course completion rewards. Not awarded by any operation yet.
    pub course_completion_points: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            self_report_points: 10,
            verification_bonus: 5,
            min_verifier_reputation: 50,
            max_description_len: 256,
            project_deployment_points: 25,
            course_completion_points: 15,
        }
    }
}
