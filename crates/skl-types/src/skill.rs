use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Display names of the category enumeration, indexed by `code - 1`.
///
/// Widening the category set means appending here; the valid range is
/// derived from this table's length.
const CATEGORY_NAMES: [&str; 6] = [
    "Clarity Fundamentals",
    "DeFi Protocols",
    "Security & Multisig",
    "Oracle Integration",
    "Token Standards",
    "Testing & Deployment",
];

const UNKNOWN_CATEGORY: &str = "Unknown Category";
const UNKNOWN_LEVEL: &str = "Unknown Level";

/// A validated skill category.
///
/// Constructing one through [`SkillCategory::new`] is the range check every
/// write path relies on; holding a `SkillCategory` means the code is valid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SkillCategory(u8);

impl SkillCategory {
    pub const CLARITY_FUNDAMENTALS: Self = Self(1);
    pub const DEFI_PROTOCOLS: Self = Self(2);
    pub const SECURITY_MULTISIG: Self = Self(3);
    pub const ORACLE_INTEGRATION: Self = Self(4);
    pub const TOKEN_STANDARDS: Self = Self(5);
    pub const TESTING_DEPLOYMENT: Self = Self(6);

    /// Lowest valid category code.
    pub const MIN: u8 = 1;
    /// Highest valid category code.
    pub const MAX: u8 = CATEGORY_NAMES.len() as u8;

    /// Validate a raw category code.
    pub fn new(raw: u32) -> Result<Self, TypeError> {
        if raw < Self::MIN as u32 || raw > Self::MAX as u32 {
            return Err(TypeError::InvalidCategory(raw));
        }
        Ok(Self(raw as u8))
    }

    pub fn code(&self) -> u8 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        CATEGORY_NAMES[(self.0 - Self::MIN) as usize]
    }

    /// Every valid category in code order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<u8> for SkillCategory {
    type Error = TypeError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw as u32)
    }
}

impl From<SkillCategory> for u8 {
    fn from(category: SkillCategory) -> Self {
        category.0
    }
}

impl fmt::Debug for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SkillCategory({})", self.0)
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display name for any raw category code. Never fails.
pub fn category_name(raw: u32) -> &'static str {
    SkillCategory::new(raw)
        .map(|c| c.name())
        .unwrap_or(UNKNOWN_CATEGORY)
}

/// Proficiency band derived from accumulated points in one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum SkillLevel {
    Beginner = 1,
    Intermediate = 2,
    Advanced = 3,
    Expert = 4,
}

impl SkillLevel {
    /// Lowest point total classified as Intermediate.
    pub const INTERMEDIATE_FROM: u64 = 26;
    /// Lowest point total classified as Advanced.
    pub const ADVANCED_FROM: u64 = 76;
    /// Lowest point total classified as Expert.
    pub const EXPERT_FROM: u64 = 151;

    /// Classify a point total. Each band includes its lower threshold.
    pub fn from_points(points: u64) -> Self {
        if points >= Self::EXPERT_FROM {
            Self::Expert
        } else if points >= Self::ADVANCED_FROM {
            Self::Advanced
        } else if points >= Self::INTERMEDIATE_FROM {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }

    pub fn from_code(code: u8) -> Result<Self, TypeError> {
        match code {
            1 => Ok(Self::Beginner),
            2 => Ok(Self::Intermediate),
            3 => Ok(Self::Advanced),
            4 => Ok(Self::Expert),
            other => Err(TypeError::InvalidLevel(other)),
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display name for a raw level code, as exposed to external callers.
pub fn level_name(code: u8) -> &'static str {
    SkillLevel::from_code(code)
        .map(|l| l.name())
        .unwrap_or(UNKNOWN_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn category_range_is_enforced() {
        assert!(SkillCategory::new(0).is_err());
        assert!(SkillCategory::new(1).is_ok());
        assert!(SkillCategory::new(6).is_ok());
        assert_eq!(
            SkillCategory::new(7).unwrap_err(),
            TypeError::InvalidCategory(7)
        );
    }

    #[test]
    fn category_names_match_reference_table() {
        assert_eq!(category_name(1), "Clarity Fundamentals");
        assert_eq!(category_name(3), "Security & Multisig");
        assert_eq!(category_name(6), "Testing & Deployment");
        assert_eq!(category_name(0), "Unknown Category");
        assert_eq!(category_name(99), "Unknown Category");
    }

    #[test]
    fn all_lists_every_category_once() {
        let codes: Vec<u8> = SkillCategory::all().map(|c| c.code()).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn category_deserialization_validates() {
        let ok: SkillCategory = serde_json::from_str("2").unwrap();
        assert_eq!(ok, SkillCategory::DEFI_PROTOCOLS);
        assert!(serde_json::from_str::<SkillCategory>("9").is_err());
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(SkillLevel::from_points(0), SkillLevel::Beginner);
        assert_eq!(SkillLevel::from_points(25), SkillLevel::Beginner);
        assert_eq!(SkillLevel::from_points(26), SkillLevel::Intermediate);
        assert_eq!(SkillLevel::from_points(75), SkillLevel::Intermediate);
        assert_eq!(SkillLevel::from_points(76), SkillLevel::Advanced);
        assert_eq!(SkillLevel::from_points(150), SkillLevel::Advanced);
        assert_eq!(SkillLevel::from_points(151), SkillLevel::Expert);
    }

    #[test]
    fn level_names() {
        assert_eq!(level_name(1), "Beginner");
        assert_eq!(level_name(4), "Expert");
        assert_eq!(level_name(0), "Unknown Level");
        assert_eq!(level_name(5), "Unknown Level");
    }

    #[test]
    fn level_code_roundtrip() {
        for level in [
            SkillLevel::Beginner,
            SkillLevel::Intermediate,
            SkillLevel::Advanced,
            SkillLevel::Expert,
        ] {
            assert_eq!(SkillLevel::from_code(level.code()).unwrap(), level);
        }
    }

    proptest! {
        #[test]
        fn classification_never_regresses(a in 0u64..10_000, b in 0u64..10_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(SkillLevel::from_points(lo) <= SkillLevel::from_points(hi));
        }
    }
}
