//! Core operations for the Skill Ledger.
//!
//! This crate is the only place ledger invariants are enforced. It provides:
//! - [`SkillLedger`], the three mutating entry points and the read-only queries
//! - [`CallContext`], the caller identity and sequence marker supplied by the host
//! - [`LedgerConfig`], point values and thresholds
//! - [`LedgerAuditor`], a consistency check over a whole store
//!
//! Every mutating operation validates all preconditions before it builds a
//! [`skl_store::WriteBatch`], so a rejected call leaves the store untouched.

pub mod audit;
pub mod config;
pub mod context;
pub mod error;
pub mod ledger;

pub use audit::{AuditReport, LedgerAuditor, Violation, ViolationKind};
pub use config::LedgerConfig;
pub use context::CallContext;
pub use error::{LedgerError, LedgerResult};
pub use ledger::{SkillLedger, SkillView};
pub use skl_types::{category_name, level_name, SkillCategory, SkillLevel};

/// Classify a point total into a [`SkillLevel`].
pub fn classify_level(points: u64) -> SkillLevel {
    SkillLevel::from_points(points)
}
