//! Foundation types for the Skill Ledger.
//!
//! This crate provides the identity, sequencing, and skill classification
//! types shared by every other Skill Ledger crate.
//!
//! # Key Types
//!
//! - [`DeveloperId`] — Opaque developer identity derived from identity material
//! - [`SequenceMarker`] — Monotonic block-height style marker for record timestamps
//! - [`SkillCategory`] — Validated member of the closed category enumeration
//! - [`SkillLevel`] — Derived classification of accumulated points

pub mod error;
pub mod identity;
pub mod sequence;
pub mod skill;

pub use error::TypeError;
pub use identity::{DeveloperId, IdentityMaterial};
pub use sequence::SequenceMarker;
pub use skill::{category_name, level_name, SkillCategory, SkillLevel};
