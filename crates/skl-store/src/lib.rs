//! Ledger store for the Skill Ledger.
//!
//! The store holds the three persistent relations (skill records, developer
//! profiles, verification receipts) and nothing else. It performs no
//! validation: every invariant is enforced by the operations layer before a
//! write reaches the store.
//!
//! # Modules
//!
//! - [`records`] — Record, key and patch types for the three relations
//! - [`batch`] — [`WriteBatch`], the unit of atomic application
//! - [`traits`] — The [`LedgerStore`] trait
//! - [`memory`] — [`InMemoryLedgerStore`], one ordered map per relation
//! - [`journal`] — Append-only, CRC-framed on-disk journal of write batches
//! - [`journaled`] — [`JournaledStore`], an in-memory mirror backed by a journal

pub mod batch;
pub mod error;
pub mod journal;
pub mod journaled;
pub mod memory;
pub mod records;
pub mod traits;

pub use batch::{StoreWrite, WriteBatch};
pub use error::{StoreError, StoreResult};
pub use journal::{Journal, JournalConfig, SyncMode};
pub use journaled::JournaledStore;
pub use memory::InMemoryLedgerStore;
pub use records::{
    DeveloperProfile, ProfilePatch, ReceiptKey, SkillKey, SkillPatch, SkillRecord,
    VerificationReceipt,
};
pub use traits::LedgerStore;
