use std::io;

/// Errors from ledger store operations.
///
/// None of these are recoverable by the operations layer; a store error
/// aborts the current call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the journal file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A write batch could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A journal frame before the tail is damaged. Replaying past it would
    /// rebuild a state no sequence of operations produced.
    #[error("journal corrupt at byte {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
