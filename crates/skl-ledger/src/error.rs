use skl_store::StoreError;

/// Errors produced by ledger operations.
///
/// Every variant except [`LedgerError::Store`] is a precondition failure
/// detected before any write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("skill category {0} is outside the valid range")]
    InvalidSkillCategory(u32),

    #[error("profile not initialized")]
    NotAuthorized,

    #[error("developers cannot verify their own skills")]
    CannotVerifySelf,

    #[error("reputation {have} is below the verifier minimum of {need}")]
    InsufficientReputation { have: u64, need: u64 },

    #[error("skill already verified by this verifier")]
    AlreadyVerified,

    #[error("no skill record for this developer and category")]
    SkillNotFound,

    #[error("description is {len} characters, limit is {max}")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("store error: {0}")]
    Store(String),
}

impl LedgerError {
    /// Stable numeric result code for callers that branch on integers.
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidSkillCategory(_) => 100,
            Self::NotAuthorized => 101,
            Self::CannotVerifySelf => 102,
            Self::InsufficientReputation { .. } => 103,
            Self::AlreadyVerified => 104,
            Self::SkillNotFound => 105,
            Self::DescriptionTooLong { .. } => 106,
            Self::Store(_) => 500,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(error: StoreError) -> Self {
        Self::Store(error.to_string())
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
