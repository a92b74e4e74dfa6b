use skl_types::{DeveloperId, SequenceMarker};

/// What the host supplies with every call: who is acting, and when.
///
/// The ledger trusts both values. Authenticating the caller and producing
/// monotonic markers is the host's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: DeveloperId,
    pub sequence: SequenceMarker,
}

impl CallContext {
    pub fn new(caller: DeveloperId, sequence: impl Into<SequenceMarker>) -> Self {
        Self {
            caller,
            sequence: sequence.into(),
        }
    }
}
