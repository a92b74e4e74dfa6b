use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic sequence marker (a block height, in the reference host).
///
/// Records are stamped with the marker of the operation that wrote them.
/// The marker carries no wall-clock meaning; only its order matters.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceMarker(u64);

impl SequenceMarker {
    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    /// The zero marker, before any operation.
    pub const fn genesis() -> Self {
        Self(0)
    }

    pub const fn height(&self) -> u64 {
        self.0
    }

    /// The marker immediately after this one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u64> for SequenceMarker {
    fn from(height: u64) -> Self {
        Self(height)
    }
}

impl fmt::Debug for SequenceMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SequenceMarker(#{})", self.0)
    }
}

impl fmt::Display for SequenceMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_is_smallest() {
        assert!(SequenceMarker::genesis() < SequenceMarker::new(1));
    }

    #[test]
    fn next_advances_and_saturates() {
        assert_eq!(SequenceMarker::new(4).next(), SequenceMarker::new(5));
        assert_eq!(
            SequenceMarker::new(u64::MAX).next(),
            SequenceMarker::new(u64::MAX)
        );
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&SequenceMarker::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", SequenceMarker::new(7)), "#7");
    }
}
