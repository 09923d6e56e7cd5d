//! Commit state machine
//!
//! Two states, one legal round trip: `Idle -> Committing -> Idle`.
//! The `Committing` state is entered synchronously before the update
//! suspends, which is what keeps a second commit from starting while
//! one is in flight.

/// Re-entrancy state of the form's commit operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitState {
    /// No update in flight; edits and commits are accepted
    #[default]
    Idle,
    /// An update is in flight; edits are accepted, commits are refused
    Committing,
}

impl CommitState {
    /// Returns `true` while an update is in flight.
    #[must_use]
    pub const fn is_committing(self) -> bool {
        matches!(self, Self::Committing)
    }
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Committing => write!(f, "committing"),
        }
    }
}
