//! Configuration form reconciliation
//!
//! The form owns the baseline snapshot and the pending edits, and turns
//! them into a normalized patch on commit.

pub mod reconciler;
pub mod state;

pub use reconciler::{CommitOutcome, ConfigurationForm};
pub use state::CommitState;
