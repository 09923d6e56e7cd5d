//! The configuration form reconciler
//!
//! Holds the baseline configuration and the pending edits behind a
//! shared handle. All accessors take `&self`; the inner state lives in a
//! `Mutex` whose guard is released before the commit suspends, so edits
//! recorded while an update is in flight land in a later commit instead
//! of the in-flight request.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::config::schema::LogSourceConfiguration;
use crate::config::validation::Validator;
use crate::error::{FormError, Result, ValidationIssue};
use crate::patch::{ConfigurationPatch, FieldEdit, NewColumn, PendingChanges};
use crate::persistence::UpdateConfiguration;

use super::state::CommitState;

const LOCK_POISONED: &str = "form state lock poisoned";

/// Outcome of a commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The patch was persisted; the contained configuration is the new baseline
    Applied(LogSourceConfiguration),
    /// Nothing differed from the baseline; the persistence boundary was not called
    Unchanged,
}

#[derive(Debug)]
struct FormInner {
    baseline: LogSourceConfiguration,
    pending: PendingChanges,
    commit_state: CommitState,
}

impl FormInner {
    /// Pending changes with entries made redundant by the current
    /// baseline removed.
    fn effective_pending(&self) -> PendingChanges {
        self.pending.diff_against(&self.baseline)
    }
}

/// Resets the commit state to `Idle` when the commit future completes
/// or is dropped mid-flight. A cancelled commit applies no state
/// mutation but must not leave the form refusing further commits.
struct CommitGuard {
    inner: Arc<Mutex<FormInner>>,
}

impl Drop for CommitGuard {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.commit_state = CommitState::Idle;
        }
    }
}

/// Form state reconciler for a log source configuration.
///
/// Constructed when the owning view mounts and dropped when it unmounts.
/// Clones share the same state, so a handle can be held across an
/// in-flight commit while another records edits.
///
/// # Panics
///
/// Accessors panic if the internal mutex is poisoned, which only happens
/// after a panic on another thread holding the lock.
#[derive(Clone, Debug)]
pub struct ConfigurationForm {
    inner: Arc<Mutex<FormInner>>,
}

impl ConfigurationForm {
    /// Creates a form over the given baseline snapshot with no pending
    /// edits.
    #[must_use]
    pub fn new(baseline: LogSourceConfiguration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FormInner {
                baseline,
                pending: PendingChanges::default(),
                commit_state: CommitState::Idle,
            })),
        }
    }

    // ========================================================================
    // Edit Recording
    // ========================================================================

    /// Records one field edit.
    ///
    /// Never fails; invalid values are surfaced through
    /// [`validation_errors`](Self::validation_errors) instead of being
    /// rejected. Recording the baseline's own value clears the field's
    /// pending entry.
    pub fn record_change(&self, edit: FieldEdit) {
        let mut inner = self.inner.lock().expect(LOCK_POISONED);
        debug!(field = edit.field_name(), "recording field change");
        inner.pending.apply(edit);
        let normalized = inner.effective_pending();
        inner.pending = normalized;
    }

    /// Appends a new column to the effective column list.
    pub fn add_column(&self, column: NewColumn) {
        let columns = {
            let inner = self.inner.lock().expect(LOCK_POISONED);
            let mut columns = inner.effective_pending().overlay(&inner.baseline).columns;
            columns.push(column.into_column());
            columns
        };
        self.record_change(FieldEdit::Columns(columns));
    }

    /// Moves a column within the effective column list.
    ///
    /// Returns `false` without recording anything if either index is out
    /// of bounds.
    pub fn move_column(&self, source_index: usize, destination_index: usize) -> bool {
        let columns = {
            let inner = self.inner.lock().expect(LOCK_POISONED);
            let mut columns = inner.effective_pending().overlay(&inner.baseline).columns;
            if source_index >= columns.len() || destination_index >= columns.len() {
                warn!(
                    source_index,
                    destination_index,
                    len = columns.len(),
                    "ignoring out-of-bounds column move"
                );
                return false;
            }
            let column = columns.remove(source_index);
            columns.insert(destination_index, column);
            columns
        };
        self.record_change(FieldEdit::Columns(columns));
        true
    }

    /// Clears all pending edits.
    pub fn discard(&self) {
        let mut inner = self.inner.lock().expect(LOCK_POISONED);
        debug!("discarding pending changes");
        inner.pending = PendingChanges::default();
    }

    // ========================================================================
    // Flags and Views
    // ========================================================================

    /// Returns `true` iff any recorded edit still differs from the
    /// baseline.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        let inner = self.inner.lock().expect(LOCK_POISONED);
        !inner.effective_pending().is_empty()
    }

    /// Returns `true` iff no recorded edit fails its field-level rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }

    /// Returns all field-level validation errors for the recorded edits.
    #[must_use]
    pub fn validation_errors(&self) -> Vec<ValidationIssue> {
        let pending = {
            let inner = self.inner.lock().expect(LOCK_POISONED);
            inner.effective_pending()
        };
        Validator::new().validate(&pending).errors
    }

    /// Returns the current baseline snapshot.
    #[must_use]
    pub fn baseline(&self) -> LogSourceConfiguration {
        self.inner.lock().expect(LOCK_POISONED).baseline.clone()
    }

    /// Returns the recorded edits, diffed against the current baseline.
    #[must_use]
    pub fn pending_changes(&self) -> PendingChanges {
        self.inner.lock().expect(LOCK_POISONED).effective_pending()
    }

    /// Returns the baseline overlaid with the pending edits, i.e. what a
    /// rendering layer should display.
    #[must_use]
    pub fn effective_configuration(&self) -> LogSourceConfiguration {
        let inner = self.inner.lock().expect(LOCK_POISONED);
        inner.effective_pending().overlay(&inner.baseline)
    }

    /// Returns the current commit state.
    #[must_use]
    pub fn commit_state(&self) -> CommitState {
        self.inner.lock().expect(LOCK_POISONED).commit_state
    }

    // ========================================================================
    // Baseline Refresh
    // ========================================================================

    /// Replaces the baseline with an externally refreshed snapshot.
    ///
    /// Pending edits are preserved and re-diffed against the new
    /// baseline on every read; entries the refresh made redundant stop
    /// counting as dirty.
    pub fn replace_baseline(&self, baseline: LogSourceConfiguration) {
        let mut inner = self.inner.lock().expect(LOCK_POISONED);
        if !inner.pending.is_empty() {
            debug!("baseline refreshed with edits pending; re-diffing on read");
        }
        inner.baseline = baseline;
    }

    // ========================================================================
    // Commit
    // ========================================================================

    /// Builds the normalized patch and delegates it to the persistence
    /// collaborator.
    ///
    /// The patch is snapshotted synchronously before the first suspension
    /// point; edits recorded while the update is in flight are kept for a
    /// later commit. On success the returned configuration becomes the
    /// new baseline and the snapshotted edits are cleared. On failure the
    /// pending changes are left exactly as they were.
    ///
    /// # Errors
    ///
    /// - [`FormError::CommitInProgress`] if another commit is in flight
    /// - [`FormError::Validation`] if any recorded edit is invalid
    /// - [`FormError::PersistenceFailed`] if the collaborator rejects the
    ///   update
    pub async fn commit<C>(&self, client: &C) -> Result<CommitOutcome>
    where
        C: UpdateConfiguration + ?Sized,
    {
        let (patch, snapshot, _guard) = {
            let mut inner = self.inner.lock().expect(LOCK_POISONED);
            if inner.commit_state.is_committing() {
                return Err(FormError::CommitInProgress);
            }

            let snapshot = inner.effective_pending();
            if snapshot.is_empty() {
                debug!("commit skipped: no pending changes");
                return Ok(CommitOutcome::Unchanged);
            }

            let result = Validator::new().validate(&snapshot);
            if result.has_errors() {
                return Err(FormError::Validation {
                    errors: result.errors,
                });
            }

            inner.commit_state = CommitState::Committing;
            let patch = ConfigurationPatch::from_pending(&snapshot);
            let guard = CommitGuard {
                inner: Arc::clone(&self.inner),
            };
            (patch, snapshot, guard)
        };

        info!("committing configuration patch");
        match client.update_configuration(patch).await {
            Ok(updated) => {
                let mut inner = self.inner.lock().expect(LOCK_POISONED);
                inner.baseline = updated.clone();
                inner.pending.clear_committed(&snapshot);
                info!(name = %updated.name, "configuration update applied");
                Ok(CommitOutcome::Applied(updated))
            }
            Err(source) => {
                warn!(error = %source, "configuration update failed; pending changes kept");
                Err(FormError::PersistenceFailed { source })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
