//! Validation of recorded field changes
//!
//! Field-level validation in the collect-all style: every recorded edit
//! is checked and all issues are reported together rather than stopping
//! at the first one. Invalid values are flagged, never rejected; the
//! form keeps accepting edits and simply refuses to commit.

use std::collections::HashSet;

use crate::error::{Severity, ValidationIssue};
use crate::patch::PendingChanges;

/// Names longer than this draw a warning; the persistence boundary
/// accepts them but they are almost certainly a paste error.
const NAME_LENGTH_WARNING_THRESHOLD: usize = 255;

// ============================================================================
// Public API
// ============================================================================

/// Result of validating the pending changes.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (block the commit).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validator for pending configuration changes.
///
/// Only recorded edits are checked; fields untouched since the baseline
/// are assumed to have been valid when they were last persisted.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the pending changes and returns all issues found.
    pub fn validate(&mut self, pending: &PendingChanges) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_name(pending);
        self.validate_indices(pending);
        self.validate_fields(pending);
        self.validate_columns(pending);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Field Rules
    // ========================================================================

    fn validate_name(&mut self, pending: &PendingChanges) {
        if let Some(name) = &pending.name {
            if name.trim().is_empty() {
                self.add_error("name", "Name is required and cannot be empty");
            }
            if name.len() > NAME_LENGTH_WARNING_THRESHOLD {
                self.add_warning("name", "Name is unusually long");
            }
        }
    }

    fn validate_indices(&mut self, pending: &PendingChanges) {
        if let Some(alias) = &pending.log_alias {
            if alias.trim().is_empty() {
                self.add_error("logAlias", "Log indices cannot be empty");
            }
        }
    }

    fn validate_fields(&mut self, pending: &PendingChanges) {
        if let Some(field) = &pending.timestamp_field {
            if field.trim().is_empty() {
                self.add_error("timestampField", "Timestamp field cannot be empty");
            }
        }
        if let Some(field) = &pending.tiebreaker_field {
            if field.trim().is_empty() {
                self.add_error("tiebreakerField", "Tiebreaker field cannot be empty");
            }
        }
    }

    fn validate_columns(&mut self, pending: &PendingChanges) {
        let Some(columns) = &pending.columns else {
            return;
        };

        if columns.is_empty() {
            self.add_error("columns", "At least one log column is required");
        }

        let mut seen = HashSet::new();
        for column in columns {
            if !seen.insert(column.id()) {
                self.add_error("columns", "Column ids must be unique");
                break;
            }
        }
    }

    // ========================================================================
    // Issue Accumulation
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
