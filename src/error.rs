//! Error types for `logsource`
//!
//! Form-level and persistence-level errors, plus the validation issue
//! types shared between the validator and the form.

use thiserror::Error;

// ============================================================================
// Form Errors
// ============================================================================

/// Errors surfaced by the configuration form.
///
/// Persistence failures deliberately leave the pending changes intact so
/// the caller can retry; the display policy belongs to the caller.
#[derive(Debug, Error)]
pub enum FormError {
    /// One or more recorded changes failed field-level validation
    #[error("{} validation issue(s) found", errors.len())]
    Validation {
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// The delegated configuration update was rejected or never completed
    #[error("failed to persist configuration update")]
    PersistenceFailed {
        /// Underlying persistence error
        #[from]
        source: PersistenceError,
    },

    /// A commit is already in flight; the new one was not started
    #[error("a configuration update is already in flight")]
    CommitInProgress,
}

// ============================================================================
// Persistence Errors
// ============================================================================

/// Errors returned by the external persistence collaborator.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The update was received but rejected (e.g. conflict, forbidden)
    #[error("update rejected: {message}")]
    Rejected {
        /// Reason given by the collaborator
        message: String,
    },

    /// The update never reached the collaborator
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },

    /// The collaborator responded with an undecodable body
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while checking recorded changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Wire-level path to the problematic field (e.g. "timestampField")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Validation failure that blocks a commit
    Error,
    /// Potential issue that does not block a commit
    Warning,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

// ============================================================================
// Tests
// ============================================================================
