//! Configuration schema types
//!
//! The baseline log source configuration and its column and index
//! reference shapes. These types round-trip through the persistence
//! boundary's camelCase JSON wire format.

use serde::{Deserialize, Serialize};

// ============================================================================
// Baseline Configuration
// ============================================================================

/// The last-persisted log source configuration snapshot.
///
/// Replaced wholesale whenever a fresh snapshot is loaded or a commit
/// succeeds; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSourceConfiguration {
    /// Display name of the log source
    pub name: String,

    /// Legacy flat index alias (superseded by `log_indices`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_alias: Option<String>,

    /// Structured index reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_indices: Option<LogIndexReference>,

    /// Field used for primary time-based sorting
    pub timestamp_field: String,

    /// Field used to break ties between identical timestamps
    pub tiebreaker_field: String,

    /// Ordered list of columns shown in the log stream
    #[serde(default)]
    pub columns: Vec<LogColumn>,
}

// ============================================================================
// Index References
// ============================================================================

/// Structured reference to the indices a log source reads from.
///
/// The legacy `logAlias` field translates into the `index_name` variant;
/// the `index_pattern` variant points at a saved index pattern by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LogIndexReference {
    /// Direct index name or comma-separated name expression
    IndexName {
        /// The index name expression (e.g. `"logs-*"`)
        index_name: String,
    },
    /// Reference to a saved index pattern
    IndexPattern {
        /// Id of the saved index pattern
        index_pattern_id: String,
    },
}

// ============================================================================
// Log Columns
// ============================================================================

/// A single column in the log stream, externally tagged on the wire
/// (e.g. `{"timestampColumn":{"id":"..."}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogColumn {
    /// The event timestamp
    TimestampColumn(TimestampColumn),
    /// The rendered log message
    MessageColumn(MessageColumn),
    /// An arbitrary document field
    FieldColumn(FieldColumn),
}

impl LogColumn {
    /// Returns the column's unique id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::TimestampColumn(c) => &c.id,
            Self::MessageColumn(c) => &c.id,
            Self::FieldColumn(c) => &c.id,
        }
    }
}

/// Timestamp column settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampColumn {
    /// Unique column id
    pub id: String,
}

/// Message column settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageColumn {
    /// Unique column id
    pub id: String,
}

/// Field column settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldColumn {
    /// Unique column id
    pub id: String,
    /// Name of the document field to display
    pub field: String,
}

// ============================================================================
// Tests
// ============================================================================
