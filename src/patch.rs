//! Pending changes and the normalized configuration patch
//!
//! `PendingChanges` accumulates field-level edits that differ from the
//! baseline. `ConfigurationPatch` is the write-only body built from them
//! on every commit; it applies the legacy-field translation rule
//! (`logAlias` becomes a structured `logIndices` reference) and is never
//! stored.

use serde::Serialize;
use uuid::Uuid;

use crate::config::schema::{
    FieldColumn, LogColumn, LogIndexReference, LogSourceConfiguration, MessageColumn,
    TimestampColumn,
};

// ============================================================================
// Field Edits
// ============================================================================

/// A single user-entered edit to one configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// New display name
    Name(String),
    /// New legacy index alias expression
    LogAlias(String),
    /// New timestamp field name
    TimestampField(String),
    /// New tiebreaker field name
    TiebreakerField(String),
    /// New column list, replacing the previous one wholesale
    Columns(Vec<LogColumn>),
}

impl FieldEdit {
    /// Returns the wire-level name of the edited field.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::LogAlias(_) => "logAlias",
            Self::TimestampField(_) => "timestampField",
            Self::TiebreakerField(_) => "tiebreakerField",
            Self::Columns(_) => "columns",
        }
    }
}

/// A column to append to the effective column list.
///
/// Ids are assigned on insertion, matching the persistence boundary's
/// expectation that every column carries a unique id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewColumn {
    /// Add a timestamp column
    Timestamp,
    /// Add a message column
    Message,
    /// Add a field column for the named document field
    Field(String),
}

impl NewColumn {
    /// Materializes the column with a freshly generated id.
    #[must_use]
    pub fn into_column(self) -> LogColumn {
        let id = Uuid::new_v4().to_string();
        match self {
            Self::Timestamp => LogColumn::TimestampColumn(TimestampColumn { id }),
            Self::Message => LogColumn::MessageColumn(MessageColumn { id }),
            Self::Field(field) => LogColumn::FieldColumn(FieldColumn { id, field }),
        }
    }
}

// ============================================================================
// Pending Changes
// ============================================================================

/// The set of uncommitted field edits.
///
/// Holds only fields that differ from the baseline; recording a value
/// equal to the baseline clears the field's entry. The field set is
/// statically the baseline's field set, so the subset invariant holds by
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChanges {
    /// Pending display name, if edited
    pub name: Option<String>,
    /// Pending legacy alias, if edited
    pub log_alias: Option<String>,
    /// Pending timestamp field, if edited
    pub timestamp_field: Option<String>,
    /// Pending tiebreaker field, if edited
    pub tiebreaker_field: Option<String>,
    /// Pending column list, if edited
    pub columns: Option<Vec<LogColumn>>,
}

impl PendingChanges {
    /// Returns `true` if no field edits are recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.log_alias.is_none()
            && self.timestamp_field.is_none()
            && self.tiebreaker_field.is_none()
            && self.columns.is_none()
    }

    /// Applies one field edit, overwriting any previous edit of the
    /// same field.
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(value) => self.name = Some(value),
            FieldEdit::LogAlias(value) => self.log_alias = Some(value),
            FieldEdit::TimestampField(value) => self.timestamp_field = Some(value),
            FieldEdit::TiebreakerField(value) => self.tiebreaker_field = Some(value),
            FieldEdit::Columns(value) => self.columns = Some(value),
        }
    }

    /// Returns a copy with entries equal to the baseline removed.
    ///
    /// This is how a stale baseline is reconciled: edits recorded against
    /// an older snapshot stop counting as pending once an external refresh
    /// makes them redundant.
    #[must_use]
    pub fn diff_against(&self, baseline: &LogSourceConfiguration) -> Self {
        Self {
            name: self.name.clone().filter(|v| *v != baseline.name),
            log_alias: self
                .log_alias
                .clone()
                .filter(|v| Some(v.as_str()) != baseline.log_alias.as_deref()),
            timestamp_field: self
                .timestamp_field
                .clone()
                .filter(|v| *v != baseline.timestamp_field),
            tiebreaker_field: self
                .tiebreaker_field
                .clone()
                .filter(|v| *v != baseline.tiebreaker_field),
            columns: self.columns.clone().filter(|v| *v != baseline.columns),
        }
    }

    /// Clears every field whose current value matches the given
    /// commit snapshot, leaving edits recorded after the snapshot intact.
    pub fn clear_committed(&mut self, snapshot: &Self) {
        if self.name == snapshot.name {
            self.name = None;
        }
        if self.log_alias == snapshot.log_alias {
            self.log_alias = None;
        }
        if self.timestamp_field == snapshot.timestamp_field {
            self.timestamp_field = None;
        }
        if self.tiebreaker_field == snapshot.tiebreaker_field {
            self.tiebreaker_field = None;
        }
        if self.columns == snapshot.columns {
            self.columns = None;
        }
    }

    /// Overlays these edits on the baseline, yielding the configuration
    /// a rendering layer would display.
    #[must_use]
    pub fn overlay(&self, baseline: &LogSourceConfiguration) -> LogSourceConfiguration {
        LogSourceConfiguration {
            name: self.name.clone().unwrap_or_else(|| baseline.name.clone()),
            log_alias: self.log_alias.clone().or_else(|| baseline.log_alias.clone()),
            log_indices: baseline.log_indices.clone(),
            timestamp_field: self
                .timestamp_field
                .clone()
                .unwrap_or_else(|| baseline.timestamp_field.clone()),
            tiebreaker_field: self
                .tiebreaker_field
                .clone()
                .unwrap_or_else(|| baseline.tiebreaker_field.clone()),
            columns: self.columns.clone().unwrap_or_else(|| baseline.columns.clone()),
        }
    }
}

// ============================================================================
// Normalized Patch
// ============================================================================

/// The normalized update body sent to the persistence boundary.
///
/// Built fresh from `PendingChanges` on every commit and consumed within
/// that commit. Carries `logIndices` instead of the legacy `logAlias`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationPatch {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Structured index reference translated from a pending `logAlias`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_indices: Option<LogIndexReference>,

    /// New timestamp field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_field: Option<String>,

    /// New tiebreaker field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiebreaker_field: Option<String>,

    /// New column list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<LogColumn>>,
}

impl ConfigurationPatch {
    /// Builds the patch from the pending changes.
    ///
    /// A pending `logAlias` value `v` becomes
    /// `logIndices: {"type": "index_name", "indexName": v}`; the patch
    /// never contains a `logAlias` key.
    #[must_use]
    pub fn from_pending(pending: &PendingChanges) -> Self {
        Self {
            name: pending.name.clone(),
            log_indices: pending.log_alias.clone().map(|index_name| {
                LogIndexReference::IndexName { index_name }
            }),
            timestamp_field: pending.timestamp_field.clone(),
            tiebreaker_field: pending.tiebreaker_field.clone(),
            columns: pending.columns.clone(),
        }
    }

    /// Returns `true` if the patch carries no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.log_indices.is_none()
            && self.timestamp_field.is_none()
            && self.tiebreaker_field.is_none()
            && self.columns.is_none()
    }
}

// ============================================================================
// Tests
// ============================================================================
