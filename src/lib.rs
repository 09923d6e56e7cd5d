//! `logsource` - Log source configuration form reconciliation
//!
//! This library tracks the delta between a last-persisted log source
//! configuration and in-progress edits, and builds the normalized patch
//! sent to the persistence boundary when the edits are applied.

pub mod config;
pub mod error;
pub mod form;
pub mod patch;
pub mod persistence;
