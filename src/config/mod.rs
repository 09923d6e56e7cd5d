//! Configuration module
//!
//! Schema types for log source configurations and validation of
//! recorded field-level changes.

pub mod schema;
pub mod validation;

pub use schema::*;
pub use validation::{ValidationResult, Validator};
