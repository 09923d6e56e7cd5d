//! Persistence boundary
//!
//! The single seam between the form and whatever stores configurations.
//! The form never retries; failures propagate to the caller with the
//! pending changes left intact.

use async_trait::async_trait;

use crate::config::schema::LogSourceConfiguration;
use crate::error::PersistenceError;
use crate::patch::ConfigurationPatch;

/// External collaborator that persists configuration updates.
///
/// Implementations receive the normalized patch and return the full
/// configuration as persisted, which becomes the form's new baseline.
#[async_trait]
pub trait UpdateConfiguration: Send + Sync {
    /// Applies the patch and returns the resulting configuration.
    async fn update_configuration(
        &self,
        patch: ConfigurationPatch,
    ) -> Result<LogSourceConfiguration, PersistenceError>;
}
