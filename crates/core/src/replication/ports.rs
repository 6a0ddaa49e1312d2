//! Port interfaces for lead replication
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use leadbridge_domain::{CrmCredentials, CrmSettings, NewPerson, PersonId, Result};

/// Application-level outcome of a person creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonCreation {
    /// The CRM created the person and assigned `PersonId`.
    Created(PersonId),
    /// The call completed but the CRM reported it as unsuccessful.
    Rejected { message: String },
}

/// Trait for creating persons in the CRM
#[async_trait]
pub trait CrmClient: Send + Sync {
    /// Issue exactly one person creation call.
    ///
    /// # Errors
    /// Returns `BridgeError::Transport` on network failure, timeout or an
    /// unreadable response. CRM-side rejections are `Ok(Rejected)`.
    async fn create_person(
        &self,
        credentials: &CrmCredentials,
        person: &NewPerson,
    ) -> Result<PersonCreation>;
}

/// Trait for reading CRM settings at call time
pub trait CrmSettingsSource: Send + Sync {
    fn crm_settings(&self) -> CrmSettings;
}
