//! Lead replication service - core business logic

use std::sync::Arc;

use leadbridge_domain::{
    BridgeError, CrmContact, FailurePolicy, Lead, NewPerson, Result, WebhookLead,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::ports::{CrmClient, CrmSettingsSource, PersonCreation};

/// Contacts created by one successful batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplicationReport {
    pub contacts: Vec<CrmContact>,
}

impl ReplicationReport {
    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

/// Replicates webhook leads into the CRM, one call per lead.
pub struct LeadReplicator {
    crm: Arc<dyn CrmClient>,
    settings: Arc<dyn CrmSettingsSource>,
    policy: FailurePolicy,
}

impl LeadReplicator {
    /// Create a replicator that stops at the first CRM rejection.
    pub fn new(crm: Arc<dyn CrmClient>, settings: Arc<dyn CrmSettingsSource>) -> Self {
        Self { crm, settings, policy: FailurePolicy::default() }
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create one CRM person per lead, sequentially and in input order.
    ///
    /// Settings and field presence are checked before the first call. Contacts
    /// created before a failure are not rolled back.
    ///
    /// # Errors
    /// - `Configuration` if the CRM token or domain is absent (no calls made)
    /// - `InvalidInput` if any lead lacks a required field (no calls made)
    /// - `Replication` for the first lead the CRM rejected
    /// - `Transport` with the position of the lead whose call failed; this
    ///   always aborts the batch
    #[instrument(skip(self, leads), fields(batch_size = leads.len(), policy = ?self.policy))]
    pub async fn replicate(&self, leads: Vec<WebhookLead>) -> Result<ReplicationReport> {
        let credentials = self.settings.crm_settings().require()?;

        let leads = leads
            .into_iter()
            .enumerate()
            .map(|(position, lead)| lead.validate(position))
            .collect::<Result<Vec<Lead>>>()?;

        let mut report = ReplicationReport { contacts: Vec::with_capacity(leads.len()) };
        let mut first_rejection: Option<BridgeError> = None;

        for (position, lead) in leads.iter().enumerate() {
            let person = NewPerson::from(lead);
            let creation = self
                .crm
                .create_person(&credentials, &person)
                .await
                .map_err(|err| err.at_position(position))?;

            match creation {
                PersonCreation::Created(person_id) => {
                    info!(position, person_id = %person_id, "lead replicated");
                    report.contacts.push(CrmContact { person_id, email: lead.email.clone() });
                }
                PersonCreation::Rejected { message } => {
                    warn!(position, reason = %message, "CRM rejected lead");
                    let err = BridgeError::Replication { position, message };
                    match self.policy {
                        FailurePolicy::StopAtFirstFailure => return Err(err),
                        FailurePolicy::ContinueOnFailure => {
                            first_rejection.get_or_insert(err);
                        }
                    }
                }
            }
        }

        if let Some(err) = first_rejection {
            warn!(created = report.len(), "batch finished with rejected leads");
            return Err(err);
        }

        info!(created = report.len(), "batch replicated");
        Ok(report)
    }
}
