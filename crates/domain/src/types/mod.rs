//! Domain types and models

pub mod credentials;
pub mod lead;

pub use credentials::CredentialSet;
pub use lead::{CrmContact, Lead, NewPerson, PersonId, PhoneEntry, WebhookLead, WebhookPayload};
