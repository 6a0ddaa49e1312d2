//! Shared test helpers for `leadbridge-core` integration tests.
//!
//! Lightweight mocks of the replication ports so the tests can focus on
//! batch behaviour instead of HTTP.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use leadbridge_core::{CrmClient, CrmSettingsSource, PersonCreation};
use leadbridge_domain::{
    BridgeError, CrmCredentials, CrmSettings, NewPerson, PersonId, Result, WebhookLead,
};
use parking_lot::Mutex;

/// Scripted answer for one person creation call.
#[derive(Debug, Clone)]
pub enum CrmReply {
    Reject(String),
    Fail(String),
}

/// Mock CRM that records every call and answers `Created` unless scripted.
#[derive(Debug, Clone, Default)]
pub struct MockCrmClient {
    calls: Arc<Mutex<Vec<NewPerson>>>,
    scripted: Arc<Mutex<HashMap<usize, CrmReply>>>,
}

impl MockCrmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply for the call at `index` (0-based).
    pub fn reply_at(self, index: usize, reply: CrmReply) -> Self {
        self.scripted.lock().insert(index, reply);
        self
    }

    pub fn calls(&self) -> Vec<NewPerson> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl CrmClient for MockCrmClient {
    async fn create_person(
        &self,
        _credentials: &CrmCredentials,
        person: &NewPerson,
    ) -> Result<PersonCreation> {
        let index = {
            let mut calls = self.calls.lock();
            calls.push(person.clone());
            calls.len() - 1
        };

        match self.scripted.lock().get(&index).cloned() {
            Some(CrmReply::Reject(message)) => Ok(PersonCreation::Rejected { message }),
            Some(CrmReply::Fail(message)) => Err(BridgeError::transport(message)),
            None => Ok(PersonCreation::Created(PersonId::Numeric(1000 + index as i64))),
        }
    }
}

/// Fixed CRM settings.
#[derive(Debug, Clone)]
pub struct StaticCrmSettings(pub CrmSettings);

impl StaticCrmSettings {
    pub fn complete() -> Self {
        Self(CrmSettings {
            api_token: Some("crm-token".to_string()),
            company_domain: Some("acme".to_string()),
        })
    }
}

impl CrmSettingsSource for StaticCrmSettings {
    fn crm_settings(&self) -> CrmSettings {
        self.0.clone()
    }
}

pub fn lead(name: &str, email: &str, phone: &str) -> WebhookLead {
    WebhookLead {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        personal_phone: Some(phone.to_string()),
    }
}

/// `count` well-formed leads named `lead-0`, `lead-1`, ...
pub fn batch(count: usize) -> Vec<WebhookLead> {
    (0..count)
        .map(|i| lead(&format!("lead-{i}"), &format!("lead{i}@example.com"), &format!("55{i}")))
        .collect()
}
