//! Shared helpers for `leadbridge-infra` integration tests.

#![allow(dead_code)]

use leadbridge_infra::EnvSettings;

pub fn crm_env() -> EnvSettings {
    EnvSettings::from_pairs([("API_TOKEN", "crm-token"), ("COMPANY_DOMAIN", "acme")])
}

pub fn lead_json(name: &str, email: &str, phone: &str) -> serde_json::Value {
    serde_json::json!({"name": name, "email": email, "personal_phone": phone})
}
