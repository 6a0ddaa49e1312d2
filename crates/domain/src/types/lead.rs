//! Lead and CRM contact types
//!
//! Leads arrive in RD Station webhook batches and only live for the duration
//! of one request. Contacts are owned by the CRM; the bridge only observes the
//! identifier it assigns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::CRM_PERSON_VISIBILITY;
use crate::errors::{BridgeError, Result};

/// Webhook body: `{"leads": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub leads: Vec<WebhookLead>,
}

/// A lead as delivered by the marketing platform, before field validation.
///
/// Unknown fields are ignored; RD Station sends many more than the bridge
/// uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookLead {
    pub name: Option<String>,
    pub email: Option<String>,
    pub personal_phone: Option<String>,
}

impl WebhookLead {
    /// Check that every required field is present.
    ///
    /// # Errors
    /// Returns `BridgeError::InvalidInput` naming the first absent field.
    pub fn validate(self, position: usize) -> Result<Lead> {
        let require = |value: Option<String>, field: &str| {
            value.ok_or_else(|| BridgeError::InvalidInput { position, field: field.to_string() })
        };

        Ok(Lead {
            name: require(self.name, "name")?,
            email: require(self.email, "email")?,
            personal_phone: require(self.personal_phone, "personal_phone")?,
        })
    }
}

/// A validated lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub personal_phone: String,
}

/// Phone entry in the CRM person payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEntry {
    pub value: String,
}

/// Person creation payload sent to the CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub email: String,
    pub phone: Vec<PhoneEntry>,
    pub visible_to: String,
}

impl From<&Lead> for NewPerson {
    fn from(lead: &Lead) -> Self {
        Self {
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: vec![PhoneEntry { value: lead.personal_phone.clone() }],
            visible_to: CRM_PERSON_VISIBILITY.to_string(),
        }
    }
}

/// Identifier the CRM assigns to a created person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// A person successfully created in the CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmContact {
    pub person_id: PersonId,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_ignores_unknown_fields() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{"leads":[{"name":"A","email":"a@x.com","personal_phone":"1","uuid":"x","tags":[]}]}"#,
        )
        .unwrap();

        let lead = payload.leads.into_iter().next().unwrap().validate(0).unwrap();
        assert_eq!(lead.email, "a@x.com");
    }

    #[test]
    fn validate_names_first_missing_field() {
        let raw = WebhookLead {
            name: Some("B".into()),
            email: None,
            personal_phone: None,
        };

        let err = raw.validate(4).unwrap_err();
        assert_eq!(err, BridgeError::InvalidInput { position: 4, field: "email".into() });
    }

    #[test]
    fn new_person_uses_fixed_visibility_and_single_phone() {
        let lead = Lead {
            name: "A".into(),
            email: "a@x.com".into(),
            personal_phone: "555".into(),
        };

        let person = NewPerson::from(&lead);
        let json = serde_json::to_value(&person).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "A",
                "email": "a@x.com",
                "phone": [{"value": "555"}],
                "visible_to": "3"
            })
        );
    }

    #[test]
    fn person_id_accepts_numbers_and_strings() {
        let numeric: PersonId = serde_json::from_str("42").unwrap();
        let text: PersonId = serde_json::from_str("\"p-9\"").unwrap();

        assert_eq!(numeric, PersonId::Numeric(42));
        assert_eq!(text.to_string(), "p-9");
    }
}
