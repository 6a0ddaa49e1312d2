//! Pipedrive person client
//!
//! One `POST {base}/api/v1/persons?api_token=...` per lead. The response
//! envelope's `success` flag decides between a created person and a CRM-side
//! rejection; anything unreadable is a transport failure.

use async_trait::async_trait;
use leadbridge_core::{CrmClient, PersonCreation};
use leadbridge_domain::constants::CRM_PERSONS_PATH;
use leadbridge_domain::{BridgeError, CrmCredentials, NewPerson, PersonId, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::http::HttpClient;

/// Response envelope shared by Pipedrive v1 endpoints.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<PersonData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PersonData {
    id: PersonId,
}

/// CRM client for Pipedrive.
#[derive(Debug, Clone)]
pub struct PipedriveClient {
    http_client: HttpClient,
    base_url_override: Option<String>,
}

impl PipedriveClient {
    /// Create a client targeting `https://{company_domain}.pipedrive.com`.
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client, base_url_override: None }
    }

    /// Send every request to `base_url` instead of the company subdomain.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url_override = base_url.map(|url| url.trim_end_matches('/').to_string());
        self
    }

    fn persons_url(&self, company_domain: &str) -> String {
        match &self.base_url_override {
            Some(base) => format!("{base}{CRM_PERSONS_PATH}"),
            None => format!("https://{company_domain}.pipedrive.com{CRM_PERSONS_PATH}"),
        }
    }
}

#[async_trait]
impl CrmClient for PipedriveClient {
    #[instrument(skip(self, credentials, person), fields(company = %credentials.company_domain))]
    async fn create_person(
        &self,
        credentials: &CrmCredentials,
        person: &NewPerson,
    ) -> Result<PersonCreation> {
        let request = self
            .http_client
            .request(Method::POST, self.persons_url(&credentials.company_domain))
            .query(&[("api_token", credentials.api_token.as_str())])
            .json(person);

        let response = self.http_client.send(request).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| BridgeError::transport(format!("failed to read CRM response: {err}")))?;

        let envelope: Envelope = serde_json::from_str(&body).map_err(|err| {
            warn!(status = status.as_u16(), "unreadable CRM response");
            BridgeError::transport(format!("unreadable CRM response (HTTP {status}): {err}"))
        })?;

        if !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| format!("CRM reported failure (HTTP {})", status.as_u16()));
            return Ok(PersonCreation::Rejected { message });
        }

        let id = envelope
            .data
            .map(|data| data.id)
            .ok_or_else(|| BridgeError::transport("CRM response is missing the person id"))?;

        debug!(person_id = %id, "person created");
        Ok(PersonCreation::Created(id))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use leadbridge_domain::PhoneEntry;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn credentials() -> CrmCredentials {
        CrmCredentials { api_token: "tok".into(), company_domain: "acme".into() }
    }

    fn person() -> NewPerson {
        NewPerson {
            name: "A".into(),
            email: "a@x.com".into(),
            phone: vec![PhoneEntry { value: "1".into() }],
            visible_to: "3".into(),
        }
    }

    fn client_for(server: &MockServer) -> PipedriveClient {
        PipedriveClient::new(HttpClient::new().unwrap()).with_base_url(Some(server.uri()))
    }

    #[test]
    fn default_url_uses_company_subdomain() {
        let client = PipedriveClient::new(HttpClient::new().unwrap());
        assert_eq!(client.persons_url("acme"), "https://acme.pipedrive.com/api/v1/persons");
    }

    #[tokio::test]
    async fn created_person_returns_its_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/persons"))
            .and(query_param("api_token", "tok"))
            .and(body_json(serde_json::json!({
                "name": "A",
                "email": "a@x.com",
                "phone": [{"value": "1"}],
                "visible_to": "3"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "success": true,
                "data": {"id": 42, "name": "A"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server).create_person(&credentials(), &person()).await.unwrap();

        assert_eq!(outcome, PersonCreation::Created(PersonId::Numeric(42)));
    }

    #[tokio::test]
    async fn success_false_is_a_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "error": "Invalid email"
            })))
            .mount(&server)
            .await;

        let outcome = client_for(&server).create_person(&credentials(), &person()).await.unwrap();

        assert_eq!(outcome, PersonCreation::Rejected { message: "Invalid email".into() });
    }

    #[tokio::test]
    async fn html_error_page_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).create_person(&credentials(), &person()).await.unwrap_err();

        assert_eq!(err.kind(), "transport");
    }

    #[tokio::test]
    async fn success_without_id_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"success": true})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).create_person(&credentials(), &person()).await.unwrap_err();

        assert_eq!(err, BridgeError::transport("CRM response is missing the person id"));
    }

    #[tokio::test]
    async fn timeout_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let http = HttpClient::builder().timeout(Duration::from_millis(50)).build().unwrap();
        let client = PipedriveClient::new(http).with_base_url(Some(server.uri()));

        let err = client.create_person(&credentials(), &person()).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
