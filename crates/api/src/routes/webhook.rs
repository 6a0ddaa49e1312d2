//! Marketing platform lead webhook

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use leadbridge_domain::{BridgeError, WebhookPayload};
use tracing::{info, warn};

use super::response::ApiMessage;
use crate::utils::logging::log_boundary_error;
use crate::AppContext;

pub const PROBE_MESSAGE: &str = "RDStation webhooks working";
pub const CREATED_MESSAGE: &str = "Success, created persons at Pipedrive";
pub const CRM_REJECTED_MESSAGE: &str = "Error when creating Pipedrive person";
pub const FAILURE_MESSAGE: &str = "Error";

/// `GET /webhook`
pub async fn probe() -> ApiMessage {
    ApiMessage::new(StatusCode::OK, PROBE_MESSAGE)
}

/// `POST /webhook`
///
/// Every failure is a 500; only the message tells a CRM rejection apart.
pub async fn receive(State(context): State<Arc<AppContext>>, body: Bytes) -> ApiMessage {
    let payload = match serde_json::from_slice::<WebhookPayload>(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(route = "webhook", kind = "invalid_input", error = %err, "malformed webhook body");
            return ApiMessage::new(StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE);
        }
    };

    match context.replicator.replicate(payload.leads).await {
        Ok(report) => {
            info!(created = report.len(), "webhook batch replicated");
            ApiMessage::new(StatusCode::CREATED, CREATED_MESSAGE)
        }
        Err(err) => {
            log_boundary_error("webhook", &err);
            let message = match err {
                BridgeError::Replication { .. } => CRM_REJECTED_MESSAGE,
                _ => FAILURE_MESSAGE,
            };
            ApiMessage::new(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}
