//! OAuth endpoints for the marketing platform

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use leadbridge_common::auth::AuthorizationOutcome;
use leadbridge_domain::BridgeError;
use serde::Deserialize;

use super::response::ApiMessage;
use crate::utils::logging::log_boundary_error;
use crate::AppContext;

pub const ALREADY_VALID_MESSAGE: &str = "Already has a valid token";
pub const REQUEST_DONE_MESSAGE: &str = "OAuth request done";
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Missing authorization credentials";
pub const MISSING_CALLBACK_MESSAGE: &str = "Missing authorization credentials or code";
pub const CALLBACK_DONE_MESSAGE: &str = "OAuth flow completed successfully";
pub const CALLBACK_FAILED_MESSAGE: &str = "Something went wrong";
pub const REFRESHED_MESSAGE: &str = "Token refreshed";
pub const MISSING_REFRESH_MESSAGE: &str = "Missing refresh token";
pub const REFRESH_REJECTED_MESSAGE: &str = "Token refresh rejected";
pub const FAILURE_MESSAGE: &str = "Error";

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
}

/// `GET /oauth`
pub async fn authorize(State(context): State<Arc<AppContext>>) -> ApiMessage {
    match context.token_manager.check_or_initiate_authorization().await {
        Ok(AuthorizationOutcome::AlreadyValid { expires_at }) => {
            ApiMessage::new(StatusCode::OK, ALREADY_VALID_MESSAGE)
                .with_field("expires_at", expires_at.to_rfc3339())
        }
        Ok(AuthorizationOutcome::AuthorizationRequired { url }) => {
            ApiMessage::new(StatusCode::OK, REQUEST_DONE_MESSAGE).with_field("authorization_url", url)
        }
        Err(err) => {
            let err = BridgeError::from(err);
            log_boundary_error("oauth", &err);
            match err {
                BridgeError::Configuration { .. } => {
                    ApiMessage::new(StatusCode::UNAUTHORIZED, MISSING_CREDENTIALS_MESSAGE)
                }
                _ => ApiMessage::new(StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE),
            }
        }
    }
}

/// `GET /oauth/callback?code=...`
pub async fn callback(
    State(context): State<Arc<AppContext>>,
    Query(params): Query<CallbackParams>,
) -> ApiMessage {
    let code = params.code.unwrap_or_default();

    match context.token_manager.handle_authorization_callback(&code).await {
        Ok(_) => ApiMessage::new(StatusCode::OK, CALLBACK_DONE_MESSAGE),
        Err(err) => {
            let err = BridgeError::from(err);
            log_boundary_error("oauth_callback", &err);
            match err {
                BridgeError::Configuration { .. } => {
                    ApiMessage::new(StatusCode::UNAUTHORIZED, MISSING_CALLBACK_MESSAGE)
                }
                BridgeError::Exchange { status, .. } => {
                    ApiMessage::new(provider_status(status), CALLBACK_FAILED_MESSAGE)
                }
                _ => ApiMessage::new(StatusCode::INTERNAL_SERVER_ERROR, CALLBACK_FAILED_MESSAGE),
            }
        }
    }
}

/// Provider status forwarded as-is; a malformed success body becomes 502.
fn provider_status(status: Option<u16>) -> StatusCode {
    status
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|code| !code.is_success())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

/// `GET /oauth/status`
pub async fn status(State(context): State<Arc<AppContext>>) -> Response {
    match context.token_manager.state().await {
        Ok(state) => (StatusCode::OK, Json(state)).into_response(),
        Err(err) => {
            log_boundary_error("oauth_status", &BridgeError::from(err));
            ApiMessage::new(StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE).into_response()
        }
    }
}

/// `POST /oauth/refresh`
pub async fn refresh(State(context): State<Arc<AppContext>>) -> ApiMessage {
    match context.token_manager.refresh().await {
        Ok(credentials) => ApiMessage::new(StatusCode::OK, REFRESHED_MESSAGE)
            .with_field("expires_at", credentials.expires_at.to_rfc3339()),
        Err(err) => {
            let err = BridgeError::from(err);
            log_boundary_error("oauth_refresh", &err);
            match err {
                BridgeError::MissingCredential { .. } => {
                    ApiMessage::new(StatusCode::UNAUTHORIZED, MISSING_REFRESH_MESSAGE)
                }
                BridgeError::Refresh { .. } => {
                    ApiMessage::new(StatusCode::UNAUTHORIZED, REFRESH_REJECTED_MESSAGE)
                }
                BridgeError::Configuration { .. } => {
                    ApiMessage::new(StatusCode::UNAUTHORIZED, MISSING_CREDENTIALS_MESSAGE)
                }
                _ => ApiMessage::new(StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE),
            }
        }
    }
}
