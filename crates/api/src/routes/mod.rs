//! HTTP surface
//!
//! | Method | Path              | Operation                          |
//! |--------|-------------------|------------------------------------|
//! | GET    | `/webhook`        | liveness probe                     |
//! | POST   | `/webhook`        | replicate a lead batch into the CRM |
//! | GET    | `/oauth`          | check or initiate authorization    |
//! | GET    | `/oauth/callback` | exchange the authorization code    |
//! | GET    | `/oauth/status`   | credential lifecycle state         |
//! | POST   | `/oauth/refresh`  | refresh-token grant                |

pub mod oauth;
pub mod response;
pub mod webhook;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::AppContext;

/// Build the application router.
pub fn router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/webhook", get(webhook::probe).post(webhook::receive))
        .route("/oauth", get(oauth::authorize))
        .route("/oauth/callback", get(oauth::callback))
        .route("/oauth/status", get(oauth::status))
        .route("/oauth/refresh", post(oauth::refresh))
        .with_state(context)
}
