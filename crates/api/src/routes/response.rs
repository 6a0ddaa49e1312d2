//! JSON response bodies

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

/// `{"message": ...}` body with optional extra fields.
#[derive(Debug, Clone)]
pub struct ApiMessage {
    status: StatusCode,
    body: Map<String, Value>,
}

impl ApiMessage {
    /// Body holding only `message`, answered with `status`.
    pub fn new(status: StatusCode, message: &str) -> Self {
        let mut body = Map::new();
        body.insert("message".to_string(), json!(message));
        Self { status, body }
    }

    /// Add a top-level field next to `message`.
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_string(), value.into());
        self
    }
}

impl IntoResponse for ApiMessage {
    fn into_response(self) -> Response {
        (self.status, Json(Value::Object(self.body))).into_response()
    }
}
