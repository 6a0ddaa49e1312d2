//! Error types used throughout the bridge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for LeadBridge
///
/// Every inbound operation (webhook delivery, OAuth callback, refresh) ends in
/// either success or exactly one of these kinds. None of them is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeError {
    /// A required setting is absent. Raised before any network I/O.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The OAuth provider rejected the code exchange or answered with a
    /// malformed body. `status` is `None` when the body could not be parsed
    /// from an otherwise successful response.
    #[error("Token exchange failed (status {status:?}): {body}")]
    Exchange { status: Option<u16>, body: String },

    /// The OAuth provider rejected a refresh or answered with a malformed
    /// body.
    #[error("Token refresh failed (status {status:?}): {body}")]
    Refresh { status: Option<u16>, body: String },

    /// No refresh token is available. Requires operator intervention.
    #[error("Missing credential: {message}")]
    MissingCredential { message: String },

    /// A stored credential set was requested for use after `expires_at`.
    #[error("Stored credential set expired")]
    Expired,

    /// Network failure, timeout or unexpected response shape.
    #[error("Transport error{}: {message}", position_suffix(*position))]
    Transport { position: Option<usize>, message: String },

    /// The CRM reported the create-person call as unsuccessful.
    #[error("CRM rejected lead at position {position}: {message}")]
    Replication { position: usize, message: String },

    /// A webhook lead is missing a required field.
    #[error("Invalid lead at position {position}: missing field `{field}`")]
    InvalidInput { position: usize, field: String },

    /// The credential store could not be read or written.
    #[error("Storage error: {message}")]
    Storage { message: String },
}

fn position_suffix(position: Option<usize>) -> String {
    position.map(|p| format!(" at position {p}")).unwrap_or_default()
}

impl BridgeError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { position: None, message: message.into() }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage { message: message.into() }
    }

    /// Attach the offending lead position to a transport error.
    ///
    /// Other kinds are returned unchanged.
    #[must_use]
    pub fn at_position(self, index: usize) -> Self {
        match self {
            Self::Transport { message, .. } => Self::Transport { position: Some(index), message },
            other => other,
        }
    }

    /// Stable label suitable for structured logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Exchange { .. } => "exchange",
            Self::Refresh { .. } => "refresh",
            Self::MissingCredential { .. } => "missing_credential",
            Self::Expired => "expired",
            Self::Transport { .. } => "transport",
            Self::Replication { .. } => "replication",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Storage { .. } => "storage",
        }
    }
}

/// Result type alias for LeadBridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
