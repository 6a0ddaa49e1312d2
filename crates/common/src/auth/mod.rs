//! OAuth 2.0 credential lifecycle for the marketing platform API
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   TokenManager   │  Lifecycle owner (authorize, exchange, refresh)
//! └────────┬─────────┘
//!          │
//!          ├──► OAuthClientTrait   (provider HTTP calls)
//!          ├──► CredentialStore    (whole-record persistence)
//!          └──► ClientConfigSource (client settings, read per call)
//! ```
//!
//! Expiry is evaluated lazily against a [`crate::time::Clock`]. Nothing
//! refreshes in the background; callers invoke `refresh` explicitly.

pub mod client;
pub mod store;
pub mod token_manager;
pub mod traits;
pub mod types;

pub use client::{OAuthClient, OAuthClientError};
pub use store::MemoryCredentialStore;
pub use token_manager::{TokenManager, TokenManagerError};
pub use traits::{ClientConfigSource, CredentialStore, CredentialStoreError, OAuthClientTrait};
pub use types::{
    AuthorizationOutcome, CredentialState, ExchangeRequest, OAuthEndpoints, RefreshRequest,
    TokenResponse,
};
