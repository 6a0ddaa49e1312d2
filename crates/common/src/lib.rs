//! Reusable infrastructure shared across LeadBridge crates.
//!
//! - [`auth`]: OAuth2 authorization-code and refresh-token lifecycle for the
//!   marketing platform API
//! - [`time`]: wall clock abstraction so expiry checks are testable
//! - `testing` (feature `test-utils`): mock implementations of the auth traits

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod time;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{
    AuthorizationOutcome, ClientConfigSource, CredentialState, CredentialStore,
    CredentialStoreError, MemoryCredentialStore, OAuthClient, OAuthClientError, OAuthClientTrait,
    OAuthEndpoints, TokenManager, TokenManagerError,
};
pub use time::{Clock, SystemClock};
