//! Test doubles for the auth traits
//!
//! Enabled for unit tests and, for other crates, through the `test-utils`
//! feature.

pub mod mocks;

pub use mocks::{MockOAuthClient, MockOutcome, StaticClientConfig};
