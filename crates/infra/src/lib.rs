//! # LeadBridge Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client with a fixed request timeout
//! - CRM (Pipedrive) person client
//! - Environment configuration loading and per-call settings lookup
//! - File-backed credential store
//!
//! ## Architecture
//! - Implements traits defined in `leadbridge-core` and `leadbridge-common`
//! - Contains all "impure" code (network, filesystem, process environment)

pub mod config;
pub mod crm;
pub mod errors;
pub mod http;
pub mod storage;

// Re-export commonly used items
pub use config::{load_from_env, seed_credentials_from_env, EnvSettings};
pub use crm::PipedriveClient;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use storage::FileCredentialStore;
