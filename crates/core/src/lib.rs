//! # LeadBridge Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the CRM and its settings (traits)
//! - The lead replication use case
//!
//! ## Architecture Principles
//! - Only depends on `leadbridge-domain`
//! - No HTTP, storage, or environment access
//! - All external dependencies via traits

pub mod replication;

pub use replication::ports::{CrmClient, CrmSettingsSource, PersonCreation};
pub use replication::{LeadReplicator, ReplicationReport};
