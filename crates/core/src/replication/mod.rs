//! Webhook lead replication into the CRM

pub mod ports;
pub mod service;

pub use service::{LeadReplicator, ReplicationReport};
