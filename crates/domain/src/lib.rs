//! # LeadBridge Domain
//!
//! Business domain types and models for LeadBridge.
//!
//! This crate contains:
//! - Lead and CRM contact types (webhook input, CRM output)
//! - OAuth credential and client configuration types
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other LeadBridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
