//! # LeadBridge API
//!
//! HTTP surface of the bridge: the RD Station lead webhook and the OAuth
//! endpoints, wired to the services in [`AppContext`].

pub mod context;
pub mod routes;
pub mod utils;

pub use context::{AppContext, BridgeTokenManager};
pub use routes::router;
