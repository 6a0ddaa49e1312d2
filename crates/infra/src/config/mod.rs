//! Configuration loading and management
//!
//! Startup settings are loaded once from environment variables. Per-call
//! settings are looked up through [`EnvSettings`] every time they are needed.

pub mod env_settings;
pub mod loader;

// Re-export commonly used items
pub use env_settings::EnvSettings;
pub use loader::{load_from_env, load_with, seed_credentials_from_env, seed_credentials_with};
