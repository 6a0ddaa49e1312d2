//! Application constants
//!
//! Centralized location for domain-level constants shared by the bridge.

// Marketing platform (RD Station) OAuth endpoints
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://api.rd.services";
pub const OAUTH_AUTHORIZE_PATH: &str = "/auth/dialog";
pub const OAUTH_TOKEN_PATH: &str = "/auth/token";

// CRM (Pipedrive) person creation
pub const CRM_PERSONS_PATH: &str = "/api/v1/persons";
/// `visible_to` policy applied to every created person (entire company).
pub const CRM_PERSON_VISIBILITY: &str = "3";

// Outbound HTTP
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 120;

// Inbound HTTP
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

// Per-call environment settings (read at call time, never cached)
pub const ENV_CRM_API_TOKEN: &str = "API_TOKEN";
pub const ENV_CRM_COMPANY_DOMAIN: &str = "COMPANY_DOMAIN";
pub const ENV_OAUTH_CLIENT_ID: &str = "client_id";
pub const ENV_OAUTH_CLIENT_SECRET: &str = "client_secret";
pub const ENV_OAUTH_REDIRECT_URI: &str = "redirect_uri";
pub const ENV_OAUTH_REFRESH_TOKEN: &str = "refresh_token";

// Seed credential set
pub const ENV_SEED_ACCESS_TOKEN: &str = "RDSTATION_ACCESS_TOKEN";
pub const ENV_SEED_REFRESH_TOKEN: &str = "RDSTATION_REFRESH_TOKEN";
pub const ENV_SEED_EXPIRES_AT: &str = "RDSTATION_EXPIRES_IN";
