use std::io;

use leadbridge_domain::BridgeError;
use tracing::{error, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "LEADBRIDGE_LOG_FORMAT";
pub const DEFAULT_LOG_DIRECTIVE: &str = "info,leadbridge=debug";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Parse `LEADBRIDGE_LOG_FORMAT`; unknown values fall back to pretty.
    pub fn from_env() -> Self {
        match std::env::var(ENV_LOG_FORMAT) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::default(),
        }
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the default directive; HTTP client internals stay at
/// `warn` either way.
///
/// # Errors
/// Returns an error if a subscriber is already installed
pub fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => {
            let json_layer = fmt::layer().with_target(true).with_writer(io::stdout).json();
            registry.with(json_layer).try_init()?;
        }
        LogFormat::Pretty => {
            let pretty_layer = fmt::layer().with_target(true).with_writer(io::stdout);
            registry.with(pretty_layer).try_init()?;
        }
    }

    Ok(())
}

/// Log an error caught at a route boundary with its stable `kind` label.
///
/// Transport and storage failures log at `error`, the rest at `warn`.
pub fn log_boundary_error(route: &'static str, err: &BridgeError) {
    let kind = err.kind();
    match err {
        BridgeError::Transport { .. } | BridgeError::Storage { .. } => {
            error!(route, kind, error = %err, "request failed");
        }
        _ => warn!(route, kind, error = %err, "request failed"),
    }
}
