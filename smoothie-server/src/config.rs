//! Server configuration

use std::path::PathBuf;

use thiserror::Error;

/// Default location of the warehouse secrets file
pub const DEFAULT_SECRETS_PATH: &str = ".streamlit/secrets.toml";

/// Fruit metadata endpoint shown under the order form
pub const DEFAULT_FRUITYVICE_URL: &str = "https://fruityvice.com/api/fruit/watermelon";

/// Server configuration, read from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port for the form and JSON API
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Path to the TOML file holding warehouse credentials
    pub secrets_path: PathBuf,
    /// Fruit metadata URL (overridable for local testing)
    pub fruityvice_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8501),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            secrets_path: std::env::var("SECRETS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SECRETS_PATH)),
            fruityvice_url: std::env::var("FRUITYVICE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_FRUITYVICE_URL.into()),
        }
    }
}

/// Startup configuration failure
///
/// Messages name files and keys only; secret values never appear.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read secrets file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The TOML parser's own message quotes the offending line, which may
    /// hold a password, so only the byte span is kept.
    #[error("secrets file {} is not valid TOML (bytes {:?})", .path.display(), .span)]
    Parse {
        path: PathBuf,
        span: Option<std::ops::Range<usize>>,
    },
    #[error("missing required secret `{0}`")]
    MissingKey(String),
    #[error("secret `{key}` has an invalid value")]
    InvalidValue { key: String },
}
