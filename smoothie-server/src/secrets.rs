//! Warehouse credentials loaded from the secrets file
//!
//! Two layouts are accepted:
//!
//! ```toml
//! [connections.snowflake]
//! account = "xy12345.eu-west-1"
//! user = "SMOOTHIES"
//! password = "..."
//! role = "SYSADMIN"
//! warehouse = "COMPUTE_WH"
//! database = "SMOOTHIES"
//! schema = "PUBLIC"
//! client_session_keep_alive = true
//! ```
//!
//! or the same keys under a flat `[snowflake]` table (usually without the
//! keep-alive flag). `SNOWFLAKE_<KEY>` environment variables override
//! single keys, so a deployment can inject the password without writing it
//! to disk.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::config::ConfigError;

/// A secret string that is wiped on drop and never printed
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the secret for the one place that must send it
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

/// Connection bundle for the warehouse session
#[derive(Debug, Clone)]
pub struct WarehouseCredentials {
    pub account: String,
    pub user: String,
    pub password: SecretString,
    pub role: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    pub client_session_keep_alive: bool,
    /// Overrides `{account}.snowflakecomputing.com`
    pub host: Option<String>,
    pub port: Option<u16>,
    /// `https` unless overridden
    pub protocol: Option<String>,
}

impl WarehouseCredentials {
    /// Load credentials from `path`, then apply environment overrides
    ///
    /// The file must exist even when every key is overridden.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file: SecretsFile = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            span: e.span(),
        })?;

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Parse credentials from TOML text without consulting the environment
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: SecretsFile = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            span: e.span(),
        })?;
        Self::resolve(file, |_| None)
    }

    fn resolve(
        file: SecretsFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let nested = file.connections.and_then(|c| c.snowflake);
        let (prefix, mut raw) = match (nested, file.snowflake) {
            (Some(nested), _) => ("connections.snowflake", nested),
            (None, Some(flat)) => ("snowflake", flat),
            (None, None) => ("snowflake", RawSnowflake::default()),
        };
        raw.apply_env(&env)?;

        let required = |value: Option<String>, key: &str| {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingKey(format!("{prefix}.{key}")))
        };

        Ok(Self {
            account: required(raw.account, "account")?,
            user: required(raw.user, "user")?,
            password: SecretString::new(required(raw.password, "password")?),
            role: required(raw.role, "role")?,
            warehouse: required(raw.warehouse, "warehouse")?,
            database: required(raw.database, "database")?,
            schema: required(raw.schema, "schema")?,
            client_session_keep_alive: raw.client_session_keep_alive.unwrap_or(false),
            host: raw.host.filter(|h| !h.is_empty()),
            port: raw.port,
            protocol: raw.protocol.filter(|p| !p.is_empty()),
        })
    }

    /// Base URL of the account's REST endpoint
    pub fn base_url(&self) -> String {
        let protocol = self.protocol.as_deref().unwrap_or("https");
        let host = self
            .host
            .clone()
            .unwrap_or_else(|| format!("{}.snowflakecomputing.com", self.account));
        let port = self
            .port
            .unwrap_or(if protocol == "http" { 80 } else { 443 });
        format!("{protocol}://{host}:{port}")
    }
}

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    connections: Option<Connections>,
    snowflake: Option<RawSnowflake>,
}

#[derive(Debug, Default, Deserialize)]
struct Connections {
    snowflake: Option<RawSnowflake>,
}

#[derive(Default, Deserialize)]
struct RawSnowflake {
    account: Option<String>,
    user: Option<String>,
    password: Option<String>,
    role: Option<String>,
    warehouse: Option<String>,
    database: Option<String>,
    schema: Option<String>,
    client_session_keep_alive: Option<bool>,
    host: Option<String>,
    port: Option<u16>,
    protocol: Option<String>,
}

impl fmt::Debug for RawSnowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSnowflake")
            .field("account", &self.account)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

impl RawSnowflake {
    fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let strings = [
            ("SNOWFLAKE_ACCOUNT", &mut self.account),
            ("SNOWFLAKE_USER", &mut self.user),
            ("SNOWFLAKE_PASSWORD", &mut self.password),
            ("SNOWFLAKE_ROLE", &mut self.role),
            ("SNOWFLAKE_WAREHOUSE", &mut self.warehouse),
            ("SNOWFLAKE_DATABASE", &mut self.database),
            ("SNOWFLAKE_SCHEMA", &mut self.schema),
            ("SNOWFLAKE_HOST", &mut self.host),
            ("SNOWFLAKE_PROTOCOL", &mut self.protocol),
        ];
        for (var, slot) in strings {
            if let Some(value) = env(var) {
                *slot = Some(value);
            }
        }

        if let Some(value) = env("SNOWFLAKE_PORT") {
            self.port = Some(value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SNOWFLAKE_PORT".into(),
            })?);
        }
        if let Some(value) = env("SNOWFLAKE_CLIENT_SESSION_KEEP_ALIVE") {
            self.client_session_keep_alive =
                Some(value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "SNOWFLAKE_CLIENT_SESSION_KEEP_ALIVE".into(),
                })?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const NESTED: &str = r#"
        [connections.snowflake]
        account = "xy12345.eu-west-1"
        user = "SMOOTHIES"
        password = "hunter2"
        role = "SYSADMIN"
        warehouse = "COMPUTE_WH"
        database = "SMOOTHIES"
        schema = "PUBLIC"
        client_session_keep_alive = true
    "#;

    const FLAT: &str = r#"
        [snowflake]
        account = "xy12345"
        user = "SMOOTHIES"
        password = "hunter2"
        role = "SYSADMIN"
        warehouse = "COMPUTE_WH"
        database = "SMOOTHIES"
        schema = "PUBLIC"
    "#;

    fn parse_with_env(
        text: &str,
        vars: &[(&str, &str)],
    ) -> Result<WarehouseCredentials, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let file: SecretsFile = toml::from_str(text).unwrap();
        WarehouseCredentials::resolve(file, |k| vars.get(k).cloned())
    }

    #[test]
    fn test_nested_layout() {
        let creds = WarehouseCredentials::from_toml_str(NESTED).unwrap();
        assert_eq!(creds.account, "xy12345.eu-west-1");
        assert_eq!(creds.password.expose(), "hunter2");
        assert!(creds.client_session_keep_alive);
        assert_eq!(
            creds.base_url(),
            "https://xy12345.eu-west-1.snowflakecomputing.com:443"
        );
    }

    #[test]
    fn test_flat_layout_defaults_keep_alive_off() {
        let creds = WarehouseCredentials::from_toml_str(FLAT).unwrap();
        assert_eq!(creds.warehouse, "COMPUTE_WH");
        assert!(!creds.client_session_keep_alive);
    }

    #[test]
    fn test_missing_key_names_the_full_path() {
        let text = NESTED.replace("role = \"SYSADMIN\"", "");
        let err = WarehouseCredentials::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "connections.snowflake.role"));
    }

    #[test]
    fn test_empty_file_is_missing_account() {
        let err = WarehouseCredentials::from_toml_str("").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "snowflake.account"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let creds = parse_with_env(
            FLAT,
            &[
                ("SNOWFLAKE_PASSWORD", "from-env"),
                ("SNOWFLAKE_HOST", "127.0.0.1"),
                ("SNOWFLAKE_PORT", "9090"),
                ("SNOWFLAKE_PROTOCOL", "http"),
            ],
        )
        .unwrap();
        assert_eq!(creds.password.expose(), "from-env");
        assert_eq!(creds.base_url(), "http://127.0.0.1:9090");
    }

    #[test]
    fn test_env_alone_is_enough() {
        let creds = parse_with_env(
            "",
            &[
                ("SNOWFLAKE_ACCOUNT", "acct"),
                ("SNOWFLAKE_USER", "u"),
                ("SNOWFLAKE_PASSWORD", "p"),
                ("SNOWFLAKE_ROLE", "r"),
                ("SNOWFLAKE_WAREHOUSE", "w"),
                ("SNOWFLAKE_DATABASE", "d"),
                ("SNOWFLAKE_SCHEMA", "s"),
            ],
        )
        .unwrap();
        assert_eq!(creds.base_url(), "https://acct.snowflakecomputing.com:443");
    }

    #[test]
    fn test_invalid_port_override() {
        let err = parse_with_env(FLAT, &[("SNOWFLAKE_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_debug_never_prints_password() {
        let creds = WarehouseCredentials::from_toml_str(NESTED).unwrap();
        let printed = format!("{creds:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn test_parse_error_does_not_echo_file_contents() {
        let err = WarehouseCredentials::from_toml_str("password = \"hunter2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(!err.to_string().contains("hunter2"));
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FLAT.as_bytes()).unwrap();
        let creds = WarehouseCredentials::load(file.path()).unwrap();
        assert_eq!(creds.database, "SMOOTHIES");
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        let err = WarehouseCredentials::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { path: ref p, .. } if p == &path));
    }
}
