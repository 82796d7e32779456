//! Snowflake session over the connector REST protocol
//!
//! - `POST /session/v1/login-request` exchanges credentials for a token
//! - `POST /queries/v1/query-request` runs one statement with bindings
//! - `POST /session?delete=true` ends the session
//!
//! Small result sets come back inline as JSON (`rowtype` + `rowset`),
//! which is all the order form reads.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{BindValue, RowSet, Statement, WarehouseError};
use crate::secrets::WarehouseCredentials;

const CLIENT_APP_ID: &str = "smoothie-server";

/// Session/master token expired or session no longer exists
const SESSION_EXPIRED_CODES: [&str; 2] = ["390112", "390114"];

/// An authenticated warehouse session
pub struct SnowflakeSession {
    http: reqwest::Client,
    base_url: String,
    token: Zeroizing<String>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for SnowflakeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowflakeSession")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

// ── Wire types ──

#[derive(Serialize)]
struct LoginRequest<'a> {
    data: LoginData<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct LoginData<'a> {
    client_app_id: &'a str,
    client_app_version: &'a str,
    account_name: &'a str,
    login_name: &'a str,
    password: &'a str,
    session_parameters: SessionParameters,
}

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct SessionParameters {
    client_session_keep_alive: bool,
}

#[derive(Deserialize)]
struct LoginResponseData {
    token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    sql_text: &'a str,
    async_exec: bool,
    sequence_id: u64,
    query_submission_time: i64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    bindings: BTreeMap<String, WireBinding<'a>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct WireBinding<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Deserialize)]
struct QueryResponseData {
    #[serde(default)]
    rowtype: Vec<RowType>,
    #[serde(default)]
    rowset: Vec<Vec<Option<String>>>,
}

#[derive(Deserialize)]
struct RowType {
    name: String,
}

/// Common response envelope
#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    /// Error codes arrive as strings or numbers depending on endpoint
    fn code(&self) -> String {
        match &self.code {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => "unknown".to_string(),
        }
    }
}

impl SnowflakeSession {
    /// Authenticate and open a session
    pub async fn connect(
        http: reqwest::Client,
        credentials: &WarehouseCredentials,
    ) -> Result<Self, WarehouseError> {
        let base_url = credentials.base_url();
        let body = LoginRequest {
            data: LoginData {
                client_app_id: CLIENT_APP_ID,
                client_app_version: env!("CARGO_PKG_VERSION"),
                account_name: account_locator(&credentials.account),
                login_name: &credentials.user,
                password: credentials.password.expose(),
                session_parameters: SessionParameters {
                    client_session_keep_alive: credentials.client_session_keep_alive,
                },
            },
        };

        let request_id = Uuid::new_v4().to_string();
        let response = http
            .post(format!("{base_url}/session/v1/login-request"))
            .query(&[
                ("databaseName", credentials.database.as_str()),
                ("schemaName", credentials.schema.as_str()),
                ("warehouse", credentials.warehouse.as_str()),
                ("roleName", credentials.role.as_str()),
                ("request_id", request_id.as_str()),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(WarehouseError::Connection)?;

        if !response.status().is_success() {
            return Err(WarehouseError::Http(response.status()));
        }

        let envelope: Envelope<LoginResponseData> = response
            .json()
            .await
            .map_err(|e| WarehouseError::Protocol(format!("login response: {e}")))?;

        if !envelope.success {
            return Err(WarehouseError::Authentication {
                code: envelope.code(),
            });
        }
        let token = envelope
            .data
            .map(|d| d.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| WarehouseError::Protocol("login response has no token".into()))?;

        tracing::info!(
            account = %credentials.account,
            role = %credentials.role,
            warehouse = %credentials.warehouse,
            "Warehouse session opened"
        );

        Ok(Self {
            http,
            base_url,
            token: Zeroizing::new(token),
            sequence: AtomicU64::new(0),
        })
    }

    /// Run one statement synchronously and collect its inline rows
    pub async fn run(&self, statement: &Statement) -> Result<RowSet, WarehouseError> {
        let body = QueryRequest {
            sql_text: statement.sql(),
            async_exec: false,
            sequence_id: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            query_submission_time: chrono::Utc::now().timestamp_millis(),
            bindings: wire_bindings(statement.binds()),
        };

        let response = self
            .http
            .post(format!("{}/queries/v1/query-request", self.base_url))
            .query(&[("requestId", Uuid::new_v4().to_string())])
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(WarehouseError::Connection)?;

        let status = response.status();
        if status == http::StatusCode::UNAUTHORIZED {
            return Err(WarehouseError::SessionExpired);
        }
        if !status.is_success() {
            return Err(WarehouseError::Http(status));
        }

        let envelope: Envelope<QueryResponseData> = response
            .json()
            .await
            .map_err(|e| WarehouseError::Protocol(format!("query response: {e}")))?;

        if !envelope.success {
            let code = envelope.code();
            if SESSION_EXPIRED_CODES.contains(&code.as_str()) {
                return Err(WarehouseError::SessionExpired);
            }
            return Err(WarehouseError::Query {
                code,
                message: envelope.message.unwrap_or_default(),
            });
        }

        let data = envelope.data.unwrap_or(QueryResponseData {
            rowtype: Vec::new(),
            rowset: Vec::new(),
        });
        Ok(RowSet {
            columns: data.rowtype.into_iter().map(|c| c.name).collect(),
            rows: data.rowset,
        })
    }

    /// End the session on the server side
    pub async fn close(&self) -> Result<(), WarehouseError> {
        let request_id = Uuid::new_v4().to_string();
        let response = self
            .http
            .post(format!("{}/session", self.base_url))
            .query(&[("delete", "true"), ("request_id", request_id.as_str())])
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(WarehouseError::Connection)?;

        if !response.status().is_success() {
            return Err(WarehouseError::Http(response.status()));
        }
        tracing::info!("Warehouse session closed");
        Ok(())
    }

    fn auth_header(&self) -> String {
        format!("Snowflake Token=\"{}\"", self.token.as_str())
    }
}

/// `xy12345.eu-west-1` logs in as account `xy12345`
fn account_locator(account: &str) -> &str {
    account.split('.').next().unwrap_or(account)
}

/// Positional bindings keyed "1", "2", ...
fn wire_bindings(binds: &[BindValue]) -> BTreeMap<String, WireBinding<'_>> {
    binds
        .iter()
        .enumerate()
        .map(|(i, bind)| {
            let binding = match bind {
                BindValue::Text(value) => WireBinding {
                    kind: "TEXT",
                    value: value.as_str(),
                },
            };
            ((i + 1).to_string(), binding)
        })
        .collect()
}
