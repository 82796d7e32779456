//! Warehouse access
//!
//! [`Warehouse`] is the seam between the order workflow and the remote
//! store. Statements carry their bind values next to the SQL text, never
//! inside it; every implementation must send them out-of-band.

pub mod provider;
pub mod snowflake;

use std::borrow::Cow;

use async_trait::async_trait;
use thiserror::Error;

pub use provider::SessionProvider;
pub use snowflake::SnowflakeSession;

/// A SQL statement with positional (`?`) bind values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: Cow<'static, str>,
    binds: Vec<BindValue>,
}

impl Statement {
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    /// Append the next positional bind value
    pub fn bind(mut self, value: impl Into<BindValue>) -> Self {
        self.binds.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }
}

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

/// Rows returned by a statement; every cell arrives as text or NULL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    /// Position of a column, compared case-insensitively
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Non-null values of one column, in row order
    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(move |row| row.get(idx).and_then(|v| v.as_deref())),
        )
    }

    /// Sum of the numeric cells of the first row (DML row counts)
    pub fn affected_rows(&self) -> u64 {
        self.rows
            .first()
            .map(|row| {
                row.iter()
                    .filter_map(|v| v.as_deref().and_then(|s| s.parse::<u64>().ok()))
                    .sum()
            })
            .unwrap_or(0)
    }
}

/// Warehouse failure
///
/// Display strings are for logs and never include bind values or
/// credentials. `Query::message` is the warehouse's own text and may quote
/// bound values, so Display leaves it out.
#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("warehouse unreachable: {0}")]
    Connection(#[source] reqwest::Error),
    #[error("warehouse rejected the login (code {code})")]
    Authentication { code: String },
    #[error("warehouse session expired")]
    SessionExpired,
    #[error("warehouse returned HTTP {0}")]
    Http(http::StatusCode),
    #[error("statement failed (code {code})")]
    Query { code: String, message: String },
    #[error("unexpected warehouse response: {0}")]
    Protocol(String),
}

impl WarehouseError {
    /// True when no session could be established at all
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            WarehouseError::Connection(_) | WarehouseError::Authentication { .. }
        )
    }
}

/// Remote tabular store used by the order workflow
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Run a statement and return its rows
    async fn query(&self, statement: &Statement) -> Result<RowSet, WarehouseError>;

    /// Run a DML statement and return the number of affected rows
    async fn execute(&self, statement: &Statement) -> Result<u64, WarehouseError> {
        Ok(self.query(statement).await?.affected_rows())
    }

    /// Release the session; called once at shutdown
    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_keeps_binds_out_of_sql() {
        let stmt = Statement::new("INSERT INTO t (a, b) VALUES (?, ?)")
            .bind("x'); DROP TABLE t; --")
            .bind(String::from("Alice"));
        assert_eq!(stmt.sql(), "INSERT INTO t (a, b) VALUES (?, ?)");
        assert_eq!(
            stmt.binds(),
            &[
                BindValue::Text("x'); DROP TABLE t; --".into()),
                BindValue::Text("Alice".into()),
            ]
        );
    }

    #[test]
    fn test_column_values_skip_nulls() {
        let rows = RowSet {
            columns: vec!["FRUIT_NAME".into()],
            rows: vec![
                vec![Some("Apples".into())],
                vec![None],
                vec![Some("Kiwi".into())],
            ],
        };
        let values: Vec<&str> = rows.column_values("fruit_name").unwrap().collect();
        assert_eq!(values, vec!["Apples", "Kiwi"]);
        assert!(rows.column_values("MISSING").is_none());
    }

    #[test]
    fn test_affected_rows_from_dml_result() {
        let rows = RowSet {
            columns: vec!["number of rows inserted".into()],
            rows: vec![vec![Some("1".into())]],
        };
        assert_eq!(rows.affected_rows(), 1);
        assert_eq!(RowSet::default().affected_rows(), 0);
    }

    #[test]
    fn test_connection_errors() {
        let rejected = WarehouseError::Authentication {
            code: "390100".into(),
        };
        assert!(rejected.is_connection_error());
        assert!(!WarehouseError::SessionExpired.is_connection_error());
        assert!(!WarehouseError::Protocol("x".into()).is_connection_error());
    }

    #[test]
    fn test_query_error_display_omits_warehouse_text() {
        let err = WarehouseError::Query {
            code: "100072".into(),
            message: "NULL result in a non-nullable column 'O''Brien'".into(),
        };
        assert_eq!(err.to_string(), "statement failed (code 100072)");
    }
}
