//! Fakes shared by the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use serde_json::{Value, json};
use smoothie_server::AppState;
use smoothie_server::db::fruit_options::SELECT_FRUIT_OPTIONS;
use smoothie_server::db::orders::INSERT_ORDER;
use smoothie_server::metadata::MetadataClient;
use smoothie_server::secrets::WarehouseCredentials;
use smoothie_server::warehouse::{BindValue, RowSet, Statement, Warehouse, WarehouseError};
use tracing_subscriber::EnvFilter;

pub const FRUITS: [&str; 6] = ["Apples", "Blueberries", "Kiwi", "Mango", "Peach", "Strawberries"];

/// Bind a router to an ephemeral local port
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A port nothing listens on
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/fruit/watermelon")
}

// ── Log capture ──

/// Buffer the fmt subscriber writes into
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Lines emitted at `level`, e.g. "WARN"
    pub fn at_level(&self, level: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.trim_start().starts_with(level))
            .collect()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Send this thread's events from the service crates into `buffer`
pub fn capture_logs(buffer: &LogBuffer) -> tracing::subscriber::DefaultGuard {
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("smoothie_server=trace,shared=trace"))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::set_default(subscriber)
}

// ── In-memory warehouse ──

/// Orders table kept in memory; every statement is recorded
#[derive(Default)]
pub struct FakeWarehouse {
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    statements: Mutex<Vec<Statement>>,
    orders: Mutex<Vec<(String, String)>>,
}

impl FakeWarehouse {
    pub fn orders(&self) -> Vec<(String, String)> {
        self.orders.lock().unwrap().clone()
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl Warehouse for FakeWarehouse {
    async fn query(&self, statement: &Statement) -> Result<RowSet, WarehouseError> {
        self.statements.lock().unwrap().push(statement.clone());
        match statement.sql() {
            SELECT_FRUIT_OPTIONS => {
                if self.fail_reads.load(Ordering::SeqCst) {
                    return Err(WarehouseError::Query {
                        code: "002003".into(),
                        message: "Object 'FRUIT_OPTIONS' does not exist".into(),
                    });
                }
                Ok(RowSet {
                    columns: vec!["FRUIT_NAME".into()],
                    rows: FRUITS.iter().map(|f| vec![Some(f.to_string())]).collect(),
                })
            }
            INSERT_ORDER => {
                if self.fail_writes.load(Ordering::SeqCst) {
                    return Err(WarehouseError::Query {
                        code: "100072".into(),
                        message: "NULL result in a non-nullable column".into(),
                    });
                }
                let [BindValue::Text(ingredients), BindValue::Text(name)] = statement.binds()
                else {
                    return Err(WarehouseError::Protocol("expected two binds".into()));
                };
                self.orders
                    .lock()
                    .unwrap()
                    .push((ingredients.clone(), name.clone()));
                Ok(RowSet {
                    columns: vec!["number of rows inserted".into()],
                    rows: vec![vec![Some("1".into())]],
                })
            }
            other => Err(WarehouseError::Protocol(format!("unexpected statement {other}"))),
        }
    }
}

// ── Fruit metadata ──

pub async fn spawn_metadata() -> String {
    let router = Router::new().route(
        "/api/fruit/watermelon",
        get(|| async {
            axum::Json(json!({
                "name": "Watermelon",
                "family": "Cucurbitaceae",
                "nutritions": { "calories": 30, "sugar": 6.0 }
            }))
        }),
    );
    let addr = spawn(router).await;
    format!("http://{addr}/api/fruit/watermelon")
}

pub fn app_state(warehouse: Arc<FakeWarehouse>, metadata_url: String) -> AppState {
    AppState::from_parts(
        warehouse,
        MetadataClient::new(reqwest::Client::new(), metadata_url),
    )
}

// ── Snowflake REST endpoint ──

/// Minimal connector endpoint: one token per login, recorded requests
#[derive(Default)]
pub struct MockSnowflake {
    pub logins: AtomicUsize,
    pub login_requests: Mutex<Vec<RecordedLogin>>,
    pub closes: AtomicUsize,
    /// Reject the next statement as if the session had expired
    pub expire_next: AtomicBool,
    pub reject_login: AtomicBool,
    pub queries: Mutex<Vec<RecordedQuery>>,
}

#[derive(Debug, Clone)]
pub struct RecordedLogin {
    pub params: HashMap<String, String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub authorization: String,
    pub body: Value,
}

impl MockSnowflake {
    pub fn login_requests(&self) -> Vec<RecordedLogin> {
        self.login_requests.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().unwrap().clone()
    }
}

pub async fn spawn_snowflake(mock: Arc<MockSnowflake>) -> SocketAddr {
    let router = Router::new()
        .route("/session/v1/login-request", post(login))
        .route("/queries/v1/query-request", post(query))
        .route("/session", post(close))
        .with_state(mock);
    spawn(router).await
}

async fn login(
    State(mock): State<Arc<MockSnowflake>>,
    Query(params): Query<HashMap<String, String>>,
    axum::Json(body): axum::Json<Value>,
) -> axum::Json<Value> {
    mock.login_requests.lock().unwrap().push(RecordedLogin {
        params,
        body: body.clone(),
    });
    if mock.reject_login.load(Ordering::SeqCst) || body["data"]["PASSWORD"] != "hunter2" {
        return axum::Json(json!({
            "success": false,
            "code": "390100",
            "message": "Incorrect username or password was specified.",
            "data": null
        }));
    }
    let n = mock.logins.fetch_add(1, Ordering::SeqCst) + 1;
    axum::Json(json!({
        "success": true,
        "code": null,
        "message": null,
        "data": { "token": format!("token-{n}"), "masterToken": "master" }
    }))
}

async fn query(
    State(mock): State<Arc<MockSnowflake>>,
    headers: http::HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> axum::Json<Value> {
    let authorization = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    mock.queries.lock().unwrap().push(RecordedQuery {
        authorization,
        body: body.clone(),
    });

    if mock.expire_next.swap(false, Ordering::SeqCst) {
        return axum::Json(json!({
            "success": false,
            "code": "390112",
            "message": "Your session has expired. Please login again.",
            "data": null
        }));
    }

    let sql = body["sqlText"].as_str().unwrap_or_default();
    let data = if sql.starts_with("INSERT") {
        json!({
            "rowtype": [{ "name": "number of rows inserted" }],
            "rowset": [["1"]]
        })
    } else {
        json!({
            "rowtype": [{ "name": "FRUIT_NAME" }],
            "rowset": [["Apples"], ["Kiwi"], [null], ["Mango"]]
        })
    };
    axum::Json(json!({ "success": true, "code": null, "message": null, "data": data }))
}

async fn close(
    State(mock): State<Arc<MockSnowflake>>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::Json<Value> {
    if params.get("delete").map(String::as_str) == Some("true") {
        mock.closes.fetch_add(1, Ordering::SeqCst);
    }
    axum::Json(json!({ "success": true, "code": null, "message": null, "data": null }))
}

pub fn credentials_for(addr: SocketAddr, password: &str) -> WarehouseCredentials {
    WarehouseCredentials::from_toml_str(&format!(
        r#"
        [connections.snowflake]
        account = "xy12345"
        user = "SMOOTHIES"
        password = "{password}"
        role = "SYSADMIN"
        warehouse = "COMPUTE_WH"
        database = "SMOOTHIES"
        schema = "PUBLIC"
        host = "{ip}"
        port = {port}
        protocol = "http"
        client_session_keep_alive = true
        "#,
        ip = addr.ip(),
        port = addr.port(),
    ))
    .unwrap()
}
