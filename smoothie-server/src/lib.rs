//! smoothie-server: customer-facing smoothie order form
//!
//! - **Warehouse** (`warehouse`): Snowflake REST session shared by all requests
//! - **Orders** (`order`, `db`): fruit catalog, bounded selection, parameterized insert
//! - **Metadata** (`metadata`): fruityvice lookup shown under the form
//! - **HTTP** (`api`): HTML form plus a JSON API

pub mod api;
pub mod config;
pub mod db;
pub mod metadata;
pub mod order;
pub mod secrets;
pub mod state;
pub mod warehouse;

pub use config::{Config, ConfigError};
pub use state::{AppState, BoxError};
