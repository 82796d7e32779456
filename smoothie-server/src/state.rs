//! Application state for smoothie-server

use std::sync::Arc;

use crate::config::Config;
use crate::metadata::MetadataClient;
use crate::secrets::WarehouseCredentials;
use crate::warehouse::{SessionProvider, Warehouse};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Order store; one session shared by every request
    pub warehouse: Arc<dyn Warehouse>,
    /// Fruit metadata endpoint
    pub metadata: MetadataClient,
}

impl AppState {
    /// Create a new AppState
    ///
    /// Unreadable or incomplete credentials stop startup. A failed login
    /// does not: the provider retries on the first request.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let credentials = WarehouseCredentials::load(&config.secrets_path)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("smoothie-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let provider = SessionProvider::new(http.clone(), credentials);
        if let Err(e) = provider.connect().await {
            tracing::error!(error = %e, "Warehouse connection failed, will retry on first use");
        }

        Ok(Self::from_parts(
            Arc::new(provider),
            MetadataClient::new(http, config.fruityvice_url.clone()),
        ))
    }

    pub fn from_parts(warehouse: Arc<dyn Warehouse>, metadata: MetadataClient) -> Self {
        Self {
            warehouse,
            metadata,
        }
    }
}
