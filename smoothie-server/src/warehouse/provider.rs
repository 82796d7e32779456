//! Process-wide warehouse session owner
//!
//! One session is opened at startup and reused by every request. When the
//! warehouse reports the session expired (or startup could not connect),
//! the provider logs in again and reissues the statement once. An expired
//! session rejects the statement before running it, so the reissue cannot
//! duplicate a write. Any other failure is returned as-is.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RowSet, SnowflakeSession, Statement, Warehouse, WarehouseError};
use crate::secrets::WarehouseCredentials;

pub struct SessionProvider {
    http: reqwest::Client,
    credentials: WarehouseCredentials,
    session: RwLock<Option<Arc<SnowflakeSession>>>,
}

impl SessionProvider {
    pub fn new(http: reqwest::Client, credentials: WarehouseCredentials) -> Self {
        Self {
            http,
            credentials,
            session: RwLock::new(None),
        }
    }

    /// Open the session eagerly so startup reports bad credentials
    pub async fn connect(&self) -> Result<(), WarehouseError> {
        self.current().await.map(|_| ())
    }

    /// Whether a session is currently held
    pub async fn is_connected(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn current(&self) -> Result<Arc<SnowflakeSession>, WarehouseError> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.clone());
        }

        let mut slot = self.session.write().await;
        // Another request may have connected while we waited for the lock
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }
        let session = Arc::new(
            SnowflakeSession::connect(self.http.clone(), &self.credentials).await?,
        );
        *slot = Some(session.clone());
        Ok(session)
    }

    /// Replace `stale` with a fresh session unless someone already did
    async fn reconnect(
        &self,
        stale: &Arc<SnowflakeSession>,
    ) -> Result<Arc<SnowflakeSession>, WarehouseError> {
        let mut slot = self.session.write().await;
        if let Some(session) = slot.as_ref() {
            if !Arc::ptr_eq(session, stale) {
                return Ok(session.clone());
            }
        }
        *slot = None;
        tracing::warn!("Warehouse session expired, reconnecting");
        let session = Arc::new(
            SnowflakeSession::connect(self.http.clone(), &self.credentials).await?,
        );
        *slot = Some(session.clone());
        Ok(session)
    }
}

#[async_trait]
impl Warehouse for SessionProvider {
    async fn query(&self, statement: &Statement) -> Result<RowSet, WarehouseError> {
        let session = self.current().await?;
        match session.run(statement).await {
            Err(WarehouseError::SessionExpired) => {
                let fresh = self.reconnect(&session).await?;
                fresh.run(statement).await
            }
            other => other,
        }
    }

    async fn close(&self) {
        let Some(session) = self.session.write().await.take() else {
            return;
        };
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "Failed to close warehouse session");
        }
    }
}
