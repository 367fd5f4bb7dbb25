use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::auth::{IdentityVerifier, JwtVerifier};
use crate::config::{AppConfig, StoreBackend};
use crate::database::{DatabaseManager, DocumentStore, MemoryDocumentStore, PgDocumentStore};

/// Dependencies shared by every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { store, verifier }
    }

    /// Connect the configured store and identity verifier. Failures are fatal
    /// to startup and are returned to the caller rather than logged away.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let verifier = JwtVerifier::from_config(&config.identity)
            .context("identity provider configuration")?;

        let store: Arc<dyn DocumentStore> = match config.database.backend {
            StoreBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database)
                    .await
                    .context("failed to connect to the document store")?;
                Arc::new(PgDocumentStore::new(pool))
            }
            StoreBackend::Memory => {
                info!("Using in-memory document store; data will not survive a restart");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        Ok(Self::new(store, Arc::new(verifier)))
    }
}
