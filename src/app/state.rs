// src/app/state.rs
use reqwest::Client;

use crate::backend::BackendClient;
use crate::config::ClientConfig;
use crate::errors::Result;
use crate::session::{FileStorage, Session};

pub struct AppState {
    pub backend: BackendClient,
    pub session: Session,
}

impl AppState {
    /// State backed by the session file under `config.storage_dir`.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let storage = FileStorage::open(&config.storage_dir).await?;
        Ok(Self::with_session(config, Session::new(storage)))
    }

    pub fn with_session(config: ClientConfig, session: Session) -> Self {
        Self {
            backend: BackendClient::new(Client::new(), config),
            session,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.backend.config()
    }
}
