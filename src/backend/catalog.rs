// src/backend/catalog.rs

use serde_json::{Map, Value};

use crate::backend::{BackendClient, ensure_success};
use crate::catalog::ModelCatalog;
use crate::errors::{Result, TiacherError};

impl BackendClient {
    /// `GET /models/all`: display name to identifier, in backend order.
    pub async fn list_models(&self, token: &str) -> Result<ModelCatalog> {
        let resp = ensure_success(self.get("/models/all", token).send().await?).await?;
        let raw: Map<String, Value> = resp.json().await?;

        let pairs = raw
            .into_iter()
            .map(|(name, value)| match value {
                Value::String(id) => Ok((name, id)),
                other => Err(TiacherError::UnexpectedResponse(format!(
                    "model '{}' has a non-string identifier: {}",
                    name, other
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ModelCatalog::from_pairs(pairs))
    }
}
