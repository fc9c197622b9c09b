// src/backend/admin.rs

use log::info;
use serde::Serialize;
use serde_json::Map;

use crate::backend::{BackendClient, ensure_success};
use crate::errors::Result;
use crate::models::{Role, User};

#[derive(Serialize)]
struct RoleChange<'a> {
    rol: &'a Role,
}

impl BackendClient {
    /// `GET /admin/users`; the backend keys rows by a numeric string.
    pub async fn list_users(&self, token: &str) -> Result<Vec<User>> {
        let resp = ensure_success(self.get("/admin/users", token).send().await?).await?;
        let raw: Map<String, serde_json::Value> = resp.json().await?;
        let users = raw
            .into_values()
            .map(serde_json::from_value::<User>)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// `PUT /admin/users/{id}/rol`.
    pub async fn change_role(&self, token: &str, user_id: u64, role: &Role) -> Result<()> {
        info!("Changing role of user {} to {}", user_id, role);
        let resp = self
            .put(&format!("/admin/users/{}/rol", user_id), token)
            .json(&RoleChange { rol: role })
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }
}
