// src/backend/auth.rs

use log::{error, info};
use serde::{Deserialize, Deserializer, Serialize};

use crate::backend::{BackendClient, is_json};
use crate::errors::{Result, TiacherError, backend_message};
use crate::models::AccessLevel;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";

#[derive(Serialize)]
struct LoginRequest<'a> {
    mail: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    #[serde(rename = "nombre")]
    name: &'a str,
    password: &'a str,
    mail: &'a str,
}

/// Body of a successful `POST /login`.
#[derive(Deserialize, Debug, Clone)]
pub struct LoginResponse {
    #[serde(default)]
    pub logged: bool,
    #[serde(default, deserialize_with = "access_level")]
    pub access: AccessLevel,
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Accepts `2` as well as `"2"`.
fn access_level<'de, D>(deserializer: D) -> std::result::Result<AccessLevel, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let level = match &value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Null => Some(0),
        _ => None,
    };
    level
        .map(AccessLevel)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid access level: {}", value)))
}

impl BackendClient {
    /// `POST /login`. Non-JSON replies are rejected before the status is looked at.
    pub async fn login(&self, mail: &str, password: &str) -> Result<LoginResponse> {
        info!("Logging in as {}", mail);
        let resp = self
            .post("/login")
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&LoginRequest { mail, password })
            .send()
            .await?;

        if !is_json(&resp) {
            let text = resp.text().await.unwrap_or_default();
            error!("Non-JSON login response: {}", text);
            return Err(TiacherError::UnexpectedResponse(
                "The server did not return a valid JSON response".to_string(),
            ));
        }

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(TiacherError::ApiError {
                status: status.as_u16(),
                message: backend_message(&body).unwrap_or_else(|| INVALID_CREDENTIALS.to_string()),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// `POST /register`.
    pub async fn register(&self, name: &str, mail: &str, password: &str) -> Result<()> {
        info!("Registering {}", mail);
        let resp = self
            .post("/register")
            .json(&RegisterRequest { name, password, mail })
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(TiacherError::ApiError {
            status: status.as_u16(),
            message: backend_message(&body).unwrap_or_else(|| REGISTER_FAILED.to_string()),
        })
    }
}
