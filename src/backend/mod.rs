// src/backend/mod.rs

use log::debug;
use reqwest::{Client, RequestBuilder, Response};

use crate::config::ClientConfig;
use crate::errors::{Result, TiacherError};

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod exams;

/// HTTP client for the exam-generation backend.
///
/// One method per endpoint, spread over the submodules. Every call is a
/// single request: nothing is retried and nothing is cached.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    config: ClientConfig,
}

impl BackendClient {
    /// Creates a new `BackendClient`.
    pub fn new(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    fn get(&self, path: &str, token: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("GET {}", url);
        self.client.get(url).bearer_auth(token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("POST {}", url);
        self.client.post(url)
    }

    fn put(&self, path: &str, token: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("PUT {}", url);
        self.client.put(url).bearer_auth(token)
    }
}

/// Passes successful responses through and turns the rest into `ApiError`.
async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    debug!("Backend response status: {}", status);
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error body".to_string());
    Err(TiacherError::from_response_body(status, &body))
}

fn is_json(resp: &Response) -> bool {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}
