//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use attend_api::{create_app, create_memory_app_state, AppState};
use attend_common::AppConfig;
use attend_core::value_objects::SystemClock;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Export key configured on every test server
pub const TEST_EXPORT_KEY: &str = "integration-export-key";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Shared with the running app, for seeding
    pub state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server on fresh in-memory tables
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_memory_app_state(config, Arc::new(SystemClock))?;
        let app = create_app(state.clone());

        // Port 0 lets the OS pick a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with a session cookie
    pub async fn get_session(&self, path: &str, session: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .header("Cookie", format!("session={session}"))
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with JSON body and a session cookie
    pub async fn post_session<T: Serialize>(
        &self,
        path: &str,
        session: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("Cookie", format!("session={session}"))
            .json(body)
            .send()
            .await?)
    }
}

/// Development configuration with fixed secrets and the test export key
pub fn test_config() -> Result<AppConfig> {
    test_config_with(&[])
}

/// [`test_config`] with extra or overriding variables
pub fn test_config_with(extra: &[(&'static str, &'static str)]) -> Result<AppConfig> {
    let mut vars: HashMap<&str, &str> = HashMap::from([
        ("APP_ENV", "development"),
        ("SESSION_SECRET", "integration-session-secret"),
        ("QR_SECRET", "integration-qr-secret"),
        ("EXPORT_API_KEY", TEST_EXPORT_KEY),
    ]);
    vars.extend(extra.iter().copied());

    AppConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()))
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}

/// Header value as a string, if present
pub fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
