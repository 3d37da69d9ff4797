//! Shared harness for HTTP integration tests.
//!
//! Starts the real server wiring (`lifecycle::bootstrap` + `run_for_tests`)
//! against an isolated RocksDB directory on an ephemeral port, so every test
//! exercises the same stack production runs.

use anyhow::Result;
use projeta::config::ServerConfig;
use projeta::lifecycle::{self, RunningTestServer};
use serde_json::{json, Value};

/// A running server instance with an isolated data directory.
pub struct TestServer {
    _temp_dir: tempfile::TempDir,
    pub base_url: String,
    pub client: reqwest::Client,
    running: RunningTestServer,
}

impl TestServer {
    /// Full URL for an API path, e.g. `server.url("/projects")`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/v1/api{}", self.base_url, path)
    }

    pub async fn shutdown(self) {
        self.running.shutdown().await;
    }
}

/// Boot a fresh server for one test.
pub async fn start_test_server() -> Result<TestServer> {
    // The bootstrap admin password must be the known default for assertions
    std::env::remove_var("PROJETA_ADMIN_PASSWORD");

    let temp_dir = tempfile::TempDir::new()?;

    let mut config = ServerConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.workers = 1;
    config.storage.rocksdb_path = temp_dir
        .path()
        .join("rocksdb")
        .to_string_lossy()
        .into_owned();

    let app_context = lifecycle::bootstrap(&config).await?;
    let running = lifecycle::run_for_tests(&config, app_context).await?;
    let base_url = running.base_url.clone();

    Ok(TestServer {
        _temp_dir: temp_dir,
        base_url,
        client: reqwest::Client::new(),
        running,
    })
}

/// Register a user through the public endpoint and log them in.
///
/// Returns the bearer token and the new user's id.
#[allow(dead_code)]
pub async fn register_and_login(
    server: &TestServer,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<(String, i64)> {
    let resp = server
        .client
        .post(server.url("/auth/register"))
        .json(&json!({ "name": name, "email": email, "password": password, "role": role }))
        .send()
        .await?;
    anyhow::ensure!(
        resp.status().as_u16() == 201,
        "register {} failed: {}",
        email,
        resp.status()
    );
    let user: Value = resp.json().await?;
    let user_id = user["id"].as_i64().expect("registered user id");

    let token = login(server, email, password).await?;
    Ok((token, user_id))
}

/// Log in and return the bearer token.
#[allow(dead_code)]
pub async fn login(server: &TestServer, email: &str, password: &str) -> Result<String> {
    let resp = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(
        resp.status().is_success(),
        "login {} failed: {}",
        email,
        resp.status()
    );
    let body: Value = resp.json().await?;
    Ok(body["accessToken"]
        .as_str()
        .expect("accessToken in login response")
        .to_string())
}

/// Create a project as the given caller and return its id.
#[allow(dead_code)]
pub async fn create_project(server: &TestServer, token: &str, name: &str) -> Result<i64> {
    let resp = server
        .client
        .post(server.url("/projects"))
        .bearer_auth(token)
        .json(&json!({ "name": name, "description": "integration", "status": "active" }))
        .send()
        .await?;
    anyhow::ensure!(
        resp.status().as_u16() == 201,
        "create project failed: {}",
        resp.status()
    );
    let body: Value = resp.json().await?;
    Ok(body["id"].as_i64().expect("project id"))
}
