#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use notes_api::config::AppConfig;
use notes_api::store::MemoryStore;
use notes_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

/// Full router over a fresh in-memory store.
pub fn test_app() -> Router {
    let config = AppConfig::for_memory_store(SECRET);
    let state = AppState::new(config, Arc::new(MemoryStore::new())).expect("valid test state");
    app(state)
}

/// Sends one request through the router and decodes the JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Creates an account and returns its access token.
pub async fn sign_up(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/create-account",
        None,
        Some(json!({ "fullName": "Test User", "email": email, "password": "secret-pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "sign-up failed: {}", body);
    body["accessToken"].as_str().expect("accessToken").to_string()
}

/// Adds a note and returns the created note object.
pub async fn add_note(app: &Router, token: &str, title: &str, content: &str, tags: &[&str]) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/add-note",
        Some(token),
        Some(json!({ "title": title, "content": content, "tags": tags })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add-note failed: {}", body);
    body["note"].clone()
}

/// The built binary running with the in-memory store on a free port.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_notes-api"))
            .env("NOTES_API_PORT", port.to_string())
            .env("NOTES_STORE", "memory")
            .env("APP_ENV", "development")
            .env("ACCESS_TOKEN_SECRET", SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawns the server and waits for /health; the process is killed on drop.
pub async fn spawn_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
