#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use minna_style_hub::config::{AppConfig, SecurityConfig};
use minna_style_hub::database::MemoryItemStore;
use minna_style_hub::services::{MailError, Mailer, OutboundMail};
use minna_style_hub::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const ADMIN_USERNAME: &str = "minna";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const FEEDBACK_INBOX: &str = "owner@minna.example";

/// Captures outbound mail; optionally fails the n-th send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutboundMail>>,
    pub fail_on: Option<usize>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        let mut sent = self.sent.lock().await;
        if self.fail_on == Some(sent.len()) {
            return Err(MailError::InvalidEndpoint("relay unavailable".to_string()));
        }
        sent.push(mail);
        Ok(())
    }
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryItemStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development(SecurityConfig::new(
        JWT_SECRET,
        ADMIN_USERNAME,
        ADMIN_PASSWORD,
    ));
    config.mail.feedback_inbox = FEEDBACK_INBOX.to_string();
    config
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(MemoryItemStore::new(), RecordingMailer::default()).await
}

/// Serve the real router on a free port, backed by the given store and mailer.
pub async fn spawn_server_with(store: MemoryItemStore, mailer: RecordingMailer) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(store);
    let mailer = Arc::new(mailer);
    let state = AppState::new(test_config(), store.clone(), mailer.clone())?;

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    Ok(TestServer { port, base_url, store, mailer })
}

pub async fn login(server: &TestServer) -> Result<String> {
    let res = reqwest::Client::new()
        .post(server.url("/login"))
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .send()
        .await?;
    anyhow::ensure!(res.status().is_success(), "login failed with {}", res.status());

    let body = res.json::<Value>().await?;
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("login response has no token")
}

pub fn item_body(n: usize) -> Value {
    json!({
        "title": format!("Item {}", n),
        "text": "Hand-finished linen",
        "brand": "Minna",
        "images": [format!("https://cdn.minna.example/{}.jpg", n)],
        "buttonLink": format!("https://shop.minna.example/items/{}", n)
    })
}
