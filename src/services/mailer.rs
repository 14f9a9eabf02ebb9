use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay rejected message with status {0}")]
    Rejected(StatusCode),

    #[error("invalid mail relay url: {0}")]
    InvalidEndpoint(String),
}

/// Image embedded in an HTML body and referenced as `cid:<content_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineImage {
    pub content_id: String,
    pub content_type: String,
    /// Base64 (standard alphabet, padded)
    pub data: String,
}

impl InlineImage {
    pub fn png(content_id: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            content_id: content_id.into(),
            content_type: "image/png".to_string(),
            data: STANDARD.encode(bytes),
        }
    }
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub html: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inline_images: Vec<InlineImage>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError>;
}

/// Delivers mail by posting JSON to an HTTP relay.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(endpoint: &str, api_key: Option<String>) -> Result<Self, MailError> {
        let endpoint = Url::parse(endpoint).map_err(|_| MailError::InvalidEndpoint(endpoint.to_string()))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        let mut request = self.client.post(self.endpoint.clone()).json(&mail);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status()));
        }
        Ok(())
    }
}

/// Logs messages instead of sending them. Used when no relay is configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        info!(to = %mail.to, subject = %mail.subject, "mail relay not configured, message logged only");
        Ok(())
    }
}
