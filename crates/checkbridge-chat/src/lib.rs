//! checkbridge-chat: incoming-webhook delivery of chat cards
//!
//! Posts rendered cards to a chat space webhook. The thread key is passed as
//! the `threadKey` query parameter so every card of one pull request lands in
//! the same conversation thread.

use async_trait::async_trait;
use checkbridge_core::{ChatSink, Message, NotifierError, NotifierResult, ThreadKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

const SERVICE: &str = "chat webhook";

/// Webhook configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Full webhook URL including its key/token query parameters
    pub url: String,
}

impl WebhookConfig {
    pub fn new(url: &str) -> Self {
        WebhookConfig {
            url: url.to_string(),
        }
    }
}

// The webhook URL embeds credentials; keep it out of debug output.
impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("url", &"<redacted>")
            .finish()
    }
}

fn http_error(err: reqwest::Error) -> NotifierError {
    if err.is_decode() {
        NotifierError::Decode(err.to_string())
    } else {
        // Strip the URL: it carries the webhook token.
        NotifierError::Network(err.without_url().to_string())
    }
}

/// Chat webhook client
#[derive(Debug, Clone)]
pub struct WebhookClient {
    config: WebhookConfig,
    http_client: reqwest::Client,
}

impl WebhookClient {
    /// Create a new webhook client
    pub fn new(config: WebhookConfig) -> NotifierResult<Self> {
        if config.url.is_empty() {
            return Err(NotifierError::Config("Chat webhook URL is empty".to_string()));
        }
        let http_client = reqwest::Client::builder()
            .user_agent(format!("checkbridge/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NotifierError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(WebhookClient {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl ChatSink for WebhookClient {
    async fn send(&self, thread_key: &ThreadKey, message: &Message) -> NotifierResult<Message> {
        let mut request = self.http_client.post(&self.config.url).json(message);
        if !thread_key.as_str().is_empty() {
            request = request.query(&[("threadKey", thread_key.as_str())]);
        }

        let response = request.send().await.map_err(http_error)?;
        let status = response.status();
        let body = response.text().await.map_err(http_error)?;

        if !status.is_success() {
            return Err(NotifierError::Transport {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let ack: Message = serde_json::from_str(&body)?;
        debug!(thread_key = %thread_key, message_name = %ack.name, "Webhook accepted message");
        Ok(ack)
    }
}
