use std::time::Duration;

use {
    async_trait::async_trait,
    herald_channels::escape::query_escape,
    serde::Deserialize,
    tracing::debug,
};

use crate::error::{Error, Result};

/// Per-call timeout for Bot API requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound Bot API calls.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Send `text` (HTML parse mode, no link previews) to `chat_id`.
    async fn send_message(&self, token: &str, chat_id: i64, text: &str) -> Result<()>;
}

/// Bot API client over HTTPS.
pub struct HttpBotApi {
    http: reqwest::Client,
    base_url: String,
}

/// Error body returned by the Bot API.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    description: String,
}

impl HttpBotApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn send_message_url(&self, token: &str, chat_id: i64, text: &str) -> String {
        format!(
            "{}/bot{token}/sendMessage?chat_id={chat_id}&parse_mode=html&disable_web_page_preview=true&text={}",
            self.base_url,
            query_escape(text)
        )
    }
}

#[async_trait]
impl BotApi for HttpBotApi {
    async fn send_message(&self, token: &str, chat_id: i64, text: &str) -> Result<()> {
        let url = self.send_message_url(token, chat_id, text);
        // The URL embeds the bot token; keep it out of error messages.
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = resp.status();
        debug!(chat_id, status = status.as_u16(), "telegram sendMessage response");
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.description)
            .unwrap_or(body);
        Err(Error::Api {
            status: status.as_u16(),
            description,
        })
    }
}
