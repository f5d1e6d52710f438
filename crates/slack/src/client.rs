use std::time::Duration;

use {
    async_trait::async_trait,
    herald_channels::escape::{query_escape, query_escape_percent_spaces},
    serde::Deserialize,
    tracing::debug,
};

use crate::error::{Error, Result};

/// Per-call timeout for Web API requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound Slack Web API calls.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Post `text` to `user` as the token's own user.
    async fn post_message(&self, token: &str, user: &str, text: &str) -> Result<()>;
}

/// `chat.postMessage` response envelope.
#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Slack Web API client over HTTPS.
pub struct HttpChatApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChatApi {
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

    fn post_message_url(&self, user: &str, text: &str) -> String {
        // chat.postMessage wants spaces in `text` as %20 rather than `+`.
        format!(
            "{}/api/chat.postMessage?channel={}&as_user=true&unfurl_links=true&text={}",
            self.base_url,
            query_escape(user),
            query_escape_percent_spaces(text)
        )
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn post_message(&self, token: &str, user: &str, text: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.post_message_url(user, text))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .bearer_auth(token)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        debug!(user, status = status.as_u16(), "slack chat.postMessage response");

        let parsed: PostMessageResponse = serde_json::from_str(&body)?;
        if parsed.ok {
            return Ok(());
        }
        Err(Error::Api {
            error: parsed
                .error
                .unwrap_or_else(|| format!("http status {}", status.as_u16())),
        })
    }
}
