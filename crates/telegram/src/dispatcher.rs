use std::sync::Arc;

use {
    async_trait::async_trait,
    herald_channels::{ChannelDispatcher, ChannelKind, DispatchOutcome, fanout::fan_out},
    herald_config::TelegramConfig,
    secrecy::ExposeSecret,
};

use crate::client::BotApi;

/// Sends a Telegram message to every configured chat of an address.
pub struct TelegramDispatcher {
    api: Arc<dyn BotApi>,
}

impl TelegramDispatcher {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ChannelDispatcher for TelegramDispatcher {
    type Config = TelegramConfig;

    async fn dispatch(&self, config: TelegramConfig) -> DispatchOutcome {
        let token: Arc<str> = Arc::from(config.token.expose_secret().as_str());
        let text: Arc<str> = Arc::from(config.message);

        fan_out(ChannelKind::Telegram, config.chat_ids, |chat_id| {
            let api = Arc::clone(&self.api);
            let token = Arc::clone(&token);
            let text = Arc::clone(&text);
            async move { api.send_message(&token, chat_id, &text).await }
        })
        .await
    }
}
