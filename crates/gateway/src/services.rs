use std::sync::Arc;

use {
    herald_channels::Dispatchers,
    herald_config::HeraldConfig,
    herald_email::{EmailDispatcher, FsTemplateSource, SmtpSubmitter, TemplateCache},
    herald_slack::{HttpChatApi, SlackDispatcher},
    herald_telegram::{HttpBotApi, TelegramDispatcher},
};

/// Build the dispatchers that talk to the real Telegram, Slack and SMTP
/// endpoints.
pub fn live_dispatchers(config: &HeraldConfig) -> anyhow::Result<Dispatchers> {
    let telegram = TelegramDispatcher::new(Arc::new(HttpBotApi::new(&config.api.telegram)?));
    let slack = SlackDispatcher::new(Arc::new(HttpChatApi::new(&config.api.slack)?));
    let templates = Arc::new(TemplateCache::new(FsTemplateSource));
    let email = EmailDispatcher::new(
        templates,
        config.template_path.clone(),
        Arc::new(SmtpSubmitter),
    );

    Ok(Dispatchers::new(
        Arc::new(telegram),
        Arc::new(slack),
        Arc::new(email),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_with_default_config() {
        assert!(live_dispatchers(&HeraldConfig::default()).is_ok());
    }
}
