use std::sync::Arc;

use {
    async_trait::async_trait,
    herald_channels::{ChannelDispatcher, ChannelKind, DispatchOutcome, fanout::fan_out},
    herald_config::SlackConfig,
    secrecy::ExposeSecret,
};

use crate::client::ChatApi;

/// Sends a Slack direct message to every configured user of an address.
pub struct SlackDispatcher {
    api: Arc<dyn ChatApi>,
}

impl SlackDispatcher {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ChannelDispatcher for SlackDispatcher {
    type Config = SlackConfig;

    async fn dispatch(&self, config: SlackConfig) -> DispatchOutcome {
        let token: Arc<str> = Arc::from(config.token.expose_secret().as_str());
        let text: Arc<str> = Arc::from(config.message);

        fan_out(ChannelKind::Slack, config.users, |user| {
            let api = Arc::clone(&self.api);
            let token = Arc::clone(&token);
            let text = Arc::clone(&text);
            async move { api.post_message(&token, &user, &text).await }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::error::{Error, Result},
        secrecy::Secret,
        std::sync::Mutex,
    };

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ChatApi for RecordingApi {
        async fn post_message(&self, _token: &str, user: &str, text: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((user.to_string(), text.to_string()));
            if user == "UBAD" {
                return Err(Error::Api {
                    error: "user_not_found".into(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn failing_user_does_not_block_others() {
        let api = Arc::new(RecordingApi::default());
        let dispatcher = SlackDispatcher::new(api.clone());

        let outcome = dispatcher
            .dispatch(SlackConfig {
                message: "deploy done".into(),
                token: Secret::new("xoxb".into()),
                users: vec!["UBAD".into(), "U2".into()],
            })
            .await;

        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.failed, 1);

        let mut calls = api.calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(calls, vec![
            ("U2".to_string(), "deploy done".to_string()),
            ("UBAD".to_string(), "deploy done".to_string()),
        ]);
    }
}
