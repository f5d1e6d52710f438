use std::sync::Arc;

use {
    herald_channels::{ChannelKind, Dispatchers, effective_configs},
    herald_config::Address,
};

use crate::{registry::AddressRegistry, request::DispatchRequest};

/// Why a request did not lead to dispatch.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no address given")]
    MissingAddress,

    #[error("method {method} does not dispatch")]
    MethodNotAllowed { method: String },

    #[error("address not registered: {address}")]
    NotFound { address: String },
}

/// A resolved request whose channels have been launched.
#[derive(Debug)]
pub struct Resolution<'a> {
    pub name: &'a str,
    pub address: &'a Address,
    /// Channels launched, in configured order. Unknown identifiers are absent.
    pub launched: Vec<ChannelKind>,
}

/// Looks up addresses, merges overrides and launches the channel dispatchers.
pub struct RequestResolver {
    registry: Arc<AddressRegistry>,
    dispatchers: Dispatchers,
}

impl RequestResolver {
    pub fn new(registry: Arc<AddressRegistry>, dispatchers: Dispatchers) -> Self {
        Self {
            registry,
            dispatchers,
        }
    }

    pub fn registry(&self) -> &AddressRegistry {
        &self.registry
    }

    /// Resolve `request` and launch one detached dispatch per enabled
    /// channel.
    ///
    /// Returns once every channel has been launched; nothing is awaited.
    /// Delivery failures surface only in the logs.
    pub fn resolve<'a>(
        &'a self,
        request: &'a DispatchRequest,
    ) -> Result<Resolution<'a>, ResolveError> {
        let name = request.address_name().ok_or(ResolveError::MissingAddress)?;
        let address = self
            .registry
            .lookup(name)
            .ok_or_else(|| ResolveError::NotFound {
                address: name.to_string(),
            })?;

        let launched = effective_configs(address, &request.overrides)
            .into_iter()
            .map(|config| self.dispatchers.launch(name, config))
            .collect();

        Ok(Resolution {
            name,
            address,
            launched,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        async_trait::async_trait,
        herald_channels::{ChannelDispatcher, DispatchOutcome},
        herald_config::{EmailConfig, HeraldConfig, SlackConfig, TelegramConfig},
        tokio::sync::mpsc,
    };

    struct Forward<C> {
        tx: mpsc::UnboundedSender<C>,
    }

    #[async_trait]
    impl<C: Send + 'static> ChannelDispatcher for Forward<C> {
        type Config = C;

        async fn dispatch(&self, config: C) -> DispatchOutcome {
            let _ = self.tx.send(config);
            DispatchOutcome::default()
        }
    }

    struct Harness {
        resolver: RequestResolver,
        telegram: mpsc::UnboundedReceiver<TelegramConfig>,
        slack: mpsc::UnboundedReceiver<SlackConfig>,
        email: mpsc::UnboundedReceiver<EmailConfig>,
    }

    fn harness() -> Harness {
        let cfg = HeraldConfig::from_json(
            r#"{"addresses": {
                "ops": {
                    "handlers": ["telegram", "slack", "sms"],
                    "config": {
                        "telegram": {"message": "hi", "token": "T", "chats": [111]},
                        "slack": {"message": "hey", "token": "S", "users": ["U1"]}
                    }
                },
                "mail": {
                    "handlers": ["email"],
                    "config": {"email": {"subject": "Stored", "sender": "Ops", "emails": ["a@example.com"]}}
                }
            }}"#,
        )
        .unwrap();
        let (tg_tx, telegram) = mpsc::unbounded_channel();
        let (slack_tx, slack) = mpsc::unbounded_channel();
        let (email_tx, email) = mpsc::unbounded_channel();
        let dispatchers = Dispatchers::new(
            Arc::new(Forward { tx: tg_tx }),
            Arc::new(Forward { tx: slack_tx }),
            Arc::new(Forward { tx: email_tx }),
        );
        Harness {
            resolver: RequestResolver::new(
                Arc::new(AddressRegistry::from_config(&cfg)),
                dispatchers,
            ),
            telegram,
            slack,
            email,
        }
    }

    fn request(query: &str) -> DispatchRequest {
        DispatchRequest::from_form(Some(query), None)
    }

    #[tokio::test]
    async fn missing_address() {
        let h = harness();
        let err = h.resolver.resolve(&request("message=x")).unwrap_err();
        assert_eq!(err, ResolveError::MissingAddress);
    }

    #[tokio::test]
    async fn unknown_address() {
        let h = harness();
        let err = h.resolver.resolve(&request("address=nobody")).unwrap_err();
        assert_eq!(err, ResolveError::NotFound {
            address: "nobody".into()
        });
    }

    #[tokio::test]
    async fn launches_known_channels_in_order() {
        let mut h = harness();
        let req = request("address=ops&message=urgent");
        let res = h.resolver.resolve(&req).unwrap();
        assert_eq!(res.name, "ops");
        assert_eq!(res.launched, vec![ChannelKind::Telegram, ChannelKind::Slack]);
        assert_eq!(res.address.enabled_channels, vec!["telegram", "slack", "sms"]);

        let tg = h.telegram.recv().await.unwrap();
        assert_eq!(tg.message, "urgent");
        assert_eq!(tg.chat_ids, vec![111]);
        let slack = h.slack.recv().await.unwrap();
        assert_eq!(slack.message, "urgent");
        assert_eq!(slack.users, vec!["U1"]);
        assert!(h.email.try_recv().is_err());
    }

    #[tokio::test]
    async fn empty_subject_keeps_stored_subject() {
        let mut h = harness();
        let req = request("address=mail&subject=&sender=Pager");
        h.resolver.resolve(&req).unwrap();

        let email = h.email.recv().await.unwrap();
        assert_eq!(email.subject, "Stored");
        assert_eq!(email.sender, "Pager");
    }
}
