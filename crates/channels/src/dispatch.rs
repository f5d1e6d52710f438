use std::sync::Arc;

use {
    async_trait::async_trait,
    herald_config::{EmailConfig, SlackConfig, TelegramConfig},
    tracing::{info, warn},
};

use crate::{kind::ChannelKind, overrides::EffectiveChannelConfig};

/// Delivery attempt for one channel of one request.
///
/// Implementations send to every recipient in `config`, each recipient
/// independently, and report how many sends failed. Errors never propagate
/// past this boundary.
#[async_trait]
pub trait ChannelDispatcher: Send + Sync {
    /// Effective config type this channel consumes.
    type Config: Send + 'static;

    async fn dispatch(&self, config: Self::Config) -> DispatchOutcome;
}

/// Per-recipient tally of a finished dispatch. Only used for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub attempted: usize,
    pub failed: usize,
}

impl DispatchOutcome {
    pub fn delivered(&self) -> usize {
        self.attempted - self.failed
    }

    pub fn record(&mut self, ok: bool) {
        self.attempted += 1;
        if !ok {
            self.failed += 1;
        }
    }
}

type Shared<C> = Arc<dyn ChannelDispatcher<Config = C>>;

/// One dispatcher per channel kind.
#[derive(Clone)]
pub struct Dispatchers {
    pub telegram: Shared<TelegramConfig>,
    pub slack: Shared<SlackConfig>,
    pub email: Shared<EmailConfig>,
}

impl Dispatchers {
    pub fn new(
        telegram: Shared<TelegramConfig>,
        slack: Shared<SlackConfig>,
        email: Shared<EmailConfig>,
    ) -> Self {
        Self {
            telegram,
            slack,
            email,
        }
    }

    /// Launch the dispatcher matching `config` on a detached task and return
    /// immediately. The send is never awaited by the caller; its outcome is
    /// only logged.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(&self, address: &str, config: EffectiveChannelConfig) -> ChannelKind {
        let kind = config.kind();
        match config {
            EffectiveChannelConfig::Telegram(cfg) => {
                spawn_detached(address, kind, Arc::clone(&self.telegram), cfg)
            },
            EffectiveChannelConfig::Slack(cfg) => {
                spawn_detached(address, kind, Arc::clone(&self.slack), cfg)
            },
            EffectiveChannelConfig::Email(cfg) => {
                spawn_detached(address, kind, Arc::clone(&self.email), cfg)
            },
        }
        kind
    }
}

fn spawn_detached<C: Send + 'static>(
    address: &str,
    kind: ChannelKind,
    dispatcher: Shared<C>,
    config: C,
) {
    let address = address.to_string();
    info!(address, channel = %kind, "launching dispatch");
    // Not awaited: the task outlives the request that launched it.
    tokio::spawn(async move {
        let outcome = dispatcher.dispatch(config).await;
        if outcome.failed == 0 {
            info!(
                address,
                channel = %kind,
                delivered = outcome.delivered(),
                "dispatch finished"
            );
        } else {
            warn!(
                address,
                channel = %kind,
                delivered = outcome.delivered(),
                failed = outcome.failed,
                "dispatch finished with failures"
            );
        }
    });
}
