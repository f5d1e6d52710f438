use {
    herald_config::{Address, AddressConfig, EmailConfig, SlackConfig, TelegramConfig},
    tracing::debug,
};

use crate::kind::ChannelKind;

/// Request-supplied field overrides.
///
/// A field replaces the stored value only when it is present and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Applies to Telegram and Slack.
    pub message: Option<String>,
    /// Email only.
    pub sender: Option<String>,
    /// Email only.
    pub subject: Option<String>,
    /// Email only. Inserted into the template as raw HTML.
    pub body: Option<String>,
}

/// A channel's stored config with request overrides merged in. Scoped to a
/// single dispatch.
#[derive(Debug, Clone)]
pub enum EffectiveChannelConfig {
    Telegram(TelegramConfig),
    Slack(SlackConfig),
    Email(EmailConfig),
}

impl EffectiveChannelConfig {
    pub fn kind(&self) -> ChannelKind {
        match self {
            Self::Telegram(_) => ChannelKind::Telegram,
            Self::Slack(_) => ChannelKind::Slack,
            Self::Email(_) => ChannelKind::Email,
        }
    }

    /// Merge `overrides` onto the stored config for `kind`.
    pub fn merge(kind: ChannelKind, stored: &AddressConfig, overrides: &Overrides) -> Self {
        match kind {
            ChannelKind::Telegram => {
                let mut cfg = stored.telegram.clone();
                apply(&mut cfg.message, &overrides.message);
                Self::Telegram(cfg)
            },
            ChannelKind::Slack => {
                let mut cfg = stored.slack.clone();
                apply(&mut cfg.message, &overrides.message);
                Self::Slack(cfg)
            },
            ChannelKind::Email => {
                let mut cfg = stored.email.clone();
                apply(&mut cfg.sender, &overrides.sender);
                apply(&mut cfg.subject, &overrides.subject);
                apply(&mut cfg.body, &overrides.body);
                Self::Email(cfg)
            },
        }
    }
}

fn apply(stored: &mut String, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        *stored = v.to_string();
    }
}

/// Build one effective config per enabled channel of `address`, in the
/// configured order. Unknown channel identifiers are skipped.
pub fn effective_configs(address: &Address, overrides: &Overrides) -> Vec<EffectiveChannelConfig> {
    address
        .enabled_channels
        .iter()
        .filter_map(|id| match id.parse::<ChannelKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                debug!(error = %e, "ignoring unknown channel");
                None
            },
        })
        .map(|kind| EffectiveChannelConfig::merge(kind, &address.config, overrides))
        .collect()
}
