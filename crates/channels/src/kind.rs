use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::error::Error;

/// The closed set of supported notification transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Telegram bot message.
    Telegram,
    /// Slack direct message.
    Slack,
    Email,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [Self::Telegram, Self::Slack, Self::Email];

    /// Identifier used in config files and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telegram => "telegram",
            Self::Slack => "slack",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::unknown_channel(s))
    }
}
