//! Config schema: server settings plus the address book.
//!
//! JSON keys follow the historical config format (`handlers`, `chats`,
//! `users`, `emails`, `smtp.server`), so existing config files keep working.

use std::{collections::HashMap, path::PathBuf};

use {secrecy::Secret, serde::Deserialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeraldConfig {
    /// Interface to bind the HTTP listener to.
    pub bind: String,
    pub port: u16,
    /// Switch log verbosity to debug once the config is loaded.
    pub debug: bool,
    /// Directory holding `favicon.ico` and `robots.txt`.
    pub public_dir: PathBuf,
    /// HTML template used for email bodies.
    pub template_path: PathBuf,
    pub api: ApiEndpoints,
    /// Registered recipient profiles keyed by address name.
    pub addresses: HashMap<String, Address>,
}

impl Default for HeraldConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
            debug: false,
            public_dir: PathBuf::from("public"),
            template_path: PathBuf::from("template/mail.html"),
            api: ApiEndpoints::default(),
            addresses: HashMap::new(),
        }
    }
}

/// Base URLs of the outbound chat APIs. Overridable for self-hosted Bot API
/// servers and for tests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiEndpoints {
    pub telegram: String,
    pub slack: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            telegram: "https://api.telegram.org".into(),
            slack: "https://slack.com".into(),
        }
    }
}

/// A registered recipient profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Enabled channel identifiers, in the order they were configured.
    /// Unknown identifiers are kept here and ignored at dispatch time.
    #[serde(rename = "handlers")]
    pub enabled_channels: Vec<String>,
    pub config: AddressConfig,
}

/// Stored per-channel settings. All three are always present; only the
/// enabled ones are used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressConfig {
    pub telegram: TelegramConfig,
    pub slack: SlackConfig,
    pub email: EmailConfig,
}

/// Telegram bot message settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub message: String,
    pub token: Secret<String>,
    #[serde(rename = "chats")]
    pub chat_ids: Vec<i64>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            message: String::new(),
            token: Secret::new(String::new()),
            chat_ids: Vec::new(),
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("message", &self.message)
            .field("token", &"[REDACTED]")
            .field("chat_ids", &self.chat_ids)
            .finish()
    }
}

/// Slack chat message settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub message: String,
    pub token: Secret<String>,
    /// Slack user IDs; each receives a direct message.
    pub users: Vec<String>,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            message: String::new(),
            token: Secret::new(String::new()),
            users: Vec::new(),
        }
    }
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("message", &self.message)
            .field("token", &"[REDACTED]")
            .field("users", &self.users)
            .finish()
    }
}

/// Email settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Display name shown in the `From` header.
    pub sender: String,
    pub subject: String,
    /// HTML inserted unescaped into the mail template. Callers must only
    /// supply trusted markup.
    pub body: String,
    pub emails: Vec<String>,
    pub smtp: SmtpConfig,
}

/// SMTP submission settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub user: String,
    pub password: Secret<String>,
    /// SMTP host name.
    pub server: String,
    pub port: u16,
    /// Envelope sender and the address part of the `From` header.
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: Secret::new(String::new()),
            server: String::new(),
            port: 25,
            from: String::new(),
        }
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("from", &self.from)
            .finish()
    }
}

impl HeraldConfig {
    /// Parse a JSON config document.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret};

    const SAMPLE: &str = r#"{
        "port": 9000,
        "debug": true,
        "addresses": {
            "ops": {
                "handlers": ["telegram", "slack", "pager"],
                "config": {
                    "telegram": { "message": "hi", "token": "T", "chats": [111, -222] },
                    "slack": { "message": "hey", "token": "xoxb", "users": ["U1", "U2"] },
                    "email": {
                        "sender": "Ops",
                        "subject": "Alert",
                        "body": "<b>down</b>",
                        "emails": ["a@example.com"],
                        "smtp": { "user": "u", "password": "p", "server": "smtp.example.com", "port": 587, "from": "noreply@example.com" }
                    }
                }
            }
        }
    }"#;

    #[test]
    fn parses_address_book() {
        let cfg = HeraldConfig::from_json(SAMPLE).unwrap();
        assert_eq!(cfg.port, 9000);
        assert!(cfg.debug);

        let ops = &cfg.addresses["ops"];
        assert_eq!(ops.enabled_channels, vec!["telegram", "slack", "pager"]);
        assert_eq!(ops.config.telegram.chat_ids, vec![111, -222]);
        assert_eq!(ops.config.telegram.token.expose_secret(), "T");
        assert_eq!(ops.config.slack.users, vec!["U1", "U2"]);
        assert_eq!(ops.config.email.smtp.port, 587);
        assert_eq!(ops.config.email.smtp.password.expose_secret(), "p");
    }

    #[test]
    fn missing_sections_default() {
        let cfg = HeraldConfig::from_json(r#"{"addresses": {"bare": {"handlers": ["email"]}}}"#)
            .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.bind, "0.0.0.0");
        assert_eq!(cfg.api.telegram, "https://api.telegram.org");

        let bare = &cfg.addresses["bare"];
        assert!(bare.config.telegram.chat_ids.is_empty());
        assert!(bare.config.email.emails.is_empty());
        assert_eq!(bare.config.email.smtp.port, 25);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let cfg = HeraldConfig::from_json(SAMPLE).unwrap();
        let dump = format!("{:?}", cfg.addresses["ops"]);
        assert!(dump.contains("[REDACTED]"));
        assert!(!dump.contains("xoxb"));
        assert!(!dump.contains("\"p\""));
    }
}
