//! Telegram bot message channel.
//!
//! Sends the configured message to every chat ID of an address through the
//! Bot API `sendMessage` method, one task per chat.

pub mod client;
pub mod dispatcher;
pub mod error;

pub use {
    client::{BotApi, HttpBotApi},
    dispatcher::TelegramDispatcher,
    error::{Error, Result},
};
