//! Slack direct message channel.

pub mod client;
pub mod dispatcher;
pub mod error;

pub use {
    client::{ChatApi, HttpChatApi},
    dispatcher::SlackDispatcher,
    error::{Error, Result},
};
