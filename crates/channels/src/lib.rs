//! Channel dispatch core.
//!
//! A channel is one notification transport (Telegram, Slack, email). Each
//! transport crate implements [`ChannelDispatcher`] for its own config type;
//! [`Dispatchers`] routes a merged [`EffectiveChannelConfig`] to the right
//! implementation and launches it as a detached task.

pub mod dispatch;
pub mod error;
pub mod escape;
pub mod fanout;
pub mod kind;
pub mod overrides;

pub use {
    dispatch::{ChannelDispatcher, DispatchOutcome, Dispatchers},
    error::{Error, Result},
    kind::ChannelKind,
    overrides::{EffectiveChannelConfig, Overrides, effective_configs},
};
