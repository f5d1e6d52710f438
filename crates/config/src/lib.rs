//! Configuration loading: schema types, file discovery and `${ENV}` substitution.
//!
//! The loaded [`HeraldConfig`] is read once at startup. Nothing in this crate
//! keeps global state; callers own the returned value.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, find_config_file, load_config},
    schema::{
        Address, AddressConfig, ApiEndpoints, EmailConfig, HeraldConfig, SlackConfig, SmtpConfig,
        TelegramConfig,
    },
};
