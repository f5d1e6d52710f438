use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Template(#[from] minijinja::Error),

    #[error("template load task failed: {0}")]
    LoadTask(#[from] tokio::task::JoinError),

    #[error("no recipients configured")]
    NoRecipients,

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error(transparent)]
    Envelope(#[from] lettre::error::Error),

    #[error("smtp submission failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
