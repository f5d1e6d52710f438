use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// Response body was not the expected JSON envelope.
    #[error("invalid slack response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Slack answered `ok: false`.
    #[error("slack api error: {error}")]
    Api { error: String },
}

pub type Result<T> = std::result::Result<T, Error>;
