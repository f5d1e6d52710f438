use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// The Bot API answered with a non-success status.
    #[error("telegram api error ({status}): {description}")]
    Api { status: u16, description: String },
}

pub type Result<T> = std::result::Result<T, Error>;
