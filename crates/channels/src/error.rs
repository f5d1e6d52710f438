/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed channel errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A channel identifier outside the supported set.
    #[error("unknown channel: {id}")]
    UnknownChannel { id: String },
}

impl Error {
    #[must_use]
    pub fn unknown_channel(id: impl std::fmt::Display) -> Self {
        Self::UnknownChannel { id: id.to_string() }
    }
}
