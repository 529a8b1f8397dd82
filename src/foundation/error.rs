/// Convenience result type used across postertile.
pub type PosterResult<T> = Result<T, PosterError>;

/// Top-level error taxonomy used by the compositor APIs.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Uploaded bytes are not a decodable image.
    #[error("input error: {0}")]
    Input(String),

    /// Operation requested before an image is loaded or placed.
    #[error("not ready: {0}")]
    NotReady(String),

    /// Parameter value outside its accepted range.
    #[error("parameter out of range: {0}")]
    Parameter(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`PosterError::NotReady`] value.
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Build a [`PosterError::Parameter`] value.
    pub fn parameter(msg: impl Into<String>) -> Self {
        Self::Parameter(msg.into())
    }

    /// Build a [`PosterError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
