/// Result alias used across the crate.
pub type GeodashResult<T> = Result<T, GeodashError>;

/// Crate-level error.
#[derive(thiserror::Error, Debug)]
pub enum GeodashError {
    /// Invalid input, configuration or selection.
    #[error("validation error: {0}")]
    Validation(String),

    /// Upstream data provider failed or answered with something unusable.
    #[error("provider error: {0}")]
    Provider(String),

    /// Map geometry or frame rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// GIF or video assembly failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Anything else, usually IO with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GeodashError {
    /// Build a [`GeodashError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GeodashError::Provider`].
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Build a [`GeodashError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`GeodashError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

impl From<reqwest::Error> for GeodashError {
    fn from(e: reqwest::Error) -> Self {
        Self::Provider(e.to_string())
    }
}
