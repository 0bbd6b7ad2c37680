/// Convenience result type used across the caption engine.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    /// Invalid user-provided transcript, style, or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while laying out the words of a chunk.
    #[error("layout error: {0}")]
    Layout(String),

    /// Errors reported by the rendering backend while measuring or drawing.
    #[error("backend error: {0}")]
    Backend(String),

    /// The rendering backend failed to initialize and will not be retried.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionError {
    /// Build a [`CaptionError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CaptionError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`CaptionError::Backend`] value.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Build a [`CaptionError::BackendUnavailable`] value.
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Build a [`CaptionError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CaptionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
