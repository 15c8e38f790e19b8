/// Convenience result type used across tickreel.
pub type TickreelResult<T> = Result<T, TickreelError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Tick-level animation operations never return this type; they report progress through plain
/// completion flags. Errors are reserved for configuration, rendering and encoding boundaries.
#[derive(thiserror::Error, Debug)]
pub enum TickreelError {
    /// Invalid user-provided configuration (frame geometry, indices, config values).
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures of the external encoder process or the encoding worker.
    #[error("encode error: {0}")]
    Encode(String),

    /// Failures while rasterizing onto a surface (fonts, text layout).
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TickreelError {
    /// Build a [`TickreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TickreelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TickreelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TickreelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
