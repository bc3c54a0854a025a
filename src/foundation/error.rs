/// Convenience result type used across revealfx.
pub type RevealResult<T> = Result<T, RevealError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Frame sources that are not ready yet are not errors; they are reported through
/// [`crate::FrameOutcome::NotReady`] instead.
#[derive(thiserror::Error, Debug)]
pub enum RevealError {
    /// Polygon data that cannot be traced: fewer than two vertices or zero perimeter.
    #[error("degenerate polygon: {0}")]
    DegeneratePolygon(String),

    /// Invalid user-provided configuration or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RevealError {
    /// Build a [`RevealError::DegeneratePolygon`] value.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegeneratePolygon(msg.into())
    }

    /// Build a [`RevealError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RevealError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error came from polygon validation.
    pub fn is_degenerate_polygon(&self) -> bool {
        matches!(self, Self::DegeneratePolygon(_))
    }
}

impl From<serde_json::Error> for RevealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
