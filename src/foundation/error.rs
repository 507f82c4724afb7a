/// Convenience result type used across rigweave.
pub type RigResult<T> = Result<T, RigError>;

/// Fatal error taxonomy surfaced to callers.
///
/// Per-entity problems never land here; they are recorded as
/// [`Anomaly`](crate::Anomaly) values and the entity is skipped or defaulted.
#[derive(thiserror::Error, Debug)]
pub enum RigError {
    /// No limb of type `Torso` exists, so no pose can be computed.
    #[error("missing root: {0}")]
    MissingRoot(String),

    /// Invalid caller-provided data (settings, selections, joint ids).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing documents and settings.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RigError {
    /// Build a [`RigError::MissingRoot`] value.
    pub fn missing_root(msg: impl Into<String>) -> Self {
        Self::MissingRoot(msg.into())
    }

    /// Build a [`RigError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RigError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this is the missing-root condition callers degrade on.
    pub fn is_missing_root(&self) -> bool {
        matches!(self, Self::MissingRoot(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
