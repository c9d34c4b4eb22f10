/// Convenience result type used across Candela.
pub type RenderResult<T> = Result<T, RenderError>;

/// Top-level error taxonomy used by the frame setup and accumulation APIs.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// A scene reference was required for sampling but never resolved.
    ///
    /// Raised lazily at the first point of actual use, never at bind or
    /// construction time: scenes under construction are allowed to carry
    /// unresolved names.
    #[error("unknown entity: no {kind} named \"{name}\" (required by \"{referer}\")")]
    UnknownEntity {
        /// Name that failed to resolve.
        name: String,
        /// Human label of the entity kind that was looked up.
        kind: String,
        /// Name of the entity that holds the dangling reference.
        referer: String,
    },

    /// The tile backend failed to produce a tile during content detection.
    ///
    /// Fatal for the owning entity's frame setup (detection cannot guess a
    /// default without risking silently wrong output), not for the frame.
    #[error("resource acquisition error: {0}")]
    ResourceAcquisition(String),

    /// Invalid scene construction or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Frame setup was interrupted by the abort switch between entities.
    #[error("frame setup aborted")]
    Aborted,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RenderError {
    /// Build a [`RenderError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RenderError::ResourceAcquisition`] value.
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::ResourceAcquisition(msg.into())
    }

    /// Build a [`RenderError::UnknownEntity`] value.
    pub fn unknown_entity(
        name: impl Into<String>,
        kind: impl Into<String>,
        referer: impl Into<String>,
    ) -> Self {
        Self::UnknownEntity {
            name: name.into(),
            kind: kind.into(),
            referer: referer.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
