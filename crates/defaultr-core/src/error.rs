//! Error types for defaultr spec parsing and application.

use thiserror::Error;

/// Errors that can occur while building or applying a defaults spec.
///
/// Every variant except [`DefaultrError::Json`] is a configuration error:
/// it is raised while the spec is parsed, before any document is touched.
#[derive(Error, Debug)]
pub enum DefaultrError {
    /// An operation descriptor did not carry a `spec` field.
    #[error("Defaultr expected a spec in its operation entry, but instead got: {0}")]
    MissingSpec(String),

    /// The spec root (or the value handed in as a spec) was not a JSON object.
    #[error("Defaultr spec must be a JSON object, got {0}")]
    SpecNotObject(&'static str),

    /// A key below an array-output (`[]`) key was not an integer index.
    #[error("Array spec key '{key}' must be an integer index, found '{token}'")]
    NonIntegerArrayKey { key: String, token: String },

    /// An array index above [`crate::key::MAX_INDEX`].
    #[error("Array spec key '{key}' names index {token}, above the limit of {max}")]
    IndexTooLarge {
        key: String,
        token: String,
        max: usize,
    },

    /// An OR key (`a|b`) with an empty alternative.
    #[error("Invalid OR key '{0}': every '|' alternative must be non-empty")]
    InvalidOrKey(String),

    /// Spec or document text was not valid JSON (text entry points only).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout defaultr-core.
pub type Result<T> = std::result::Result<T, DefaultrError>;
