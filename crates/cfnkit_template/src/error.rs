//! Error types for template operations.

use std::fmt;

use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while building, querying, rendering or parsing templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to decode {kind} resource: {message}")]
    Decode { kind: String, message: String },

    #[error("Resource {name} of kind {kind} not found: {reason}")]
    ResourceNotFound {
        name: String,
        kind: String,
        reason: LookupFailure,
    },

    #[error("Template serialization failed: {0}")]
    Serialization(String),

    #[error("Invalid logical name: {0}")]
    InvalidName(String),

    #[error("Stack output not found: {0}")]
    MissingOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Why a by-name lookup did not yield a resource of the requested kind.
///
/// All three collapse into [`TemplateError::ResourceNotFound`]; callers that
/// need to tell them apart can match on the `reason` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// No resource is registered under the name.
    Absent,
    /// A resource exists but carries another discriminator.
    KindMismatch { found: Option<String> },
    /// The discriminator matches but the properties could not be decoded.
    Malformed(String),
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::Absent => write!(f, "no resource with that name"),
            LookupFailure::KindMismatch { found: Some(found) } => {
                write!(f, "resource has kind {}", found)
            }
            LookupFailure::KindMismatch { found: None } => {
                write!(f, "resource has no Type discriminator")
            }
            LookupFailure::Malformed(message) => write!(f, "malformed properties: {}", message),
        }
    }
}
