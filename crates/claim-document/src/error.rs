//! Document error types

/// Errors raised while decoding or navigating a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// A field expected to hold an object holds something else
    #[error("field {field:?} is not an object")]
    NotAnObject {
        /// Name of the offending field
        field: String,
    },

    /// Input was not valid JSON, or did not fit the requested type
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Input was not valid YAML
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Encoding the document failed
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl DocumentError {
    /// Create a type mismatch error for `field`
    #[inline]
    #[must_use]
    pub fn not_an_object(field: impl Into<String>) -> Self {
        Self::NotAnObject {
            field: field.into(),
        }
    }
}
