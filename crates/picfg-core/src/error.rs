// ── Core error types ──
//
// Errors that end an extraction run. API failures are wrapped as-is so
// callers can still tell an auth problem from a timeout; document-shape
// problems get their own variant.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A request failed at the transport or classification layer.
    #[error(transparent)]
    Api(#[from] picfg_api::Error),

    /// A required element or attribute is absent from a response document.
    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// The extractor was configured with unusable values.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn missing(field: &str, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.to_owned(),
            context: context.into(),
        }
    }

    /// The wrapped API error, if this failure came from a request.
    pub fn api_error(&self) -> Option<&picfg_api::Error> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}
