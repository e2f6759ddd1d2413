//! Error types for the Pulseline import pipeline

use serde::Serialize;
use thiserror::Error;

use crate::types::Dialect;

/// Pipeline stage at which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    Detect,
    Parse,
    Normalize,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Detect => "detect",
            Stage::Parse => "parse",
            Stage::Normalize => "normalize",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during an import
///
/// Every variant is a recoverable typed value: the pipeline entry point never
/// lets an internal fault escape as a panic. The external HTTP layer maps
/// these kinds to a status code and message.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No JSON payload found in the envelope. Surfaces to the caller as
    /// "nothing to import", not as a parse failure.
    #[error("no payload found in request body")]
    EmptyPayload,

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("document structure matches no known export dialect")]
    UnrecognizedDialect,

    #[error("{dialect}: missing or invalid required field: {field}")]
    MissingRequiredField { dialect: Dialect, field: String },

    #[error("invalid temporal value: {0:?}")]
    InvalidTemporalValue(String),

    #[error("invalid numeric value: {0:?}")]
    InvalidNumericValue(String),
}

impl ImportError {
    /// Pipeline stage that raised this error
    ///
    /// Assembly proper is infallible once normalization has succeeded, so no
    /// error maps past `Normalize`.
    pub fn stage(&self) -> Stage {
        match self {
            ImportError::EmptyPayload | ImportError::MalformedDocument(_) => Stage::Extract,
            ImportError::UnrecognizedDialect => Stage::Detect,
            ImportError::MissingRequiredField { .. } => Stage::Parse,
            ImportError::InvalidTemporalValue(_) | ImportError::InvalidNumericValue(_) => {
                Stage::Normalize
            }
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::MalformedDocument(err.to_string())
    }
}
