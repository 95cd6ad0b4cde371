//! Structured-data decoding error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    #[error("malformed JSON: {message}")]
    Json { message: String },

    #[error("malformed version manifest: {message}")]
    Manifest { message: String },
}
