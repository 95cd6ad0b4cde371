#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the launchcore installation core
//!
//! This crate provides fine-grained error types organized by domain, the
//! aggregate [`Error`] used across crate boundaries, and the closed-set
//! [`ClassifiedError`] taxonomy the pipeline reports terminal failures
//! through. All error types implement Clone for easier handling.

use std::borrow::Cow;

use thiserror::Error;

pub mod addon;
pub mod classified;
pub mod install;
pub mod network;
pub mod parse;
pub mod process;
pub mod tracker;

// Re-export all error types at the root
pub use addon::AddonError;
pub use classified::ClassifiedError;
pub use install::InstallError;
pub use network::NetworkError;
pub use parse::ParseError;
pub use process::ProcessError;
pub use tracker::TrackerError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("add-on error: {0}")]
    Addon(#[from] AddonError),

    #[error("process error: {0}")]
    Process(#[from] ProcessError),

    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("install error: {0}")]
    Install(#[from] InstallError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("I/O error: {message}")]
    Io {
        #[cfg_attr(feature = "serde", serde(with = "io_kind_as_str"))]
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(ParseError::Json {
            message: err.to_string(),
        })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(ToString::to_string).unwrap_or_default();
        if err.is_timeout() {
            Self::Network(NetworkError::Timeout { url })
        } else if err.is_decode() {
            Self::Parse(ParseError::Json {
                message: err.to_string(),
            })
        } else if err.is_connect() {
            Self::Network(NetworkError::ConnectionRefused(err.to_string()))
        } else if let Some(status) = err.status() {
            Self::Network(NetworkError::HttpStatus {
                status: status.as_u16(),
                url,
            })
        } else {
            Self::Network(NetworkError::DownloadFailed { url })
        }
    }
}

/// Result type alias for launchcore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for display.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Network(err) => err.user_message(),
            Error::Io { message, .. } => Cow::Owned(message.clone()),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Network(err) => err.user_hint(),
            Error::Process(_) => Some("Check the installer log for the failing command."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Network(err) => err.is_retryable(),
            Error::Io { .. } => true,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Network(err) => err.user_code(),
            Error::Parse(_) => Some("error.parse"),
            Error::Addon(_) => Some("error.addon"),
            Error::Process(_) => Some("error.process"),
            Error::Tracker(_) => Some("error.tracker"),
            Error::Install(_) => Some("error.install"),
            Error::Internal(_) => Some("error.internal"),
            Error::Cancelled => Some("error.cancelled"),
            Error::Io { .. } => Some("error.io"),
        }
    }
}

// Serde helper for io::ErrorKind as string
#[cfg(feature = "serde")]
mod io_kind_as_str {
    use serde::{Deserialize, Deserializer, Serializer};
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(kind: &std::io::ErrorKind, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&format!("{kind:?}"))
    }
    pub fn deserialize<'de, D>(deserializer: D) -> Result<std::io::ErrorKind, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        // Best effort mapping; default to Other
        Ok(match s.as_str() {
            "NotFound" => std::io::ErrorKind::NotFound,
            "PermissionDenied" => std::io::ErrorKind::PermissionDenied,
            "ConnectionRefused" => std::io::ErrorKind::ConnectionRefused,
            "ConnectionReset" => std::io::ErrorKind::ConnectionReset,
            "ConnectionAborted" => std::io::ErrorKind::ConnectionAborted,
            "NotConnected" => std::io::ErrorKind::NotConnected,
            "BrokenPipe" => std::io::ErrorKind::BrokenPipe,
            "InvalidInput" => std::io::ErrorKind::InvalidInput,
            "InvalidData" => std::io::ErrorKind::InvalidData,
            "TimedOut" => std::io::ErrorKind::TimedOut,
            "Interrupted" => std::io::ErrorKind::Interrupted,
            "UnexpectedEof" => std::io::ErrorKind::UnexpectedEof,
            _ => std::io::ErrorKind::Other,
        })
    }
}
