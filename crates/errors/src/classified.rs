//! Closed-set failure classification
//!
//! The pipeline reports every terminal failure as a [`ClassifiedError`] so a
//! presentation layer can pick remediation text per category without
//! inspecting implementation-specific failure types. Classification is a
//! total, ordered match: every [`Error`] maps to exactly one variant.

use std::io::ErrorKind;

use crate::{AddonError, Error, NetworkError, ProcessError, UserFacingError};

/// User-facing failure category for a terminated installation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassifiedError {
    #[error("the request timed out")]
    Timeout,

    #[error("the network is unreachable")]
    NetworkUnreachable,

    #[error("the connection failed")]
    ConnectionFailed,

    #[error("a server response could not be parsed")]
    ParseFailed,

    #[error("an add-on resource is unavailable")]
    ExternalResourceUnavailable,

    #[error("the external process crashed with code {0}")]
    ExternalProcessCrashed(i32),

    #[error("a download did not complete")]
    DownloadFailed,

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl ClassifiedError {
    /// Classify a raw failure into its user-facing category.
    ///
    /// Matching runs in priority order: timeout shapes first, then
    /// unreachable-route, connection, parse, add-on resource, process-crash
    /// and download shapes, with everything else falling through to
    /// [`ClassifiedError::Unknown`] carrying a non-empty detail string.
    #[must_use]
    pub fn classify(error: &Error) -> Self {
        match error {
            Error::Network(NetworkError::Timeout { .. }) => Self::Timeout,
            Error::Network(NetworkError::HostUnresolved { .. }) => Self::NetworkUnreachable,
            Error::Network(
                NetworkError::ConnectionRefused(_) | NetworkError::ConnectionReset(_),
            ) => Self::ConnectionFailed,
            Error::Parse(_) => Self::ParseFailed,
            Error::Addon(AddonError::ResourceUnavailable { .. }) => {
                Self::ExternalResourceUnavailable
            }
            Error::Process(ProcessError::Crashed { code }) => Self::ExternalProcessCrashed(*code),
            Error::Network(NetworkError::DownloadFailed { .. } | NetworkError::HttpStatus { .. }) => {
                Self::DownloadFailed
            }
            Error::Io { kind, .. } => match kind {
                ErrorKind::TimedOut => Self::Timeout,
                ErrorKind::ConnectionRefused
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::NotConnected => Self::ConnectionFailed,
                _ => Self::unknown_from(error),
            },
            _ => Self::unknown_from(error),
        }
    }

    /// Stable category code, mirroring the user-code scheme of the error
    /// domains.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout => "classified.timeout",
            Self::NetworkUnreachable => "classified.network_unreachable",
            Self::ConnectionFailed => "classified.connection_failed",
            Self::ParseFailed => "classified.parse_failed",
            Self::ExternalResourceUnavailable => "classified.resource_unavailable",
            Self::ExternalProcessCrashed(_) => "classified.process_crashed",
            Self::DownloadFailed => "classified.download_failed",
            Self::Unknown(_) => "classified.unknown",
        }
    }

    fn unknown_from(error: &Error) -> Self {
        // Best available description: display message, then raw message,
        // then a literal.
        let detail = error.user_message().into_owned();
        let detail = if detail.is_empty() {
            error.to_string()
        } else {
            detail
        };
        let detail = if detail.is_empty() {
            "Unknown error".to_string()
        } else {
            detail
        };
        Self::Unknown(detail)
    }
}
