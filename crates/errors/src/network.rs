//! Network-related error types

use std::borrow::Cow;

use thiserror::Error;

use crate::UserFacingError;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("host could not be resolved: {host}")]
    HostUnresolved { host: String },

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("connection reset: {0}")]
    ConnectionReset(String),

    #[error("HTTP error {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("download did not complete: {url}")]
    DownloadFailed { url: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } => Some("Check your connection and try again."),
            Self::HostUnresolved { .. } => Some("Check your network or DNS settings."),
            Self::ConnectionRefused(_) | Self::ConnectionReset(_) => {
                Some("The remote server may be down; try again later.")
            }
            Self::HttpStatus { .. } | Self::DownloadFailed { .. } => {
                Some("Retry the installation.")
            }
            Self::InvalidUrl(_) => None,
        }
    }

    fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidUrl(_))
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Timeout { .. } => "network.timeout",
            Self::HostUnresolved { .. } => "network.unresolved",
            Self::ConnectionRefused(_) => "network.refused",
            Self::ConnectionReset(_) => "network.reset",
            Self::HttpStatus { .. } => "network.http_status",
            Self::DownloadFailed { .. } => "network.download_failed",
            Self::InvalidUrl(_) => "network.invalid_url",
        })
    }
}
