//! Add-on provider error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddonError {
    /// The provider's download endpoint did not yield a usable artifact URL.
    #[error("add-on resource unavailable from {provider}")]
    ResourceUnavailable { provider: String },

    #[error("add-on version {version} is not available from {provider}")]
    UnsupportedVersion { provider: String, version: String },
}
