//! Installation pipeline error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstallError {
    /// `start` was called on a pipeline instance that already ran.
    #[error("installation already running")]
    AlreadyRunning,

    /// Resolution produced no spec for a planned artifact.
    #[error("resolved plan is missing artifact: {name}")]
    MissingArtifact { name: String },

    #[error("step plan is empty")]
    PlanEmpty,
}
