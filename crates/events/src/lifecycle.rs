//! Installation lifecycle events

use serde::{Deserialize, Serialize};

/// Events emitted over one installation run, from start to terminal outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstallEvent {
    /// A run began and its step plan was registered.
    Started {
        run_id: String,
        version: String,
        install_name: String,
        total_steps: usize,
    },

    /// A step entered `Running`.
    StepStarted { id: u64, label: String },

    /// A running step reported a progress fraction in [0.0, 1.0].
    StepProgress { id: u64, label: String, fraction: f64 },

    /// A step completed.
    StepCompleted { id: u64, label: String },

    /// A step failed; the run will terminate.
    StepFailed { id: u64, label: String, error: String },

    /// The run finished with every step completed.
    Completed { run_id: String, install_name: String },

    /// The run terminated with a classified failure.
    Failed { run_id: String, error: String },

    /// The run was cancelled before completion.
    Cancelled { run_id: String },
}

impl InstallEvent {
    /// Appropriate tracing level for this event.
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        match self {
            Self::StepFailed { .. } | Self::Failed { .. } => tracing::Level::ERROR,
            Self::Cancelled { .. } => tracing::Level::WARN,
            Self::Started { .. } | Self::Completed { .. } => tracing::Level::INFO,
            Self::StepStarted { .. } | Self::StepCompleted { .. } => tracing::Level::DEBUG,
            Self::StepProgress { .. } => tracing::Level::TRACE,
        }
    }
}
