//! External-process error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcessError {
    /// The processor exited with a nonzero code.
    #[error("external process exited with code {code}")]
    Crashed { code: i32 },

    #[error("failed to spawn external process: {message}")]
    SpawnFailed { message: String },

    /// The process was killed by a signal before producing an exit code.
    #[error("external process terminated: {message}")]
    Terminated { message: String },
}
