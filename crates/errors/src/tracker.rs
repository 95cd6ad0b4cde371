//! Task tracker contract-violation error types
//!
//! These are programming-contract checks, not recoverable user errors: the
//! pipeline must never attempt an invalid transition or touch a finalized
//! tracker.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackerError {
    #[error("tracker is finalized; no further tasks may be appended")]
    Finalized,

    #[error("unknown task id {id}")]
    UnknownTask { id: u64 },

    #[error("invalid status transition for task {id}: {from} -> {to}")]
    InvalidTransition { id: u64, from: String, to: String },
}
