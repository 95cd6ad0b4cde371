#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Installation pipeline for the launchcore core
//!
//! This crate orchestrates one installation run end to end: it turns an
//! [`InstallationRequest`](launchcore_types::InstallationRequest) into an
//! ordered step plan, executes the steps against external collaborators
//! (metadata resolution, artifact transport, the external processor,
//! installed-state finalization), publishes per-step state through the
//! task tracker, honors cooperative cancellation at every safe point, and
//! classifies terminal failures for presentation-agnostic reporting.
//!
//! The pipeline never blocks its caller: `start` returns immediately and
//! the outcome arrives through callbacks, while any listener follows the
//! run through tracker snapshots.

pub mod cancel;
pub mod collaborators;
pub mod config;
pub mod pipeline;
pub mod plan;

pub use cancel::{CancelState, CancellationController};
pub use collaborators::{
    ArtifactFetcher, Collaborators, ExternalProcessRunner, InstalledStateFinalizer,
    MetadataResolver, ProgressFn,
};
pub use config::PipelineConfig;
pub use pipeline::{InstallPipeline, PipelineState};
pub use plan::{PlannedStep, StepKind, StepPlan};
