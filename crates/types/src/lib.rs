#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Shared value types for the launchcore installation core
//!
//! This crate holds the immutable descriptions that flow through the
//! installation pipeline: what the caller asked to install, what metadata
//! resolution produced, and what the finalizer records locally. Nothing in
//! here performs I/O.

pub mod plan;
pub mod request;
pub mod version;

pub use plan::{ArtifactSpec, InstalledVersion, ProcessSpec, ResolvedPlan};
pub use request::{AddonProvider, AddonSelection, InstallationRequest};
pub use version::VersionId;
