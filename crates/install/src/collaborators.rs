//! External collaborator contracts
//!
//! The pipeline stays implementation-agnostic to everything that touches
//! the outside world: metadata resolution, artifact transport, the external
//! processor, and installed-version persistence all live behind these
//! traits. Resource cleanup on any exit path (success, failure,
//! cancellation) is the implementor's responsibility.

use async_trait::async_trait;
use launchcore_errors::Result;
use launchcore_types::{ArtifactSpec, InstallationRequest, ProcessSpec, ResolvedPlan};
use std::sync::Arc;

/// Progress callback for long-running collaborator work; receives a
/// fraction in [0.0, 1.0].
pub type ProgressFn<'a> = &'a (dyn Fn(f64) + Send + Sync);

/// Resolves an installation request into a concrete plan of artifact URLs
/// and an optional processor invocation.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Resolve download URLs and processor metadata for `request`.
    async fn resolve(&self, request: &InstallationRequest) -> Result<ResolvedPlan>;
}

/// Fetches one artifact to its destination path.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetch `artifact`, reporting progress through `on_progress`.
    ///
    /// Whether a partially written destination is deleted or kept for
    /// resumption is the implementor's policy.
    async fn fetch(&self, artifact: &ArtifactSpec, on_progress: ProgressFn<'_>) -> Result<()>;
}

/// Runs the external processor an add-on installer requires.
#[async_trait]
pub trait ExternalProcessRunner: Send + Sync {
    /// Run `spec` to completion; a nonzero exit surfaces as
    /// [`ProcessError::Crashed`](launchcore_errors::ProcessError::Crashed).
    async fn run(&self, spec: &ProcessSpec) -> Result<()>;
}

/// Persists local installed-version state once every other step completed.
#[async_trait]
pub trait InstalledStateFinalizer: Send + Sync {
    /// Record the installed version described by `plan`/`request`.
    async fn finalize(&self, plan: &ResolvedPlan, request: &InstallationRequest) -> Result<()>;
}

/// The bundle of collaborators one pipeline run calls into.
#[derive(Clone)]
pub struct Collaborators {
    pub resolver: Arc<dyn MetadataResolver>,
    pub fetcher: Arc<dyn ArtifactFetcher>,
    pub runner: Arc<dyn ExternalProcessRunner>,
    pub finalizer: Arc<dyn InstalledStateFinalizer>,
}

impl Collaborators {
    /// Bundle the four collaborator implementations.
    pub fn new(
        resolver: Arc<dyn MetadataResolver>,
        fetcher: Arc<dyn ArtifactFetcher>,
        runner: Arc<dyn ExternalProcessRunner>,
        finalizer: Arc<dyn InstalledStateFinalizer>,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            runner,
            finalizer,
        }
    }
}
