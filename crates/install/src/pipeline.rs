//! The installation pipeline orchestrator
//!
//! One [`InstallPipeline`] instance drives exactly one run: it derives the
//! step plan from the request, registers every step with the task tracker,
//! executes the stages (resolve, bounded-concurrency downloads, optional
//! external processor, finalize) honoring the shared cancellation token,
//! and reports the terminal outcome through exactly one of the caller's
//! callbacks, or through neither when the run was cancelled.

use crate::cancel::CancellationController;
use crate::collaborators::Collaborators;
use crate::config::PipelineConfig;
use crate::plan::{PlannedStep, StepKind, StepPlan};
use futures::stream::{FuturesUnordered, StreamExt};
use launchcore_errors::{ClassifiedError, Error, InstallError, Result};
use launchcore_events::{
    EventEmitter, EventSender, InstallEvent, TaskId, TaskStatus, TaskTracker,
};
use launchcore_types::{ArtifactSpec, InstallationRequest};
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;

const IDLE: u8 = 0;
const PLANNING: u8 = 1;
const RUNNING: u8 = 2;
const SUCCEEDED: u8 = 3;
const FAILED: u8 = 4;
const CANCELLED: u8 = 5;

/// Lifecycle of one pipeline instance. Terminal states are final; a new
/// run requires a new instance with its own tracker/controller pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Planning,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl PipelineState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            IDLE => Self::Idle,
            PLANNING => Self::Planning,
            RUNNING => Self::Running,
            SUCCEEDED => Self::Succeeded,
            FAILED => Self::Failed,
            _ => Self::Cancelled,
        }
    }
}

/// Orchestrator for one installation run.
pub struct InstallPipeline {
    shared: Arc<RunShared>,
}

struct RunShared {
    config: PipelineConfig,
    collaborators: Collaborators,
    tracker: Arc<TaskTracker>,
    cancel: Arc<CancellationController>,
    state: AtomicU8,
    events: Option<EventSender>,
    run_id: Uuid,
}

impl EventEmitter for RunShared {
    fn event_sender(&self) -> Option<&EventSender> {
        self.events.as_ref()
    }
}

enum StepOutcome<T> {
    Done(T),
    Failed(Error),
    Cancelled,
}

enum RunOutcome {
    Succeeded,
    Failed(Error),
    Cancelled,
}

impl InstallPipeline {
    /// Create a pipeline with no lifecycle event sink.
    #[must_use]
    pub fn new(config: PipelineConfig, collaborators: Collaborators) -> Self {
        Self::build(config, collaborators, None)
    }

    /// Create a pipeline that pushes lifecycle events to `events`.
    #[must_use]
    pub fn with_events(
        config: PipelineConfig,
        collaborators: Collaborators,
        events: EventSender,
    ) -> Self {
        Self::build(config, collaborators, Some(events))
    }

    fn build(
        config: PipelineConfig,
        collaborators: Collaborators,
        events: Option<EventSender>,
    ) -> Self {
        Self {
            shared: Arc::new(RunShared {
                config,
                collaborators,
                tracker: Arc::new(TaskTracker::new()),
                cancel: Arc::new(CancellationController::new()),
                state: AtomicU8::new(IDLE),
                events,
                run_id: Uuid::new_v4(),
            }),
        }
    }

    /// Begin the run for `request`.
    ///
    /// Returns immediately; the run executes on its own task, so this must
    /// be called from within a Tokio runtime. The outcome arrives through
    /// exactly one of `on_success`/`on_error`, or through neither if the
    /// run is cancelled. If `cancel` was called before `start`, the run is
    /// treated as pre-cancelled: every planned step ends `Cancelled` and
    /// no callback fires.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::AlreadyRunning`] if `start` was already
    /// called on this instance.
    pub fn start<S, E>(
        &self,
        request: InstallationRequest,
        on_success: S,
        on_error: E,
    ) -> Result<()>
    where
        S: FnOnce() + Send + 'static,
        E: FnOnce(ClassifiedError) + Send + 'static,
    {
        self.shared
            .state
            .compare_exchange(IDLE, PLANNING, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| InstallError::AlreadyRunning)?;

        let plan = StepPlan::from_request(&request);
        let mut steps = Vec::with_capacity(plan.len());
        for planned in plan.steps() {
            let record = self.shared.tracker.append(planned.label())?;
            steps.push((record.id, planned.clone()));
        }

        self.shared.emit(InstallEvent::Started {
            run_id: self.shared.run_id.to_string(),
            version: request.version.to_string(),
            install_name: request.install_name.clone(),
            total_steps: steps.len(),
        });
        tracing::info!(
            run_id = %self.shared.run_id,
            version = %request.version,
            steps = steps.len(),
            "installation run started"
        );

        self.shared.state.store(RUNNING, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        tokio::spawn(run(shared, request, steps, on_success, on_error));
        Ok(())
    }

    /// Request cooperative cancellation of the run.
    ///
    /// Idempotent and safe at any time, including before `start`.
    pub fn cancel(&self) {
        self.shared.cancel.request_cancel();
    }

    /// The task tracker for this run, for snapshots and subscriptions.
    #[must_use]
    pub fn tracker(&self) -> Arc<TaskTracker> {
        Arc::clone(&self.shared.tracker)
    }

    /// The cancellation controller shared across this run's steps.
    #[must_use]
    pub fn cancellation(&self) -> Arc<CancellationController> {
        Arc::clone(&self.shared.cancel)
    }

    /// Current pipeline state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        PipelineState::from_raw(self.shared.state.load(Ordering::Acquire))
    }

    /// Identifier of this run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.shared.run_id
    }
}

impl EventEmitter for InstallPipeline {
    fn event_sender(&self) -> Option<&EventSender> {
        self.shared.events.as_ref()
    }
}

async fn run<S, E>(
    shared: Arc<RunShared>,
    request: InstallationRequest,
    steps: Vec<(TaskId, PlannedStep)>,
    on_success: S,
    on_error: E,
) where
    S: FnOnce() + Send + 'static,
    E: FnOnce(ClassifiedError) + Send + 'static,
{
    match execute(&shared, &request, &steps).await {
        RunOutcome::Succeeded => {
            shared.state.store(SUCCEEDED, Ordering::Release);
            shared.tracker.finalize();
            shared.emit(InstallEvent::Completed {
                run_id: shared.run_id.to_string(),
                install_name: request.install_name.clone(),
            });
            tracing::info!(run_id = %shared.run_id, "installation completed");
            on_success();
        }
        RunOutcome::Failed(error) => {
            cancel_unfinished(&shared);
            let classified = ClassifiedError::classify(&error);
            shared.state.store(FAILED, Ordering::Release);
            shared.tracker.finalize();
            shared.emit(InstallEvent::Failed {
                run_id: shared.run_id.to_string(),
                error: classified.to_string(),
            });
            tracing::error!(
                run_id = %shared.run_id,
                error = %error,
                category = classified.code(),
                "installation failed"
            );
            on_error(classified);
        }
        RunOutcome::Cancelled => {
            cancel_unfinished(&shared);
            shared.cancel.acknowledge_stopped();
            shared.state.store(CANCELLED, Ordering::Release);
            shared.tracker.finalize();
            shared.emit(InstallEvent::Cancelled {
                run_id: shared.run_id.to_string(),
            });
            tracing::warn!(run_id = %shared.run_id, "installation cancelled");
            // Cancellation is a distinct terminal outcome: neither
            // callback fires.
        }
    }
}

async fn execute(
    shared: &RunShared,
    request: &InstallationRequest,
    steps: &[(TaskId, PlannedStep)],
) -> RunOutcome {
    let mut resolve_id = None;
    let mut downloads = Vec::new();
    let mut processor_id = None;
    let mut finalize_id = None;
    for (id, step) in steps {
        match &step.kind {
            StepKind::Resolve => resolve_id = Some(*id),
            StepKind::Download { artifact } => downloads.push((*id, artifact.clone())),
            StepKind::RunProcessor => processor_id = Some(*id),
            StepKind::Finalize => finalize_id = Some(*id),
        }
    }
    let (Some(resolve_id), Some(finalize_id)) = (resolve_id, finalize_id) else {
        return RunOutcome::Failed(InstallError::PlanEmpty.into());
    };

    let resolved = match run_step(
        shared,
        resolve_id,
        shared.collaborators.resolver.resolve(request),
    )
    .await
    {
        StepOutcome::Done(resolved) => resolved,
        StepOutcome::Failed(error) => return RunOutcome::Failed(error),
        StepOutcome::Cancelled => return RunOutcome::Cancelled,
    };

    if !downloads.is_empty() {
        let semaphore = Arc::new(Semaphore::new(shared.config.max_concurrent_downloads.max(1)));
        let mut in_flight: FuturesUnordered<_> = downloads
            .iter()
            .map(|(id, name)| {
                download_step(
                    shared,
                    *id,
                    name.clone(),
                    resolved.artifact(name).cloned(),
                    Arc::clone(&semaphore),
                )
            })
            .collect();

        while let Some(outcome) = in_flight.next().await {
            match outcome {
                StepOutcome::Done(()) => {}
                StepOutcome::Failed(error) => {
                    // Dropping the stream stops sibling downloads at their
                    // next await point; they are marked Cancelled below.
                    drop(in_flight);
                    return RunOutcome::Failed(error);
                }
                StepOutcome::Cancelled => {
                    drop(in_flight);
                    return RunOutcome::Cancelled;
                }
            }
        }
    }

    if let Some(processor_id) = processor_id {
        if let Some(spec) = resolved.process.clone() {
            let runner = Arc::clone(&shared.collaborators.runner);
            match run_step(shared, processor_id, async move { runner.run(&spec).await }).await {
                StepOutcome::Done(()) => {}
                StepOutcome::Failed(error) => return RunOutcome::Failed(error),
                StepOutcome::Cancelled => return RunOutcome::Cancelled,
            }
        } else {
            // The resolver decided no processor run is needed after all.
            if shared.cancel.is_cancel_requested() {
                let _ = shared
                    .tracker
                    .update(processor_id, TaskStatus::Cancelled, None);
                return RunOutcome::Cancelled;
            }
            if let Ok(record) = shared
                .tracker
                .update(processor_id, TaskStatus::Completed, None)
            {
                shared.emit(InstallEvent::StepCompleted {
                    id: processor_id.raw(),
                    label: record.label,
                });
            }
        }
    }

    match run_step(
        shared,
        finalize_id,
        shared.collaborators.finalizer.finalize(&resolved, request),
    )
    .await
    {
        StepOutcome::Done(()) => RunOutcome::Succeeded,
        StepOutcome::Failed(error) => RunOutcome::Failed(error),
        StepOutcome::Cancelled => RunOutcome::Cancelled,
    }
}

/// Run one sequential step: check the token, mark Running, race the
/// collaborator future against cancellation, record the terminal status.
async fn run_step<T, F>(shared: &RunShared, id: TaskId, fut: F) -> StepOutcome<T>
where
    F: Future<Output = Result<T>> + Send,
{
    if shared.cancel.is_cancel_requested() {
        let _ = shared.tracker.update(id, TaskStatus::Cancelled, None);
        return StepOutcome::Cancelled;
    }

    let label = match shared.tracker.update(id, TaskStatus::Running, None) {
        Ok(record) => record.label,
        Err(error) => return StepOutcome::Failed(error),
    };
    shared.emit(InstallEvent::StepStarted {
        id: id.raw(),
        label: label.clone(),
    });

    tokio::select! {
        () = shared.cancel.cancelled_wait() => {
            let _ = shared.tracker.update(id, TaskStatus::Cancelled, None);
            StepOutcome::Cancelled
        }
        result = fut => match result {
            Ok(value) => {
                let _ = shared.tracker.update(id, TaskStatus::Completed, None);
                shared.emit(InstallEvent::StepCompleted { id: id.raw(), label });
                tracing::debug!(task = %id, "step completed");
                StepOutcome::Done(value)
            }
            Err(error) => {
                let _ = shared.tracker.update(id, TaskStatus::Failed, None);
                shared.emit(InstallEvent::StepFailed {
                    id: id.raw(),
                    label,
                    error: error.to_string(),
                });
                StepOutcome::Failed(error)
            }
        }
    }
}

/// Run one download step under the concurrency semaphore.
async fn download_step(
    shared: &RunShared,
    id: TaskId,
    name: String,
    artifact: Option<ArtifactSpec>,
    semaphore: Arc<Semaphore>,
) -> StepOutcome<()> {
    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => return StepOutcome::Failed(Error::internal("download semaphore closed")),
    };

    if shared.cancel.is_cancel_requested() {
        let _ = shared.tracker.update(id, TaskStatus::Cancelled, None);
        return StepOutcome::Cancelled;
    }

    let Some(artifact) = artifact else {
        let _ = shared.tracker.update(id, TaskStatus::Failed, None);
        let error: Error = InstallError::MissingArtifact { name: name.clone() }.into();
        shared.emit(InstallEvent::StepFailed {
            id: id.raw(),
            label: format!("download-artifact:{name}"),
            error: error.to_string(),
        });
        return StepOutcome::Failed(error);
    };

    let label = match shared.tracker.update(id, TaskStatus::Running, Some(0.0)) {
        Ok(record) => record.label,
        Err(error) => return StepOutcome::Failed(error),
    };
    shared.emit(InstallEvent::StepStarted {
        id: id.raw(),
        label: label.clone(),
    });

    let progress_tracker = Arc::clone(&shared.tracker);
    let progress_events = shared.events.clone();
    let progress_label = label.clone();
    let on_progress = move |fraction: f64| {
        // Progress racing a cancelled step is dropped by the tracker.
        let _ = progress_tracker.set_progress(id, fraction);
        if let Some(sender) = &progress_events {
            let _ = sender.send(InstallEvent::StepProgress {
                id: id.raw(),
                label: progress_label.clone(),
                fraction,
            });
        }
    };

    tokio::select! {
        () = shared.cancel.cancelled_wait() => {
            let _ = shared.tracker.update(id, TaskStatus::Cancelled, None);
            StepOutcome::Cancelled
        }
        result = shared.collaborators.fetcher.fetch(&artifact, &on_progress) => match result {
            Ok(()) => {
                let _ = shared.tracker.update(id, TaskStatus::Completed, Some(1.0));
                shared.emit(InstallEvent::StepCompleted { id: id.raw(), label });
                tracing::debug!(task = %id, artifact = %artifact.name, "artifact downloaded");
                StepOutcome::Done(())
            }
            Err(error) => {
                let _ = shared.tracker.update(id, TaskStatus::Failed, None);
                shared.emit(InstallEvent::StepFailed {
                    id: id.raw(),
                    label,
                    error: error.to_string(),
                });
                StepOutcome::Failed(error)
            }
        }
    }
}

/// Mark every record that has not reached a terminal status as Cancelled.
fn cancel_unfinished(shared: &RunShared) {
    for record in shared.tracker.snapshot() {
        if !record.status.is_terminal() {
            let _ = shared
                .tracker
                .update(record.id, TaskStatus::Cancelled, None);
        }
    }
}
