//! Observable per-step task state
//!
//! [`TaskTracker`] is the ordered collection of [`TaskRecord`]s for one
//! pipeline run. The pipeline mutates it; listeners observe it through
//! point-in-time snapshots, never through live references. A record's status
//! only moves forward along `Pending -> Running -> {Completed | Failed |
//! Cancelled}`.

use launchcore_errors::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;
use tokio::sync::mpsc;

/// Stable identifier of one task within a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// The raw numeric id.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of one task. Transitions are monotonic; terminal statuses are
/// final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    /// Whether this status is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Running => 1,
            Self::Completed | Self::Failed | Self::Cancelled => 2,
        }
    }

    /// Whether a record in this status may be replaced with `next`.
    ///
    /// Forward moves and same-status replacement (progress updates while
    /// `Running`) are allowed; terminal statuses accept nothing.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        !self.is_terminal() && next.rank() >= self.rank()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One step's observable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    /// Semantic tag of what the step does, e.g. `download-artifact:client`.
    pub label: String,
    pub status: TaskStatus,
    /// Progress fraction in [0.0, 1.0]; `None` means indeterminate.
    pub progress: Option<f64>,
}

struct TrackerInner {
    records: Vec<TaskRecord>,
    listeners: Vec<mpsc::UnboundedSender<Vec<TaskRecord>>>,
    next_id: u64,
    finalized: bool,
}

/// Thread-safe ordered collection of task records for one pipeline run.
///
/// Insertion order is plan order and never changes. Every mutation pushes a
/// fresh snapshot to each subscribed listener under the same write guard, so
/// a listener always observes a step's `Running` snapshot before its
/// terminal one.
pub struct TaskTracker {
    inner: RwLock<TrackerInner>,
}

impl TaskTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TrackerInner {
                records: Vec::new(),
                listeners: Vec::new(),
                next_id: 0,
                finalized: false,
            }),
        }
    }

    /// Append a new `Pending` record at the next position.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Finalized`] if the tracker has been
    /// finalized.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn append(&self, label: impl Into<String>) -> Result<TaskRecord> {
        let mut inner = self.inner.write().expect("tracker lock poisoned");
        if inner.finalized {
            return Err(TrackerError::Finalized.into());
        }

        let record = TaskRecord {
            id: TaskId(inner.next_id),
            label: label.into(),
            status: TaskStatus::Pending,
            progress: None,
        };
        inner.next_id += 1;
        inner.records.push(record.clone());
        Self::notify(&mut inner);
        Ok(record)
    }

    /// Replace the status (and optionally the progress) of the record at
    /// `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::UnknownTask`] for an unknown id and
    /// [`TrackerError::InvalidTransition`] if the requested status would
    /// move backwards or leave a terminal status.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn update(
        &self,
        id: TaskId,
        status: TaskStatus,
        progress: Option<f64>,
    ) -> Result<TaskRecord> {
        let mut inner = self.inner.write().expect("tracker lock poisoned");
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(TrackerError::UnknownTask { id: id.raw() })?;

        if !record.status.can_transition_to(status) {
            return Err(TrackerError::InvalidTransition {
                id: id.raw(),
                from: record.status.to_string(),
                to: status.to_string(),
            }
            .into());
        }

        record.status = status;
        if let Some(fraction) = progress {
            record.progress = Some(fraction.clamp(0.0, 1.0));
        }
        let updated = record.clone();
        Self::notify(&mut inner);
        Ok(updated)
    }

    /// Update the progress fraction of a running record.
    ///
    /// Progress on a record that has already reached a terminal status is
    /// dropped silently: a collaborator's progress callback may race the
    /// step's cancellation, and that race must not surface as an error.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::UnknownTask`] for an unknown id.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_progress(&self, id: TaskId, fraction: f64) -> Result<()> {
        let mut inner = self.inner.write().expect("tracker lock poisoned");
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(TrackerError::UnknownTask { id: id.raw() })?;

        if record.status.is_terminal() {
            return Ok(());
        }
        record.progress = Some(fraction.clamp(0.0, 1.0));
        Self::notify(&mut inner);
        Ok(())
    }

    /// A consistent point-in-time copy of all records, in plan order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TaskRecord> {
        self.inner
            .read()
            .expect("tracker lock poisoned")
            .records
            .clone()
    }

    /// Register a listener that receives a snapshot after every mutation.
    ///
    /// The current snapshot is delivered immediately so late subscribers
    /// start consistent. Delivery is at-least-once per change; listeners
    /// must tolerate duplicate-equivalent snapshots.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Vec<TaskRecord>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.write().expect("tracker lock poisoned");
        let _ = tx.send(inner.records.clone());
        inner.listeners.push(tx);
        rx
    }

    /// Mark the tracker finalized; further `append` calls fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn finalize(&self) {
        let mut inner = self.inner.write().expect("tracker lock poisoned");
        inner.finalized = true;
    }

    /// Whether the tracker has been finalized.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.inner.read().expect("tracker lock poisoned").finalized
    }

    fn notify(inner: &mut TrackerInner) {
        let snapshot = inner.records.clone();
        inner
            .listeners
            .retain(|listener| listener.send(snapshot.clone()).is_ok());
    }
}

impl Default for TaskTracker {
    fn default() -> Self {
        Self::new()
    }
}
