//! Cooperative cancellation for one pipeline run
//!
//! Steps call into collaborators (network transport, external process) that
//! cannot be preempted safely, so cancellation is cooperative: every step
//! checks the shared controller before starting and at its await points, and
//! unwinds its own resources on a positive check.

use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::Notify;

const ACTIVE: u8 = 0;
const CANCELLING: u8 = 1;
const CANCELLED: u8 = 2;

/// Lifecycle of a run's cancellation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelState {
    /// No cancellation requested.
    Active,
    /// Cancellation requested; steps are still winding down.
    Cancelling,
    /// All steps have observed cancellation and stopped.
    Cancelled,
}

/// Cancellation token shared by reference across all steps of one run.
#[derive(Debug)]
pub struct CancellationController {
    state: AtomicU8,
    notify: Notify,
}

impl CancellationController {
    /// Create a controller in the `Active` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ACTIVE),
            notify: Notify::new(),
        }
    }

    /// Current token state.
    #[must_use]
    pub fn state(&self) -> CancelState {
        match self.state.load(Ordering::Acquire) {
            ACTIVE => CancelState::Active,
            CANCELLING => CancelState::Cancelling,
            _ => CancelState::Cancelled,
        }
    }

    /// Request cancellation. Idempotent: transitions `Active ->
    /// Cancelling`; a no-op once cancelling or cancelled.
    pub fn request_cancel(&self) {
        if self
            .state
            .compare_exchange(ACTIVE, CANCELLING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.notify.notify_waiters();
        }
    }

    /// Non-blocking poll, used by every step before starting and at
    /// checkpoints during long work.
    #[must_use]
    pub fn is_cancel_requested(&self) -> bool {
        self.state.load(Ordering::Acquire) != ACTIVE
    }

    /// Called once by the orchestrator after all steps have observed
    /// cancellation and ceased. Transitions `Cancelling -> Cancelled`.
    pub fn acknowledge_stopped(&self) {
        let _ = self
            .state
            .compare_exchange(CANCELLING, CANCELLED, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Resolve once cancellation has been requested.
    ///
    /// This is the select-able safe point: racing an in-flight collaborator
    /// future against it stops the step at its next await point without
    /// preempting the collaborator mid-operation.
    pub async fn cancelled_wait(&self) {
        loop {
            if self.is_cancel_requested() {
                return;
            }
            let notified = self.notify.notified();
            // Re-check after registering to close the request/notify race.
            if self.is_cancel_requested() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for CancellationController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_request_cancel_is_idempotent() {
        let controller = CancellationController::new();
        assert_eq!(controller.state(), CancelState::Active);
        assert!(!controller.is_cancel_requested());

        controller.request_cancel();
        controller.request_cancel();
        assert_eq!(controller.state(), CancelState::Cancelling);
        assert!(controller.is_cancel_requested());
    }

    #[test]
    fn test_acknowledge_requires_cancelling() {
        let controller = CancellationController::new();
        controller.acknowledge_stopped();
        assert_eq!(controller.state(), CancelState::Active);

        controller.request_cancel();
        controller.acknowledge_stopped();
        assert_eq!(controller.state(), CancelState::Cancelled);
        assert!(controller.is_cancel_requested());
    }

    #[tokio::test]
    async fn test_cancelled_wait_resolves_after_request() {
        let controller = Arc::new(CancellationController::new());
        let waiter = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.cancelled_wait().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.request_cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_wait_resolves_immediately_when_already_cancelled() {
        let controller = CancellationController::new();
        controller.request_cancel();
        tokio::time::timeout(Duration::from_millis(100), controller.cancelled_wait())
            .await
            .expect("already-cancelled wait must not block");
    }
}
