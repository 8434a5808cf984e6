//! Device-loss recovery state machine.
//!
//! A rendering surface owns exactly one [`RecoveryTracker`], which tags the
//! pipeline's lifecycle phase and times the automatic reinitialization after
//! a context loss. The tracker is pure state over `Instant`s — no GPU
//! handles — so the loss/restore protocol unit-tests without a device.
//!
//! Protocol: a loss signal may arrive asynchronously relative to the frame
//! loop, so the loss handler only flips the phase (and the caller cancels
//! any scheduled frame); it never mutates GPU state inline. Restoration arms
//! a settle deadline; once [`reinit_due`](RecoveryTracker::reinit_due) fires
//! the owner rebuilds the whole pipeline and reports back with `mark_ready`
//! or `mark_failed`. A failure during that one automatic attempt is
//! terminal.

use std::time::{Duration, Instant};

/// Delay between observing a restored context and rebuilding the pipeline,
/// giving the driver time to settle.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Lifecycle phase of the device-bound pipeline object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelinePhase {
    /// No device resources exist yet.
    Uninitialized,
    /// Pipeline is compiled, buffers exist, render calls are accepted.
    Ready,
    /// The device became invalid; render calls are dropped until the
    /// automatic reinitialization completes.
    ContextLost,
    /// Terminal: an unrecoverable error occurred. Carries the human-readable
    /// message surfaced to the caller.
    Failed { message: String },
}

/// Tags the pipeline phase and schedules loss recovery.
#[derive(Debug)]
pub struct RecoveryTracker {
    settle: Duration,
    phase: PipelinePhase,
    reinit_at: Option<Instant>,
}

impl RecoveryTracker {
    pub fn new() -> Self {
        Self::with_settle(SETTLE_DELAY)
    }

    /// Tracker with a custom settle delay; tests use short delays.
    pub fn with_settle(settle: Duration) -> Self {
        Self {
            settle,
            phase: PipelinePhase::Uninitialized,
            reinit_at: None,
        }
    }

    pub fn phase(&self) -> &PipelinePhase {
        &self.phase
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, PipelinePhase::Ready)
    }

    /// Terminal failure message, if the pipeline has failed.
    pub fn failure(&self) -> Option<&str> {
        match &self.phase {
            PipelinePhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Records a successful (re)initialization.
    pub fn mark_ready(&mut self) {
        self.phase = PipelinePhase::Ready;
        self.reinit_at = None;
    }

    /// Loss signal: flips the phase and nothing else. Only meaningful while
    /// Ready; a loss reported mid-recovery or after a terminal failure is
    /// ignored.
    pub fn mark_lost(&mut self) {
        if self.is_ready() {
            self.phase = PipelinePhase::ContextLost;
            self.reinit_at = None;
        }
    }

    /// Restore signal: arms the automatic reinitialization deadline.
    pub fn mark_restored(&mut self, now: Instant) {
        if matches!(self.phase, PipelinePhase::ContextLost) && self.reinit_at.is_none() {
            self.reinit_at = Some(now + self.settle);
        }
    }

    /// Whether the owner should rebuild the pipeline now. Consumes the armed
    /// deadline so the rebuild is attempted exactly once per restore.
    pub fn reinit_due(&mut self, now: Instant) -> bool {
        match self.reinit_at {
            Some(deadline) if now >= deadline => {
                self.reinit_at = None;
                true
            }
            _ => false,
        }
    }

    /// Records a terminal failure; no further recovery is attempted.
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.phase = PipelinePhase::Failed {
            message: message.into(),
        };
        self.reinit_at = None;
    }

    /// Deadline of the pending reinitialization, for event-loop wakeup.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.reinit_at
    }
}

impl Default for RecoveryTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: Duration = Duration::from_millis(100);

    fn ready_tracker() -> RecoveryTracker {
        let mut tracker = RecoveryTracker::with_settle(SETTLE);
        tracker.mark_ready();
        tracker
    }

    #[test]
    fn starts_uninitialized_and_not_ready() {
        let tracker = RecoveryTracker::new();
        assert_eq!(*tracker.phase(), PipelinePhase::Uninitialized);
        assert!(!tracker.is_ready());
    }

    #[test]
    fn loss_then_restore_recovers_within_settle_delay() {
        let mut tracker = ready_tracker();
        let now = Instant::now();

        tracker.mark_lost();
        assert_eq!(*tracker.phase(), PipelinePhase::ContextLost);

        tracker.mark_restored(now);
        assert!(!tracker.reinit_due(now), "must wait out the settle delay");
        assert!(!tracker.reinit_due(now + SETTLE / 2));
        assert!(tracker.reinit_due(now + SETTLE));

        tracker.mark_ready();
        assert!(tracker.is_ready());
    }

    #[test]
    fn reinit_fires_exactly_once_per_restore() {
        let mut tracker = ready_tracker();
        let now = Instant::now();
        tracker.mark_lost();
        tracker.mark_restored(now);
        assert!(tracker.reinit_due(now + SETTLE));
        assert!(!tracker.reinit_due(now + SETTLE * 2));
    }

    #[test]
    fn failed_recovery_is_terminal() {
        let mut tracker = ready_tracker();
        let now = Instant::now();
        tracker.mark_lost();
        tracker.mark_restored(now);
        assert!(tracker.reinit_due(now + SETTLE));

        tracker.mark_failed("device did not come back");
        assert_eq!(tracker.failure(), Some("device did not come back"));

        // A later loss signal must not restart recovery.
        tracker.mark_lost();
        tracker.mark_restored(now + SETTLE * 2);
        assert!(!tracker.reinit_due(now + SETTLE * 10));
        assert!(tracker.failure().is_some());
    }

    #[test]
    fn loss_is_ignored_unless_ready() {
        let mut tracker = RecoveryTracker::with_settle(SETTLE);
        tracker.mark_lost();
        assert_eq!(*tracker.phase(), PipelinePhase::Uninitialized);
    }

    #[test]
    fn duplicate_restore_keeps_the_first_deadline() {
        let mut tracker = ready_tracker();
        let now = Instant::now();
        tracker.mark_lost();
        tracker.mark_restored(now);
        tracker.mark_restored(now + SETTLE * 5);
        assert_eq!(tracker.next_deadline(), Some(now + SETTLE));
    }

    #[test]
    fn ready_clears_any_armed_deadline() {
        let mut tracker = ready_tracker();
        let now = Instant::now();
        tracker.mark_lost();
        tracker.mark_restored(now);
        tracker.mark_ready();
        assert_eq!(tracker.next_deadline(), None);
        assert!(!tracker.reinit_due(now + SETTLE));
    }
}
