//! Frame pacing and render-loop lifecycle.
//!
//! [`FrameScheduler`] decides when the render loop owes the surface a frame.
//! It is a pure state machine over `Instant`s: the platform event loop asks
//! `ready_for_frame` before requesting a redraw and reports back with
//! `mark_rendered`, so at most one frame is ever in flight. A static policy
//! arms exactly one frame per input change; an animated policy paces frames
//! against an optional FPS cap.
//!
//! The scheduler never talks to a timer itself. Whatever callback primitive
//! the platform offers (a winit event loop here, anything monotonic-clocked
//! elsewhere) drives it by polling `next_deadline`.

use std::time::{Duration, Instant};

/// How the surface should be driven.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulePolicy {
    /// One layout+render pass per input change, then idle.
    Static,
    /// Continuous rendering, optionally clamped to a frame rate.
    Animated {
        /// Requested frames-per-second cap; `None` renders every callback.
        target_fps: Option<f32>,
    },
}

fn normalize_fps(value: Option<f32>) -> Option<f32> {
    value.and_then(|fps| if fps > 0.0 { Some(fps) } else { None })
}

/// Drives at most one in-flight frame request at a time.
#[derive(Debug)]
pub struct FrameScheduler {
    policy: SchedulePolicy,
    running: bool,
    pending: bool,
    last_rendered: Option<Instant>,
}

impl FrameScheduler {
    /// Creates a stopped scheduler; call [`start`](Self::start) to arm it.
    ///
    /// An animated policy with a non-positive FPS cap is treated as uncapped.
    pub fn new(policy: SchedulePolicy) -> Self {
        let policy = match policy {
            SchedulePolicy::Animated { target_fps } => SchedulePolicy::Animated {
                target_fps: normalize_fps(target_fps),
            },
            SchedulePolicy::Static => SchedulePolicy::Static,
        };
        Self {
            policy,
            running: false,
            pending: false,
            last_rendered: None,
        }
    }

    pub fn policy(&self) -> SchedulePolicy {
        self.policy
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts the loop and arms the first frame.
    pub fn start(&mut self) {
        tracing::debug!(policy = ?self.policy, "frame scheduler started");
        self.running = true;
        self.pending = true;
        self.last_rendered = None;
    }

    /// Stops the loop and cancels any pending frame.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!("frame scheduler stopped");
        }
        self.running = false;
        self.pending = false;
    }

    /// Reacts to an input change (palette, point count, animate toggle):
    /// cancels the pending frame and arms a fresh one.
    pub fn invalidate(&mut self) {
        if self.running {
            self.pending = true;
            self.last_rendered = None;
        }
    }

    /// Drops the pending frame without rearming. Callers must do this before
    /// tearing down or reinitializing the surface.
    pub fn cancel_pending(&mut self) {
        self.pending = false;
    }

    /// Whether the loop owes the surface a frame at `now`.
    pub fn ready_for_frame(&self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        if self.pending {
            return true;
        }
        match self.policy {
            SchedulePolicy::Static => false,
            SchedulePolicy::Animated { target_fps } => match (target_fps, self.last_rendered) {
                (None, _) | (_, None) => true,
                (Some(fps), Some(last)) => now >= last + frame_interval(fps),
            },
        }
    }

    /// Records a presented frame and clears the pending flag.
    pub fn mark_rendered(&mut self, now: Instant) {
        self.pending = false;
        self.last_rendered = Some(now);
    }

    /// Instant at which the next frame becomes due, if the policy paces one.
    ///
    /// Static policies and uncapped animation return `None`: the former waits
    /// for invalidation, the latter renders on every callback.
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.running || self.pending {
            return None;
        }
        match self.policy {
            SchedulePolicy::Static => None,
            SchedulePolicy::Animated { target_fps } => {
                let fps = target_fps?;
                self.last_rendered.map(|last| last + frame_interval(fps))
            }
        }
    }
}

fn frame_interval(fps: f32) -> Duration {
    Duration::from_secs_f32(1.0 / fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_scheduler_never_fires() {
        let scheduler = FrameScheduler::new(SchedulePolicy::Static);
        assert!(!scheduler.is_running());
        assert!(!scheduler.ready_for_frame(Instant::now()));
    }

    #[test]
    fn static_policy_renders_exactly_once() {
        let mut scheduler = FrameScheduler::new(SchedulePolicy::Static);
        let now = Instant::now();
        scheduler.start();
        assert!(scheduler.ready_for_frame(now));
        scheduler.mark_rendered(now);
        assert!(!scheduler.ready_for_frame(now + Duration::from_secs(10)));
    }

    #[test]
    fn invalidate_rearms_a_static_frame() {
        let mut scheduler = FrameScheduler::new(SchedulePolicy::Static);
        let now = Instant::now();
        scheduler.start();
        scheduler.mark_rendered(now);
        scheduler.invalidate();
        assert!(scheduler.ready_for_frame(now));
    }

    #[test]
    fn uncapped_animation_is_always_ready() {
        let mut scheduler =
            FrameScheduler::new(SchedulePolicy::Animated { target_fps: None });
        let now = Instant::now();
        scheduler.start();
        scheduler.mark_rendered(now);
        assert!(scheduler.ready_for_frame(now));
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn fps_cap_paces_frames() {
        let mut scheduler =
            FrameScheduler::new(SchedulePolicy::Animated { target_fps: Some(10.0) });
        let now = Instant::now();
        scheduler.start();
        scheduler.mark_rendered(now);
        assert!(!scheduler.ready_for_frame(now + Duration::from_millis(50)));
        assert!(scheduler.ready_for_frame(now + Duration::from_millis(100)));
        assert_eq!(
            scheduler.next_deadline(),
            Some(now + Duration::from_millis(100))
        );
    }

    #[test]
    fn zero_fps_treated_as_uncapped() {
        let mut scheduler =
            FrameScheduler::new(SchedulePolicy::Animated { target_fps: Some(0.0) });
        scheduler.start();
        let now = Instant::now();
        scheduler.mark_rendered(now);
        assert!(scheduler.ready_for_frame(now));
    }

    #[test]
    fn stop_cancels_the_pending_frame() {
        let mut scheduler = FrameScheduler::new(SchedulePolicy::Static);
        scheduler.start();
        scheduler.stop();
        assert!(!scheduler.ready_for_frame(Instant::now()));
    }

    #[test]
    fn cancel_pending_drops_the_armed_frame() {
        let mut scheduler = FrameScheduler::new(SchedulePolicy::Static);
        scheduler.start();
        scheduler.cancel_pending();
        assert!(scheduler.is_running());
        assert!(!scheduler.ready_for_frame(Instant::now()));
    }
}
