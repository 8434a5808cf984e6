//! Windowed preview surface and its event loop.
//!
//! [`run_preview`] owns the winit event loop that drives the field: the
//! frame scheduler decides when a frame is owed, `layout` places the control
//! points for that instant, and the GPU state draws them. Exactly one
//! producer (the redraw path below) ever issues render calls, and the GPU
//! handles are exclusively owned by the active [`SurfaceState`], so ordering
//! rules — never render unless Ready, cancel pending frames before any
//! teardown or reinit — are enforced in one place.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use scheduler::{FrameScheduler, SchedulePolicy};

use crate::gpu::GpuState;
use crate::layout;
use crate::recovery::RecoveryTracker;
use crate::types::{PipelineError, RenderStatus, RendererConfig, ShapeParameters};

/// Per-surface pipeline owner: window handle, GPU resources, and the
/// loss-recovery phase tag.
struct SurfaceState {
    window: Arc<Window>,
    config: RendererConfig,
    gpu: Option<GpuState>,
    tracker: RecoveryTracker,
}

impl SurfaceState {
    fn new(window: Arc<Window>, config: RendererConfig) -> Self {
        Self {
            window,
            config,
            gpu: None,
            tracker: RecoveryTracker::new(),
        }
    }

    /// Builds the full pipeline from scratch. Any prior resources are
    /// released first; there is no partial-state reuse.
    fn initialize(&mut self) -> Result<(), PipelineError> {
        self.gpu = None;
        let size = PhysicalSize::new(self.config.surface_size.0, self.config.surface_size.1);
        match GpuState::new(self.window.as_ref(), size, self.config.antialiasing) {
            Ok(gpu) => {
                self.gpu = Some(gpu);
                self.tracker.mark_ready();
                Ok(())
            }
            Err(err) => {
                self.tracker.mark_failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Releases GPU resources; idempotent.
    fn teardown(&mut self) {
        self.gpu = None;
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.surface_size = (new_size.width, new_size.height);
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(new_size);
        }
    }

    /// Renders the field at `time` seconds. Not-Ready phases silently skip.
    fn render_frame(&mut self, time: f32) -> Result<RenderStatus, PipelineError> {
        if !self.tracker.is_ready() {
            return Ok(RenderStatus::Skipped);
        }
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(RenderStatus::Skipped);
        };
        let active = self.config.active_points();
        let points = layout::control_points(active, self.config.animate, time);
        let shape = ShapeParameters::for_field(active, self.config.animate);
        gpu.render(&points, &self.config.colors, active, shape)
    }

    /// Loss signal from the frame path: cancel scheduling, drop the device
    /// resources, and arm the automatic reinitialization. wgpu reports loss
    /// terminally (recovery means reacquiring the device), so the restore
    /// deadline is armed as soon as the loss is observed.
    fn handle_loss(&mut self, frame_scheduler: &mut FrameScheduler, now: Instant) {
        warn!("rendering context lost; reinitializing after settle delay");
        frame_scheduler.cancel_pending();
        self.teardown();
        self.tracker.mark_lost();
        self.tracker.mark_restored(now);
    }

    /// Drives the pending reinitialization, if one is due. Returns the
    /// terminal failure message when recovery itself fails.
    fn poll_recovery(
        &mut self,
        frame_scheduler: &mut FrameScheduler,
        now: Instant,
    ) -> Option<String> {
        if !self.tracker.reinit_due(now) {
            return None;
        }
        match self.initialize() {
            Ok(()) => {
                info!("pipeline reinitialised after context loss");
                frame_scheduler.invalidate();
                None
            }
            Err(err) => Some(format!("recovery after context loss failed: {err}")),
        }
    }
}

/// Opens the preview window and runs the render loop until the window is
/// closed, Escape is pressed, or the pipeline fails terminally.
pub fn run_preview(config: RendererConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title("meshfield preview")
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create preview window: {err}"))?;
    let window = Arc::new(window);

    let mut state = SurfaceState::new(window.clone(), config.clone());
    state
        .initialize()
        .map_err(|err| anyhow!("failed to initialise rendering pipeline: {err}"))?;

    let policy = if config.animate {
        SchedulePolicy::Animated {
            target_fps: config.target_fps,
        }
    } else {
        SchedulePolicy::Static
    };
    let mut frame_scheduler = FrameScheduler::new(policy);
    frame_scheduler.start();

    let started = Instant::now();
    // The closure owns the surface state; terminal failures travel out
    // through this slot so the caller sees the message and the retry path.
    let failure: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
    let failure_slot = failure.clone();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        frame_scheduler.stop();
                        state.teardown();
                        elwt.exit();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state == ElementState::Pressed
                            && matches!(event.logical_key, Key::Named(NamedKey::Escape))
                        {
                            frame_scheduler.stop();
                            state.teardown();
                            elwt.exit();
                        }
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(new_size);
                        frame_scheduler.invalidate();
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        if !frame_scheduler.ready_for_frame(now) {
                            return;
                        }
                        let time = started.elapsed().as_secs_f32();
                        match state.render_frame(time) {
                            Ok(RenderStatus::Presented) => frame_scheduler.mark_rendered(now),
                            Ok(RenderStatus::Skipped) => {}
                            Err(PipelineError::ContextLost) => {
                                state.handle_loss(&mut frame_scheduler, now);
                            }
                            Err(err) => {
                                error!(error = %err, "render failed; stopping frame loop");
                                state.tracker.mark_failed(err.to_string());
                                frame_scheduler.stop();
                                *failure_slot.borrow_mut() = Some(err.to_string());
                                elwt.exit();
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                if let Some(message) = state.poll_recovery(&mut frame_scheduler, now) {
                    error!(error = %message, "pipeline recovery failed");
                    frame_scheduler.stop();
                    *failure_slot.borrow_mut() = Some(message);
                    elwt.exit();
                    return;
                }
                if state.tracker.is_ready() && frame_scheduler.ready_for_frame(now) {
                    state.window.request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else if let Some(deadline) = next_wakeup(&frame_scheduler, &state.tracker) {
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                } else {
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))?;

    if let Some(message) = failure.borrow_mut().take() {
        return Err(anyhow!(
            "{message}; relaunch to rebuild the pipeline from scratch"
        ));
    }
    Ok(())
}

/// Earliest of the scheduler's frame deadline and the recovery deadline.
///
/// While the pipeline is not Ready, frame deadlines are meaningless (frames
/// would only be skipped), so only the recovery deadline counts.
fn next_wakeup(frame_scheduler: &FrameScheduler, tracker: &RecoveryTracker) -> Option<Instant> {
    if !tracker.is_ready() {
        return tracker.next_deadline();
    }
    match (frame_scheduler.next_deadline(), tracker.next_deadline()) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}
