//! Renderer crate for meshfield.
//!
//! Converts a palette and a control-point count into a smoothly blended
//! per-pixel color field on a `wgpu` surface. The overall flow is:
//!
//! ```text
//!   CLI / meshfield
//!          │ RendererConfig
//!          ▼
//!   run_preview ──▶ SurfaceState ──▶ winit event loop ──▶ render_frame()
//!          ▲              │                    │
//!          │              │ FrameScheduler     └─▶ layout ─▶ FieldUniforms ─▶ GPU UBO
//!          │              ▼
//!          └──── RecoveryTracker (loss ▶ settle ▶ rebuild)
//! ```
//!
//! `SurfaceState` owns all GPU resources (surface, device, pipeline,
//! uniforms) plus the loss-recovery phase tag, while [`run_preview`] is the
//! thin entry point driving it from a winit event loop. The shader pair is
//! fixed: a pass-through quad vertex stage and a fragment stage that blends
//! up to [`MAX_POINTS`] weighted control points per pixel.

mod compile;
mod gpu;
pub mod layout;
pub mod recovery;
mod types;
mod window;

pub use layout::control_points;
pub use recovery::{PipelinePhase, RecoveryTracker, SETTLE_DELAY};
pub use types::{
    Antialiasing, PipelineError, RenderStatus, RendererConfig, ShapeParameters,
    DEFAULT_SURFACE_SIZE, MAX_POINTS,
};
pub use window::run_preview;
