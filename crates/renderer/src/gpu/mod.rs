//! GPU-facing half of the renderer.
//!
//! `context` acquires the device and surface, `pipeline` compiles the fixed
//! shader pair and allocates buffers, `uniforms` mirrors the std140 uniform
//! block, and `state` ties them together as the single owned resource behind
//! a rendering surface.

mod context;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
