use std::fmt;

/// Maximum number of control points the fragment shader is compiled for.
pub const MAX_POINTS: usize = 7;

/// Default surface size for a preview instance, in physical pixels.
pub const DEFAULT_SURFACE_SIZE: (u32, u32) = (900, 500);

/// Failure taxonomy for the rendering pipeline.
///
/// Everything except [`ContextLost`](PipelineError::ContextLost) is terminal
/// for the current pipeline instance: the only retry is a full
/// reconstruction, never partial-state reuse. `ContextLost` is transient and
/// recovered automatically (see [`crate::recovery`]). A render call issued
/// while the pipeline is not ready is *not* an error; it reports
/// [`RenderStatus::Skipped`] and touches no GPU state.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// No usable rendering context could be acquired.
    #[error("no usable rendering device: {0}")]
    UnsupportedDevice(String),
    /// The driver rejected a shader source; carries the diagnostic log.
    #[error("shader compilation failed: {0}")]
    CompileFailure(String),
    /// Pipeline creation (program link) failed.
    #[error("shader pipeline link failed: {0}")]
    LinkFailure(String),
    /// Buffer or program allocation failed.
    #[error("GPU resource allocation failed: {0}")]
    ResourceFailure(String),
    /// The device backing the surface became invalid.
    #[error("rendering context lost")]
    ContextLost,
}

impl PipelineError {
    /// Whether the failure is transient and auto-recoverable.
    pub fn is_transient(&self) -> bool {
        matches!(self, PipelineError::ContextLost)
    }
}

/// Outcome of a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// A frame was drawn and presented.
    Presented,
    /// The frame was silently dropped (pipeline not ready, transient surface
    /// hiccup). Not surfaced as an error.
    Skipped,
}

/// Falloff coefficients controlling how tightly each control point's color
/// dominates nearby pixels.
///
/// Derived purely from point count and the animation flag; there is no
/// independent state. The two-point field uses a squared-distance falloff so
/// a pair of colors blends softly, while larger fields use plain distance
/// and grow sharper as points crowd in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParameters {
    pub sharpness: f32,
    pub squared_falloff: bool,
}

impl ShapeParameters {
    pub fn for_field(point_count: usize, animated: bool) -> Self {
        let sharpness = match point_count {
            0..=2 => 2.2,
            3..=4 => {
                if animated {
                    7.0
                } else {
                    8.0
                }
            }
            5..=6 => {
                if animated {
                    8.0
                } else {
                    9.5
                }
            }
            _ => {
                if animated {
                    9.0
                } else {
                    11.0
                }
            }
        };
        Self {
            sharpness,
            squared_falloff: point_count <= 2,
        }
    }
}

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

impl fmt::Display for Antialiasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Antialiasing::Auto => f.write_str("auto"),
            Antialiasing::Off => f.write_str("off"),
            Antialiasing::Samples(count) => write!(f, "{count}"),
        }
    }
}

/// Immutable configuration passed to the preview surface at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Surface size in physical pixels.
    pub surface_size: (u32, u32),
    /// Palette entries as normalized RGB, ordered by control-point index.
    pub colors: Vec<[f32; 3]>,
    /// Requested number of control points (2-7).
    pub point_count: usize,
    /// Whether control points follow their animated trajectories.
    pub animate: bool,
    /// Optional FPS cap while animating; `None` renders every callback.
    pub target_fps: Option<f32>,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: DEFAULT_SURFACE_SIZE,
            colors: Vec::new(),
            point_count: 4,
            animate: false,
            target_fps: None,
            antialiasing: Antialiasing::default(),
        }
    }
}

impl RendererConfig {
    /// Number of control points actually drawn: bounded by the palette
    /// length and the shader's compiled maximum.
    pub fn active_points(&self) -> usize {
        self.point_count.min(self.colors.len()).min(MAX_POINTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_point_field_uses_soft_squared_falloff() {
        let shape = ShapeParameters::for_field(2, false);
        assert!(shape.squared_falloff);
        assert!((shape.sharpness - 2.2).abs() < f32::EPSILON);
        // Animation does not change the two-point shape.
        assert_eq!(shape, ShapeParameters::for_field(2, true));
    }

    #[test]
    fn sharpness_grows_with_point_count() {
        assert_eq!(ShapeParameters::for_field(4, false).sharpness, 8.0);
        assert_eq!(ShapeParameters::for_field(4, true).sharpness, 7.0);
        assert_eq!(ShapeParameters::for_field(6, false).sharpness, 9.5);
        assert_eq!(ShapeParameters::for_field(6, true).sharpness, 8.0);
        assert_eq!(ShapeParameters::for_field(7, false).sharpness, 11.0);
        assert_eq!(ShapeParameters::for_field(7, true).sharpness, 9.0);
    }

    #[test]
    fn larger_fields_use_plain_distance() {
        for count in 3..=7 {
            assert!(!ShapeParameters::for_field(count, false).squared_falloff);
        }
    }

    #[test]
    fn active_points_respects_palette_and_shader_bounds() {
        let mut config = RendererConfig {
            point_count: 5,
            colors: vec![[0.0; 3]; 3],
            ..RendererConfig::default()
        };
        assert_eq!(config.active_points(), 3);
        config.colors = vec![[0.0; 3]; 9];
        config.point_count = 9;
        assert_eq!(config.active_points(), MAX_POINTS);
    }

    #[test]
    fn transient_classification() {
        assert!(PipelineError::ContextLost.is_transient());
        assert!(!PipelineError::CompileFailure("boom".into()).is_transient());
        assert!(!PipelineError::UnsupportedDevice("none".into()).is_transient());
    }
}
