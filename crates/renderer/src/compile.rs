//! Fixed shader pair for the mesh-gradient field.
//!
//! Both shaders are compiled from const GLSL sources; the fragment shader is
//! parameterized by the compile-time maximum point count so the uniform
//! arrays and the blend loop stay in lockstep with [`MAX_POINTS`]. Driver
//! diagnostics are trapped through a validation error scope and surfaced in
//! [`PipelineError::CompileFailure`] instead of crashing the process.

use std::borrow::Cow;

use wgpu::naga::ShaderStage;

use crate::types::{PipelineError, MAX_POINTS};

/// Compiles the pass-through vertex shader for the full-screen quad.
pub(crate) fn compile_vertex_shader(
    device: &wgpu::Device,
) -> Result<wgpu::ShaderModule, PipelineError> {
    create_module(
        device,
        "mesh quad vertex",
        Cow::Borrowed(VERTEX_SHADER_GLSL),
        ShaderStage::Vertex,
    )
}

/// Compiles the radial-falloff blend fragment shader.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
) -> Result<wgpu::ShaderModule, PipelineError> {
    create_module(
        device,
        "mesh field fragment",
        Cow::Owned(fragment_source()),
        ShaderStage::Fragment,
    )
}

fn create_module(
    device: &wgpu::Device,
    label: &str,
    source: Cow<'static, str>,
    stage: ShaderStage,
) -> Result<wgpu::ShaderModule, PipelineError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: source,
            stage,
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(PipelineError::CompileFailure(format!("{label}: {error}")));
    }
    Ok(module)
}

/// Expands the point-slot placeholder to [`MAX_POINTS`].
fn fragment_source() -> String {
    FRAGMENT_SHADER_GLSL.replace("POINT_SLOTS", &MAX_POINTS.to_string())
}

/// Identity pass-through of the full-screen quad vertices.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 a_position;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

/// Per-pixel weighted blend over the active control points.
///
/// The uniform block layout must match `FieldUniforms` in `gpu/uniforms.rs`:
/// point and color slots are vec4-strided per std140, `resolution.z` carries
/// the sharpness coefficient, `counts.x` the active point count, and
/// `counts.y` the squared-falloff flag used by two-point fields.
const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform FieldParams {
    vec4 points[POINT_SLOTS];
    vec4 colors[POINT_SLOTS];
    vec4 resolution;
    ivec4 counts;
} ubo;

void main() {
    vec2 uv = gl_FragCoord.xy / ubo.resolution.xy;
    uv.y = 1.0 - uv.y;

    float sharpness = ubo.resolution.z;
    vec3 color = vec3(0.0);
    float total = 0.0;
    for (int i = 0; i < POINT_SLOTS; i++) {
        if (i < ubo.counts.x) {
            float d = distance(uv, ubo.points[i].xy);
            float w;
            if (ubo.counts.y != 0) {
                w = exp(-d * d * sharpness);
            } else {
                w = exp(-d * sharpness);
            }
            color += ubo.colors[i].rgb * w;
            total += w;
        }
    }
    if (total > 0.0) {
        color /= total;
    }
    outColor = vec4(color, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_source_expands_point_slots() {
        let source = fragment_source();
        assert!(source.contains("vec4 points[7]"));
        assert!(source.contains("vec4 colors[7]"));
        assert!(!source.contains("POINT_SLOTS"));
    }

    #[test]
    fn shaders_declare_matching_entry_points() {
        assert!(VERTEX_SHADER_GLSL.contains("void main()"));
        assert!(fragment_source().contains("void main()"));
    }
}
