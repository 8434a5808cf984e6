use bytemuck::{Pod, Zeroable};

use crate::types::{ShapeParameters, MAX_POINTS};

/// CPU mirror of the `FieldParams` uniform block.
///
/// Layout must match the std140 declaration in `compile.rs`: vec2 positions
/// and vec3 colors are padded out to vec4 slots because std140 arrays are
/// 16-byte strided. `resolution` packs the viewport size in `xy` and the
/// sharpness coefficient in `z`; `counts` packs the active point count in
/// `x` and the squared-falloff flag in `y`.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct FieldUniforms {
    points: [[f32; 4]; MAX_POINTS],
    colors: [[f32; 4]; MAX_POINTS],
    resolution: [f32; 4],
    counts: [i32; 4],
}

unsafe impl Zeroable for FieldUniforms {}
unsafe impl Pod for FieldUniforms {}

impl FieldUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            points: [[0.0; 4]; MAX_POINTS],
            colors: [[1.0, 1.0, 1.0, 1.0]; MAX_POINTS],
            resolution: [width as f32, height as f32, 0.0, 0.0],
            counts: [0; 4],
        }
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution[0] = width;
        self.resolution[1] = height;
    }

    pub fn set_shape(&mut self, shape: ShapeParameters) {
        self.resolution[2] = shape.sharpness;
        self.counts[1] = shape.squared_falloff as i32;
    }

    /// Uploads control points and colors into the fixed-size slots.
    ///
    /// `active` is clamped to the shader maximum and the shorter of the two
    /// inputs. Unused color slots echo the last valid color so an off-by-one
    /// in the shader loop can never blend in an arbitrary value.
    pub fn set_field(&mut self, points: &[[f32; 2]], colors: &[[f32; 3]], active: usize) {
        let active = active.min(MAX_POINTS).min(points.len()).min(colors.len());
        self.counts[0] = active as i32;

        for (slot, point) in self.points.iter_mut().zip(points.iter().take(active)) {
            slot[0] = point[0];
            slot[1] = point[1];
        }
        for slot in self.points.iter_mut().skip(active) {
            slot[0] = 0.0;
            slot[1] = 0.0;
        }

        let fallback = colors
            .get(active.saturating_sub(1))
            .copied()
            .unwrap_or([1.0, 1.0, 1.0]);
        for (index, slot) in self.colors.iter_mut().enumerate() {
            let color = colors.get(index).filter(|_| index < active).unwrap_or(&fallback);
            slot[0] = color[0];
            slot[1] = color[1];
            slot[2] = color[2];
            slot[3] = 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std140_block_size_is_stable() {
        // 7 vec4 points + 7 vec4 colors + vec4 resolution + ivec4 counts.
        assert_eq!(std::mem::size_of::<FieldUniforms>(), 256);
    }

    #[test]
    fn unused_color_slots_echo_the_last_valid_color() {
        let mut uniforms = FieldUniforms::new(900, 500);
        let points = [[0.25, 0.25], [0.75, 0.75]];
        let colors = [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        uniforms.set_field(&points, &colors, 2);

        assert_eq!(uniforms.counts[0], 2);
        for slot in &uniforms.colors[2..] {
            assert_eq!(&slot[..3], &[0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn active_count_is_clamped_to_inputs() {
        let mut uniforms = FieldUniforms::new(900, 500);
        let points = [[0.5, 0.5]];
        let colors = [[0.2, 0.4, 0.6]];
        uniforms.set_field(&points, &colors, 5);
        assert_eq!(uniforms.counts[0], 1);
    }

    #[test]
    fn shape_lands_in_the_packed_slots() {
        let mut uniforms = FieldUniforms::new(900, 500);
        uniforms.set_shape(ShapeParameters::for_field(2, false));
        assert_eq!(uniforms.resolution[2], 2.2);
        assert_eq!(uniforms.counts[1], 1);

        uniforms.set_shape(ShapeParameters::for_field(5, true));
        assert_eq!(uniforms.resolution[2], 8.0);
        assert_eq!(uniforms.counts[1], 0);
    }
}
