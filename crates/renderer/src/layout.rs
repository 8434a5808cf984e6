//! Control-point placement and animation.
//!
//! Produces the 2D positions of up to [`MAX_POINTS`] weighted blend points
//! in normalized viewport coordinates, either as a fixed layout or as a
//! time-driven trajectory. All motion is deterministic in `time`: the
//! per-point "jitter" comes from per-index frequency and phase offsets, not
//! randomness, so a frame can be reproduced from its timestamp alone.
//!
//! Per-index frequencies keep the points from moving in lockstep; a shared
//! slow breathing term keeps the overall composition pulsing coherently.

use std::f32::consts::PI;

use crate::types::MAX_POINTS;

/// Multiplier mapping wall-clock seconds onto the animation time base.
const TIME_SCALE: f32 = 1.2;
/// Orbit radius of the two-point layouts.
const PAIR_RADIUS: f32 = 0.22;

/// Computes control-point positions for a field of `point_count` points.
///
/// Always returns exactly [`MAX_POINTS`] coordinate pairs so the caller can
/// upload a fixed-size uniform array; the first `min(point_count, 7)` pairs
/// are live, the remainder are `[0.0, 0.0]` padding. `time` is in seconds
/// and only matters when `animated` is set.
pub fn control_points(point_count: usize, animated: bool, time: f32) -> [[f32; 2]; MAX_POINTS] {
    let n = point_count.min(MAX_POINTS);
    let mut points = [[0.0_f32; 2]; MAX_POINTS];
    if n == 0 {
        return points;
    }
    let t = time * TIME_SCALE;
    match (animated, n) {
        (false, 2) => place_static_pair(&mut points),
        (false, _) => place_static_ring(&mut points, n),
        (true, 2) => animate_pair(&mut points, t),
        (true, _) => animate_ring(&mut points, n, t),
    }
    points
}

/// Two points placed symmetrically about the center at +-45 degrees.
fn place_static_pair(points: &mut [[f32; 2]; MAX_POINTS]) {
    let angle = PI / 4.0;
    let (sin, cos) = angle.sin_cos();
    points[0] = [0.5 + cos * PAIR_RADIUS, 0.5 + sin * PAIR_RADIUS];
    points[1] = [0.5 - cos * PAIR_RADIUS, 0.5 - sin * PAIR_RADIUS];
}

/// Uniform angular spacing with a small deterministic per-point radius
/// offset for an organic, non-mechanical look.
fn place_static_ring(points: &mut [[f32; 2]; MAX_POINTS], n: usize) {
    for (i, point) in points.iter_mut().take(n).enumerate() {
        let angle = i as f32 / n as f32 * 2.0 * PI;
        let radius = ring_radius(i);
        point[0] = 0.5 + angle.cos() * radius;
        point[1] = 0.5 + angle.sin() * radius;
    }
}

/// Two independently orbiting points with two-frequency angular and radial
/// oscillation. The phase offset between them lets the pair swap relative
/// position over time.
fn animate_pair(points: &mut [[f32; 2]; MAX_POINTS], t: f32) {
    let base_angle = PI / 4.0;
    let t1 = t * 0.7;
    let t2 = t * 0.9 + PI / 2.0;

    let angle1 = base_angle + t1.sin() * 1.2 + (t1 * 0.5).cos() * 0.7;
    let r1 = PAIR_RADIUS + (t1 * 0.8).sin() * 0.07 + (t1 * 0.3).cos() * 0.04;
    let angle2 = base_angle + PI + t2.cos() * 1.2 + (t2 * 0.5).sin() * 0.7;
    let r2 = PAIR_RADIUS + (t2 * 0.8).cos() * 0.07 + (t2 * 0.3).sin() * 0.04;

    points[0] = [0.5 + angle1.cos() * r1, 0.5 + angle1.sin() * r1];
    points[1] = [0.5 + angle2.cos() * r2, 0.5 + angle2.sin() * r2];
}

/// Ring layout where every point orbits its base angle under two sinusoidal
/// perturbations, with a shared slow breathing term pulsing the whole field.
fn animate_ring(points: &mut [[f32; 2]; MAX_POINTS], n: usize, t: f32) {
    let breath = 0.13 + 0.07 * (t * 0.23).sin();
    for (i, point) in points.iter_mut().take(n).enumerate() {
        let fi = i as f32;
        let base_angle = fi / n as f32 * 2.0 * PI;
        let angle = base_angle
            + (t * (0.7 + fi * 0.13) + fi).sin() * 0.38
            + (t * (0.23 + fi * 0.07) + fi * 1.7).sin() * 0.18;
        let radius = ring_radius(i)
            + (t * (0.6 + fi * 0.11) + fi * 0.8).cos() * 0.09
            + (t * (0.19 + fi * 0.09) + fi * 2.2).sin() * 0.04
            + breath;
        point[0] = 0.5 + angle.cos() * radius;
        point[1] = 0.5 + angle.sin() * radius;
    }
}

fn ring_radius(index: usize) -> f32 {
    0.32 + 0.08 * (2.1 * index as f32).sin()
}
