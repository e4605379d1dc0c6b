use openfield_common::Vec2;
use std::f32::consts::TAU;

/// Samples the outline of a rotated, translated ellipse.
///
/// Points are generated in the ellipse's own frame at fixed angular
/// increments over `[0, 2*pi)`, rotated by `heading` and translated to
/// `center`. The default step of 0.05 rad yields 126 points. Returns the
/// x- and y-coordinate sequences separately, matching the layout the
/// spatial registry and the trajectory dataset store.
pub fn ellipse_perimeter(
    center: Vec2,
    heading: f32,
    major_axis: f32,
    minor_axis: f32,
    angular_step: f32,
) -> (Vec<f32>, Vec<f32>) {
    let semi_major = major_axis / 2.0;
    let semi_minor = minor_axis / 2.0;
    let n_points = (TAU / angular_step).ceil() as usize;

    let (sin_h, cos_h) = heading.sin_cos();

    let mut xs = Vec::with_capacity(n_points);
    let mut ys = Vec::with_capacity(n_points);

    for i in 0..n_points {
        let t = i as f32 * angular_step;
        let x = semi_major * t.cos();
        let y = semi_minor * t.sin();
        xs.push(x * cos_h - y * sin_h + center.x);
        ys.push(y * cos_h + x * sin_h + center.y);
    }

    (xs, ys)
}
