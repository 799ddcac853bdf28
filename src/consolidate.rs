//! Second pass of the Stroke Width Transform.
//!
//! The first pass leaves each pixel with the shortest ray that crossed it, which
//! is meaningless at forks, intersections and corners. Consider the corner of
//! letter "L": each border pixel near the corner is matched by an opposing
//! border that can be very far. Assuming a stroke has the same width along its
//! length, we clamp every pixel of a ray to the median width along that ray.

use log::debug;

use crate::error::SwtError;
use crate::swt::{Ray, StrokeWidthMap};
use crate::util::lower_median;

/// Clamp each pixel crossed by `rays` to the median width of the ray.
///
/// Rays are processed in order and each one reads the map as left by the
/// previous ones. Widths are only ever lowered. Each `RayPoint::width` is
/// overwritten with the value read from the map before clamping.
///
/// Fails, leaving the map untouched, if a ray crosses a pixel outside of `widths`.
pub fn second_pass(widths: &mut StrokeWidthMap, rays: &mut [Ray]) -> Result<(), SwtError> {
    if let Some(point) = rays
        .iter()
        .flat_map(|ray| ray.path())
        .find(|&point| !widths.contains(point))
    {
        return Err(SwtError::PointOutOfBounds {
            point: (point.x, point.y),
            dimensions: (widths.width(), widths.height()),
        });
    }

    let mut buf = Vec::new();
    let mut lowered = 0;
    for ray in rays.iter_mut() {
        let length = ray.length();
        buf.clear();
        for point in &mut ray.points {
            point.width = widths.get(point.point).unwrap_or(length);
            buf.push(point.width);
        }
        let median = match lower_median(&mut buf) {
            Some(median) => median,
            None => continue,
        };
        for point in &ray.points {
            if median < point.width {
                widths.set(point.point, median);
                lowered += 1;
            }
        }
    }
    debug!("consolidate: {} rays, {} pixels lowered to their median", rays.len(), lowered);
    Ok(())
}
