//! First pass of the Stroke Width Transform: cast a ray from every border
//! pixel along its gradient until it meets the opposite border, and record the
//! length of the ray on every pixel it crossed.

use image::GrayImage;
use itertools::iproduct;
use log::{debug, trace};

use crate::error::SwtError;
use crate::line::CellWalk;
use crate::swt::{check_dimensions, CastStats, Gradient, Ray, StrokeWidthMap, SwtParams};
use crate::util::Point;

/// Why no ray was recorded for a border pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Miss {
    FlatGradient,
    LeftImage,
    Exhausted,
    Rejected,
}

fn is_edge(edges: &GrayImage, point: Point) -> bool {
    edges.get_pixel(point.x, point.y).0[0] > 0
}

/// Does the border at `opposite` face a ray travelling along `direction`?
fn faces(direction: (f32, f32), gradient: &Gradient, opposite: Point, params: &SwtParams) -> bool {
    let (ox, oy) = match gradient.direction(opposite, params.polarity) {
        Some(dir) => dir,
        None => return false,
    };
    // Both directions point into the stroke, hence towards each other.
    let cos = -(direction.0 * ox + direction.1 * oy);
    f32::acos(cos.clamp(-1., 1.)) < params.max_angle
}

/// March from `start` until we find the opposite border of the stroke.
fn trace_ray(
    start: Point,
    edges: &GrayImage,
    gradient: &Gradient,
    params: &SwtParams,
    max_steps: usize,
) -> Result<Ray, Miss> {
    let direction = match gradient.direction(start, params.polarity) {
        Some(direction) => direction,
        None => {
            trace!("cast: flat gradient at ({}, {})", start.x, start.y);
            return Err(Miss::FlatGradient);
        }
    };
    let (width, height) = edges.dimensions();

    let mut path = vec![start];
    for (x, y) in CellWalk::new((start.x, start.y), direction, params.step, max_steps) {
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return Err(Miss::LeftImage);
        }
        let cell = Point::new(x as u32, y as u32);
        path.push(cell);
        if !is_edge(edges, cell) {
            continue;
        }
        // Only the first border met is considered, whether it faces us or not.
        if !faces(direction, gradient, cell, params) {
            return Err(Miss::Rejected);
        }
        // The march stops short of the cap by up to half a pixel.
        if let Some(max) = params.max_stroke_width {
            if start.distance(&cell) > max {
                return Err(Miss::Exhausted);
            }
        }
        return Ok(Ray::new(start, cell, path));
    }
    Err(Miss::Exhausted)
}

fn edge_pixels(edges: &GrayImage) -> Vec<Point> {
    let (width, height) = edges.dimensions();
    iproduct!(0..height, 0..width)
        .map(|(y, x)| Point::new(x, y))
        .filter(|&point| is_edge(edges, point))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn trace_all(
    starts: &[Point],
    edges: &GrayImage,
    gradient: &Gradient,
    params: &SwtParams,
    max_steps: usize,
) -> Vec<Result<Ray, Miss>> {
    starts
        .iter()
        .map(|&start| trace_ray(start, edges, gradient, params, max_steps))
        .collect()
}

#[cfg(feature = "parallel")]
fn trace_all(
    starts: &[Point],
    edges: &GrayImage,
    gradient: &Gradient,
    params: &SwtParams,
    max_steps: usize,
) -> Vec<Result<Ray, Miss>> {
    use rayon::prelude::*;

    starts
        .par_iter()
        .map(|&start| trace_ray(start, edges, gradient, params, max_steps))
        .collect()
}

/// Cast rays from every pixel of `edges` (any non-zero value is a border).
///
/// Returns the stroke width map, where each pixel holds the length of the
/// shortest ray that crossed it, and the rays themselves in scan order.
/// Fails if `edges` and `gradient` differ in size or `params` are out of range.
pub fn first_pass(
    edges: &GrayImage,
    gradient: &Gradient,
    params: &SwtParams,
) -> Result<(StrokeWidthMap, Vec<Ray>, CastStats), SwtError> {
    params.validate()?;
    check_dimensions(edges, gradient)?;
    let (width, height) = edges.dimensions();
    let mut widths = StrokeWidthMap::new(width, height);

    let diagonal = f32::sqrt(width as f32 * width as f32 + height as f32 * height as f32);
    let reach = match params.max_stroke_width {
        Some(max) => f32::min(max, diagonal),
        None => diagonal,
    };
    let max_steps = CellWalk::steps_for(reach, params.step);

    let starts = edge_pixels(edges);
    let mut stats = CastStats {
        edge_pixels: starts.len(),
        ..Default::default()
    };
    let mut rays = Vec::new();
    for outcome in trace_all(&starts, edges, gradient, params, max_steps) {
        match outcome {
            Ok(ray) => {
                let length = ray.length();
                for point in ray.path() {
                    widths.lower_to(point, length);
                }
                rays.push(ray);
            }
            Err(Miss::FlatGradient) => stats.flat_gradient += 1,
            Err(Miss::LeftImage) => stats.left_image += 1,
            Err(Miss::Exhausted) => stats.exhausted += 1,
            Err(Miss::Rejected) => stats.rejected += 1,
        }
    }
    stats.committed = rays.len();

    debug!(
        "cast: {} rays from {} border pixels ({} flat, {} left the image, {} exhausted, {} rejected)",
        stats.committed,
        stats.edge_pixels,
        stats.flat_gradient,
        stats.left_image,
        stats.exhausted,
        stats.rejected
    );
    Ok((widths, rays, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swt::Polarity;
    use image::Luma;

    fn edges_at(width: u32, height: u32, points: &[(u32, u32)]) -> GrayImage {
        let mut edges = GrayImage::new(width, height);
        for &(x, y) in points {
            edges.put_pixel(x, y, Luma([255]));
        }
        edges
    }

    #[test]
    fn ray_crosses_to_facing_border() {
        let edges = edges_at(8, 1, &[(1, 0), (5, 0)]);
        // Bright stroke: gradients point into the stroke from both borders.
        let gradient = Gradient::from_fn(8, 1, |x, _| if x < 3 { (1., 0.) } else { (-1., 0.) });
        let params = SwtParams {
            polarity: Polarity::LightOnDark,
            ..Default::default()
        };
        let (widths, rays, stats) =
            first_pass(&edges, &gradient, &params).expect("valid input");

        assert_eq!(rays.len(), 2);
        assert_eq!(stats.committed, 2);
        let ray = &rays[0];
        assert_eq!((ray.p, ray.q), (Point::new(1, 0), Point::new(5, 0)));
        let path: Vec<_> = ray.path().map(|p| p.x).collect();
        assert_eq!(path, vec![1, 2, 3, 4, 5]);
        for x in 1..6 {
            assert_eq!(widths.get(Point::new(x, 0)), Some(4.));
        }
        assert_eq!(widths.get(Point::new(0, 0)), None);
        assert_eq!(widths.get(Point::new(6, 0)), None);
    }

    #[test]
    fn ray_leaving_image_is_dropped() {
        let edges = edges_at(5, 1, &[(3, 0)]);
        let gradient = Gradient::from_fn(5, 1, |_, _| (1., 0.));
        let params = SwtParams {
            polarity: Polarity::LightOnDark,
            ..Default::default()
        };
        let (widths, rays, stats) =
            first_pass(&edges, &gradient, &params).expect("valid input");

        assert!(rays.is_empty());
        assert_eq!(stats.left_image, 1);
        assert_eq!(widths.set_count(), 0);
    }

    #[test]
    fn border_facing_away_is_rejected() {
        let edges = edges_at(8, 1, &[(1, 0), (5, 0)]);
        // Both borders point the same way.
        let gradient = Gradient::from_fn(8, 1, |_, _| (-1., 0.));
        let (widths, rays, stats) =
            first_pass(&edges, &gradient, &SwtParams::default()).expect("valid input");

        assert!(rays.is_empty());
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.left_image, 1);
        assert_eq!(widths.set_count(), 0);
    }

    #[test]
    fn perpendicular_border_is_rejected() {
        let edges = edges_at(8, 1, &[(1, 0), (5, 0)]);
        let gradient = Gradient::from_fn(8, 1, |x, _| if x < 3 { (-1., 0.) } else { (0., 1.) });
        let (_, rays, stats) =
            first_pass(&edges, &gradient, &SwtParams::default()).expect("valid input");

        assert!(rays.is_empty());
        assert_eq!(stats.rejected, 1);
    }

    #[test]
    fn march_stops_at_first_border() {
        // The border at x = 3 faces away; the one at x = 5 would be valid.
        let edges = edges_at(8, 1, &[(1, 0), (3, 0), (5, 0)]);
        let gradient = Gradient::from_fn(8, 1, |x, _| match x {
            1 | 3 => (1., 0.),
            _ => (-1., 0.),
        });
        let params = SwtParams {
            polarity: Polarity::LightOnDark,
            ..Default::default()
        };
        let (_, rays, _) = first_pass(&edges, &gradient, &params).expect("valid input");

        assert!(rays.iter().all(|ray| ray.p != Point::new(1, 0)));
    }

    #[test]
    fn flat_border_pixel_is_skipped() {
        let edges = edges_at(4, 1, &[(1, 0)]);
        let gradient = Gradient::from_fn(4, 1, |_, _| (0., 0.));
        let (widths, rays, stats) =
            first_pass(&edges, &gradient, &SwtParams::default()).expect("valid input");

        assert!(rays.is_empty());
        assert_eq!(stats.flat_gradient, 1);
        assert_eq!(widths.set_count(), 0);
    }

    #[test]
    fn width_cap_stops_long_rays() {
        let edges = edges_at(20, 1, &[(1, 0), (15, 0)]);
        let gradient = Gradient::from_fn(20, 1, |x, _| if x < 8 { (1., 0.) } else { (-1., 0.) });
        let params = SwtParams {
            polarity: Polarity::LightOnDark,
            max_stroke_width: Some(5.),
            ..Default::default()
        };
        let (_, rays, stats) = first_pass(&edges, &gradient, &params).expect("valid input");

        assert!(rays.is_empty());
        assert_eq!(stats.exhausted, 2);
    }

    #[test]
    fn width_cap_bounds_ray_length() {
        // Entering x = 6 from the center of x = 1 takes 4.5 pixels of travel,
        // within reach of a 4.8 cap, but the ray is 5 pixels long.
        let edges = edges_at(10, 1, &[(1, 0), (6, 0)]);
        let gradient = Gradient::from_fn(10, 1, |x, _| if x < 3 { (1., 0.) } else { (-1., 0.) });
        let capped = |max| SwtParams {
            polarity: Polarity::LightOnDark,
            max_stroke_width: Some(max),
            ..Default::default()
        };

        let (widths, rays, stats) =
            first_pass(&edges, &gradient, &capped(4.8)).expect("valid input");
        assert!(rays.is_empty());
        assert_eq!(stats.exhausted, 2);
        assert_eq!(widths.set_count(), 0);

        let (_, rays, _) = first_pass(&edges, &gradient, &capped(5.)).expect("valid input");
        assert_eq!(rays.len(), 2);
        assert!(rays.iter().all(|ray| ray.length() == 5.));
    }

    #[test]
    fn mismatched_grids_are_refused() {
        let edges = GrayImage::from_pixel(4, 4, Luma([255]));
        let gradient = Gradient::from_fn(8, 8, |_, _| (1., 0.));
        match first_pass(&edges, &gradient, &SwtParams::default()) {
            Err(SwtError::DimensionMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, (4, 4));
                assert_eq!(actual, (8, 8));
            }
            other => panic!("unexpected {:?}", other.map(|(_, rays, _)| rays.len())),
        }

        let smaller = Gradient::from_fn(2, 4, |_, _| (1., 0.));
        assert!(first_pass(&edges, &smaller, &SwtParams::default()).is_err());
    }

    #[test]
    fn invalid_params_are_refused() {
        let edges = edges_at(4, 1, &[(1, 0)]);
        let gradient = Gradient::from_fn(4, 1, |_, _| (1., 0.));
        let params = SwtParams {
            max_stroke_width: Some(-1.),
            ..Default::default()
        };
        assert!(matches!(
            first_pass(&edges, &gradient, &params),
            Err(SwtError::InvalidParams(_))
        ));
    }

    #[test]
    fn diagonal_ray_keeps_shortest_width() {
        // A horizontal ray and a diagonal one both end on (4, 3).
        let edges = edges_at(10, 10, &[(0, 3), (4, 3), (1, 0), (4, 4)]);
        let gradient = Gradient::from_fn(10, 10, |x, y| match (x, y) {
            (0, 3) => (1., 0.),
            (4, 3) => (-1., 0.),
            (1, 0) => (3., 4.),
            (4, 4) => (-3., -4.),
            _ => (0., 0.),
        });
        let params = SwtParams {
            polarity: Polarity::LightOnDark,
            ..Default::default()
        };
        let (widths, rays, _) = first_pass(&edges, &gradient, &params).expect("valid input");

        for ray in &rays {
            for point in ray.path() {
                let expected = rays
                    .iter()
                    .filter(|other| other.path().any(|p| p == point))
                    .map(|other| other.length())
                    .fold(f32::INFINITY, f32::min);
                assert_eq!(widths.get(point), Some(expected));
            }
        }
    }
}
