use std::f32::consts::FRAC_PI_2;

use image::{GrayImage, Luma};
use imageproc::definitions::Image;

use crate::error::SwtError;
use crate::util::Point;

/// A single-channel floating point grid, e.g. one component of a gradient.
pub type FloatImage = Image<Luma<f32>>;

/// Whether strokes are darker or brighter than their background.
///
/// Gradients point from dark to bright. For dark strokes, the gradient at the
/// border of the stroke therefore points out of the stroke and must be
/// reversed to march across it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    DarkOnLight,
    LightOnDark,
}

impl Polarity {
    /// Factor applied to every gradient vector read by the transform.
    pub fn sign(&self) -> f32 {
        match *self {
            Polarity::DarkOnLight => -1.,
            Polarity::LightOnDark => 1.,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SwtParams {
    pub polarity: Polarity,

    /// Length of each increment of the ray march, in pixels.
    pub step: f32,

    /// Maximal angle, in radians, between the direction of a ray and the
    /// reversed gradient at the opposite border. Rays whose opposite border
    /// is not at least this close to facing them are discarded.
    pub max_angle: f32,

    /// Longest ray accepted, in pixels. Longer rays are discarded and the march
    /// gives up once it has travelled this far. If `None`, rays may cross the
    /// whole image.
    pub max_stroke_width: Option<f32>,
}

impl Default for SwtParams {
    fn default() -> SwtParams {
        SwtParams {
            polarity: Polarity::DarkOnLight,
            step: 0.05,
            max_angle: FRAC_PI_2,
            max_stroke_width: None,
        }
    }
}

impl SwtParams {
    pub fn validate(&self) -> Result<(), SwtError> {
        if !(self.step.is_finite() && self.step > 0.) {
            return Err(SwtError::InvalidParams("step must be finite and positive"));
        }
        if !(self.max_angle > 0. && self.max_angle <= std::f32::consts::PI) {
            return Err(SwtError::InvalidParams("max_angle must be in (0, pi]"));
        }
        if let Some(max) = self.max_stroke_width {
            if !(max > 0.) {
                return Err(SwtError::InvalidParams("max_stroke_width must be positive"));
            }
        }
        Ok(())
    }
}

/// Horizontal and vertical components of the intensity gradient.
#[derive(Clone, Debug)]
pub struct Gradient {
    pub gx: FloatImage,
    pub gy: FloatImage,
}

impl Gradient {
    pub fn new(gx: FloatImage, gy: FloatImage) -> Result<Self, SwtError> {
        if gx.dimensions() != gy.dimensions() {
            return Err(SwtError::DimensionMismatch {
                what: "vertical gradient",
                expected: gx.dimensions(),
                actual: gy.dimensions(),
            });
        }
        Ok(Gradient { gx, gy })
    }

    /// Build a gradient field by sampling `f(x, y) -> (gx, gy)` at each pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> (f32, f32),
    {
        let mut gx = FloatImage::new(width, height);
        let mut gy = FloatImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let (dx, dy) = f(x, y);
                gx.put_pixel(x, y, Luma([dx]));
                gy.put_pixel(x, y, Luma([dy]));
            }
        }
        Gradient { gx, gy }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.gx.dimensions()
    }

    pub fn at(&self, point: Point) -> (f32, f32) {
        (
            self.gx.get_pixel(point.x, point.y).0[0],
            self.gy.get_pixel(point.x, point.y).0[0],
        )
    }

    /// The gradient at `point`, corrected for `polarity` and scaled to unit length.
    /// `None` if the gradient vanishes.
    pub fn direction(&self, point: Point, polarity: Polarity) -> Option<(f32, f32)> {
        let (dx, dy) = self.at(point);
        let mag = f32::sqrt(dx * dx + dy * dy);
        if !(mag > f32::EPSILON) || !mag.is_finite() {
            return None;
        }
        let sign = polarity.sign();
        Some((sign * dx / mag, sign * dy / mag))
    }
}

/// Fail unless both gradient components have the size of `edges`.
pub fn check_dimensions(edges: &GrayImage, gradient: &Gradient) -> Result<(), SwtError> {
    for (what, dimensions) in [
        ("horizontal gradient", gradient.gx.dimensions()),
        ("vertical gradient", gradient.gy.dimensions()),
    ] {
        if dimensions != edges.dimensions() {
            return Err(SwtError::DimensionMismatch {
                what,
                expected: edges.dimensions(),
                actual: dimensions,
            });
        }
    }
    Ok(())
}

/// Per-pixel stroke width estimates. Pixels that no ray ever crossed are unset.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeWidthMap {
    width: u32,
    height: u32,
    data: Vec<Option<f32>>,
}

impl StrokeWidthMap {
    /// A map with every pixel unset.
    pub fn new(width: u32, height: u32) -> Self {
        StrokeWidthMap {
            width,
            height,
            data: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, point: Point) -> usize {
        debug_assert!(point.x < self.width && point.y < self.height);
        point.y as usize * self.width as usize + point.x as usize
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    pub fn get(&self, point: Point) -> Option<f32> {
        self.data[self.index(point)]
    }

    pub fn set(&mut self, point: Point, width: f32) {
        let index = self.index(point);
        self.data[index] = Some(width);
    }

    /// Record `width` at `point` unless a smaller width is already known.
    pub fn lower_to(&mut self, point: Point, width: f32) {
        let index = self.index(point);
        let slot = &mut self.data[index];
        *slot = Some(match *slot {
            Some(known) => f32::min(known, width),
            None => width,
        });
    }

    /// All pixels in row-major order, with their estimate.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Option<f32>)> + '_ {
        let width = self.width;
        self.data.iter().enumerate().map(move |(i, value)| {
            let i = i as u32;
            (Point::new(i % width, i / width), *value)
        })
    }

    /// Number of pixels holding an estimate.
    pub fn set_count(&self) -> usize {
        self.data.iter().filter(|value| value.is_some()).count()
    }

    /// The map as a float image, unset pixels holding `unset`.
    pub fn to_sentinel_image(&self, unset: f32) -> FloatImage {
        FloatImage::from_fn(self.width, self.height, |x, y| {
            Luma([self.get(Point::new(x, y)).unwrap_or(unset)])
        })
    }
}

/// A pixel crossed by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayPoint {
    pub point: Point,

    /// The stroke width at `point`. Holds the length of the ray once the ray
    /// is cast, then the value read back from the map during consolidation.
    pub width: f32,
}

/// The path between a border pixel and the opposite border of its stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    /// The border pixel the ray was cast from.
    pub p: Point,
    /// The opposite border pixel.
    pub q: Point,
    /// Every pixel crossed, from `p` to `q` included, in the order of the march.
    pub points: Vec<RayPoint>,
}

impl Ray {
    pub(crate) fn new(p: Point, q: Point, path: Vec<Point>) -> Self {
        debug_assert!(path.len() >= 2);
        let length = p.distance(&q);
        Ray {
            p,
            q,
            points: path
                .into_iter()
                .map(|point| RayPoint {
                    point,
                    width: length,
                })
                .collect(),
        }
    }

    /// Distance between both borders, i.e. the width of the stroke as seen by this ray.
    pub fn length(&self) -> f32 {
        self.p.distance(&self.q)
    }

    pub fn path(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(|point| point.point)
    }
}

/// What happened to the border pixels during the first pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CastStats {
    pub edge_pixels: usize,
    /// Border pixels skipped as their gradient vanishes.
    pub flat_gradient: usize,
    pub left_image: usize,
    /// Rays that met no border within `max_stroke_width` (or the image
    /// diagonal), or whose border lies further than `max_stroke_width`.
    pub exhausted: usize,
    /// Rays whose opposite border does not face them.
    pub rejected: usize,
    pub committed: usize,
}

#[derive(Clone, Debug)]
pub struct SwtOutput {
    pub widths: StrokeWidthMap,
    pub rays: Vec<Ray>,
    pub stats: CastStats,
}
