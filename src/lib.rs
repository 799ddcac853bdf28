//! Stroke Width Transform.
//!
//! For every pixel on the border of a stroke (a thin shape of roughly constant
//! width, such as the stroke of a letter), estimate the width of the stroke by
//! casting a ray along the gradient until it meets the opposite border.
//!
//! ```no_run
//! use lighthouse_swt::{detect_strokes, PreprocessParams, SwtParams};
//!
//! let image = image::open("page.png").expect("could not read image");
//! let output = detect_strokes(&image, &PreprocessParams::default(), &SwtParams::default())
//!     .expect("transform failed");
//! println!("{} rays", output.rays.len());
//! ```

pub mod cast;
pub mod consolidate;
pub mod error;
pub mod line;
pub mod preprocess;
pub mod render;
pub mod swt;
pub mod util;

use image::{DynamicImage, GrayImage};
use log::debug;

pub use cast::first_pass;
pub use consolidate::second_pass;
pub use error::SwtError;
pub use preprocess::PreprocessParams;
pub use render::render_widths;
pub use swt::{
    check_dimensions, CastStats, FloatImage, Gradient, Polarity, Ray, RayPoint, StrokeWidthMap,
    SwtOutput, SwtParams,
};
pub use util::Point;

/// Run both passes of the transform.
///
/// `edges` marks border pixels with any non-zero value. Fails if `edges` and
/// `gradient` differ in size or if `params` are out of range; rays that do not
/// find an opposite border are silently dropped.
pub fn stroke_width_transform(
    edges: &GrayImage,
    gradient: &Gradient,
    params: &SwtParams,
) -> Result<SwtOutput, SwtError> {
    let (mut widths, mut rays, stats) = first_pass(edges, gradient, params)?;
    second_pass(&mut widths, &mut rays)?;
    debug!(
        "swt: {} of {} pixels have a stroke width",
        widths.set_count(),
        widths.width() as usize * widths.height() as usize
    );
    Ok(SwtOutput {
        widths,
        rays,
        stats,
    })
}

/// Compute edges and gradients of `image`, then run the transform.
pub fn detect_strokes(
    image: &DynamicImage,
    preprocess: &PreprocessParams,
    params: &SwtParams,
) -> Result<SwtOutput, SwtError> {
    let (edges, gradient) = preprocess::prepare(image, preprocess);
    stroke_width_transform(&edges, &gradient, params)
}
