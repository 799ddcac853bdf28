//! Everything the transform needs from the source image: an edge mask and a
//! smoothed gradient field.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::edges::canny;
use imageproc::filter::{filter3x3, gaussian_blur_f32};

use crate::swt::{FloatImage, Gradient};

const SCHARR_X: [f32; 9] = [-3., 0., 3., -10., 0., 10., -3., 0., 3.];
const SCHARR_Y: [f32; 9] = [-3., -10., -3., 0., 0., 0., 3., 10., 3.];

#[derive(Clone, Debug)]
pub struct PreprocessParams {
    /// Hysteresis thresholds of the Canny detector, on the Sobel magnitude of
    /// the 8-bit grayscale image.
    pub canny_low: f32,
    pub canny_high: f32,

    /// Standard deviation of the Gaussian applied to the image before
    /// differentiating. 1.1 matches a 5x5 kernel.
    pub blur_sigma: f32,

    /// Standard deviation of the Gaussian applied to both derivatives.
    /// 0.8 matches a 3x3 kernel.
    pub gradient_sigma: f32,
}

impl Default for PreprocessParams {
    fn default() -> PreprocessParams {
        PreprocessParams {
            canny_low: 175.,
            canny_high: 320.,
            blur_sigma: 1.1,
            gradient_sigma: 0.8,
        }
    }
}

/// Border pixels of `gray`: 255 on an edge, 0 elsewhere.
pub fn edge_mask(gray: &GrayImage, params: &PreprocessParams) -> GrayImage {
    canny(gray, params.canny_low, params.canny_high)
}

fn smooth(image: &FloatImage, sigma: f32) -> FloatImage {
    if sigma > 0. {
        gaussian_blur_f32(image, sigma)
    } else {
        image.clone()
    }
}

/// Smoothed Scharr derivatives of the blurred image, intensities being scaled
/// to `[0, 1]`.
pub fn gradient_field(gray: &GrayImage, params: &PreprocessParams) -> Gradient {
    let intensity = FloatImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([gray.get_pixel(x, y).0[0] as f32 / 255.])
    });
    let blurred = smooth(&intensity, params.blur_sigma);
    let gx: FloatImage = filter3x3::<_, f32, f32>(&blurred, &SCHARR_X);
    let gy: FloatImage = filter3x3::<_, f32, f32>(&blurred, &SCHARR_Y);
    Gradient {
        gx: smooth(&gx, params.gradient_sigma),
        gy: smooth(&gy, params.gradient_sigma),
    }
}

/// Edge mask and gradient field of a color or grayscale image.
pub fn prepare(image: &DynamicImage, params: &PreprocessParams) -> (GrayImage, Gradient) {
    let gray = image.to_luma8();
    (edge_mask(&gray, params), gradient_field(&gray, params))
}
