use image::{GrayImage, Luma};
use lighthouse_swt::Gradient;

/// Border mask of a vertical stroke whose borders sit on columns `left` and
/// `right`, on every row.
pub fn vertical_stroke_edges(width: u32, height: u32, left: u32, right: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, _| {
        if x == left || x == right {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Gradient of a dark vertical stroke centered on `center` on a light
/// background: pointing left on its left half, right on its right half.
pub fn dark_stroke_gradient(width: u32, height: u32, center: u32) -> Gradient {
    Gradient::from_fn(width, height, |x, _| if x < center { (-1., 0.) } else { (1., 0.) })
}
