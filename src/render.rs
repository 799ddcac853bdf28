use image::{GrayImage, Luma};
use itertools::{Itertools, MinMaxResult};

use crate::swt::StrokeWidthMap;

/// Render the stroke widths as an 8-bit image for inspection.
///
/// Unset pixels are black. Widths are stretched linearly so that the thinnest
/// stroke is 1 and the thickest 255.
pub fn render_widths(widths: &StrokeWidthMap) -> GrayImage {
    let (lo, hi) = match widths.iter().filter_map(|(_, width)| width).minmax() {
        MinMaxResult::NoElements => return GrayImage::new(widths.width(), widths.height()),
        MinMaxResult::OneElement(width) => (width, width),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    let range = hi - lo;

    let mut result = GrayImage::new(widths.width(), widths.height());
    for (point, width) in widths.iter() {
        let value = match width {
            None => 0,
            Some(_) if range <= 0. => 255,
            Some(width) => 1 + (254. * (width - lo) / range).round() as u8,
        };
        result.put_pixel(point.x, point.y, Luma([value]));
    }
    result
}
