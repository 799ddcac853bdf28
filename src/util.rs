/// A pixel of the image, `x` being the column and `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Point { x, y }
    }

    /// Euclidean distance between the two pixels.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x as f32 - other.x as f32;
        let dy = self.y as f32 - other.y as f32;
        f32::sqrt(dx * dx + dy * dy)
    }
}

/// Sort `numbers` and return the element at index `len / 2`.
///
/// Unlike a textbook median, the two middle values of an even-sized slice are
/// never averaged: `[1, 2, 4, 8]` yields `4`.
pub fn lower_median(numbers: &mut [f32]) -> Option<f32> {
    if numbers.is_empty() {
        return None;
    }
    numbers.sort_by(|a, b| a.total_cmp(b));
    Some(numbers[numbers.len() / 2])
}
