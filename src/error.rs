use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwtError {
    /// Two input grids disagree on their size. Sizes are `(width, height)`.
    DimensionMismatch {
        what: &'static str,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// A ray crosses a pixel outside of the stroke width map.
    PointOutOfBounds {
        point: (u32, u32),
        dimensions: (u32, u32),
    },
    InvalidParams(&'static str),
}

impl fmt::Display for SwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "{what}: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::PointOutOfBounds { point, dimensions } => write!(
                f,
                "pixel ({}, {}) is outside of a {}x{} map",
                point.0, point.1, dimensions.0, dimensions.1
            ),
            Self::InvalidParams(reason) => write!(f, "invalid parameters: {reason}"),
        }
    }
}

impl std::error::Error for SwtError {}
