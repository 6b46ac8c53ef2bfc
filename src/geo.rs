use serde::{Deserialize, Serialize};

/// Side length of the normalized coordinate space.
pub const NORMALIZED_EXTENT: f64 = 1000.0;

/// Page dimensions in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle in source pixel space, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Axis-aligned bounds of a polygon. `None` for an empty point list.
    pub fn bounding(points: &[(f64, f64)]) -> Option<Rect> {
        let (first, rest) = points.split_first()?;
        let seed = Rect::new(first.0, first.1, first.0, first.1);
        Some(rest.iter().fold(seed, |acc, &(x, y)| Rect {
            x0: acc.x0.min(x),
            y0: acc.y0.min(y),
            x1: acc.x1.max(x),
            y1: acc.y1.max(y),
        }))
    }
}

/// `[yMin, xMin, yMax, xMax]` in the 0..=1000 normalized space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormBox(pub [u16; 4]);

impl NormBox {
    #[inline]
    pub fn y_min(&self) -> u16 {
        self.0[0]
    }

    #[inline]
    pub fn x_min(&self) -> u16 {
        self.0[1]
    }

    #[inline]
    pub fn y_max(&self) -> u16 {
        self.0[2]
    }

    #[inline]
    pub fn x_max(&self) -> u16 {
        self.0[3]
    }

    /// Ordered corners inside the normalized extent.
    pub fn is_valid(&self) -> bool {
        let limit = NORMALIZED_EXTENT as u16;
        self.y_min() <= self.y_max()
            && self.x_min() <= self.x_max()
            && self.y_max() <= limit
            && self.x_max() <= limit
    }
}

/// Union of `first` and every rectangle in `rest`.
pub fn merge<I>(first: Rect, rest: I) -> Rect
where
    I: IntoIterator<Item = Rect>,
{
    rest.into_iter().fold(first, |acc, r| acc.union(&r))
}

/// Rescales a pixel rectangle into the normalized space using the page's
/// true dimensions, rounding and clamping each coordinate.
pub fn normalize(rect: &Rect, size: PageSize) -> NormBox {
    let y0 = scale(rect.y0, size.height);
    let x0 = scale(rect.x0, size.width);
    let y1 = scale(rect.y1, size.height);
    let x1 = scale(rect.x1, size.width);
    // Clamping can collapse a box that hangs off the page; keep corners ordered.
    NormBox([y0.min(y1), x0.min(x1), y0.max(y1), x0.max(x1)])
}

fn scale(raw: f64, dimension: f64) -> u16 {
    if dimension.is_nan() || dimension <= 0.0 || !raw.is_finite() {
        return 0;
    }
    (raw / dimension * NORMALIZED_EXTENT)
        .round()
        .clamp(0.0, NORMALIZED_EXTENT) as u16
}
