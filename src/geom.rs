//! Rectangles and the two coordinate conversions used by the tracker.
//!
//! Matches are found as top-left placements in a scaled image, while callers
//! want needle centers in native map pixels. Every conversion between those
//! spaces goes through the helpers here.

/// Half-open axis-aligned rectangle `[x0, x1) x [y0, y1)` in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Rect {
    /// Creates a rectangle from two corners, swapping them if needed.
    pub fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Returns true if `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Maps native corners into a space scaled by `scale`, truncating.
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            x0: native_to_scaled(self.x0, scale),
            y0: native_to_scaled(self.y0, scale),
            x1: native_to_scaled(self.x1, scale),
            y1: native_to_scaled(self.y1, scale),
        }
    }
}

/// Near edge of the `(2 * radius + 1)`-wide crop around `center`, clipped at 0.
pub fn crop_origin(center: usize, radius: usize) -> usize {
    center.saturating_sub(radius)
}

/// Inclusive range of corners whose centers fall in `[min, max)`.
///
/// Returns `None` when no corner puts the center inside the range.
pub fn corner_span_for_centers(min: usize, max: usize, size: usize) -> Option<(usize, usize)> {
    if max <= min {
        return None;
    }
    let half = size / 2;
    let hi = (max - 1).checked_sub(half)?;
    Some((min.saturating_sub(half), hi))
}

/// Native position of a crop anchor.
///
/// `corner` is where the crop's near edge matched in scaled space and
/// `anchor_offset` is the anchor's distance from that edge in the unscaled
/// crop. A clipped crop has a smaller offset than its radius.
pub fn anchor_to_native(corner: usize, anchor_offset: usize, scale: f64) -> i32 {
    (corner as f64 / scale + anchor_offset as f64).round() as i32
}

/// Maps a native coordinate into scaled space, truncating toward zero.
pub fn native_to_scaled(value: usize, scale: f64) -> usize {
    (value as f64 * scale) as usize
}

/// Length of a `len`-pixel axis after resampling by `scale` (at least 1).
pub fn scaled_len(len: usize, scale: f64) -> usize {
    ((len as f64 * scale).round() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_normalizes_and_scales() {
        let rect = Rect::new(840, 685, 135, 195);
        assert_eq!(rect, Rect::new(135, 195, 840, 685));
        assert_eq!(rect.scaled(0.4), Rect::new(54, 78, 336, 274));
        assert!(rect.contains(135, 195));
        assert!(!rect.contains(840, 300));
        assert!(Rect::new(3, 3, 3, 9).is_empty());
    }

    #[test]
    fn crop_origin_and_center_spans() {
        assert_eq!(crop_origin(108, 40), 68);
        assert_eq!(crop_origin(10, 20), 0);
        assert_eq!(corner_span_for_centers(500, 501, 81), Some((460, 460)));
        assert_eq!(corner_span_for_centers(10, 30, 9), Some((6, 25)));
        assert_eq!(corner_span_for_centers(0, 2, 9), None);
        assert_eq!(corner_span_for_centers(5, 5, 3), None);
    }

    #[test]
    fn scaled_native_conversions() {
        assert_eq!(anchor_to_native(460, 40, 1.0), 500);
        assert_eq!(anchor_to_native(184, 40, 0.4), 500);
        assert_eq!(anchor_to_native(121, 10, 0.5), 252);
        // Crop clipped 10 pixels short on the near side.
        assert_eq!(anchor_to_native(140, 10, 1.0), 150);
        assert_eq!(native_to_scaled(135, 0.4), 54);
        assert_eq!(scaled_len(81, 0.4), 32);
        assert_eq!(scaled_len(1, 0.1), 1);
    }
}
