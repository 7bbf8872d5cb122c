//! Normalized cross-correlation kernels.
//!
//! A kernel only has to provide the raw window dot product; window statistics
//! come from the haystack's integral image, and the provided `score_at` and
//! `scan` methods combine the two:
//!
//! ```text
//! score = Σ (h - mean_h) * n0 / sqrt(energy_h * energy_n)
//! ```
//!
//! where `n0` is the zero-mean needle and `energy_*` are sums of squared
//! deviations. Scores lie in `[-1, 1]` up to the `f32` rounding of the
//! per-row dot products, so an exact self-match may land a few ulps above 1.

use crate::geom::{corner_span_for_centers, Rect};
use crate::image::{ImageView, Rgba};
use crate::integral::IntegralImage;
use crate::needle::NeedleStats;

/// Haystack windows with less energy than this are skipped.
pub const MIN_WINDOW_ENERGY: f64 = 1e-6;

/// Best placement found by a scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    /// Top-left x of the needle in the haystack.
    pub x: usize,
    /// Top-left y of the needle in the haystack.
    pub y: usize,
    /// NCC score at the placement; may exceed 1 by `f32` rounding.
    pub score: f64,
}

impl MatchResult {
    /// Score standing in for "no candidate"; below every real NCC score.
    pub const NO_CANDIDATE_SCORE: f64 = -1.0;
}

/// Inclusive range of top-left placements to evaluate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placements {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Placements {
    /// Placements keeping the needle inside the haystack and, when `valid` is
    /// given, its center inside `valid`.
    ///
    /// Returns `None` when no placement qualifies.
    pub fn new(
        haystack: (usize, usize),
        needle: (usize, usize),
        valid: Option<&Rect>,
    ) -> Option<Self> {
        let (hay_w, hay_h) = haystack;
        let (needle_w, needle_h) = needle;
        if needle_w == 0 || needle_h == 0 || needle_w > hay_w || needle_h > hay_h {
            return None;
        }
        let max_x = hay_w - needle_w;
        let max_y = hay_h - needle_h;
        let (x0, x1, y0, y1) = match valid {
            None => (0, max_x, 0, max_y),
            Some(rect) => {
                let (x0, x1) = corner_span_for_centers(rect.x0, rect.x1, needle_w)?;
                let (y0, y1) = corner_span_for_centers(rect.y0, rect.y1, needle_h)?;
                (x0, x1.min(max_x), y0, y1.min(max_y))
            }
        };
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(Self { x0, y0, x1, y1 })
    }

    /// Number of placements in the range.
    pub fn count(&self) -> usize {
        (self.x1 - self.x0 + 1) * (self.y1 - self.y0 + 1)
    }
}

/// Kernel trait for NCC scoring and scanning.
pub trait Kernel {
    /// Computes `Σ h * n0` for the needle placed at `(x, y)`.
    ///
    /// Callers guarantee the placement lies inside the haystack.
    fn window_dot(haystack: ImageView<'_, Rgba>, needle: &NeedleStats, x: usize, y: usize)
        -> f64;

    /// Computes the score at a single placement (top-left coordinates).
    ///
    /// `None` for placements outside the haystack and for flat windows.
    fn score_at(
        haystack: ImageView<'_, Rgba>,
        integral: &IntegralImage,
        needle: &NeedleStats,
        x: usize,
        y: usize,
    ) -> Option<f64> {
        let (w, h) = (needle.width(), needle.height());
        if x.checked_add(w)? > haystack.width() || y.checked_add(h)? > haystack.height() {
            return None;
        }
        let sums = integral.rect_sums(x, y, w, h)?;
        let count = needle.pixel_count();
        let energy = sums.centered_energy(count);
        if energy <= MIN_WINDOW_ENERGY {
            return None;
        }
        let means = sums.means(count);
        let n0_sums = needle.zero_mean_sums();
        let mean_term: f64 = (0..3).map(|c| means[c] * n0_sums[c]).sum();
        let dot = Self::window_dot(haystack, needle, x, y) - mean_term;
        let score = dot / (energy * needle.norm_sq()).sqrt();
        score.is_finite().then_some(score)
    }

    /// Scans `placements` top-to-bottom, left-to-right.
    ///
    /// The first placement with the strictly greatest score wins.
    fn scan(
        haystack: ImageView<'_, Rgba>,
        integral: &IntegralImage,
        needle: &NeedleStats,
        placements: Placements,
    ) -> Option<MatchResult> {
        let mut best: Option<MatchResult> = None;
        for y in placements.y0..=placements.y1 {
            for x in placements.x0..=placements.x1 {
                let Some(score) = Self::score_at(haystack, integral, needle, x, y) else {
                    continue;
                };
                if best.map_or(true, |b| score > b.score) {
                    best = Some(MatchResult { x, y, score });
                }
            }
        }
        best
    }
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;
