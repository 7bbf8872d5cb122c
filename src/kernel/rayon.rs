//! Rayon-parallel scan (feature-gated).
//!
//! Rows of placements are scored in parallel; the per-row winners are then
//! reduced in row order so the result equals the sequential scan.

use crate::image::{ImageView, Rgba};
use crate::integral::IntegralImage;
use crate::kernel::{Kernel, MatchResult, Placements};
use crate::needle::NeedleStats;
use rayon::prelude::*;

/// Row-parallel scan with the same winner as [`Kernel::scan`].
pub fn scan_par<K: Kernel>(
    haystack: ImageView<'_, Rgba>,
    integral: &IntegralImage,
    needle: &NeedleStats,
    placements: Placements,
) -> Option<MatchResult> {
    let row_best: Vec<Option<MatchResult>> = (placements.y0..=placements.y1)
        .into_par_iter()
        .map(|y| {
            let mut best: Option<MatchResult> = None;
            for x in placements.x0..=placements.x1 {
                let Some(score) = K::score_at(haystack, integral, needle, x, y) else {
                    continue;
                };
                if best.map_or(true, |b| score > b.score) {
                    best = Some(MatchResult { x, y, score });
                }
            }
            best
        })
        .collect();

    row_best
        .into_iter()
        .flatten()
        .fold(None, |best: Option<MatchResult>, cand| match best {
            Some(b) if cand.score <= b.score => Some(b),
            _ => Some(cand),
        })
}
