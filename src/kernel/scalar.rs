//! Scalar reference kernel.

use crate::image::{ImageView, Rgba};
use crate::kernel::Kernel;
use crate::needle::NeedleStats;

/// Scalar NCC kernel over interleaved RGBA rows.
pub struct NccScalar;

impl Kernel for NccScalar {
    fn window_dot(
        haystack: ImageView<'_, Rgba>,
        needle: &NeedleStats,
        x: usize,
        y: usize,
    ) -> f64 {
        let w = needle.width();
        let mut dot = 0.0f64;
        for ty in 0..needle.height() {
            let Some(row) = haystack.row(y + ty) else {
                break;
            };
            let hay = row[x..x + w].as_flattened();
            let mut acc = 0.0f32;
            for (&h, &n) in hay.iter().zip(needle.row(ty)) {
                acc += h as f32 * n;
            }
            dot += f64::from(acc);
        }
        dot
    }
}
