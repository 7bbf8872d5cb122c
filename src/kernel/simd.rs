//! SIMD-accelerated kernel using the `wide` crate.
//!
//! The window dot product runs over flattened RGBA rows, eight channel values
//! (two pixels) at a time using `f32x8`.

use crate::image::{ImageView, Rgba};
use crate::kernel::Kernel;
use crate::needle::NeedleStats;
use wide::f32x8;

const LANES: usize = 8;

/// Load 8 u8 values and convert to f32x8.
#[inline]
fn load_u8x8_as_f32x8(slice: &[u8]) -> f32x8 {
    f32x8::from([
        slice[0] as f32,
        slice[1] as f32,
        slice[2] as f32,
        slice[3] as f32,
        slice[4] as f32,
        slice[5] as f32,
        slice[6] as f32,
        slice[7] as f32,
    ])
}

/// Load 8 f32 values into f32x8.
#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

/// Horizontal sum of f32x8.
#[inline]
fn hsum(v: f32x8) -> f32 {
    let arr = v.to_array();
    arr[0] + arr[1] + arr[2] + arr[3] + arr[4] + arr[5] + arr[6] + arr[7]
}

/// SIMD NCC kernel.
pub struct NccSimd;

impl Kernel for NccSimd {
    fn window_dot(
        haystack: ImageView<'_, Rgba>,
        needle: &NeedleStats,
        x: usize,
        y: usize,
    ) -> f64 {
        let w = needle.width();
        let len = w * 4;
        let simd_end = len / LANES * LANES;
        let mut dot = 0.0f64;

        for ty in 0..needle.height() {
            let Some(row) = haystack.row(y + ty) else {
                break;
            };
            let hay = row[x..x + w].as_flattened();
            let tpl = needle.row(ty);

            let mut acc = f32x8::ZERO;
            let mut i = 0;
            while i < simd_end {
                acc += load_u8x8_as_f32x8(&hay[i..]) * load_f32x8(&tpl[i..]);
                i += LANES;
            }
            let mut tail = 0.0f32;
            while i < len {
                tail += hay[i] as f32 * tpl[i];
                i += 1;
            }
            dot += f64::from(hsum(acc) + tail);
        }
        dot
    }
}
