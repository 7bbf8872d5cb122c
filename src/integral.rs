//! Summed-area tables over RGB channels.
//!
//! Four tables of size `(W + 1) x (H + 1)` hold running sums of R, G, B and of
//! `R^2 + G^2 + B^2`. Row 0 and column 0 are zero and `table[y][x]` is the sum
//! over `[0, x) x [0, y)`, so any rectangle sum costs four lookups. Sums are
//! kept in `u64`, which is exact for any image that fits in memory.

use crate::image::{ImageView, Rgba};
use crate::util::{MapTrackError, MapTrackResult};

/// Channel sums over one rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowSums {
    pub r: u64,
    pub g: u64,
    pub b: u64,
    /// Sum of squared channel values over R, G and B.
    pub sq: u64,
}

impl WindowSums {
    /// Per-channel means over a window of `count` pixels.
    pub fn means(&self, count: usize) -> [f64; 3] {
        let n = count as f64;
        [self.r as f64 / n, self.g as f64 / n, self.b as f64 / n]
    }

    /// Sum of squared deviations from the per-channel means.
    pub fn centered_energy(&self, count: usize) -> f64 {
        let n = count as f64;
        let (r, g, b) = (self.r as f64, self.g as f64, self.b as f64);
        (self.sq as f64 - (r * r + g * g + b * b) / n).max(0.0)
    }
}

/// Precomputed summed-area tables for one image.
#[derive(Clone, Debug)]
pub struct IntegralImage {
    width: usize,
    height: usize,
    sum_r: Vec<u64>,
    sum_g: Vec<u64>,
    sum_b: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl IntegralImage {
    /// Builds the tables for a view.
    pub fn new(view: ImageView<'_, Rgba>) -> Self {
        let width = view.width();
        let height = view.height();
        let mut out = Self::zeroed(width, height);
        for y in 0..height {
            if let Some(row) = view.row(y) {
                out.accumulate_row(y, row);
            }
        }
        out
    }

    /// Builds the tables for a contiguous pixel slice.
    ///
    /// A zero-area input yields an all-zero table. Fails if `pixels` holds
    /// fewer than `width * height` pixels.
    pub fn from_pixels(pixels: &[Rgba], width: usize, height: usize) -> MapTrackResult<Self> {
        let needed = width
            .checked_mul(height)
            .ok_or(MapTrackError::InvalidDimensions { width, height })?;
        if pixels.len() < needed {
            return Err(MapTrackError::BufferTooSmall {
                needed,
                got: pixels.len(),
            });
        }
        let mut out = Self::zeroed(width, height);
        if width == 0 {
            return Ok(out);
        }
        for (y, row) in pixels.chunks_exact(width).take(height).enumerate() {
            out.accumulate_row(y, row);
        }
        Ok(out)
    }

    fn zeroed(width: usize, height: usize) -> Self {
        let len = (width + 1) * (height + 1);
        Self {
            width,
            height,
            sum_r: vec![0; len],
            sum_g: vec![0; len],
            sum_b: vec![0; len],
            sum_sq: vec![0; len],
        }
    }

    fn accumulate_row(&mut self, y: usize, row: &[Rgba]) {
        let stride = self.width + 1;
        let above = y * stride;
        let here = (y + 1) * stride;
        let (mut r, mut g, mut b, mut sq) = (0u64, 0u64, 0u64, 0u64);
        for (x, px) in row.iter().enumerate().take(self.width) {
            let (pr, pg, pb) = (u64::from(px[0]), u64::from(px[1]), u64::from(px[2]));
            r += pr;
            g += pg;
            b += pb;
            sq += pr * pr + pg * pg + pb * pb;
            let idx = here + x + 1;
            self.sum_r[idx] = self.sum_r[above + x + 1] + r;
            self.sum_g[idx] = self.sum_g[above + x + 1] + g;
            self.sum_b[idx] = self.sum_b[above + x + 1] + b;
            self.sum_sq[idx] = self.sum_sq[above + x + 1] + sq;
        }
    }

    /// Width of the source image in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the source image in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the sums over the `width x height` rectangle at `(x, y)`.
    ///
    /// `None` if the rectangle leaves the image.
    pub fn rect_sums(&self, x: usize, y: usize, width: usize, height: usize) -> Option<WindowSums> {
        let x1 = x.checked_add(width)?;
        let y1 = y.checked_add(height)?;
        if x1 > self.width || y1 > self.height {
            return None;
        }
        Some(self.window_sums(x, y, width, height))
    }

    /// Unchecked variant of [`rect_sums`](Self::rect_sums) for scan loops.
    #[inline]
    pub(crate) fn window_sums(&self, x: usize, y: usize, width: usize, height: usize) -> WindowSums {
        let stride = self.width + 1;
        let tl = y * stride + x;
        let tr = tl + width;
        let bl = (y + height) * stride + x;
        let br = bl + width;
        let pick = |t: &[u64]| t[br] + t[tl] - t[tr] - t[bl];
        WindowSums {
            r: pick(&self.sum_r),
            g: pick(&self.sum_g),
            b: pick(&self.sum_b),
            sq: pick(&self.sum_sq),
        }
    }
}
