//! Needle (template) statistics precomputed once per match call.

use crate::image::{ImageView, Rgba};
use crate::util::{MapTrackError, MapTrackResult};

/// Needles with less energy than this carry no usable signal.
pub const MIN_NEEDLE_ENERGY: f64 = 1e-6;

/// Zero-mean needle buffer and its energy.
///
/// The buffer is interleaved like the source pixels (four floats per pixel)
/// with the alpha slot fixed at zero, so it lines up with a flattened RGBA
/// haystack row.
#[derive(Clone, Debug)]
pub struct NeedleStats {
    width: usize,
    height: usize,
    mean: [f64; 3],
    zero_mean: Vec<f32>,
    zero_mean_sums: [f64; 3],
    norm_sq: f64,
}

impl NeedleStats {
    /// Computes statistics for a needle view.
    ///
    /// Fails with [`MapTrackError::DegenerateNeedle`] for flat needles.
    pub fn from_view(needle: ImageView<'_, Rgba>) -> MapTrackResult<Self> {
        let width = needle.width();
        let height = needle.height();
        let count = width
            .checked_mul(height)
            .ok_or(MapTrackError::InvalidDimensions { width, height })?;

        let mut sum = [0.0f64; 3];
        for y in 0..height {
            let row = needle.row(y).ok_or(MapTrackError::BufferTooSmall {
                needed: (y + 1) * needle.stride(),
                got: needle.as_slice().len(),
            })?;
            for px in row {
                for c in 0..3 {
                    sum[c] += f64::from(px[c]);
                }
            }
        }
        let mean = sum.map(|s| s / count as f64);

        let mut zero_mean = Vec::with_capacity(count * 4);
        let mut zero_mean_sums = [0.0f64; 3];
        let mut norm_sq = 0.0f64;
        for y in 0..height {
            let Some(row) = needle.row(y) else { continue };
            for px in row {
                for c in 0..3 {
                    let d = f64::from(px[c]) - mean[c];
                    norm_sq += d * d;
                    let stored = d as f32;
                    zero_mean_sums[c] += f64::from(stored);
                    zero_mean.push(stored);
                }
                zero_mean.push(0.0);
            }
        }

        if norm_sq < MIN_NEEDLE_ENERGY {
            return Err(MapTrackError::DegenerateNeedle { energy: norm_sq });
        }

        Ok(Self {
            width,
            height,
            mean,
            zero_mean,
            zero_mean_sums,
            norm_sq,
        })
    }

    /// Returns the needle width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the needle height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels in the needle.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Per-channel (R, G, B) mean of the needle.
    pub fn mean(&self) -> [f64; 3] {
        self.mean
    }

    /// Sum of squared deviations from the mean (the needle energy).
    pub fn norm_sq(&self) -> f64 {
        self.norm_sq
    }

    /// Zero-mean buffer, four floats per pixel in row-major order.
    pub fn zero_mean(&self) -> &[f32] {
        &self.zero_mean
    }

    /// Per-channel sums of the stored zero-mean values.
    ///
    /// Zero up to `f32` rounding; the matcher uses them to subtract the
    /// haystack window mean without touching every pixel again.
    pub(crate) fn zero_mean_sums(&self) -> [f64; 3] {
        self.zero_mean_sums
    }

    /// Zero-mean values of needle row `y`.
    #[inline]
    pub(crate) fn row(&self, y: usize) -> &[f32] {
        let len = self.width * 4;
        &self.zero_mean[y * len..(y + 1) * len]
    }
}

#[cfg(test)]
mod tests {
    use super::NeedleStats;
    use crate::image::OwnedImage;
    use crate::util::MapTrackError;

    #[test]
    fn known_stats() {
        let data = vec![[0, 10, 5, 255], [2, 10, 5, 0], [4, 10, 5, 9], [6, 10, 5, 1]];
        let img = OwnedImage::new(data, 2, 2).unwrap();
        let stats = NeedleStats::from_view(img.view()).unwrap();

        assert_eq!(stats.mean(), [3.0, 10.0, 5.0]);
        assert!((stats.norm_sq() - 20.0).abs() < 1e-12);
        assert_eq!(&stats.zero_mean()[..8], &[-3.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0]);
        assert_eq!(stats.row(1), &[1.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn flat_needle_is_rejected() {
        let img = OwnedImage::filled(4, 4, [80, 90, 100, 255]).unwrap();
        let err = NeedleStats::from_view(img.view()).err().unwrap();
        assert!(matches!(err, MapTrackError::DegenerateNeedle { energy } if energy < 1e-6));
    }
}
