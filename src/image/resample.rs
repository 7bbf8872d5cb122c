//! Area-averaging resampling for arbitrary scale factors.
//!
//! Each destination pixel averages the source pixels its footprint covers,
//! weighting partially covered pixels by the covered fraction. At scale 1.0
//! the output is an exact copy.

use crate::geom::scaled_len;
use crate::image::{ImageView, OwnedImage, Rgba};
use crate::util::{MapTrackError, MapTrackResult};

/// Source taps `(index, weight)` for one destination coordinate.
type Taps = Vec<(usize, f32)>;

fn axis_taps(src_len: usize, dst_len: usize) -> Vec<Taps> {
    let ratio = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * ratio;
            let end = ((d + 1) as f64 * ratio).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);
            let mut taps = Vec::with_capacity(last - first);
            for s in first..last {
                let lo = start.max(s as f64);
                let hi = end.min((s + 1) as f64);
                if hi > lo {
                    taps.push((s, ((hi - lo) / ratio) as f32));
                }
            }
            taps
        })
        .collect()
}

/// Resamples `src` by `scale` using area averaging.
///
/// Output dimensions are `round(len * scale)`, at least one pixel.
pub fn resize_area(src: ImageView<'_, Rgba>, scale: f64) -> MapTrackResult<OwnedImage> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(MapTrackError::InvalidConfig {
            reason: format!("resample scale must be positive and finite, got {scale}"),
        });
    }
    let dst_width = scaled_len(src.width(), scale);
    let dst_height = scaled_len(src.height(), scale);
    if dst_width == src.width() && dst_height == src.height() {
        return Ok(OwnedImage::from_view(src));
    }

    let x_taps = axis_taps(src.width(), dst_width);
    let y_taps = axis_taps(src.height(), dst_height);
    let mut out = Vec::with_capacity(dst_width * dst_height);
    for row_taps in &y_taps {
        for col_taps in &x_taps {
            let mut acc = [0.0f32; 4];
            for &(sy, wy) in row_taps {
                let Some(row) = src.row(sy) else { continue };
                for &(sx, wx) in col_taps {
                    let w = wx * wy;
                    let px = row[sx];
                    for c in 0..4 {
                        acc[c] += px[c] as f32 * w;
                    }
                }
            }
            out.push(acc.map(|v| v.round().clamp(0.0, 255.0) as u8));
        }
    }
    OwnedImage::new(out, dst_width, dst_height)
}

#[cfg(test)]
mod tests {
    use super::{axis_taps, resize_area};
    use crate::image::OwnedImage;

    #[test]
    fn taps_cover_source_with_unit_weight() {
        for (src, dst) in [(10, 4), (81, 32), (7, 7), (3, 5)] {
            let taps = axis_taps(src, dst);
            assert_eq!(taps.len(), dst);
            for t in &taps {
                let total: f32 = t.iter().map(|&(_, w)| w).sum();
                assert!((total - 1.0).abs() < 1e-5, "{src}->{dst}: {total}");
            }
        }
    }

    #[test]
    fn halving_averages_two_by_two_blocks() {
        let data = (0..16u8).map(|v| [v * 10, v, 0, 255]).collect();
        let img = OwnedImage::new(data, 4, 4).unwrap();
        let half = resize_area(img.view(), 0.5).unwrap();
        assert_eq!((half.width(), half.height()), (2, 2));
        // (0 + 1 + 4 + 5) / 4 = 2.5 rounds up to 3.
        assert_eq!(half.data()[0], [25, 3, 0, 255]);
        assert_eq!(half.data()[3], [125, 13, 0, 255]);
    }

    #[test]
    fn unit_scale_copies_and_bad_scale_errors() {
        let img = OwnedImage::filled(3, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(resize_area(img.view(), 1.0).unwrap(), img);
        assert!(resize_area(img.view(), 0.0).is_err());
        assert!(resize_area(img.view(), f64::NAN).is_err());
    }
}
