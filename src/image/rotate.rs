//! Rotation of RGBA patches about their center.

use crate::image::{ImageView, OwnedImage, Rgba};
use crate::util::math::sin_cos_deg;

/// Rotates an RGBA image using bilinear sampling.
///
/// Rotation is performed about the image center with
/// `cx = (w - 1) / 2` and `cy = (h - 1) / 2` in floating-point coordinates.
/// Each destination pixel center `(x, y)` is mapped to the source coordinate
/// using inverse rotation. Samples outside the source bounds are filled with
/// `fill`. The output has the same dimensions as the input and every channel
/// is rounded to the nearest integer before clamping to `[0, 255]`.
///
/// Rotations compose: rotating by `a` and then by `b` approximates a single
/// rotation by `a + b`.
pub fn rotate_rgba_bilinear(src: ImageView<'_, Rgba>, angle_deg: f32, fill: Rgba) -> OwnedImage {
    let width = src.width();
    let height = src.height();
    let mut out = vec![fill; width * height];

    let (sin_a, cos_a) = sin_cos_deg(angle_deg);
    let cx = (width as f32 - 1.0) * 0.5;
    let cy = (height as f32 - 1.0) * 0.5;
    let max_x = width as f32 - 1.0;
    let max_y = height as f32 - 1.0;
    let epsilon = 1e-4;

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let src_x = cos_a * dx + sin_a * dy + cx;
            let src_y = -sin_a * dx + cos_a * dy + cy;

            if !src_x.is_finite()
                || !src_y.is_finite()
                || src_x < -epsilon
                || src_y < -epsilon
                || src_x > max_x + epsilon
                || src_y > max_y + epsilon
            {
                continue;
            }

            let src_x = src_x.clamp(0.0, max_x);
            let src_y = src_y.clamp(0.0, max_y);
            let x0 = src_x.floor() as usize;
            let y0 = src_y.floor() as usize;
            let x1 = (x0 + 1).min(width - 1);
            let y1 = (y0 + 1).min(height - 1);
            let fx = src_x - x0 as f32;
            let fy = src_y - y0 as f32;

            let (Some(row0), Some(row1)) = (src.row(y0), src.row(y1)) else {
                continue;
            };
            let w00 = (1.0 - fx) * (1.0 - fy);
            let w10 = fx * (1.0 - fy);
            let w01 = (1.0 - fx) * fy;
            let w11 = fx * fy;

            let mut px = [0u8; 4];
            for (c, slot) in px.iter_mut().enumerate() {
                let value = row0[x0][c] as f32 * w00
                    + row0[x1][c] as f32 * w10
                    + row1[x0][c] as f32 * w01
                    + row1[x1][c] as f32 * w11;
                *slot = value.round().clamp(0.0, 255.0) as u8;
            }
            out[y * width + x] = px;
        }
    }

    OwnedImage {
        data: out,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::rotate_rgba_bilinear;
    use crate::image::{OwnedImage, Rgba};

    fn ramp(width: usize, height: usize) -> OwnedImage {
        let data: Vec<Rgba> = (0..width * height)
            .map(|i| [i as u8, 255 - i as u8, (i * 7) as u8, 255])
            .collect();
        OwnedImage::new(data, width, height).unwrap()
    }

    #[test]
    fn identity_and_half_turn() {
        let img = ramp(5, 3);
        let same = rotate_rgba_bilinear(img.view(), 0.0, [0; 4]);
        assert_eq!(same, img);

        let flipped = rotate_rgba_bilinear(img.view(), 180.0, [0; 4]);
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(flipped.view().get(x, y), img.view().get(4 - x, 2 - y));
            }
        }
    }

    #[test]
    fn quarter_turn_on_odd_square_is_exact() {
        let img = ramp(5, 5);
        let quarter = rotate_rgba_bilinear(img.view(), 90.0, [0; 4]);
        let back = rotate_rgba_bilinear(quarter.view(), 270.0, [0; 4]);
        assert_eq!(back, img);
        assert_ne!(quarter, img);
    }

    #[test]
    fn constant_image_with_matching_fill() {
        let img = OwnedImage::filled(7, 6, [9, 9, 9, 255]).unwrap();
        let rotated = rotate_rgba_bilinear(img.view(), 33.0, [9, 9, 9, 255]);
        assert!(rotated.data().iter().all(|&px| px == [9, 9, 9, 255]));
    }
}
