//! Image views, owned RGBA buffers and the geometric operations on them.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.
//!
//! Screen captures, reference maps and templates are all RGBA (`[u8; 4]` per
//! pixel). Alpha is carried through but ignored by matching.

use crate::geom::crop_origin;
use crate::util::{MapTrackError, MapTrackResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod resample;
pub mod rotate;

/// One RGBA pixel.
pub type Rgba = [u8; 4];

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> MapTrackResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> MapTrackResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(MapTrackError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> MapTrackResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(MapTrackError::InvalidDimensions { width, height });
        }

        let out_of_bounds = MapTrackError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(MapTrackError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(MapTrackError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }
}

impl<'a> ImageView<'a, Rgba> {
    /// Crops the `(2 * radius + 1)`-sided square centered on `(cx, cy)`.
    ///
    /// The square is clipped to the image bounds, so its top-left corner is
    /// `(crop_origin(cx, radius), crop_origin(cy, radius))`. `None` means
    /// nothing of it overlaps the image.
    pub fn crop_square(&self, cx: usize, cy: usize, radius: usize) -> Option<ImageView<'a, Rgba>> {
        let x0 = crop_origin(cx, radius);
        let y0 = crop_origin(cy, radius);
        let x1 = cx.saturating_add(radius).saturating_add(1).min(self.width);
        let y1 = cy.saturating_add(radius).saturating_add(1).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        self.roi(x0, y0, x1 - x0, y1 - y0).ok()
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> MapTrackResult<usize> {
    if width == 0 || height == 0 {
        return Err(MapTrackError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(MapTrackError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(MapTrackError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous RGBA image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage {
    data: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Creates an owned image from exactly `width * height` pixels.
    pub fn new(data: Vec<Rgba>, width: usize, height: usize) -> MapTrackResult<Self> {
        if width == 0 || height == 0 {
            return Err(MapTrackError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(MapTrackError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(MapTrackError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(MapTrackError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an owned image from tightly packed RGBA bytes.
    pub fn from_rgba_bytes(bytes: &[u8], width: usize, height: usize) -> MapTrackResult<Self> {
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(4))
            .ok_or(MapTrackError::InvalidDimensions { width, height })?;
        if bytes.len() != needed {
            return Err(MapTrackError::BufferTooSmall {
                needed,
                got: bytes.len(),
            });
        }
        let data = bytes
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Self::new(data, width, height)
    }

    /// Creates an image where every pixel is `pixel`.
    pub fn filled(width: usize, height: usize, pixel: Rgba) -> MapTrackResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(MapTrackError::InvalidDimensions { width, height })?;
        Self::new(vec![pixel; len], width, height)
    }

    /// Copies a (possibly strided) view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, Rgba>) -> Self {
        let mut data = Vec::with_capacity(view.width() * view.height());
        for y in 0..view.height() {
            if let Some(row) = view.row(y) {
                data.extend_from_slice(row);
            }
        }
        Self {
            data,
            width: view.width(),
            height: view.height(),
        }
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, Rgba> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel buffer in row-major order.
    pub fn data(&self) -> &[Rgba] {
        &self.data
    }

    /// Returns the pixel buffer mutably in row-major order.
    pub fn data_mut(&mut self) -> &mut [Rgba] {
        &mut self.data
    }

    /// Copies `src` into this image with its top-left corner at `(x, y)`.
    ///
    /// Pixels falling outside the destination are dropped.
    pub fn blit(&mut self, src: ImageView<'_, Rgba>, x: usize, y: usize) {
        if x >= self.width {
            return;
        }
        for sy in 0..src.height() {
            let dy = y + sy;
            if dy >= self.height {
                break;
            }
            let Some(row) = src.row(sy) else { break };
            let count = row.len().min(self.width.saturating_sub(x));
            let start = dy * self.width + x;
            self.data[start..start + count].copy_from_slice(&row[..count]);
        }
    }
}
