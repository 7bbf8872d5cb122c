//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{MapTrackError, MapTrackResult};
use std::path::Path;

/// Creates an owned image from an `image` RGBA buffer.
pub fn owned_from_rgba_image(img: &image::RgbaImage) -> MapTrackResult<OwnedImage> {
    OwnedImage::from_rgba_bytes(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Creates an owned RGBA image from a dynamic image of any colour type.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> MapTrackResult<OwnedImage> {
    owned_from_rgba_image(&img.to_rgba8())
}

/// Loads an image from disk and converts it to an owned RGBA image.
pub fn load_rgba_image<P: AsRef<Path>>(path: P) -> MapTrackResult<OwnedImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| MapTrackError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })?;
    owned_from_dynamic_image(&img)
}
