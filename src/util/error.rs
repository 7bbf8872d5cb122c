//! Error types for maptrack.

use thiserror::Error;

/// Result alias for maptrack operations.
pub type MapTrackResult<T> = std::result::Result<T, MapTrackError>;

/// Errors that can occur when building images or running the tracker.
///
/// The enum is `Clone` so a failed one-time initialization can be cached and
/// handed to every later caller.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MapTrackError {
    /// Width or height is zero or overflows the address space.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the declared geometry needs.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region of interest does not fit inside its image.
    #[error(
        "roi {width}x{height} at ({x}, {y}) is out of bounds for {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The rotation angle grid parameters are unusable.
    #[error("invalid angle grid: {reason}")]
    InvalidAngleGrid { reason: &'static str },
    /// The needle has (almost) no energy and cannot be correlated.
    #[error("degenerate needle: energy {energy} is below the matching floor")]
    DegenerateNeedle { energy: f64 },
    /// Configuration or call parameters are out of range or malformed.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
    /// A named resource could not be located.
    #[error("resource not found: {name}")]
    ResourceNotFound { name: String },
    /// Reading or decoding an image failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
    /// Loading reference maps or the pointer template failed.
    #[error("initialization failed: {0}")]
    Initialization(Box<MapTrackError>),
}
