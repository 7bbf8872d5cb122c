//! Low-level building blocks for custom pipelines.
//!
//! These expose the matcher, the statistics it consumes and the image
//! operations used by inference. Most users should prefer [`MapTracker`].
//!
//! [`MapTracker`]: crate::MapTracker

pub use crate::heading::{search_rotation, RotationSearch};
pub use crate::image::resample::resize_area;
pub use crate::image::rotate::rotate_rgba_bilinear;
pub use crate::integral::{IntegralImage, WindowSums};
pub use crate::kernel::scalar::NccScalar;
#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::scan_par;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::NccSimd;
pub use crate::kernel::{Kernel, MatchResult, Placements};
pub use crate::locate::locate_in_maps;
pub use crate::needle::NeedleStats;
pub use crate::search::match_template;
