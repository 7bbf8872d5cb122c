//! maptrack locates a game's mini-map on a set of reference maps and reads the
//! heading of the player pointer drawn on it.
//!
//! Both estimates come from exhaustive RGB normalized cross-correlation backed
//! by integral images. Location matches a resampled mini-map crop against every
//! reference map; heading turns the pointer patch through a grid of angles and
//! matches an upright pointer template. Parallel scanning is available through
//! the `rayon` feature and a vectorized dot product through `simd`.
//!
//! ```no_run
//! use maptrack::{InferParams, MapTracker, MemoryResources, OwnedImage, TrackerConfig};
//!
//! # fn run(map: OwnedImage, pointer: OwnedImage, screen: OwnedImage) -> maptrack::MapTrackResult<()> {
//! let resources = MemoryResources::new()
//!     .with_map("map01_lv001", map, None)
//!     .with_pointer(pointer);
//! let tracker = MapTracker::new(TrackerConfig::default(), resources)?;
//! let inference = tracker.infer(screen.view(), &InferParams::default())?;
//! println!("{} ({}, {}) facing {}", inference.result.map_name,
//!     inference.result.x, inference.result.y, inference.result.rot);
//! # Ok(())
//! # }
//! ```

pub mod bank;
pub mod config;
pub mod engine;
pub mod geom;
pub mod heading;
pub mod image;
pub mod integral;
pub mod kernel;
pub mod locate;
pub mod lowlevel;
pub mod needle;
pub mod resources;
pub mod search;
mod trace;
pub mod util;

pub use bank::{AngleGrid, ReferenceMap, ScaledMapCache, ScaledMaps};
pub use config::{AngleSteps, CropAnchor, InferParams, TrackerConfig};
pub use engine::{is_hit, InferResult, Inference, MapTracker};
pub use geom::Rect;
pub use heading::{HeadingEstimate, PointerTemplate};
pub use crate::image::{ImageView, OwnedImage, Rgba};
pub use locate::{LocationEstimate, NO_MAP};
#[cfg(feature = "image-io")]
pub use resources::DirResources;
pub use resources::{MapSource, MemoryResources, ResourceProvider};
pub use util::{MapTrackError, MapTrackResult};

#[cfg(feature = "image-io")]
pub use crate::image::io;
