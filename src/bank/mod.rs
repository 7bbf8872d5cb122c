//! Reference maps and the single-slot scaled-map cache.
//!
//! Base maps are loaded once per tracker. Location search runs on copies
//! resampled by the caller's precision; those copies, together with their
//! integral images and scaled valid regions, live in [`ScaledMapCache`] until a
//! different scale is requested. The whole set is swapped atomically under the
//! cache lock, and readers keep an `Arc` to the set they matched against.

mod angles;

pub use angles::AngleGrid;

use crate::geom::Rect;
use crate::image::resample::resize_area;
use crate::image::OwnedImage;
use crate::integral::IntegralImage;
use crate::trace::{trace_event, trace_span};
use crate::util::MapTrackResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A named reference map with its integral image.
#[derive(Clone, Debug)]
pub struct ReferenceMap {
    name: String,
    image: OwnedImage,
    integral: IntegralImage,
    valid_region: Option<Rect>,
}

impl ReferenceMap {
    /// Builds a map and its integral image.
    ///
    /// `valid_region` is in this image's pixel space and bounds where a match
    /// center may fall.
    pub fn new(name: impl Into<String>, image: OwnedImage, valid_region: Option<Rect>) -> Self {
        let integral = IntegralImage::new(image.view());
        Self {
            name: name.into(),
            image,
            integral,
            valid_region,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &OwnedImage {
        &self.image
    }

    pub fn integral(&self) -> &IntegralImage {
        &self.integral
    }

    pub fn valid_region(&self) -> Option<&Rect> {
        self.valid_region.as_ref()
    }

    /// Resamples the map and its valid region by `scale`.
    pub fn rescaled(&self, scale: f64) -> MapTrackResult<Self> {
        let image = resize_area(self.image.view(), scale)?;
        Ok(Self::new(
            self.name.clone(),
            image,
            self.valid_region.map(|r| r.scaled(scale)),
        ))
    }
}

/// Reference maps resampled to one scale.
#[derive(Debug)]
pub struct ScaledMaps {
    scale: f64,
    maps: Vec<ReferenceMap>,
}

impl ScaledMaps {
    /// Scale factor relative to the base maps.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Maps in the same order as the base set.
    pub fn maps(&self) -> &[ReferenceMap] {
        &self.maps
    }
}

/// Single-slot cache of scaled reference maps.
#[derive(Debug, Default)]
pub struct ScaledMapCache {
    slot: Mutex<Option<Arc<ScaledMaps>>>,
    rebuilds: AtomicUsize,
}

impl ScaledMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `base` resampled by `scale`, rebuilding only if the cached
    /// scale differs or the cache is empty.
    ///
    /// The rebuild happens while holding the lock, so concurrent callers never
    /// observe a partially built set.
    pub fn get_scaled_maps(
        &self,
        base: &[ReferenceMap],
        scale: f64,
    ) -> MapTrackResult<Arc<ScaledMaps>> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = slot.as_ref() {
            if cached.scale == scale && !cached.maps.is_empty() {
                return Ok(Arc::clone(cached));
            }
        }

        let _span = trace_span!("rebuild_scaled_maps", scale = scale).entered();
        #[cfg(feature = "rayon")]
        let maps = base
            .par_iter()
            .map(|m| m.rescaled(scale))
            .collect::<MapTrackResult<Vec<_>>>()?;
        #[cfg(not(feature = "rayon"))]
        let maps = base
            .iter()
            .map(|m| m.rescaled(scale))
            .collect::<MapTrackResult<Vec<_>>>()?;

        let fresh = Arc::new(ScaledMaps { scale, maps });
        *slot = Some(Arc::clone(&fresh));
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
        trace_event!("scaled_maps_rebuilt", scale = scale, maps = fresh.maps.len());
        Ok(fresh)
    }

    /// Scale of the resident entry, if any.
    pub fn cached_scale(&self) -> Option<f64> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().map(|s| s.scale)
    }

    /// Number of rebuilds performed so far.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds.load(Ordering::Relaxed)
    }
}
