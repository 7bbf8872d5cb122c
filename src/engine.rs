//! The tracker engine: one-time resource loading plus the combined location
//! and heading inference.

use crate::bank::{ReferenceMap, ScaledMapCache};
use crate::config::{InferParams, TrackerConfig};
use crate::heading::{estimate_heading, HeadingEstimate, PointerTemplate};
use crate::image::{ImageView, Rgba};
use crate::locate::{locate_in_maps, LocationEstimate};
use crate::resources::ResourceProvider;
use crate::trace::{trace_event, trace_span};
use crate::util::{MapTrackError, MapTrackResult};
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Flat inference result as reported to hosts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct InferResult {
    /// Winning map, or `"None"` when nothing was located.
    pub map_name: String,
    /// Mini-map center in native map pixels.
    pub x: i32,
    pub y: i32,
    /// Clockwise heading in degrees.
    pub rot: u32,
    pub loc_conf: f64,
    pub rot_conf: f64,
    pub loc_time_ms: i64,
    pub rot_time_ms: i64,
}

/// An [`InferResult`] with the threshold decision applied.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inference {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub result: InferResult,
    pub hit: bool,
}

/// True when both confidences strictly exceed `threshold`.
pub fn is_hit(loc_conf: f64, rot_conf: f64, threshold: f64) -> bool {
    loc_conf > threshold && rot_conf > threshold
}

#[derive(Debug)]
struct Assets {
    maps: Vec<ReferenceMap>,
    pointer: PointerTemplate,
}

/// Localizes the player on reference maps and reads the pointer heading.
///
/// Resources are loaded on first use and kept for the tracker's lifetime. A
/// load failure is remembered and returned by every later call. The tracker
/// is `Send + Sync`; concurrent callers share the loaded maps and the
/// scaled-map cache.
pub struct MapTracker {
    config: TrackerConfig,
    provider: Box<dyn ResourceProvider>,
    assets: OnceLock<MapTrackResult<Arc<Assets>>>,
    cache: ScaledMapCache,
}

impl std::fmt::Debug for MapTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapTracker")
            .field("config", &self.config)
            .field("initialized", &self.assets.get().is_some())
            .field("cache", &self.cache)
            .finish()
    }
}

impl MapTracker {
    /// Creates a tracker; nothing is loaded until the first call that needs it.
    pub fn new<P>(config: TrackerConfig, provider: P) -> MapTrackResult<Self>
    where
        P: ResourceProvider + 'static,
    {
        config.validate()?;
        Ok(Self {
            config,
            provider: Box::new(provider),
            assets: OnceLock::new(),
            cache: ScaledMapCache::new(),
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The scaled-map cache shared by all location calls.
    pub fn scaled_cache(&self) -> &ScaledMapCache {
        &self.cache
    }

    /// Loads resources now instead of on the first inference.
    pub fn warm_up(&self) -> MapTrackResult<()> {
        self.assets().map(|_| ())
    }

    /// Names of the loaded reference maps, in matching order.
    pub fn map_names(&self) -> MapTrackResult<Vec<String>> {
        let assets = self.assets()?;
        Ok(assets.maps.iter().map(|m| m.name().to_string()).collect())
    }

    fn assets(&self) -> MapTrackResult<Arc<Assets>> {
        self.assets
            .get_or_init(|| {
                self.load_assets()
                    .map(Arc::new)
                    .map_err(|err| MapTrackError::Initialization(Box::new(err)))
            })
            .clone()
    }

    fn load_assets(&self) -> MapTrackResult<Assets> {
        let _span = trace_span!("load_resources").entered();
        let sources = self.provider.load_maps()?;
        let mut seen = BTreeSet::new();
        let mut maps = Vec::with_capacity(sources.len());
        for source in sources {
            if !seen.insert(source.name.clone()) {
                return Err(MapTrackError::InvalidConfig {
                    reason: format!("duplicate map name {:?}", source.name),
                });
            }
            maps.push(ReferenceMap::new(source.name, source.image, source.valid_region));
        }
        if maps.is_empty() {
            return Err(MapTrackError::ResourceNotFound {
                name: "reference maps".to_string(),
            });
        }
        let pointer = PointerTemplate::new(self.provider.load_pointer()?);
        trace_event!(
            "resources_ready",
            maps = maps.len(),
            pointer_usable = pointer.stats().is_some()
        );
        Ok(Assets { maps, pointer })
    }

    /// Location inference only.
    pub fn locate(
        &self,
        screen: ImageView<'_, Rgba>,
        precision: f64,
    ) -> MapTrackResult<LocationEstimate> {
        crate::config::check_precision(precision)?;
        let assets = self.assets()?;
        self.locate_with(&assets, screen, precision)
    }

    /// Heading inference only.
    pub fn heading(
        &self,
        screen: ImageView<'_, Rgba>,
        precision: f64,
    ) -> MapTrackResult<HeadingEstimate> {
        crate::config::check_precision(precision)?;
        let assets = self.assets()?;
        self.heading_with(&assets, screen, precision)
    }

    fn locate_with(
        &self,
        assets: &Assets,
        screen: ImageView<'_, Rgba>,
        precision: f64,
    ) -> MapTrackResult<LocationEstimate> {
        let scaled = self.cache.get_scaled_maps(&assets.maps, precision)?;
        locate_in_maps(screen, &self.config.minimap, &scaled, self.config.parallel)
    }

    fn heading_with(
        &self,
        assets: &Assets,
        screen: ImageView<'_, Rgba>,
        precision: f64,
    ) -> MapTrackResult<HeadingEstimate> {
        estimate_heading(
            screen,
            &self.config.pointer,
            &assets.pointer,
            self.config.angle_steps.step_for(precision),
            self.config.rotation_fill,
        )
    }

    /// Runs location and heading inference on one screen capture.
    ///
    /// Misses are reported through the confidences and `hit`, never as
    /// errors. Errors mean the resources could not be loaded or `params` is
    /// out of range.
    pub fn infer(
        &self,
        screen: ImageView<'_, Rgba>,
        params: &InferParams,
    ) -> MapTrackResult<Inference> {
        let params = InferParams::new(params.precision, params.threshold)?;
        let assets = self.assets()?;
        let _span = trace_span!("infer", precision = params.precision).entered();

        let run_loc = || timed(|| self.locate_with(&assets, screen, params.precision));
        let run_rot = || timed(|| self.heading_with(&assets, screen, params.precision));

        #[cfg(feature = "rayon")]
        let ((loc, loc_ms), (rot, rot_ms)) = if self.config.parallel {
            rayon::join(run_loc, run_rot)
        } else {
            (run_loc(), run_rot())
        };
        #[cfg(not(feature = "rayon"))]
        let ((loc, loc_ms), (rot, rot_ms)) = (run_loc(), run_rot());

        let (loc, rot) = (loc?, rot?);
        let result = InferResult {
            map_name: loc.map_name,
            x: loc.x,
            y: loc.y,
            rot: rot.degrees,
            loc_conf: loc.confidence,
            rot_conf: rot.confidence,
            loc_time_ms: loc_ms,
            rot_time_ms: rot_ms,
        };
        let hit = is_hit(result.loc_conf, result.rot_conf, params.threshold);
        trace_event!(
            "inference_completed",
            map = result.map_name.as_str(),
            x = result.x,
            y = result.y,
            rot = result.rot,
            loc_conf = result.loc_conf,
            rot_conf = result.rot_conf,
            hit = hit,
            loc_ms = result.loc_time_ms,
            rot_ms = result.rot_time_ms
        );
        Ok(Inference { result, hit })
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, i64) {
    let start = Instant::now();
    let out = f();
    let ms = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);
    (out, ms)
}
