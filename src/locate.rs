//! Location inference: which reference map the mini-map shows, and where.

use crate::bank::ScaledMaps;
use crate::config::CropAnchor;
use crate::geom::{anchor_to_native, crop_origin};
use crate::image::resample::resize_area;
use crate::image::{ImageView, OwnedImage, Rgba};
use crate::kernel::MatchResult;
use crate::needle::NeedleStats;
use crate::search::match_template;
use crate::trace::trace_span;
use crate::util::{MapTrackError, MapTrackResult};

/// Map name reported when nothing was located.
pub const NO_MAP: &str = "None";

/// Best map and native-pixel position of the mini-map center.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationEstimate {
    pub map_name: String,
    pub x: i32,
    pub y: i32,
    /// NCC score of the winning placement, 0 when nothing was found.
    pub confidence: f64,
}

impl LocationEstimate {
    /// The "no location" result.
    pub fn none() -> Self {
        Self {
            map_name: NO_MAP.to_string(),
            x: 0,
            y: 0,
            confidence: 0.0,
        }
    }

    /// True if some map produced a candidate.
    pub fn is_found(&self) -> bool {
        self.map_name != NO_MAP
    }
}

/// Locates the mini-map crop of `screen` in every map of `maps`.
///
/// The reported position is where the anchor lands on the map, which stays
/// correct when the crop is clipped at a screen edge.
///
/// The crop is resampled by the scale the maps were built at. A flat crop or
/// one without any valid placement yields [`LocationEstimate::none`]. Ties
/// between maps go to the one listed first.
pub fn locate_in_maps(
    screen: ImageView<'_, Rgba>,
    anchor: &CropAnchor,
    maps: &ScaledMaps,
    parallel: bool,
) -> MapTrackResult<LocationEstimate> {
    let scale = maps.scale();
    let _span = trace_span!("locate", scale = scale, maps = maps.maps().len()).entered();

    let Some(crop) = screen.crop_square(anchor.center_x, anchor.center_y, anchor.radius) else {
        return Ok(LocationEstimate::none());
    };
    // Anchor offset inside the crop; less than the radius where it was clipped.
    let anchor_x = anchor.center_x - crop_origin(anchor.center_x, anchor.radius);
    let anchor_y = anchor.center_y - crop_origin(anchor.center_y, anchor.radius);
    let needle_img = if scale == 1.0 {
        OwnedImage::from_view(crop)
    } else {
        resize_area(crop, scale)?
    };
    let stats = match NeedleStats::from_view(needle_img.view()) {
        Ok(stats) => stats,
        Err(MapTrackError::DegenerateNeedle { .. }) => return Ok(LocationEstimate::none()),
        Err(err) => return Err(err),
    };

    let mut best: Option<(&str, MatchResult)> = None;
    for map in maps.maps() {
        let found = match_template(
            map.image().view(),
            map.integral(),
            &stats,
            map.valid_region(),
            parallel,
        );
        if let Some(m) = found {
            if best.map_or(true, |(_, b)| m.score > b.score) {
                best = Some((map.name(), m));
            }
        }
    }

    Ok(match best {
        None => LocationEstimate::none(),
        Some((name, m)) => LocationEstimate {
            map_name: name.to_string(),
            x: anchor_to_native(m.x, anchor_x, scale),
            y: anchor_to_native(m.y, anchor_y, scale),
            confidence: m.score,
        },
    })
}
