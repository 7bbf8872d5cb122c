//! Rotation inference: which way the player pointer faces.
//!
//! The screen patch is turned through a grid of angles and each turned copy
//! is matched against the upright pointer template. The turn that realigns
//! the patch best is the inverse of the pointer's heading.

use crate::bank::AngleGrid;
use crate::config::CropAnchor;
use crate::image::rotate::rotate_rgba_bilinear;
use crate::image::{ImageView, OwnedImage, Rgba};
use crate::integral::IntegralImage;
use crate::needle::NeedleStats;
use crate::search::match_template;
use crate::trace::trace_span;
use crate::util::math::heading_from_search_angle;
use crate::util::MapTrackResult;

/// The upright pointer template with its statistics computed once.
#[derive(Clone, Debug)]
pub struct PointerTemplate {
    image: OwnedImage,
    stats: Option<NeedleStats>,
}

impl PointerTemplate {
    /// Wraps a template; a flat template is kept but can never match.
    pub fn new(image: OwnedImage) -> Self {
        let stats = NeedleStats::from_view(image.view()).ok();
        Self { image, stats }
    }

    pub fn image(&self) -> &OwnedImage {
        &self.image
    }

    /// Needle statistics, `None` for a degenerate template.
    pub fn stats(&self) -> Option<&NeedleStats> {
        self.stats.as_ref()
    }
}

/// Clockwise pointer heading in whole degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadingEstimate {
    /// Degrees clockwise from north, in `[0, 360)`.
    pub degrees: u32,
    /// NCC score of the winning turn, 0 when nothing was found.
    pub confidence: f64,
}

impl HeadingEstimate {
    /// The "no rotation" result.
    pub fn none() -> Self {
        Self {
            degrees: 0,
            confidence: 0.0,
        }
    }
}

/// Winning patch turn of a rotation search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationSearch {
    /// Angle the patch was turned by, in degrees.
    pub search_angle_deg: u32,
    pub score: f64,
}

impl RotationSearch {
    /// Heading implied by this search result.
    pub fn heading(&self) -> HeadingEstimate {
        HeadingEstimate {
            degrees: heading_from_search_angle(self.search_angle_deg),
            confidence: self.score,
        }
    }
}

/// Turns `patch` through every angle of `grid` and matches `pointer` in it.
///
/// The first angle with the strictly greatest score wins. `None` if no turn
/// produced a candidate.
pub fn search_rotation(
    patch: ImageView<'_, Rgba>,
    pointer: &NeedleStats,
    grid: &AngleGrid,
    fill: Rgba,
) -> Option<RotationSearch> {
    let mut best: Option<RotationSearch> = None;
    for angle in grid.iter() {
        let rotated = rotate_rgba_bilinear(patch, angle as f32, fill);
        let integral = IntegralImage::new(rotated.view());
        let Some(m) = match_template(rotated.view(), &integral, pointer, None, false) else {
            continue;
        };
        if best.map_or(true, |b| m.score > b.score) {
            best = Some(RotationSearch {
                search_angle_deg: angle,
                score: m.score,
            });
        }
    }
    best
}

/// Estimates the pointer heading from the pointer crop of `screen`.
pub fn estimate_heading(
    screen: ImageView<'_, Rgba>,
    anchor: &CropAnchor,
    pointer: &PointerTemplate,
    step_deg: u32,
    fill: Rgba,
) -> MapTrackResult<HeadingEstimate> {
    let _span = trace_span!("heading", step_deg = step_deg).entered();
    let grid = AngleGrid::full_turn(step_deg)?;
    let Some(stats) = pointer.stats() else {
        return Ok(HeadingEstimate::none());
    };
    let Some(patch) = screen.crop_square(anchor.center_x, anchor.center_y, anchor.radius) else {
        return Ok(HeadingEstimate::none());
    };
    Ok(search_rotation(patch, stats, &grid, fill)
        .map(|found| found.heading())
        .unwrap_or_else(HeadingEstimate::none))
}
