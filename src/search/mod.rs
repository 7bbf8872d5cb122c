//! Template search entry point.
//!
//! Picks the kernel for the enabled features and the parallel or sequential
//! scan, after restricting placements to the valid region.

#[cfg(feature = "rayon")]
use crate::kernel::rayon::scan_par;
use crate::geom::Rect;
use crate::image::{ImageView, Rgba};
use crate::integral::IntegralImage;
use crate::kernel::{Kernel, MatchResult, Placements};
use crate::needle::NeedleStats;

// Use the SIMD kernel when available.
#[cfg(not(feature = "simd"))]
pub(crate) use crate::kernel::scalar::NccScalar as Ncc;
#[cfg(feature = "simd")]
pub(crate) use crate::kernel::simd::NccSimd as Ncc;

/// Finds the best NCC placement of `needle` in `haystack`.
///
/// `valid` restricts where the needle center may fall. `None` means no
/// placement qualified or every window was flat; treat it as a score of
/// [`MatchResult::NO_CANDIDATE_SCORE`]. `parallel` only has an effect with the
/// `rayon` feature and never changes the result.
pub fn match_template(
    haystack: ImageView<'_, Rgba>,
    integral: &IntegralImage,
    needle: &NeedleStats,
    valid: Option<&Rect>,
    parallel: bool,
) -> Option<MatchResult> {
    let placements = Placements::new(
        (haystack.width(), haystack.height()),
        (needle.width(), needle.height()),
        valid,
    )?;

    #[cfg(feature = "rayon")]
    if parallel {
        return scan_par::<Ncc>(haystack, integral, needle, placements);
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;

    Ncc::scan(haystack, integral, needle, placements)
}
