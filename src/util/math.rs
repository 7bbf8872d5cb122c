//! Angle helpers for rotation search.

/// Wraps an angle in whole degrees to the range [0, 360).
pub(crate) fn wrap_deg(angle_deg: i64) -> u32 {
    angle_deg.rem_euclid(360) as u32
}

/// Converts the winning patch rotation into a clockwise heading.
///
/// The search rotates the screen patch onto the upright template, so the
/// heading is the inverse turn.
pub(crate) fn heading_from_search_angle(search_deg: u32) -> u32 {
    wrap_deg(360 - i64::from(search_deg))
}

/// Computes sine and cosine for an angle in degrees.
pub(crate) fn sin_cos_deg(angle_deg: f32) -> (f32, f32) {
    angle_deg.to_radians().sin_cos()
}
