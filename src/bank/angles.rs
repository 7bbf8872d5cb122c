//! Angle grid for the rotation search.

use crate::util::{MapTrackError, MapTrackResult};

/// Discrete angles `0, step, 2 * step, ...` below 360 degrees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AngleGrid {
    step_deg: u32,
    len: usize,
}

impl AngleGrid {
    /// Creates a grid covering one full turn with a step in `1..=360`.
    pub fn full_turn(step_deg: u32) -> MapTrackResult<Self> {
        if step_deg == 0 {
            return Err(MapTrackError::InvalidAngleGrid {
                reason: "step_deg must be > 0",
            });
        }
        if step_deg > 360 {
            return Err(MapTrackError::InvalidAngleGrid {
                reason: "step_deg must not exceed a full turn",
            });
        }
        let len = 360u32.div_ceil(step_deg) as usize;
        Ok(Self { step_deg, len })
    }

    /// Returns the number of discrete angles in the grid.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the grid has no angles.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the grid step size in degrees.
    pub fn step_deg(&self) -> u32 {
        self.step_deg
    }

    /// Returns the angle for the given index.
    pub fn angle_at(&self, idx: usize) -> u32 {
        debug_assert!(idx < self.len);
        idx as u32 * self.step_deg
    }

    /// Iterates over all angles in the grid.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len).map(|idx| self.angle_at(idx))
    }
}
