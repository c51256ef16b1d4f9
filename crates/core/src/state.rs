//! Serializable grid state and the payload handed to the remote generation
//! backend.
//!
//! Wire field names are camelCase (`controlPoints`, `originalX`, ...):
//! the persisted format the surrounding application already stores under
//! [`STATE_KEY`] and the backend parses when reproducing a warp
//! server-side.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::WarpError;
use crate::grid::ControlGrid;

/// Well-known key the state is stored under in durable key-value storage.
pub const STATE_KEY: &str = "gridTransform_state";

/// One captured control point: live position plus the immutable original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedControlPoint {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "originalX")]
    pub original_x: f64,
    #[serde(rename = "originalY")]
    pub original_y: f64,
}

/// The persisted grid state.
///
/// Created on first grid initialization, updated on every drag step and on
/// reset, replaced when a different source image or grid size is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpState {
    #[serde(rename = "controlPoints")]
    pub control_points: Vec<SavedControlPoint>,
    pub size: usize,
    #[serde(rename = "deformStrength")]
    pub deform_strength: f64,
    /// Capture time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,
}

impl WarpState {
    /// Captures a grid's point positions, size, and deform strength.
    pub fn capture(grid: &ControlGrid, timestamp: u64) -> Self {
        Self {
            control_points: grid
                .points()
                .iter()
                .map(|p| SavedControlPoint {
                    x: p.position.x,
                    y: p.position.y,
                    original_x: p.original_position.x,
                    original_y: p.original_position.y,
                })
                .collect(),
            size: grid.size(),
            deform_strength: grid.deform_strength(),
            timestamp,
        }
    }

    /// True when the state carries no control points (a default or
    /// never-laid-out grid was captured).
    pub fn is_empty(&self) -> bool {
        self.control_points.is_empty()
    }

    /// Rebuilds a live grid from this state.
    ///
    /// Point positions are overwritten directly (no regeneration), so the
    /// round trip `WarpState::capture(grid).to_grid()` reproduces positions
    /// to exact floating-point equality. Returns `WarpError::StateMismatch`
    /// when the point count disagrees with `size`, and
    /// `WarpError::InvalidGridSize` for `size < 2`.
    pub fn to_grid(&self) -> Result<ControlGrid, WarpError> {
        let positions: Vec<(DVec2, DVec2)> = self
            .control_points
            .iter()
            .map(|p| {
                (
                    DVec2::new(p.x, p.y),
                    DVec2::new(p.original_x, p.original_y),
                )
            })
            .collect();
        ControlGrid::from_positions(self.size, self.deform_strength, &positions)
    }
}

/// Milliseconds since the Unix epoch, for state timestamps.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Output-surface dimensions transmitted alongside a grid state so the
/// backend can reproduce the same coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasDimensions {
    pub width: u32,
    pub height: u32,
}

/// Request payload for handing a warp to the remote generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub grid_state: WarpState,
    pub canvas_dimensions: CanvasDimensions,
    /// The target character the warp applies to.
    #[serde(rename = "char")]
    pub character: String,
}

impl SyncRequest {
    /// Builds the payload from a captured state, surface dimensions, and
    /// the target character.
    pub fn new(grid_state: WarpState, width: u32, height: u32, character: impl Into<String>) -> Self {
        Self {
            grid_state,
            canvas_dimensions: CanvasDimensions { width, height },
            character: character.into(),
        }
    }
}
