//! Control grid model: the N×N lattice of draggable points that defines a
//! deformation, plus the [`Placement`] rectangle that anchors it to the
//! output surface.
//!
//! Grid coordinates live in output-surface space. The source image's natural
//! pixel space is mapped into the placement rectangle before warping, so a
//! grid point's `original_position` is where the undeformed image sits and
//! its `position` is where the user dragged it.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::WarpError;

/// Margin (in surface units) that dragged points must keep from the surface
/// edge. Matches the handle radius of the interactive host.
pub const POINT_MARGIN: f64 = 6.0;

/// Displacement (per axis) below which a point counts as undeformed.
pub const DEFORMATION_EPSILON: f64 = 0.1;

/// Margin reserved around an aspect-fit placement for control-point handles.
const FIT_MARGIN: f64 = 60.0;

/// Where the undeformed source image would be drawn on the output surface.
///
/// This rectangle is the domain over which grid coordinates are defined:
/// a freshly created grid spans it exactly, and the point-level deformers
/// use it to map query coordinates into grid space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    /// Creates a placement rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centers an `image_w` × `image_h` source in a `surface_w` × `surface_h`
    /// output surface, preserving aspect ratio and reserving a fixed margin
    /// for control-point handles.
    ///
    /// Falls back to covering the full surface when the image dimensions are
    /// not positive.
    pub fn fit(surface_w: f64, surface_h: f64, image_w: f64, image_h: f64) -> Self {
        if image_w <= 0.0 || image_h <= 0.0 {
            return Self::new(0.0, 0.0, surface_w, surface_h);
        }
        let avail_w = (surface_w - FIT_MARGIN).max(1.0);
        let avail_h = (surface_h - FIT_MARGIN).max(1.0);
        let aspect = image_w / image_h;
        let (width, height) = if avail_w / avail_h > aspect {
            (avail_h * aspect, avail_h)
        } else {
            (avail_w, avail_w / aspect)
        };
        Self {
            x: (surface_w - width) / 2.0,
            y: (surface_h - height) / 2.0,
            width,
            height,
        }
    }

    /// Position of the query point relative to this rectangle, where (0, 0)
    /// is the top-left corner and (1, 1) the bottom-right.
    ///
    /// Not clamped; callers decide how to treat out-of-range values.
    pub fn relative(&self, p: DVec2) -> DVec2 {
        DVec2::new((p.x - self.x) / self.width, (p.y - self.y) / self.height)
    }

    /// True when the rectangle has no usable area.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A single draggable grid point.
///
/// `original_position` is fixed at grid creation; `position` mutates only
/// through [`ControlGrid`] commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub position: DVec2,
    pub original_position: DVec2,
    pub row: usize,
    pub col: usize,
}

/// The N×N control point lattice, stored row-major.
///
/// Topology (`size`) is fixed after construction; changing it requires
/// rebuilding the grid, which resets every point. A grid with no points is a
/// legal "not yet laid out" value; every operation treats it as a no-op so
/// a missing placement never raises.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlGrid {
    size: usize,
    points: Vec<ControlPoint>,
    deform_strength: f64,
}

impl ControlGrid {
    /// Lays out `size` × `size` points evenly across `placement`.
    ///
    /// Returns `WarpError::InvalidGridSize` if `size < 2`.
    pub fn new(size: usize, placement: &Placement) -> Result<Self, WarpError> {
        if size < 2 {
            return Err(WarpError::InvalidGridSize(size));
        }
        let cells = (size - 1) as f64;
        let mut points = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let pos = DVec2::new(
                    placement.x + (col as f64 / cells) * placement.width,
                    placement.y + (row as f64 / cells) * placement.height,
                );
                points.push(ControlPoint {
                    position: pos,
                    original_position: pos,
                    row,
                    col,
                });
            }
        }
        Ok(Self {
            size,
            points,
            deform_strength: 1.0,
        })
    }

    /// The "placement absent" grid: correct topology, no points.
    ///
    /// Consumers treat it as a no-op; the caller is expected to rebuild with
    /// a real placement before rendering.
    pub fn empty(size: usize) -> Self {
        Self {
            size: size.max(2),
            points: Vec::new(),
            deform_strength: 1.0,
        }
    }

    /// Rebuilds a grid from captured point pairs `(position, original)`,
    /// row-major.
    ///
    /// Returns `WarpError::InvalidGridSize` if `size < 2`, or
    /// `WarpError::StateMismatch` if the point count is not `size * size`.
    pub fn from_positions(
        size: usize,
        deform_strength: f64,
        positions: &[(DVec2, DVec2)],
    ) -> Result<Self, WarpError> {
        if size < 2 {
            return Err(WarpError::InvalidGridSize(size));
        }
        if positions.len() != size * size {
            return Err(WarpError::StateMismatch {
                expected: size * size,
                got: positions.len(),
            });
        }
        let points = positions
            .iter()
            .enumerate()
            .map(|(i, &(position, original_position))| ControlPoint {
                position,
                original_position,
                row: i / size,
                col: i % size,
            })
            .collect();
        Ok(Self {
            size,
            points,
            deform_strength,
        })
    }

    /// Points per axis.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cells per axis (`size - 1`).
    pub fn cells(&self) -> usize {
        self.size - 1
    }

    /// True when the grid has no points laid out yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Read-only access to the row-major point array.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// The point at `(row, col)`.
    ///
    /// Returns `WarpError::PointOutOfRange` if the index is outside the grid
    /// (including every index of an empty grid).
    pub fn point(&self, row: usize, col: usize) -> Result<&ControlPoint, WarpError> {
        if row >= self.size || col >= self.size || self.points.is_empty() {
            return Err(WarpError::PointOutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        Ok(&self.points[row * self.size + col])
    }

    /// Current position of the point at the edge-clamped index `(row, col)`.
    ///
    /// Out-of-range indices snap to the nearest border point, which is what
    /// gives edge cells their "natural spline" boundary curves. Returns
    /// `None` for an empty grid.
    pub fn clamped_position(&self, row: isize, col: isize) -> Option<DVec2> {
        if self.points.is_empty() {
            return None;
        }
        let hi = (self.size - 1) as isize;
        let r = row.clamp(0, hi) as usize;
        let c = col.clamp(0, hi) as usize;
        Some(self.points[r * self.size + c].position)
    }

    /// Moves one point, clamping the target so it stays [`POINT_MARGIN`]
    /// inside the `bounds` (width, height) of the enclosing surface.
    ///
    /// A no-op on an empty grid; out-of-range indices on a populated grid
    /// are a `WarpError::PointOutOfRange`.
    pub fn move_point(
        &mut self,
        row: usize,
        col: usize,
        new_position: DVec2,
        bounds: DVec2,
    ) -> Result<(), WarpError> {
        if self.points.is_empty() {
            log::debug!("move_point ignored: grid has no points");
            return Ok(());
        }
        if row >= self.size || col >= self.size {
            return Err(WarpError::PointOutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        let min = DVec2::splat(POINT_MARGIN);
        let max = (bounds - DVec2::splat(POINT_MARGIN)).max(min);
        self.points[row * self.size + col].position = new_position.clamp(min, max);
        Ok(())
    }

    /// Restores one point to its original position.
    pub fn reset_point(&mut self, row: usize, col: usize) -> Result<(), WarpError> {
        if self.points.is_empty() {
            log::debug!("reset_point ignored: grid has no points");
            return Ok(());
        }
        if row >= self.size || col >= self.size {
            return Err(WarpError::PointOutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        let p = &mut self.points[row * self.size + col];
        p.position = p.original_position;
        Ok(())
    }

    /// Restores every point to its original position.
    pub fn reset_all(&mut self) {
        for p in &mut self.points {
            p.position = p.original_position;
        }
    }

    /// True iff any point is displaced more than [`DEFORMATION_EPSILON`]
    /// on either axis.
    pub fn has_deformation(&self) -> bool {
        self.points.iter().any(|p| {
            let d = p.position - p.original_position;
            d.x.abs() > DEFORMATION_EPSILON || d.y.abs() > DEFORMATION_EPSILON
        })
    }

    /// The placement rectangle the grid was laid out over, recovered as the
    /// bounding box of the original positions. `None` for an empty grid.
    pub fn original_bounds(&self) -> Option<Placement> {
        let first = self.points.first()?.original_position;
        let mut min = first;
        let mut max = first;
        for p in &self.points {
            min = min.min(p.original_position);
            max = max.max(p.original_position);
        }
        Some(Placement::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// The deform-strength scalar carried with the grid.
    ///
    /// Honored only by the bilinear point fallback; the Coons paths read
    /// grid positions directly. Never clamped here.
    pub fn deform_strength(&self) -> f64 {
        self.deform_strength
    }

    /// Sets the deform-strength scalar (unclamped).
    pub fn set_deform_strength(&mut self, strength: f64) {
        self.deform_strength = strength;
    }
}
