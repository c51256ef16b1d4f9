//! Coons patch evaluation for a single grid cell.
//!
//! A [`CellPatch`] captures the four boundary curves of a cell (derived from
//! Catmull-Rom conversions of the surrounding control points) together with
//! the four corner positions, and maps interior parametric coordinates to
//! warped surface positions. It is pure and is the single source of truth
//! for "where does `(u, v)` of this cell land".

use glam::DVec2;

use crate::curve::{catmull_rom_to_bezier, CubicBezier};
use crate::grid::ControlGrid;

/// The four boundary curves and corners of the grid cell at `(gy, gx)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPatch {
    top: CubicBezier,
    bottom: CubicBezier,
    left: CubicBezier,
    right: CubicBezier,
    p00: DVec2,
    p10: DVec2,
    p01: DVec2,
    p11: DVec2,
}

impl CellPatch {
    /// Builds the patch for the cell whose top-left point is `(gy, gx)`.
    ///
    /// Neighbor indices beyond the grid border are clamped to the border,
    /// which approximates a natural (non-looping) spline boundary. Returns
    /// `None` for an empty grid or a cell index outside the
    /// `cells() × cells()` cell lattice.
    pub fn from_grid(grid: &ControlGrid, gy: usize, gx: usize) -> Option<Self> {
        if grid.is_empty() || gy >= grid.cells() || gx >= grid.cells() {
            return None;
        }
        let (gy, gx) = (gy as isize, gx as isize);
        let at = |r: isize, c: isize| grid.clamped_position(r, c);

        let p00 = at(gy, gx)?;
        let p10 = at(gy, gx + 1)?;
        let p01 = at(gy + 1, gx)?;
        let p11 = at(gy + 1, gx + 1)?;

        let top = catmull_rom_to_bezier(at(gy, gx - 1)?, p00, p10, at(gy, gx + 2)?);
        let bottom = catmull_rom_to_bezier(at(gy + 1, gx - 1)?, p01, p11, at(gy + 1, gx + 2)?);
        let left = catmull_rom_to_bezier(at(gy - 1, gx)?, p00, p01, at(gy + 2, gx)?);
        let right = catmull_rom_to_bezier(at(gy - 1, gx + 1)?, p10, p11, at(gy + 2, gx + 1)?);

        Some(Self {
            top,
            bottom,
            left,
            right,
            p00,
            p10,
            p01,
            p11,
        })
    }

    /// Warped surface position for parametric coordinates `(u, v) ∈ [0, 1]²`.
    ///
    /// Standard Coons construction: the two pairs of opposite boundary
    /// curves are lofted and the bilinear corner blend is subtracted so the
    /// corners are not counted twice.
    pub fn eval(&self, u: f64, v: f64) -> DVec2 {
        let top = self.top.eval(u);
        let bottom = self.bottom.eval(u);
        let left = self.left.eval(v);
        let right = self.right.eval(v);
        let corners = self.p00 * ((1.0 - u) * (1.0 - v))
            + self.p10 * (u * (1.0 - v))
            + self.p01 * ((1.0 - u) * v)
            + self.p11 * (u * v);
        top * (1.0 - v) + bottom * v + left * (1.0 - u) + right * u - corners
    }
}
