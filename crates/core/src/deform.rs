//! Point-level deformation strategies.
//!
//! Two algorithms coexist for different targets: the Coons patch mapping
//! (exact, seam-free, shared with the raster pipeline) and a cheaper
//! bilinear displacement blend for discrete coordinates where seams across
//! cell boundaries are acceptable. They stay separate strategies behind one
//! capability trait; their quality/cost tradeoffs differ fundamentally.

use glam::DVec2;

use crate::error::WarpError;
use crate::grid::{ControlGrid, Placement};
use crate::patch::CellPatch;

/// All available strategy names.
const STRATEGY_NAMES: &[&str] = &["bilinear", "coons"];

/// Capability interface for deforming a single coordinate.
///
/// This trait is **object-safe**: you can use `Box<dyn PointDeformer>` or
/// `&dyn PointDeformer` for runtime strategy selection.
pub trait PointDeformer {
    /// Maps a point in output-surface coordinates to its deformed position.
    fn deform_point(&self, p: DVec2) -> DVec2;
}

/// Bilinear displacement blend, scaled by the grid's deform strength.
///
/// Locates the cell enclosing the query, blends the four corner
/// *displacements* (`position - original_position`) bilinearly, and applies
/// the scaled displacement to the query. Queries outside the placement (and
/// every query against an empty grid) are returned unchanged. Not seam-free
/// across cell boundaries.
pub struct BilinearDeformer<'a> {
    grid: &'a ControlGrid,
    placement: Placement,
}

impl<'a> BilinearDeformer<'a> {
    /// Creates the strategy over a grid and its placement rectangle.
    pub fn new(grid: &'a ControlGrid, placement: Placement) -> Self {
        Self { grid, placement }
    }
}

impl PointDeformer for BilinearDeformer<'_> {
    fn deform_point(&self, p: DVec2) -> DVec2 {
        if self.grid.is_empty() || self.placement.is_degenerate() {
            return p;
        }
        let rel = self.placement.relative(p);
        if rel.x < 0.0 || rel.x > 1.0 || rel.y < 0.0 || rel.y > 1.0 {
            return p;
        }
        let size = self.grid.size();
        let cells = self.grid.cells() as f64;
        let gx = rel.x * cells;
        let gy = rel.y * cells;

        let x1 = (gx.floor() as usize).min(size - 1);
        let y1 = (gy.floor() as usize).min(size - 1);
        let x2 = (x1 + 1).min(size - 1);
        let y2 = (y1 + 1).min(size - 1);
        let wx = gx - x1 as f64;
        let wy = gy - y1 as f64;

        let displacement = |row: usize, col: usize| {
            let pt = &self.grid.points()[row * size + col];
            pt.position - pt.original_position
        };
        let d = displacement(y1, x1) * ((1.0 - wx) * (1.0 - wy))
            + displacement(y1, x2) * (wx * (1.0 - wy))
            + displacement(y2, x1) * ((1.0 - wx) * wy)
            + displacement(y2, x2) * (wx * wy);

        p + d * self.grid.deform_strength()
    }
}

/// Exact Coons patch mapping for a single coordinate.
///
/// Clamps the query into the grid domain, locates the enclosing cell, and
/// evaluates the cell's patch surface, the same mapping the raster
/// pipeline paints through, so deformed coordinates land exactly on the
/// warped image. Ignores the deform-strength scalar; grid positions are
/// authoritative.
pub struct CoonsDeformer<'a> {
    grid: &'a ControlGrid,
    placement: Placement,
}

impl<'a> CoonsDeformer<'a> {
    /// Creates the strategy over a grid and its placement rectangle.
    pub fn new(grid: &'a ControlGrid, placement: Placement) -> Self {
        Self { grid, placement }
    }
}

impl PointDeformer for CoonsDeformer<'_> {
    fn deform_point(&self, p: DVec2) -> DVec2 {
        if self.grid.is_empty() || self.placement.is_degenerate() {
            return p;
        }
        let rel = self.placement.relative(p);
        let u = rel.x.clamp(0.0, 1.0);
        let v = rel.y.clamp(0.0, 1.0);
        let cells = self.grid.cells();
        let gu = u * cells as f64;
        let gv = v * cells as f64;
        let gx = (gu.floor() as usize).min(cells - 1);
        let gy = (gv.floor() as usize).min(cells - 1);
        match CellPatch::from_grid(self.grid, gy, gx) {
            Some(patch) => patch.eval(gu - gx as f64, gv - gy as f64),
            None => p,
        }
    }
}

/// Enumeration of the available deformation strategies.
///
/// Use [`DeformerKind::from_name`] for string-based construction (CLI).
pub enum DeformerKind<'a> {
    /// Bilinear displacement blend (cheap, not seam-free).
    Bilinear(BilinearDeformer<'a>),
    /// Coons patch mapping (exact, seam-free).
    Coons(CoonsDeformer<'a>),
}

impl<'a> DeformerKind<'a> {
    /// Constructs a strategy by name.
    ///
    /// Returns `WarpError::UnknownStrategy` if the name is not recognized.
    pub fn from_name(
        name: &str,
        grid: &'a ControlGrid,
        placement: Placement,
    ) -> Result<Self, WarpError> {
        match name {
            "bilinear" => Ok(DeformerKind::Bilinear(BilinearDeformer::new(
                grid, placement,
            ))),
            "coons" => Ok(DeformerKind::Coons(CoonsDeformer::new(grid, placement))),
            _ => Err(WarpError::UnknownStrategy(name.to_string())),
        }
    }

    /// Returns a slice of all recognized strategy names.
    pub fn list_strategies() -> &'static [&'static str] {
        STRATEGY_NAMES
    }
}

impl PointDeformer for DeformerKind<'_> {
    fn deform_point(&self, p: DVec2) -> DVec2 {
        match self {
            DeformerKind::Bilinear(d) => d.deform_point(p),
            DeformerKind::Coons(d) => d.deform_point(p),
        }
    }
}
