//! Cell subdivision and the two render quality tiers.
//!
//! Every grid cell is cut into an S×S lattice of sub-cells, each sub-cell
//! into two triangles. Source corners interpolate the cell's share of the
//! source image's natural pixel space; destination corners come from the
//! cell's Coons patch. Interactive renders draw directly at 1×; seamless
//! renders draw 3×-supersampled into an offscreen surface and box-downsample
//! into the visible output, which suppresses the seam and aliasing artifacts
//! tolerated during dragging.

use glam::DVec2;
use meshwarp_core::{CellPatch, ControlGrid, WarpError};

use crate::resampler::draw_triangle;
use crate::surface::Surface;

/// Sub-cells per cell axis during interactive dragging.
pub const INTERACTIVE_SUBDIV: usize = 8;

/// Sub-cells per cell axis for the final pass.
pub const SEAMLESS_SUBDIV: usize = 20;

/// Supersampling factor of the final pass.
pub const SUPERSAMPLE: usize = 3;

/// All recognized quality names.
const QUALITY_NAMES: &[&str] = &["interactive", "seamless"];

/// The two render quality tiers, trading subdivision density and
/// supersampling for responsiveness vs. final fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderQuality {
    /// Cheap per-mutation redraw: coarse subdivision, no supersampling.
    Interactive,
    /// Final/export pass: dense subdivision plus supersampled downsample.
    Seamless,
}

impl RenderQuality {
    /// Constructs a quality tier by name.
    ///
    /// Returns `WarpError::UnknownStrategy` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, WarpError> {
        match name {
            "interactive" => Ok(RenderQuality::Interactive),
            "seamless" => Ok(RenderQuality::Seamless),
            _ => Err(WarpError::UnknownStrategy(name.to_string())),
        }
    }

    /// The tier's name.
    pub fn name(self) -> &'static str {
        match self {
            RenderQuality::Interactive => "interactive",
            RenderQuality::Seamless => "seamless",
        }
    }

    /// Sub-cells per cell axis at this tier.
    pub fn subdiv(self) -> usize {
        match self {
            RenderQuality::Interactive => INTERACTIVE_SUBDIV,
            RenderQuality::Seamless => SEAMLESS_SUBDIV,
        }
    }

    /// Returns a slice of all recognized quality names.
    pub fn list_names() -> &'static [&'static str] {
        QUALITY_NAMES
    }
}

/// Clears `out` and paints the warped source into it at the given quality.
///
/// An empty grid paints nothing (callers gate on prerequisites before
/// invoking a render).
pub fn render(
    out: &mut Surface,
    source: &Surface,
    grid: &ControlGrid,
    quality: RenderQuality,
) -> Result<(), WarpError> {
    match quality {
        RenderQuality::Interactive => {
            out.clear();
            render_pass(out, source, grid, quality.subdiv(), 1.0);
            Ok(())
        }
        RenderQuality::Seamless => {
            let mut hi = Surface::new(
                out.width()
                    .checked_mul(SUPERSAMPLE)
                    .ok_or(WarpError::InvalidDimensions)?,
                out.height()
                    .checked_mul(SUPERSAMPLE)
                    .ok_or(WarpError::InvalidDimensions)?,
            )?;
            render_pass(&mut hi, source, grid, quality.subdiv(), SUPERSAMPLE as f64);
            downsample_into(out, &hi, SUPERSAMPLE);
            Ok(())
        }
    }
}

/// Paints every cell's sub-triangles into `out`, with destination
/// coordinates scaled by `scale` (1 for direct draws, the supersampling
/// factor for the offscreen pass).
fn render_pass(out: &mut Surface, source: &Surface, grid: &ControlGrid, subdiv: usize, scale: f64) {
    if grid.is_empty() {
        return;
    }
    let cells = grid.cells();
    let sw = source.width() as f64;
    let sh = source.height() as f64;

    for gy in 0..cells {
        for gx in 0..cells {
            let Some(patch) = CellPatch::from_grid(grid, gy, gx) else {
                continue;
            };
            for vstep in 0..subdiv {
                let v0 = vstep as f64 / subdiv as f64;
                let v1 = (vstep + 1) as f64 / subdiv as f64;
                let sy0 = (gy as f64 + v0) / cells as f64 * sh;
                let sy1 = (gy as f64 + v1) / cells as f64 * sh;

                for ustep in 0..subdiv {
                    let u0 = ustep as f64 / subdiv as f64;
                    let u1 = (ustep + 1) as f64 / subdiv as f64;
                    let sx0 = (gx as f64 + u0) / cells as f64 * sw;
                    let sx1 = (gx as f64 + u1) / cells as f64 * sw;

                    let d00 = patch.eval(u0, v0) * scale;
                    let d10 = patch.eval(u1, v0) * scale;
                    let d01 = patch.eval(u0, v1) * scale;
                    let d11 = patch.eval(u1, v1) * scale;

                    let s00 = DVec2::new(sx0, sy0);
                    let s10 = DVec2::new(sx1, sy0);
                    let s01 = DVec2::new(sx0, sy1);
                    let s11 = DVec2::new(sx1, sy1);

                    draw_triangle(out, source, [s00, s10, s01], [d00, d10, d01]);
                    draw_triangle(out, source, [s11, s01, s10], [d11, d01, d10]);
                }
            }
        }
    }
}

/// Box-averages `factor` × `factor` blocks of `hi` into `out`.
fn downsample_into(out: &mut Surface, hi: &Surface, factor: usize) {
    let samples = (factor * factor) as u32;
    for y in 0..out.height() {
        for x in 0..out.width() {
            let mut acc = [0u32; 4];
            for sy in 0..factor {
                for sx in 0..factor {
                    let p = hi.pixel(x * factor + sx, y * factor + sy);
                    for k in 0..4 {
                        acc[k] += p[k] as u32;
                    }
                }
            }
            out.put_pixel(
                x,
                y,
                [
                    ((acc[0] + samples / 2) / samples) as u8,
                    ((acc[1] + samples / 2) / samples) as u8,
                    ((acc[2] + samples / 2) / samples) as u8,
                    ((acc[3] + samples / 2) / samples) as u8,
                ],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshwarp_core::{ControlGrid, Placement};

    fn solid_source(w: usize, h: usize, color: [u8; 4]) -> Surface {
        let mut s = Surface::new(w, h).unwrap();
        s.fill(color);
        s
    }

    /// Gradient source whose channels are linear in x and y; bilinear
    /// resampling reproduces linear content exactly, so content equality
    /// checks stay sharp.
    fn gradient_source(w: usize, h: usize) -> Surface {
        let mut s = Surface::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                s.put_pixel(x, y, [(x * 2) as u8, (y * 2) as u8, 60, 255]);
            }
        }
        s
    }

    // ── Quality tiers ──────────────────────────────────────────────

    #[test]
    fn from_name_parses_both_tiers() {
        assert_eq!(
            RenderQuality::from_name("interactive").unwrap(),
            RenderQuality::Interactive
        );
        assert_eq!(
            RenderQuality::from_name("seamless").unwrap(),
            RenderQuality::Seamless
        );
    }

    #[test]
    fn from_name_unknown_is_error() {
        assert!(RenderQuality::from_name("draft").is_err());
    }

    #[test]
    fn tiers_expose_their_subdivision() {
        assert_eq!(RenderQuality::Interactive.subdiv(), 8);
        assert_eq!(RenderQuality::Seamless.subdiv(), 20);
    }

    #[test]
    fn list_names_covers_both() {
        assert_eq!(RenderQuality::list_names(), &["interactive", "seamless"]);
    }

    // ── Identity law ───────────────────────────────────────────────

    #[test]
    fn identity_render_of_solid_source_covers_placement_exactly() {
        // Undeformed grid, placement equal to the source's natural size:
        // every pixel inside the placement matches the source, with no
        // holes between triangles.
        let color = [200, 50, 30, 255];
        let source = solid_source(60, 60, color);
        let placement = Placement::new(0.0, 0.0, 60.0, 60.0);
        let grid = ControlGrid::new(3, &placement).unwrap();
        let mut out = Surface::new(60, 60).unwrap();
        render(&mut out, &source, &grid, RenderQuality::Interactive).unwrap();
        for y in 0..60 {
            for x in 0..60 {
                assert_eq!(out.pixel(x, y), color, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn identity_render_seamless_matches_solid_source() {
        let color = [12, 240, 99, 255];
        let source = solid_source(30, 30, color);
        let placement = Placement::new(0.0, 0.0, 30.0, 30.0);
        let grid = ControlGrid::new(3, &placement).unwrap();
        let mut out = Surface::new(30, 30).unwrap();
        render(&mut out, &source, &grid, RenderQuality::Seamless).unwrap();
        for y in 0..30 {
            for x in 0..30 {
                assert_eq!(out.pixel(x, y), color, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn identity_render_reproduces_content_on_interior_cells() {
        // Border cells reparameterize slightly because of clamped spline
        // neighbors; interior cells of a 4x4 grid are clamp-free and must
        // reproduce source content exactly.
        let source = gradient_source(99, 99);
        let placement = Placement::new(0.0, 0.0, 99.0, 99.0);
        let grid = ControlGrid::new(4, &placement).unwrap();
        let mut out = Surface::new(99, 99).unwrap();
        render(&mut out, &source, &grid, RenderQuality::Interactive).unwrap();
        // Center cell spans [33, 66]²; stay a couple of pixels inside it.
        for y in 36..=63 {
            for x in 36..=63 {
                assert_eq!(out.pixel(x, y), source.pixel(x, y), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn render_outside_placement_stays_transparent() {
        let source = solid_source(40, 40, [255, 0, 0, 255]);
        let placement = Placement::new(100.0, 100.0, 40.0, 40.0);
        let grid = ControlGrid::new(3, &placement).unwrap();
        let mut out = Surface::new(300, 300).unwrap();
        render(&mut out, &source, &grid, RenderQuality::Interactive).unwrap();
        assert_eq!(out.pixel(10, 10), [0, 0, 0, 0]);
        assert_eq!(out.pixel(290, 290), [0, 0, 0, 0]);
        assert_eq!(out.pixel(120, 120), [255, 0, 0, 255]);
    }

    #[test]
    fn render_with_empty_grid_paints_nothing() {
        let source = solid_source(40, 40, [255, 0, 0, 255]);
        let placement = Placement::new(0.0, 0.0, 40.0, 40.0);
        let grid = ControlGrid::empty(3);
        let mut out = Surface::new(40, 40).unwrap();
        render(&mut out, &source, &grid, RenderQuality::Interactive).unwrap();
        assert!(out.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn render_clears_stale_content() {
        let source = solid_source(20, 20, [0, 0, 255, 255]);
        let placement = Placement::new(0.0, 0.0, 20.0, 20.0);
        let grid = ControlGrid::new(2, &placement).unwrap();
        let mut out = Surface::new(40, 40).unwrap();
        out.fill([77, 77, 77, 255]);
        render(&mut out, &source, &grid, RenderQuality::Interactive).unwrap();
        // Pixels beyond the placement were cleared, not left stale.
        assert_eq!(out.pixel(30, 30), [0, 0, 0, 0]);
    }

    // ── Deformation ────────────────────────────────────────────────

    #[test]
    fn deformed_render_differs_from_identity() {
        let source = gradient_source(100, 100);
        let placement = Placement::new(0.0, 0.0, 100.0, 100.0);
        let mut grid = ControlGrid::new(3, &placement).unwrap();
        let mut identity = Surface::new(100, 100).unwrap();
        render(&mut identity, &source, &grid, RenderQuality::Interactive).unwrap();

        grid.move_point(1, 1, DVec2::new(65.0, 40.0), DVec2::new(100.0, 100.0))
            .unwrap();
        let mut warped = Surface::new(100, 100).unwrap();
        render(&mut warped, &source, &grid, RenderQuality::Interactive).unwrap();
        assert_ne!(identity.data(), warped.data());
    }

    // ── Downsampling ───────────────────────────────────────────────

    #[test]
    fn downsample_averages_blocks() {
        let mut hi = Surface::new(6, 6).unwrap();
        hi.fill([90, 90, 90, 255]);
        // One 3x3 block half bright, half dark.
        for y in 0..3 {
            for x in 0..3 {
                let v = if (x + y) % 2 == 0 { 100 } else { 80 };
                hi.put_pixel(x, y, [v, v, v, 255]);
            }
        }
        let mut out = Surface::new(2, 2).unwrap();
        downsample_into(&mut out, &hi, 3);
        // 5 pixels at 100 + 4 at 80 -> (820 + 4) / 9 = 91 (rounded).
        assert_eq!(out.pixel(0, 0), [91, 91, 91, 255]);
        assert_eq!(out.pixel(1, 1), [90, 90, 90, 255]);
    }
}
