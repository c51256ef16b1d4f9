//! The warp engine: one instance per source image.
//!
//! `WarpEngine` owns the control grid, the source image with its placement,
//! and the output surface, and exposes the command interface the host UI
//! drives: move/reset points, change grid size, pump throttled interactive
//! renders, run the final pass, and serialize state. All grid mutation goes
//! through these commands; no external component touches point positions
//! directly.
//!
//! Missing prerequisites (no source image, a grid without points) degrade
//! to logged no-ops that leave prior state unchanged; nothing here raises
//! for an incomplete setup, matching how the interactive host behaves while
//! an image is still loading.

use glam::DVec2;
use meshwarp_core::{
    now_millis, ControlGrid, Placement, SyncRequest, WarpError, WarpState,
};

use crate::renderer::{render, RenderQuality};
use crate::scheduler::RenderScheduler;
use crate::surface::Surface;

/// Mesh warp engine instance.
pub struct WarpEngine {
    grid: ControlGrid,
    source: Option<Surface>,
    placement: Option<Placement>,
    output: Surface,
    scheduler: RenderScheduler,
}

impl WarpEngine {
    /// Creates an engine with an output surface of the given size and a
    /// grid of `grid_size` points per axis, not yet laid out.
    ///
    /// Returns `WarpError::InvalidGridSize` for `grid_size < 2` and
    /// `WarpError::InvalidDimensions` for an unusable surface size.
    pub fn new(surface_w: usize, surface_h: usize, grid_size: usize) -> Result<Self, WarpError> {
        if grid_size < 2 {
            return Err(WarpError::InvalidGridSize(grid_size));
        }
        Ok(Self {
            grid: ControlGrid::empty(grid_size),
            source: None,
            placement: None,
            output: Surface::new(surface_w, surface_h)?,
            scheduler: RenderScheduler::new(),
        })
    }

    /// Loads a source image and lays the grid out over its placement.
    ///
    /// With `placement: None` the image is aspect-fit into the surface with
    /// the standard handle margin. Loading a source rebuilds the grid, which
    /// resets any prior deformation, and queues a redraw.
    pub fn set_source(&mut self, source: Surface, placement: Option<Placement>) {
        let placement = placement.unwrap_or_else(|| {
            Placement::fit(
                self.output.width() as f64,
                self.output.height() as f64,
                source.width() as f64,
                source.height() as f64,
            )
        });
        let size = self.grid.size();
        self.grid = ControlGrid::new(size, &placement)
            .unwrap_or_else(|_| ControlGrid::empty(size));
        self.source = Some(source);
        self.placement = Some(placement);
        self.scheduler.request();
    }

    /// Moves a control point, clamped to the surface margin, and queues a
    /// redraw. A logged no-op while no grid is laid out.
    pub fn move_point(&mut self, row: usize, col: usize, pos: DVec2) -> Result<(), WarpError> {
        if self.grid.is_empty() {
            log::debug!("move_point ignored: no grid laid out yet");
            return Ok(());
        }
        let bounds = DVec2::new(self.output.width() as f64, self.output.height() as f64);
        self.grid.move_point(row, col, pos, bounds)?;
        self.scheduler.request();
        Ok(())
    }

    /// Resets one control point and queues a redraw.
    pub fn reset_point(&mut self, row: usize, col: usize) -> Result<(), WarpError> {
        if self.grid.is_empty() {
            log::debug!("reset_point ignored: no grid laid out yet");
            return Ok(());
        }
        self.grid.reset_point(row, col)?;
        self.scheduler.request();
        Ok(())
    }

    /// Resets every control point and queues a redraw.
    pub fn reset_all(&mut self) {
        self.grid.reset_all();
        self.scheduler.request();
    }

    /// Rebuilds the grid with a new size, resetting all deformation.
    ///
    /// Returns `WarpError::InvalidGridSize` for `size < 2`. Without a
    /// placement the grid stays unlaid at the new size.
    pub fn set_grid_size(&mut self, size: usize) -> Result<(), WarpError> {
        if size < 2 {
            return Err(WarpError::InvalidGridSize(size));
        }
        let strength = self.grid.deform_strength();
        self.grid = match &self.placement {
            Some(placement) => ControlGrid::new(size, placement)?,
            None => ControlGrid::empty(size),
        };
        self.grid.set_deform_strength(strength);
        self.scheduler.request();
        Ok(())
    }

    /// True iff any point is displaced beyond the deformation epsilon.
    pub fn has_deformation(&self) -> bool {
        self.grid.has_deformation()
    }

    /// Runs the pending interactive render, if one is queued and the
    /// prerequisites are present. Call at the host's paint cadence.
    ///
    /// Returns whether a render actually ran. The render observes the grid
    /// as it is *now*, not as it was when the redraw was requested.
    pub fn pump(&mut self) -> Result<bool, WarpError> {
        if !self.scheduler.take() {
            return Ok(false);
        }
        let Some(source) = &self.source else {
            log::debug!("interactive render skipped: no source image");
            return Ok(false);
        };
        if self.grid.is_empty() {
            log::debug!("interactive render skipped: no grid laid out");
            return Ok(false);
        }
        render(&mut self.output, source, &self.grid, RenderQuality::Interactive)?;
        Ok(true)
    }

    /// Runs the final/seamless render synchronously to completion.
    ///
    /// Not throttled. Returns whether a render ran (prerequisites present).
    pub fn render_final(&mut self) -> Result<bool, WarpError> {
        let Some(source) = &self.source else {
            log::debug!("final render skipped: no source image");
            return Ok(false);
        };
        if self.grid.is_empty() {
            log::debug!("final render skipped: no grid laid out");
            return Ok(false);
        }
        render(&mut self.output, source, &self.grid, RenderQuality::Seamless)?;
        Ok(true)
    }

    /// Read-only handle to the output surface for display.
    pub fn surface(&self) -> &Surface {
        &self.output
    }

    /// Read-only view of the control grid.
    pub fn grid(&self) -> &ControlGrid {
        &self.grid
    }

    /// The current placement rectangle, if a source is loaded.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// The deform-strength scalar (bilinear fallback only; unclamped).
    pub fn deform_strength(&self) -> f64 {
        self.grid.deform_strength()
    }

    /// Sets the deform-strength scalar.
    pub fn set_deform_strength(&mut self, strength: f64) {
        self.grid.set_deform_strength(strength);
    }

    /// Captures the current grid as a persistable state, stamped with the
    /// current time.
    pub fn to_state(&self) -> WarpState {
        WarpState::capture(&self.grid, now_millis())
    }

    /// Applies a persisted state to the live grid and queues a redraw.
    ///
    /// Non-empty states overwrite point positions directly (no
    /// regeneration); an empty state rebuilds the default layout from the
    /// placement. A state whose point count disagrees with its size is
    /// treated as "no saved state": the default layout is restored and the
    /// problem is logged, never raised.
    pub fn apply_state(&mut self, state: &WarpState) {
        if !state.is_empty() {
            match state.to_grid() {
                Ok(grid) => {
                    self.grid = grid;
                    self.scheduler.request();
                    return;
                }
                Err(e) => log::warn!("ignoring malformed warp state: {e}"),
            }
        }
        let size = if state.size >= 2 {
            state.size
        } else {
            self.grid.size()
        };
        let strength = self.grid.deform_strength();
        self.grid = match &self.placement {
            Some(placement) => ControlGrid::new(size, placement)
                .unwrap_or_else(|_| ControlGrid::empty(size)),
            None => ControlGrid::empty(size),
        };
        self.grid.set_deform_strength(strength);
        self.scheduler.request();
    }

    /// Builds the request payload for the remote generation backend.
    pub fn sync_request(&self, character: impl Into<String>) -> SyncRequest {
        let width = u32::try_from(self.output.width()).unwrap_or(u32::MAX);
        let height = u32::try_from(self.output.height()).unwrap_or(u32::MAX);
        SyncRequest::new(self.to_state(), width, height, character)
    }
}
