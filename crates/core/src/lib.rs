#![deny(unsafe_code)]
//! Core types for the mesh warp engine.
//!
//! Provides the `ControlGrid` model and `Placement` rectangle, cubic
//! boundary curves with Catmull-Rom conversion, the `CellPatch` Coons
//! evaluator, the point-level deformation strategies (`DeformerKind`),
//! the `WarpState` codec with its `StateStore` and backend `SyncRequest`,
//! and the `WarpError` type.
//!
//! The raster pipeline (surface, triangle resampler, render scheduler,
//! engine object) lives in the sibling `meshwarp-raster` crate.

pub mod curve;
pub mod deform;
pub mod error;
pub mod grid;
pub mod patch;
pub mod state;
pub mod store;

pub use curve::{catmull_rom_to_bezier, CubicBezier};
pub use deform::{BilinearDeformer, CoonsDeformer, DeformerKind, PointDeformer};
pub use error::WarpError;
pub use grid::{ControlGrid, ControlPoint, Placement, DEFORMATION_EPSILON, POINT_MARGIN};
pub use patch::CellPatch;
pub use state::{
    now_millis, CanvasDimensions, SavedControlPoint, SyncRequest, WarpState, STATE_KEY,
};
pub use store::StateStore;
