#![deny(unsafe_code)]
//! Raster pipeline for the mesh warp engine.
//!
//! This crate sits on top of `meshwarp-core` (grid model, curves, patch
//! evaluator, state codec) and provides everything pixel-shaped: the RGBA
//! [`Surface`], the triangle-affine [`resampler`], the interactive/seamless
//! [`renderer`] passes, the coalescing [`RenderScheduler`], and the
//! [`WarpEngine`] command object that the host UI drives.

pub mod engine;
pub mod renderer;
pub mod resampler;
pub mod scheduler;
pub mod surface;

#[cfg(feature = "png")]
pub mod snapshot;

pub use engine::WarpEngine;
pub use renderer::{
    render, RenderQuality, INTERACTIVE_SUBDIV, SEAMLESS_SUBDIV, SUPERSAMPLE,
};
pub use scheduler::RenderScheduler;
pub use surface::Surface;
