//! Phase engine crate.
//!
//! This crate owns the CPU raster pieces used by higher layers: geometry,
//! premultiplied colors and paints, composite operations and a canvas-style
//! drawing context over an in-memory surface.

pub mod coords;
pub mod logging;
pub mod paint;
pub mod raster;
pub mod time;
