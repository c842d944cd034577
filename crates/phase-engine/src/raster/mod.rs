//! CPU raster: an owned pixel surface and a canvas-style drawing context over it.
//!
//! Pixels are stored as premultiplied [`Color`](crate::paint::Color) values and only
//! quantized to 8-bit when leaving the engine (PNG export, `to_rgba_image`).

mod canvas;
mod surface;

pub use canvas::Canvas;
pub use surface::Surface;
