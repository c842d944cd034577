//! Coordinate and geometry types shared by the raster and the mesh renderer.
//!
//! Canonical surface space:
//! - Pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! A pixel `(x, y)` is sampled at its center `(x + 0.5, y + 0.5)`.

mod rect;
mod transform;
mod vec2;

pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
