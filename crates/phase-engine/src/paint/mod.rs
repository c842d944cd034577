//! Paint model shared between the raster and the mesh renderer.
//!
//! Scope:
//! - color representation (sRGB-encoded, premultiplied alpha)
//! - paint sources (solid, radial gradient)
//! - composite operations
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod composite;
pub mod gradient;

pub use color::Color;
pub use composite::CompositeOp;
pub use gradient::{ColorStop, RadialGradient};

use crate::coords::Vec2;

/// Paint source for filling geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    RadialGradient(RadialGradient),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    /// Color at local point `p`.
    #[inline]
    pub fn sample(&self, p: Vec2) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::RadialGradient(g) => g.sample(p),
        }
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        match self {
            Paint::Solid(c) => c.a >= 1.0,
            Paint::RadialGradient(g) => g.stops.iter().all(|s| s.color.a >= 1.0),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Paint::RadialGradient(g)
    }
}
