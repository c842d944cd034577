use crate::coords::Vec2;

use super::Color;

/// A single gradient stop.
///
/// `t` is expected in [0, 1]. Stops are assumed sorted by `t`; sampling walks them in order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Radial gradient from a center point out to `radius`, in the paint's local space.
///
/// Semantics:
/// - `t = distance(p, center) / radius`
/// - stops define premultiplied colors, interpolated in premultiplied space
/// - beyond the radius the edge stop is held (pad)
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Vec2, radius: f32, stops: Vec<ColorStop>) -> Self {
        Self { center, radius, stops }
    }

    /// Samples the gradient at local point `p`.
    ///
    /// A non-positive radius degenerates to the last stop everywhere.
    pub fn sample(&self, p: Vec2) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::transparent();
        };
        if self.radius <= 0.0 {
            return last.color;
        }

        let t = ((p - self.center).length() / self.radius).clamp(0.0, 1.0);
        if t <= first.t {
            return first.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.t {
                let span = hi.t - lo.t;
                if span <= 0.0 {
                    return hi.color;
                }
                return lo.color.lerp(hi.color, (t - lo.t) / span);
            }
        }

        last.color
    }
}
