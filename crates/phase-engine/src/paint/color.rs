/// Premultiplied RGBA color with sRGB-encoded channels (no linearization).
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
///
/// Rationale:
/// - Compositing formulas stay branch-free for fully transparent sources.
/// - Gradient interpolation in premultiplied space avoids dark fringes.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Opaque color from straight RGB bytes with a separate `[0, 1]` alpha.
    #[inline]
    pub fn from_rgb_u8_alpha(rgb: [u8; 3], alpha: f32) -> Self {
        Self::from_straight(rgb[0] as f32 / 255.0, rgb[1] as f32 / 255.0, rgb[2] as f32 / 255.0, alpha)
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Straight-alpha 8-bit RGBA, rounded to nearest and clamped.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let (r, g, b, a) = self.to_straight();
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(r), q(g), q(b), q(a)]
    }

    /// Component-wise linear interpolation (premultiplied space).
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Clamps all channels to [0, 1] and enforces premultiplication.
    #[inline]
    pub fn clamped(self) -> Self {
        let a = self.a.clamp(0.0, 1.0);

        // Clamp premultiplied rgb so it cannot exceed alpha.
        let r = self.r.clamp(0.0, a);
        let g = self.g.clamp(0.0, a);
        let b = self.b.clamp(0.0, a);

        Self { r, g, b, a }
    }
}
