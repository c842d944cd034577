use super::Vec2;

/// 2D affine transform.
///
/// Maps a point `p` to:
/// ```text
/// x' = a*x + c*y + e
/// y' = b*x + d*y + f
/// ```
///
/// The `then_*` builders post-multiply, so `identity().then_translate(..).then_rotate(..)`
/// behaves like calling `translate` then `rotate` on a 2D drawing context: the last
/// operation is applied to local coordinates first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    /// `self * other` (apply `other` first, then `self`).
    #[inline]
    pub fn concat(self, other: Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    #[inline]
    pub fn then_translate(self, tx: f32, ty: f32) -> Transform {
        self.concat(Transform { e: tx, f: ty, ..Transform::identity() })
    }

    /// Rotation by `radians`, clockwise on screen (+Y down).
    #[inline]
    pub fn then_rotate(self, radians: f32) -> Transform {
        let (sin, cos) = radians.sin_cos();
        self.concat(Transform { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 })
    }

    #[inline]
    pub fn then_scale(self, sx: f32, sy: f32) -> Transform {
        self.concat(Transform { a: sx, d: sy, ..Transform::identity() })
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    #[inline]
    pub fn determinant(self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Returns the inverse transform, or `None` if the matrix is singular.
    pub fn invert(self) -> Option<Transform> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Transform {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }
}
