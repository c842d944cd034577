use crate::coords::{Rect, Transform, Vec2};
use crate::paint::{CompositeOp, Paint};

use super::Surface;

#[derive(Debug, Copy, Clone, Default)]
struct CanvasState {
    transform: Transform,
    composite: CompositeOp,
}

/// Immediate-mode drawing context over a [`Surface`].
///
/// Mirrors the subset of a 2D canvas context the mesh renderer needs:
/// a current transform and composite op, a `save`/`restore` stack, and
/// rectangle fills with solid or gradient paint.
pub struct Canvas<'a> {
    surface: &'a mut Surface,
    state: CanvasState,
    stack: Vec<CanvasState>,
}

impl<'a> Canvas<'a> {
    pub fn new(surface: &'a mut Surface) -> Self {
        Self { surface, state: CanvasState::default(), stack: Vec::new() }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    // ── state ─────────────────────────────────────────────────────────────

    /// Pushes the current transform and composite op.
    pub fn save(&mut self) {
        self.stack.push(self.state);
    }

    /// Pops the most recently saved state. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => log::debug!("canvas restore without matching save"),
        }
    }

    #[inline]
    pub fn composite(&self) -> CompositeOp {
        self.state.composite
    }

    #[inline]
    pub fn set_composite(&mut self, op: CompositeOp) {
        self.state.composite = op;
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.state.transform
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.state.transform = self.state.transform.then_translate(tx, ty);
    }

    /// Rotates the local coordinate system by `radians` (clockwise on screen).
    pub fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform.then_rotate(radians);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.then_scale(sx, sy);
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Resets every pixel to transparent, ignoring transform and composite op.
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// Fills `rect` (in local coordinates) with `paint` under the current state.
    ///
    /// A pixel is covered when its center, mapped back into local space, falls
    /// inside `rect`. The paint is sampled at that local point and combined with
    /// the destination using the current composite op. A singular transform
    /// covers nothing.
    pub fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        if rect.is_empty() {
            return;
        }
        let Some(inverse) = self.state.transform.invert() else {
            log::debug!("fill_rect skipped: singular transform");
            return;
        };

        let op = self.state.composite;
        let w = self.surface.width() as usize;
        for (i, px) in self.surface.pixels_mut().iter_mut().enumerate() {
            let device = Vec2::new((i % w) as f32 + 0.5, (i / w) as f32 + 0.5);
            let local = inverse.apply(device);
            if rect.contains(local) {
                *px = op.composite(*px, paint.sample(local));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn red() -> Paint {
        Paint::solid(Color::from_straight(1.0, 0.0, 0.0, 1.0))
    }

    #[test]
    fn fill_rect_identity_covers_exact_pixels() {
        let mut s = Surface::new(4, 4);
        let mut c = Canvas::new(&mut s);
        c.fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0), &red());

        assert_eq!(s.pixel(0, 0), Some(Color::transparent()));
        assert_eq!(s.pixel(1, 1).unwrap().a, 1.0);
        assert_eq!(s.pixel(2, 2).unwrap().a, 1.0);
        assert_eq!(s.pixel(3, 3), Some(Color::transparent()));
    }

    #[test]
    fn translate_moves_fill() {
        let mut s = Surface::new(4, 4);
        let mut c = Canvas::new(&mut s);
        c.translate(2.0, 2.0);
        c.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &red());

        assert_eq!(s.pixel(1, 1), Some(Color::transparent()));
        assert_eq!(s.pixel(3, 3).unwrap().a, 1.0);
    }

    #[test]
    fn restore_pops_transform_and_composite() {
        let mut s = Surface::new(2, 2);
        let mut c = Canvas::new(&mut s);
        c.save();
        c.translate(5.0, 5.0);
        c.set_composite(CompositeOp::Multiply);
        c.restore();

        assert_eq!(c.transform(), Transform::identity());
        assert_eq!(c.composite(), CompositeOp::SourceOver);
    }

    #[test]
    fn unbalanced_restore_is_noop() {
        let mut s = Surface::new(2, 2);
        let mut c = Canvas::new(&mut s);
        c.set_composite(CompositeOp::Screen);
        c.restore();
        assert_eq!(c.composite(), CompositeOp::Screen);
    }

    #[test]
    fn singular_transform_draws_nothing() {
        let mut s = Surface::new(2, 2);
        let mut c = Canvas::new(&mut s);
        c.scale(0.0, 0.0);
        c.fill_rect(Rect::new(-10.0, -10.0, 20.0, 20.0), &red());
        assert!(s.pixels().iter().all(|p| *p == Color::transparent()));
    }

    #[test]
    fn composite_op_applies_to_fill() {
        let mut s = Surface::new(1, 1);
        let mut c = Canvas::new(&mut s);
        let grey = Paint::solid(Color::from_straight(0.5, 0.5, 0.5, 1.0));
        c.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &grey);
        c.set_composite(CompositeOp::Lighter);
        c.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &grey);

        let px = s.pixel(0, 0).unwrap();
        assert!((px.r - 1.0).abs() < 1e-6);
    }
}
