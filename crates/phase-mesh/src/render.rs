//! Mesh rendering.
//!
//! A gradient is drawn as:
//! 1. an opaque base fill with the average stop color (no transparent gaps),
//! 2. one elliptical radial falloff per stop, in list order, all composited
//!    with the gradient's single blend mode.
//!
//! Each ellipse is a circular radial gradient drawn under a
//! translate → rotate → scale transform, so the falloff stays a simple
//! distance-over-radius in local space.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use phase_engine::coords::{Rect, Vec2};
use phase_engine::paint::{Color, ColorStop as PaintStop, CompositeOp, Paint, RadialGradient};
use phase_engine::raster::{Canvas, Surface};

use crate::codec::round2;
use crate::model::{ColorStop, Gradient};

/// Opacity of a stop's falloff at t = 0, 0.5 and 1.
const FALLOFF: [(f32, f32); 3] = [(0.0, 0.6), (0.5, 0.3), (1.0, 0.0)];

/// Renders `gradient` onto a fresh `size × size` surface.
pub fn render(gradient: &Gradient, size: u32) -> Surface {
    let mut surface = Surface::new(size, size);
    render_into(&mut surface, gradient, size);
    surface
}

/// Renders `gradient` into `surface`, resizing it to `size × size` first.
///
/// Output depends only on the gradient content and `size`. A gradient without
/// stops leaves the surface transparent.
pub fn render_into(surface: &mut Surface, gradient: &Gradient, size: u32) {
    surface.resize(size, size);
    let mut canvas = Canvas::new(surface);
    canvas.clear();

    if gradient.color_stops.is_empty() {
        return;
    }

    let side = size as f32;
    let [r, g, b] = average_color(&gradient.color_stops);
    canvas.fill_rect(Rect::new(0.0, 0.0, side, side), &Paint::solid(Color::from_srgb_u8(r, g, b, 255)));

    canvas.set_composite(gradient.effective_blend_mode().composite_op());

    for stop in &gradient.color_stops {
        let Some(rgb) = stop.rgb() else {
            log::warn!("skipping stop with unparseable color {:?}", stop.color);
            continue;
        };

        let center = Vec2::new(stop.x as f32 / 100.0 * side, stop.y as f32 / 100.0 * side);
        let base_radius = stop.intensity as f32 / 100.0 * side;

        canvas.save();
        canvas.translate(center.x, center.y);
        canvas.rotate((stop.rotation as f32).to_radians());
        canvas.scale(stop.scale_x as f32, stop.scale_y as f32);

        let falloff = RadialGradient::new(
            Vec2::zero(),
            base_radius,
            FALLOFF
                .iter()
                .map(|&(t, alpha)| PaintStop::new(t, Color::from_rgb_u8_alpha(rgb, alpha)))
                .collect(),
        );
        // 2×size square around the local origin; covers the surface under any allowed scale.
        canvas.fill_rect(Rect::centered_square(side), &falloff.into());

        canvas.restore();
    }

    canvas.set_composite(CompositeOp::SourceOver);
}

/// Per-channel mean of the stop colors, rounded. White when no stop has a parseable color.
pub fn average_color(stops: &[ColorStop]) -> [u8; 3] {
    let colors: Vec<[u8; 3]> = stops.iter().filter_map(ColorStop::rgb).collect();
    if colors.is_empty() {
        return [255, 255, 255];
    }

    let n = colors.len() as f64;
    let mean = |ch: usize| {
        let total: u32 = colors.iter().map(|c| c[ch] as u32).sum();
        (total as f64 / n).round() as u8
    };
    [mean(0), mean(1), mean(2)]
}

/// Clears everything outside the circle inscribed in the surface.
pub fn apply_circular_mask(surface: &mut Surface) {
    let half = surface.width() as f32 / 2.0;
    surface.clip_to_circle(Vec2::splat(half), half);
}

/// Content fingerprint: rounded stop values plus the effective blend mode.
///
/// Two gradients that [`same_content`](crate::codec::same_content) considers equal
/// share a fingerprint.
pub fn fingerprint(gradient: &Gradient) -> u64 {
    let mut h = DefaultHasher::new();
    gradient.effective_blend_mode().hash(&mut h);
    gradient.color_stops.len().hash(&mut h);
    for stop in &gradient.color_stops {
        stop.color.hash(&mut h);
        for n in stop.numbers() {
            // +0.0 so that -0.0 and 0.0 hash alike
            (round2(n) + 0.0).to_bits().hash(&mut h);
        }
    }
    h.finish()
}

/// A preview surface that only re-renders when the gradient content or size changes.
#[derive(Debug)]
pub struct MeshCanvas {
    size: u32,
    surface: Surface,
    drawn: Option<(u64, u32)>,
}

impl MeshCanvas {
    pub fn new(size: u32) -> Self {
        Self { size, surface: Surface::new(size, size), drawn: None }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size;
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Forces the next [`draw`](Self::draw) to render.
    pub fn invalidate(&mut self) {
        self.drawn = None;
    }

    /// Renders `gradient` unless the surface already shows the same content.
    /// Returns whether a render happened.
    pub fn draw(&mut self, gradient: &Gradient) -> bool {
        let key = (fingerprint(gradient), self.size);
        if self.drawn == Some(key) {
            return false;
        }
        render_into(&mut self.surface, gradient, self.size);
        self.drawn = Some(key);
        log::debug!("redrew gradient {} at {}px", gradient.id(), self.size);
        true
    }
}
