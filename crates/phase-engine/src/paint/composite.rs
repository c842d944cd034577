//! Composite operations over premultiplied colors.
//!
//! Separable blend modes follow the W3C compositing model:
//!
//! ```text
//! co = cs·(1 - ab) + cb·(1 - as) + as·ab·B(Cb, Cs)
//! ao = as + ab·(1 - as)
//! ```
//!
//! where `cs/cb` are premultiplied and `Cs/Cb` are the unpremultiplied channels.

use super::Color;

/// How a source color is combined with the destination already on the surface.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CompositeOp {
    /// Plain overwrite-with-alpha ("normal").
    #[default]
    SourceOver,
    /// Porter-Duff plus: channels and alpha are summed, then clamped.
    Lighter,
    Multiply,
    Screen,
    Overlay,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

impl CompositeOp {
    /// Composites `src` over `dst`, both premultiplied.
    ///
    /// A fully transparent source never changes the destination.
    #[inline]
    pub fn composite(self, dst: Color, src: Color) -> Color {
        if src.a <= 0.0 {
            return dst;
        }

        match self {
            CompositeOp::SourceOver => {
                let k = 1.0 - src.a;
                Color::from_premul(src.r + dst.r * k, src.g + dst.g * k, src.b + dst.b * k, src.a + dst.a * k)
            }
            CompositeOp::Lighter => Color::from_premul(
                (src.r + dst.r).min(1.0),
                (src.g + dst.g).min(1.0),
                (src.b + dst.b).min(1.0),
                (src.a + dst.a).min(1.0),
            ),
            CompositeOp::Multiply => blend_separable(dst, src, |b, s| b * s),
            CompositeOp::Screen => blend_separable(dst, src, |b, s| b + s - b * s),
            CompositeOp::Overlay => blend_separable(dst, src, |b, s| hard_light(s, b)),
            CompositeOp::ColorDodge => blend_separable(dst, src, color_dodge),
            CompositeOp::ColorBurn => blend_separable(dst, src, color_burn),
            CompositeOp::HardLight => blend_separable(dst, src, hard_light),
            CompositeOp::SoftLight => blend_separable(dst, src, soft_light),
            CompositeOp::Difference => blend_separable(dst, src, |b, s| (b - s).abs()),
            CompositeOp::Exclusion => blend_separable(dst, src, |b, s| b + s - 2.0 * b * s),
        }
    }
}

/// `Cs' = (1 - αb)·Cs + αb·B(Cb, Cs)`, composited source-over, in premultiplied space.
fn blend_separable(dst: Color, src: Color, f: fn(f32, f32) -> f32) -> Color {
    let (sr, sg, sb, sa) = src.to_straight();
    let (dr, dg, db, da) = dst.to_straight();

    let both = sa * da;
    let channel = |cs: f32, cb: f32, bs: f32, bb: f32| cs * (1.0 - da) + cb * (1.0 - sa) + both * f(bb, bs);

    Color::from_premul(
        channel(src.r, dst.r, sr, dr),
        channel(src.g, dst.g, sg, dg),
        channel(src.b, dst.b, sb, db),
        sa + da * (1.0 - sa),
    )
    .clamped()
}

// B(cb, cs) helpers; `b` is the backdrop channel, `s` the source channel.

fn hard_light(b: f32, s: f32) -> f32 {
    if s <= 0.5 {
        2.0 * s * b
    } else {
        let s2 = 2.0 * s - 1.0;
        b + s2 - b * s2
    }
}

fn color_dodge(b: f32, s: f32) -> f32 {
    if b <= 0.0 {
        0.0
    } else if s >= 1.0 {
        1.0
    } else {
        (b / (1.0 - s)).min(1.0)
    }
}

fn color_burn(b: f32, s: f32) -> f32 {
    if b >= 1.0 {
        1.0
    } else if s <= 0.0 {
        0.0
    } else {
        1.0 - ((1.0 - b) / s).min(1.0)
    }
}

fn soft_light(b: f32, s: f32) -> f32 {
    if s <= 0.5 {
        b - (1.0 - 2.0 * s) * b * (1.0 - b)
    } else {
        let d = if b <= 0.25 {
            ((16.0 * b - 12.0) * b + 4.0) * b
        } else {
            b.sqrt()
        };
        b + (2.0 * s - 1.0) * (d - b)
    }
}
