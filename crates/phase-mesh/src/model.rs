//! Gradient data model.
//!
//! Field names serialize in camelCase (`colorStops`, `scaleX`, `createdAt`, ...) so
//! persisted lists and share tokens stay interchangeable with the web app.

use std::fmt;
use std::str::FromStr;

use phase_engine::paint::CompositeOp;
use serde::{Deserialize, Serialize};

// ── BlendMode ─────────────────────────────────────────────────────────────

/// How every stop of a gradient is composited onto the layers below it.
///
/// An absent blend mode means [`BlendMode::Lighter`] everywhere: comparison,
/// defaulting and rendering.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
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

impl BlendMode {
    pub const ALL: [BlendMode; 10] = [
        BlendMode::Lighter,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
    ];

    /// Resolves an optional blend mode, defaulting to `Lighter`.
    #[inline]
    pub fn effective(mode: Option<BlendMode>) -> BlendMode {
        mode.unwrap_or_default()
    }

    /// Wire name (`"color-dodge"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            BlendMode::Lighter => "lighter",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BlendMode::Lighter => "Lighter (Additive)",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::ColorDodge => "Color Dodge",
            BlendMode::ColorBurn => "Color Burn",
            BlendMode::HardLight => "Hard Light",
            BlendMode::SoftLight => "Soft Light",
            BlendMode::Difference => "Difference",
            BlendMode::Exclusion => "Exclusion",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            BlendMode::Lighter => "Bright, glowing overlaps - great for vibrant effects",
            BlendMode::Multiply => "Darker, richer overlaps - creates depth",
            BlendMode::Screen => "Lighter, dreamy effect - soft and airy",
            BlendMode::Overlay => "Maintains highlights and shadows - balanced contrast",
            BlendMode::ColorDodge => "Dramatic color intensification - vivid and bold",
            BlendMode::ColorBurn => "Deep, saturated colors - intense and moody",
            BlendMode::HardLight => "Strong contrast - sharp and defined",
            BlendMode::SoftLight => "Subtle contrast - gentle and smooth",
            BlendMode::Difference => "Inverted overlaps - experimental and unique",
            BlendMode::Exclusion => "Similar to difference but softer - creative effects",
        }
    }

    /// Raster composite op used while painting the stops.
    pub const fn composite_op(self) -> CompositeOp {
        match self {
            BlendMode::Lighter => CompositeOp::Lighter,
            BlendMode::Multiply => CompositeOp::Multiply,
            BlendMode::Screen => CompositeOp::Screen,
            BlendMode::Overlay => CompositeOp::Overlay,
            BlendMode::ColorDodge => CompositeOp::ColorDodge,
            BlendMode::ColorBurn => CompositeOp::ColorBurn,
            BlendMode::HardLight => CompositeOp::HardLight,
            BlendMode::SoftLight => CompositeOp::SoftLight,
            BlendMode::Difference => CompositeOp::Difference,
            BlendMode::Exclusion => CompositeOp::Exclusion,
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown blend mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blend mode `{0}`")]
pub struct UnknownBlendMode(pub String);

impl FromStr for BlendMode {
    type Err = UnknownBlendMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlendMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownBlendMode(s.to_string()))
    }
}

// ── ColorStop ─────────────────────────────────────────────────────────────

/// One light source in the mesh.
///
/// Ranges (inclusive): `x, y` in [0, 100] percent of the canvas side,
/// `intensity` in [10, 100] percent (radius driver), `scale_x, scale_y` in
/// [0.5, 2.0], `rotation` in [0, 360] degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorStop {
    /// `#RRGGBB`.
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

impl ColorStop {
    /// Parses `color` into RGB bytes. `None` unless it is exactly `#RRGGBB`.
    pub fn rgb(&self) -> Option<[u8; 3]> {
        parse_hex_color(&self.color)
    }

    /// The six numeric fields in declaration order.
    #[inline]
    pub fn numbers(&self) -> [f64; 6] {
        [self.x, self.y, self.intensity, self.scale_x, self.scale_y, self.rotation]
    }
}

/// Parses `#RRGGBB` (hex digits in either case).
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

// ── Gradient ──────────────────────────────────────────────────────────────

/// A mesh gradient: ordered stops (render order) plus one blend mode.
///
/// `id` is assigned once by the system and cannot be changed afterwards; every
/// other field is freely mutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    id: String,
    pub color_stops: Vec<ColorStop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    /// Creation time, epoch milliseconds. Informative only.
    pub created_at: i64,
}

impl Gradient {
    /// Assembles a gradient with an already-minted identity.
    pub fn with_identity(id: impl Into<String>, config: GradientConfig, created_at: i64) -> Self {
        Self {
            id: id.into(),
            color_stops: config.color_stops,
            blend_mode: config.blend_mode,
            created_at,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn effective_blend_mode(&self) -> BlendMode {
        BlendMode::effective(self.blend_mode)
    }

    /// Applies every field present in `patch`. The id is never touched.
    pub fn apply(&mut self, patch: GradientPatch) {
        if let Some(stops) = patch.color_stops {
            self.color_stops = stops;
        }
        if let Some(mode) = patch.blend_mode {
            self.blend_mode = Some(mode);
        }
        if let Some(ts) = patch.created_at {
            self.created_at = ts;
        }
    }

    /// Visual content only (what a share token carries).
    pub fn to_config(&self) -> GradientConfig {
        GradientConfig {
            color_stops: self.color_stops.clone(),
            blend_mode: self.blend_mode,
        }
    }
}

/// Visual content of a gradient without identity. Creation input and share-token entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientConfig {
    #[serde(default)]
    pub color_stops: Vec<ColorStop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
}

/// Partial update for [`Gradient::apply`]. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradientPatch {
    pub color_stops: Option<Vec<ColorStop>>,
    pub blend_mode: Option<BlendMode>,
    pub created_at: Option<i64>,
}

impl GradientPatch {
    pub fn stops(stops: Vec<ColorStop>) -> Self {
        Self { color_stops: Some(stops), ..Self::default() }
    }

    pub fn blend(mode: BlendMode) -> Self {
        Self { blend_mode: Some(mode), ..Self::default() }
    }
}
