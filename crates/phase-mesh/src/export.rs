//! Export sizes and file naming.

use std::fmt;

use chrono::{NaiveDate, Utc};

use crate::model::Gradient;

/// Leading characters of the joined color codes kept in an export filename.
const FILENAME_COLORS_LEN: usize = 20;

/// Square PNG export sizes.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ExportSize {
    Px32,
    Px64,
    Px128,
    Px256,
    #[default]
    Px512,
    Px1024,
    Px2048,
}

impl ExportSize {
    pub const ALL: [ExportSize; 7] = [
        ExportSize::Px32,
        ExportSize::Px64,
        ExportSize::Px128,
        ExportSize::Px256,
        ExportSize::Px512,
        ExportSize::Px1024,
        ExportSize::Px2048,
    ];

    #[inline]
    pub const fn pixels(self) -> u32 {
        match self {
            ExportSize::Px32 => 32,
            ExportSize::Px64 => 64,
            ExportSize::Px128 => 128,
            ExportSize::Px256 => 256,
            ExportSize::Px512 => 512,
            ExportSize::Px1024 => 1024,
            ExportSize::Px2048 => 2048,
        }
    }
}

impl fmt::Display for ExportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.pixels())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported export size {0}px (expected a power of two from 32 to 2048)")]
pub struct UnsupportedSize(pub u32);

impl TryFrom<u32> for ExportSize {
    type Error = UnsupportedSize;

    fn try_from(px: u32) -> Result<Self, Self::Error> {
        ExportSize::ALL
            .into_iter()
            .find(|s| s.pixels() == px)
            .ok_or(UnsupportedSize(px))
    }
}

/// `gradient-mesh-{colors}-{size}px-{date}.png`.
///
/// `colors` is every stop color without its `#`, joined by `-`, then cut to
/// the first 20 characters of the joined string. The cut counts characters,
/// not colors.
pub fn export_filename(gradient: &Gradient, size: ExportSize, date: NaiveDate) -> String {
    let joined = gradient
        .color_stops
        .iter()
        .map(|s| s.color.trim_start_matches('#'))
        .collect::<Vec<_>>()
        .join("-");
    let colors: String = joined.chars().take(FILENAME_COLORS_LEN).collect();

    format!("gradient-mesh-{colors}-{}px-{}.png", size.pixels(), date.format("%Y-%m-%d"))
}

/// [`export_filename`] dated with the current UTC calendar day.
pub fn export_filename_today(gradient: &Gradient, size: ExportSize) -> String {
    export_filename(gradient, size, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorStop, GradientConfig};

    fn gradient(colors: &[&str]) -> Gradient {
        let stops = colors
            .iter()
            .map(|c| ColorStop {
                color: c.to_string(),
                x: 50.0,
                y: 50.0,
                intensity: 60.0,
                scale_x: 1.0,
                scale_y: 1.0,
                rotation: 0.0,
            })
            .collect();
        Gradient::with_identity("g", GradientConfig { color_stops: stops, blend_mode: None }, 0)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn sizes_are_powers_of_two() {
        for s in ExportSize::ALL {
            assert!(s.pixels().is_power_of_two());
            assert_eq!(ExportSize::try_from(s.pixels()), Ok(s));
        }
        assert_eq!(ExportSize::try_from(100), Err(UnsupportedSize(100)));
        assert_eq!(ExportSize::default().pixels(), 512);
        assert_eq!(ExportSize::Px1024.to_string(), "1024px");
    }

    #[test]
    fn filename_strips_hashes_and_joins() {
        let g = gradient(&["#FF6B6B", "#4ECDC4"]);
        assert_eq!(
            export_filename(&g, ExportSize::Px512, date()),
            "gradient-mesh-FF6B6B-4ECDC4-512px-2024-03-07.png"
        );
    }

    #[test]
    fn filename_keeps_first_twenty_chars_of_joined_colors() {
        let g = gradient(&["#FF6B6B", "#4ECDC4", "#FFE66D", "#1A535C"]);
        assert_eq!(
            export_filename(&g, ExportSize::Px64, date()),
            "gradient-mesh-FF6B6B-4ECDC4-FFE66D-64px-2024-03-07.png"
        );

        // counted on the joined string, not per color
        let g = gradient(&["#ABC", "#4ECDC4", "#FFE66D", "#1A535C"]);
        assert_eq!(
            export_filename(&g, ExportSize::Px64, date()),
            "gradient-mesh-ABC-4ECDC4-FFE66D-1A-64px-2024-03-07.png"
        );
    }

    #[test]
    fn today_uses_utc_calendar_day() {
        let g = gradient(&["#FF6B6B"]);
        let before = Utc::now().date_naive();
        let name = export_filename_today(&g, ExportSize::Px256);
        let after = Utc::now().date_naive();

        let expected = |d: NaiveDate| format!("gradient-mesh-FF6B6B-256px-{}.png", d.format("%Y-%m-%d"));
        assert!(name == expected(before) || name == expected(after), "{name}");
    }

    #[test]
    fn filename_without_stops() {
        let g = gradient(&[]);
        assert_eq!(export_filename(&g, ExportSize::Px32, date()), "gradient-mesh--32px-2024-03-07.png");
    }
}
