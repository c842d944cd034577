//! Limits, ranges and well-known names.

use std::ops::RangeInclusive;
use std::time::Duration;

/// Maximum color stops per gradient.
pub const MAX_COLOR_STOPS: usize = 20;

/// Maximum gradients accepted from a single share token.
pub const MAX_GRADIENTS_IMPORT: usize = 100;

/// Maximum length of an encoded share token, checked before any decoding.
pub const MAX_ENCODED_SIZE: usize = 50_000;

/// Maximum length of a full share URL.
pub const MAX_URL_LENGTH: usize = 8_000;

/// Key under which the canonical list is persisted.
pub const STORAGE_KEY: &str = "phase-shift-gradients";

/// Query parameter carrying a share token.
pub const URL_PARAM: &str = "gradients";

pub const POSITION_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const INTENSITY_RANGE: RangeInclusive<f64> = 10.0..=100.0;
pub const SCALE_RANGE: RangeInclusive<f64> = 0.5..=2.0;
pub const ROTATION_RANGE: RangeInclusive<f64> = 0.0..=360.0;

/// Intensity given to freshly created stops.
pub const DEFAULT_INTENSITY: f64 = 60.0;

/// Preview canvas size in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 512;

/// Minimum spacing between consecutive exports.
pub const MIN_EXPORT_INTERVAL: Duration = Duration::from_millis(1000);

/// Quiet window before a burst of edits is persisted.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);
