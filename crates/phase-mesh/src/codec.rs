//! Compact share tokens.
//!
//! Wire format: URL-safe base64 (`+`→`-`, `/`→`_`, no padding) of a UTF-8 JSON
//! array whose entries are `{colorStops: [...], blendMode?}`. Numbers are
//! rounded to two decimals and identity fields (`id`, `createdAt`) are left out,
//! so decoding always mints fresh identity. There is no version envelope;
//! incompatible entries are dropped by validation instead.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::factory::{generate_id, now_millis};
use crate::limits::{MAX_ENCODED_SIZE, MAX_GRADIENTS_IMPORT};
use crate::model::{BlendMode, ColorStop, Gradient, GradientConfig};
use crate::validate::validate;

/// Why a share token was rejected. Each variant carries a distinct message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Share link too large: {len} characters (maximum {max})", max = MAX_ENCODED_SIZE)]
    PayloadTooLarge { len: usize },
    #[error("Invalid gradient data format")]
    InvalidFormat,
    #[error("Too many gradients in link ({count}). Maximum {max} allowed.", max = MAX_GRADIENTS_IMPORT)]
    TooMany { count: usize },
    #[error("Invalid or corrupted share link: {0}")]
    Corrupted(String),
    #[error("No valid gradients found in shared link")]
    NoValidGradients,
}

/// Why a list could not be encoded.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("gradient contains a non-finite number")]
    NonFinite,
    #[error("failed to serialize gradients: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rounds to two decimal places, half away from zero.
#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn rounded_stop(stop: &ColorStop) -> ColorStop {
    ColorStop {
        color: stop.color.clone(),
        x: round2(stop.x),
        y: round2(stop.y),
        intensity: round2(stop.intensity),
        scale_x: round2(stop.scale_x),
        scale_y: round2(stop.scale_y),
        rotation: round2(stop.rotation),
    }
}

/// Minimal wire projection: rounded stops plus the blend mode as given.
fn project(gradient: &Gradient) -> GradientConfig {
    GradientConfig {
        color_stops: gradient.color_stops.iter().map(rounded_stop).collect(),
        blend_mode: gradient.blend_mode,
    }
}

/// Encodes `gradients` into a share token.
pub fn try_encode(gradients: &[Gradient]) -> Result<String, EncodeError> {
    let projected: Vec<GradientConfig> = gradients.iter().map(project).collect();
    let finite = projected
        .iter()
        .flat_map(|g| g.color_stops.iter())
        .all(|s| s.numbers().iter().all(|n| n.is_finite()));
    if !finite {
        return Err(EncodeError::NonFinite);
    }

    let json = serde_json::to_string(&projected)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Encodes `gradients` into a share token; returns an empty string on failure.
pub fn encode(gradients: &[Gradient]) -> String {
    match try_encode(gradients) {
        Ok(token) => token,
        Err(err) => {
            log::error!("failed to encode gradients: {err}");
            String::new()
        }
    }
}

/// Decodes a share token into freshly identified gradients.
///
/// Oversized tokens are rejected before any decoding work. Entries that fail
/// validation are skipped silently; the call only fails when none survive.
pub fn try_decode(token: &str) -> Result<Vec<Gradient>, DecodeError> {
    if token.len() > MAX_ENCODED_SIZE {
        return Err(DecodeError::PayloadTooLarge { len: token.len() });
    }

    let mut b64: String = token
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    while b64.len() % 4 != 0 {
        b64.push('=');
    }

    let bytes = STANDARD
        .decode(b64.as_bytes())
        .map_err(|e| DecodeError::Corrupted(format!("Decode error: {e}")))?;
    let json = String::from_utf8(bytes).map_err(|e| DecodeError::Corrupted(format!("Decode error: {e}")))?;
    let parsed: Value = serde_json::from_str(&json).map_err(|e| DecodeError::Corrupted(format!("Decode error: {e}")))?;

    let Value::Array(entries) = parsed else {
        return Err(DecodeError::InvalidFormat);
    };
    if entries.len() > MAX_GRADIENTS_IMPORT {
        return Err(DecodeError::TooMany { count: entries.len() });
    }

    let total = entries.len();
    let gradients: Vec<Gradient> = entries
        .iter()
        .filter(|entry| validate(entry))
        .filter_map(|entry| GradientConfig::deserialize(entry).ok())
        .map(materialize)
        .collect();

    if gradients.len() < total {
        log::debug!("dropped {} invalid gradient(s) from share token", total - gradients.len());
    }
    if gradients.is_empty() {
        return Err(DecodeError::NoValidGradients);
    }
    Ok(gradients)
}

/// Decodes a share token, reporting a rejection through `on_reject` and
/// returning an empty list instead of an error.
pub fn decode(token: &str, mut on_reject: impl FnMut(&DecodeError)) -> Vec<Gradient> {
    match try_decode(token) {
        Ok(gradients) => gradients,
        Err(err) => {
            log::warn!("share token rejected: {err}");
            on_reject(&err);
            Vec::new()
        }
    }
}

fn materialize(config: GradientConfig) -> Gradient {
    let blend_mode = Some(BlendMode::effective(config.blend_mode));
    Gradient::with_identity(
        generate_id(),
        GradientConfig { color_stops: config.color_stops, blend_mode },
        now_millis(),
    )
}

/// Content equality used for import de-duplication.
///
/// Stops are compared element-wise after rounding every number to two
/// decimals; an absent blend mode counts as `lighter`. Identity and creation
/// time are ignored.
pub fn same_content(a: &Gradient, b: &Gradient) -> bool {
    a.effective_blend_mode() == b.effective_blend_mode()
        && a.color_stops.len() == b.color_stops.len()
        && a
            .color_stops
            .iter()
            .zip(&b.color_stops)
            .all(|(sa, sb)| rounded_stop(sa) == rounded_stop(sb))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn stop(color: &str, x: f64) -> ColorStop {
        ColorStop {
            color: color.into(),
            x,
            y: 40.0,
            intensity: 60.0,
            scale_x: 1.25,
            scale_y: 0.75,
            rotation: 90.0,
        }
    }

    fn gradient(stops: Vec<ColorStop>, blend_mode: Option<BlendMode>) -> Gradient {
        Gradient::with_identity("fixed", GradientConfig { color_stops: stops, blend_mode }, 1)
    }

    fn token_for(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(value.to_string())
    }

    fn valid_entry() -> Value {
        json!({ "colorStops": [{
            "color": "#00FF00", "x": 10, "y": 20, "intensity": 30,
            "scaleX": 1, "scaleY": 1, "rotation": 0
        }] })
    }

    #[test]
    fn token_is_url_safe_and_unpadded() {
        let list: Vec<Gradient> = (0..8)
            .map(|i| gradient(vec![stop("#FFAA00", i as f64 * 11.11)], Some(BlendMode::Screen)))
            .collect();
        let token = encode(&list);
        assert!(!token.is_empty());
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn encode_rounds_and_strips_identity() {
        let token = encode(&[gradient(vec![stop("#FFAA00", 33.33333)], None)]);
        let json = String::from_utf8(URL_SAFE_NO_PAD.decode(token).unwrap()).unwrap();
        assert!(json.contains("33.33"));
        assert!(!json.contains("33.333"));
        assert!(!json.contains("id"));
        assert!(!json.contains("createdAt"));
        assert!(!json.contains("blendMode"));
    }

    #[test]
    fn encode_non_finite_returns_empty() {
        assert_eq!(encode(&[gradient(vec![stop("#FFAA00", f64::NAN)], None)]), "");
        assert!(matches!(try_encode(&[gradient(vec![stop("#FFAA00", f64::INFINITY)], None)]), Err(EncodeError::NonFinite)));
    }

    #[test]
    fn decode_mints_fresh_identity_and_defaults_blend() {
        let original = gradient(vec![stop("#123456", 12.0)], None);
        let decoded = try_decode(&encode(std::slice::from_ref(&original))).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_ne!(decoded[0].id(), original.id());
        assert_eq!(decoded[0].blend_mode, Some(BlendMode::Lighter));
        assert!(same_content(&original, &decoded[0]));
    }

    #[test]
    fn decode_accepts_standard_alphabet_and_padding() {
        let token = STANDARD.encode(json!([valid_entry()]).to_string());
        assert_eq!(try_decode(&token).unwrap().len(), 1);
    }

    #[test]
    fn oversized_token_rejected_before_decoding() {
        // Not even valid base64; the size check must win.
        let token = "!".repeat(MAX_ENCODED_SIZE + 1);
        assert_eq!(try_decode(&token), Err(DecodeError::PayloadTooLarge { len: MAX_ENCODED_SIZE + 1 }));
    }

    #[test]
    fn non_array_is_invalid_format() {
        let token = token_for(&json!({ "not": "array" }));
        assert_eq!(try_decode(&token), Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn more_than_limit_is_too_many() {
        let entries: Vec<Value> = (0..=MAX_GRADIENTS_IMPORT).map(|_| valid_entry()).collect();
        let token = token_for(&Value::Array(entries));
        assert_eq!(try_decode(&token), Err(DecodeError::TooMany { count: 101 }));
    }

    #[test]
    fn exactly_limit_is_accepted() {
        let entries: Vec<Value> = (0..MAX_GRADIENTS_IMPORT).map(|_| valid_entry()).collect();
        let token = token_for(&Value::Array(entries));
        assert_eq!(try_decode(&token).unwrap().len(), MAX_GRADIENTS_IMPORT);
    }

    #[test]
    fn all_invalid_entries_report_no_valid_gradients() {
        let token = token_for(&json!([{ "colorStops": [] }, { "colorStops": "nope" }, 5]));
        assert_eq!(try_decode(&token), Err(DecodeError::NoValidGradients));
        assert_eq!(try_decode(&token_for(&json!([]))), Err(DecodeError::NoValidGradients));
    }

    #[test]
    fn garbage_is_corrupted() {
        assert!(matches!(try_decode("%%%not-base64%%%"), Err(DecodeError::Corrupted(_))));
        assert!(matches!(try_decode(&URL_SAFE_NO_PAD.encode("{oops")), Err(DecodeError::Corrupted(_))));
        assert!(matches!(try_decode("A"), Err(DecodeError::Corrupted(_))));
    }

    #[test]
    fn invalid_entries_are_skipped_valid_kept() {
        let mut keep = valid_entry();
        keep["blendMode"] = json!("multiply");
        let token = token_for(&json!([
            { "colorStops": [{ "color": "red", "x": 1, "y": 1, "intensity": 50, "scaleX": 1, "scaleY": 1, "rotation": 0 }] },
            keep,
            { "colorStops": [], "blendMode": "screen" },
        ]));
        let decoded = try_decode(&token).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].color_stops[0].color, "#00FF00");
        assert_eq!(decoded[0].blend_mode, Some(BlendMode::Multiply));
    }

    #[test]
    fn decode_reports_through_callback() {
        let mut reasons = Vec::new();
        let out = decode(&token_for(&json!({ "not": "array" })), |e| reasons.push(e.to_string()));
        assert!(out.is_empty());
        assert_eq!(reasons, vec!["Invalid gradient data format".to_string()]);

        let mut called = false;
        let out = decode(&token_for(&json!([valid_entry()])), |_| called = true);
        assert_eq!(out.len(), 1);
        assert!(!called);
    }

    #[test]
    fn rejection_messages_are_distinct() {
        let messages = [
            DecodeError::PayloadTooLarge { len: 60_000 }.to_string(),
            DecodeError::InvalidFormat.to_string(),
            DecodeError::TooMany { count: 101 }.to_string(),
            DecodeError::Corrupted("x".into()).to_string(),
            DecodeError::NoValidGradients.to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn equality_ignores_sub_rounding_noise() {
        let a = gradient(vec![stop("#FF0000", 50.001)], None);
        let b = gradient(vec![stop("#FF0000", 50.0)], None);
        assert!(same_content(&a, &b));
    }

    #[test]
    fn equality_treats_absent_blend_as_lighter() {
        let a = gradient(vec![stop("#FF0000", 50.0)], None);
        let b = gradient(vec![stop("#FF0000", 50.0)], Some(BlendMode::Lighter));
        let c = gradient(vec![stop("#FF0000", 50.0)], Some(BlendMode::Screen));
        assert!(same_content(&a, &b));
        assert!(!same_content(&a, &c));
    }

    #[test]
    fn equality_is_order_and_length_sensitive() {
        let a = gradient(vec![stop("#FF0000", 10.0), stop("#00FF00", 20.0)], None);
        let b = gradient(vec![stop("#00FF00", 20.0), stop("#FF0000", 10.0)], None);
        let c = gradient(vec![stop("#FF0000", 10.0)], None);
        assert!(!same_content(&a, &b));
        assert!(!same_content(&a, &c));
    }

    fn arb_stop() -> impl Strategy<Value = ColorStop> {
        (
            any::<[u8; 3]>(),
            0.0..=100.0f64,
            0.0..=100.0f64,
            10.0..=100.0f64,
            0.5..=2.0f64,
            0.5..=2.0f64,
            0.0..=360.0f64,
        )
            .prop_map(|(rgb, x, y, intensity, scale_x, scale_y, rotation)| ColorStop {
                color: format!("#{:02X}{:02x}{:02X}", rgb[0], rgb[1], rgb[2]),
                x,
                y,
                intensity,
                scale_x,
                scale_y,
                rotation,
            })
    }

    fn arb_gradient() -> impl Strategy<Value = Gradient> {
        (
            prop::collection::vec(arb_stop(), 1..=20),
            prop::option::of(prop::sample::select(BlendMode::ALL.to_vec())),
        )
            .prop_map(|(stops, mode)| gradient(stops, mode))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn round_trip_preserves_rounded_content(list in prop::collection::vec(arb_gradient(), 1..=12)) {
            let decoded = try_decode(&encode(&list)).unwrap();
            prop_assert_eq!(decoded.len(), list.len());
            for (before, after) in list.iter().zip(&decoded) {
                prop_assert!(same_content(before, after));
                prop_assert_eq!(after.blend_mode, Some(before.effective_blend_mode()));
                for (s0, s1) in before.color_stops.iter().zip(&after.color_stops) {
                    prop_assert_eq!(&rounded_stop(s0), s1);
                }
            }
        }

        #[test]
        fn rounding_noise_below_half_cent_is_equal(g in arb_gradient(), noise in -0.004..0.004f64) {
            let mut nudged = g.clone();
            for s in &mut nudged.color_stops {
                s.x = round2(s.x) + noise;
            }
            let mut base = g.clone();
            for s in &mut base.color_stops {
                s.x = round2(s.x);
            }
            prop_assert!(same_content(&base, &nudged));
        }
    }
}
