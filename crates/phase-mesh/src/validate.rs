//! Schema and range checks for gradients entering the system.
//!
//! Validation is all-or-nothing: one bad stop rejects the whole gradient.

use serde::Deserialize;
use serde_json::Value;

use crate::limits::{INTENSITY_RANGE, MAX_COLOR_STOPS, POSITION_RANGE, ROTATION_RANGE, SCALE_RANGE};
use crate::model::{ColorStop, Gradient, GradientConfig, parse_hex_color};

/// Validates an untrusted, gradient-shaped JSON value.
///
/// Rejects missing or non-numeric stop fields, a `null` or unrecognized
/// `blendMode`, and anything [`validate_config`] rejects. An absent
/// `blendMode` is fine.
pub fn validate(candidate: &Value) -> bool {
    let Some(obj) = candidate.as_object() else {
        return false;
    };
    if matches!(obj.get("blendMode"), Some(Value::Null)) {
        return false;
    }
    match GradientConfig::deserialize(candidate) {
        Ok(config) => validate_config(&config),
        Err(_) => false,
    }
}

/// Range rules over typed content.
pub fn validate_config(config: &GradientConfig) -> bool {
    validate_stops(&config.color_stops)
}

/// Stop-count and per-stop rules.
pub fn validate_stops(stops: &[ColorStop]) -> bool {
    (1..=MAX_COLOR_STOPS).contains(&stops.len()) && stops.iter().all(validate_stop)
}

/// Per-stop rules. NaN never falls inside a range, so it rejects.
pub fn validate_stop(stop: &ColorStop) -> bool {
    parse_hex_color(&stop.color).is_some()
        && POSITION_RANGE.contains(&stop.x)
        && POSITION_RANGE.contains(&stop.y)
        && INTENSITY_RANGE.contains(&stop.intensity)
        && SCALE_RANGE.contains(&stop.scale_x)
        && SCALE_RANGE.contains(&stop.scale_y)
        && ROTATION_RANGE.contains(&stop.rotation)
}

impl Gradient {
    /// True when the gradient satisfies every content rule.
    pub fn is_valid(&self) -> bool {
        validate_stops(&self.color_stops)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn stop() -> Value {
        json!({
            "color": "#FF6B6B", "x": 50, "y": 50, "intensity": 60,
            "scaleX": 1.0, "scaleY": 1.0, "rotation": 0
        })
    }

    fn with_stop(field: &str, value: Value) -> Value {
        let mut s = stop();
        s[field] = value;
        json!({ "colorStops": [s] })
    }

    fn without(field: &str) -> Value {
        let mut s = stop();
        s.as_object_mut().unwrap().remove(field);
        json!({ "colorStops": [s] })
    }

    #[test]
    fn accepts_minimal_valid_gradient() {
        assert!(validate(&json!({ "colorStops": [stop()] })));
    }

    #[test]
    fn accepts_every_known_blend_mode() {
        for mode in crate::BlendMode::ALL {
            assert!(validate(&json!({ "colorStops": [stop()], "blendMode": mode.as_str() })));
        }
    }

    #[test]
    fn accepts_inclusive_bounds() {
        assert!(validate(&with_stop("x", json!(0))));
        assert!(validate(&with_stop("y", json!(100))));
        assert!(validate(&with_stop("intensity", json!(10))));
        assert!(validate(&with_stop("scaleX", json!(0.5))));
        assert!(validate(&with_stop("scaleY", json!(2.0))));
        assert!(validate(&with_stop("rotation", json!(360))));
        assert!(validate(&with_stop("color", json!("#abcdef"))));
    }

    #[test]
    fn rejects_empty_and_oversized_stop_lists() {
        assert!(!validate(&json!({ "colorStops": [] })));
        let many: Vec<Value> = (0..21).map(|_| stop()).collect();
        assert!(!validate(&json!({ "colorStops": many })));
        let twenty: Vec<Value> = (0..20).map(|_| stop()).collect();
        assert!(validate(&json!({ "colorStops": twenty })));
    }

    #[test]
    fn rejects_missing_or_malformed_stop_list() {
        assert!(!validate(&json!({})));
        assert!(!validate(&json!({ "colorStops": "#FF0000" })));
        assert!(!validate(&json!([stop()])));
        assert!(!validate(&json!(null)));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(!validate(&with_stop("color", json!("red"))));
        assert!(!validate(&with_stop("color", json!("#FF6B6"))));
        assert!(!validate(&with_stop("x", json!(-10))));
        assert!(!validate(&with_stop("y", json!(100.01))));
        assert!(!validate(&with_stop("intensity", json!(5))));
        assert!(!validate(&with_stop("scaleX", json!(3))));
        assert!(!validate(&with_stop("scaleY", json!(0.49))));
        assert!(!validate(&with_stop("rotation", json!(400))));
    }

    #[test]
    fn rejects_missing_or_non_numeric_fields() {
        for field in ["color", "x", "y", "intensity", "scaleX", "scaleY", "rotation"] {
            assert!(!validate(&without(field)), "missing {field}");
        }
        assert!(!validate(&with_stop("x", json!("50"))));
        assert!(!validate(&with_stop("rotation", json!(null))));
    }

    #[test]
    fn rejects_unknown_or_null_blend_mode() {
        assert!(!validate(&json!({ "colorStops": [stop()], "blendMode": "normal" })));
        assert!(!validate(&json!({ "colorStops": [stop()], "blendMode": null })));
    }

    #[test]
    fn one_bad_stop_rejects_the_gradient() {
        let mut bad = stop();
        bad["intensity"] = json!(101);
        assert!(!validate(&json!({ "colorStops": [stop(), bad, stop()] })));
    }

    #[test]
    fn typed_validation_rejects_nan() {
        let mut s: ColorStop = serde_json::from_value(stop()).unwrap();
        assert!(validate_stop(&s));
        s.x = f64::NAN;
        assert!(!validate_stop(&s));
    }
}
