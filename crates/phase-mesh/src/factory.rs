//! Construction of new gradients and stops.
//!
//! All randomness lives here (default positions, ellipse distortion, rotation);
//! rendering never draws random numbers.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::limits::{DEFAULT_INTENSITY, POSITION_RANGE};
use crate::model::{BlendMode, ColorStop, Gradient, GradientConfig};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Mints an opaque gradient id: `{millis}-{sequence}{noise}` in base 36.
///
/// The process-wide sequence makes ids unique within a session even when
/// several are minted in the same millisecond.
pub fn generate_id() -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let noise: u32 = rand::rng().random();
    format!("{}-{}x{}", now_millis(), to_base36(seq), to_base36(noise as u64))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Creates a stop with thread-local randomness. See [`create_color_stop_with`].
pub fn create_color_stop(color: impl Into<String>, position: Option<(f64, f64)>, intensity: f64) -> ColorStop {
    create_color_stop_with(&mut rand::rng(), color, position, intensity)
}

/// Creates a stop at `position` (random when `None`) with a random ellipse
/// distortion in [0.5, 2.0] per axis and a random rotation in [0, 360).
pub fn create_color_stop_with<R: Rng + ?Sized>(
    rng: &mut R,
    color: impl Into<String>,
    position: Option<(f64, f64)>,
    intensity: f64,
) -> ColorStop {
    let (x, y) = position.unwrap_or_else(|| random_position(rng));
    ColorStop {
        color: color.into(),
        x,
        y,
        intensity,
        scale_x: 0.5 + rng.random::<f64>() * 1.5,
        scale_y: 0.5 + rng.random::<f64>() * 1.5,
        rotation: rng.random::<f64>() * 360.0,
    }
}

/// Random position inside the canvas, in percent.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    (
        rng.random_range(POSITION_RANGE),
        rng.random_range(POSITION_RANGE),
    )
}

/// Stops for `colors` at random positions with the default intensity.
pub fn stops_from_colors<S: AsRef<str>>(colors: &[S]) -> Vec<ColorStop> {
    let mut rng = rand::rng();
    colors
        .iter()
        .map(|c| create_color_stop_with(&mut rng, c.as_ref(), None, DEFAULT_INTENSITY))
        .collect()
}

/// Stops for a new color selection, keeping the stop of every color that was
/// already selected and adding random stops for the rest, in `colors` order.
pub fn reselect_colors<S: AsRef<str>>(current: &[ColorStop], colors: &[S]) -> Vec<ColorStop> {
    let mut rng = rand::rng();
    colors
        .iter()
        .map(|c| match current.iter().find(|s| s.color == c.as_ref()) {
            Some(existing) => existing.clone(),
            None => create_color_stop_with(&mut rng, c.as_ref(), None, DEFAULT_INTENSITY),
        })
        .collect()
}

/// New gradient with fresh identity. A missing blend mode becomes `lighter`.
pub fn create_gradient(config: GradientConfig) -> Gradient {
    let blend_mode = Some(BlendMode::effective(config.blend_mode));
    Gradient::with_identity(
        generate_id(),
        GradientConfig { color_stops: config.color_stops, blend_mode },
        now_millis(),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::limits::{ROTATION_RANGE, SCALE_RANGE};

    #[test]
    fn ids_are_unique_in_a_tight_loop() {
        let ids: HashSet<String> = (0..2_000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 2_000);
    }

    #[test]
    fn base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn random_stop_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let s = create_color_stop_with(&mut rng, "#FFFFFF", None, 60.0);
            assert!(POSITION_RANGE.contains(&s.x) && POSITION_RANGE.contains(&s.y));
            assert!(SCALE_RANGE.contains(&s.scale_x) && SCALE_RANGE.contains(&s.scale_y));
            assert!(ROTATION_RANGE.contains(&s.rotation));
        }
    }

    #[test]
    fn explicit_position_is_kept() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = create_color_stop_with(&mut rng, "#000000", Some((12.5, 80.0)), 40.0);
        assert_eq!((s.x, s.y, s.intensity), (12.5, 80.0, 40.0));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = create_color_stop_with(&mut StdRng::seed_from_u64(42), "#123456", None, 60.0);
        let b = create_color_stop_with(&mut StdRng::seed_from_u64(42), "#123456", None, 60.0);
        assert_eq!(a, b);
    }

    #[test]
    fn reselect_keeps_existing_stops_in_new_order() {
        let red = create_color_stop("#FF0000", Some((10.0, 20.0)), 30.0);
        let blue = create_color_stop("#0000FF", Some((70.0, 80.0)), 90.0);
        let stops = reselect_colors(&[red.clone(), blue.clone()], &["#00FF00", "#0000FF", "#FF0000"]);

        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].color, "#00FF00");
        assert_eq!(stops[0].intensity, DEFAULT_INTENSITY);
        assert_eq!(stops[1], blue);
        assert_eq!(stops[2], red);
        assert!(reselect_colors(&[red], &[] as &[&str]).is_empty());
    }

    #[test]
    fn create_gradient_defaults_blend_mode() {
        let g = create_gradient(GradientConfig::default());
        assert_eq!(g.blend_mode, Some(BlendMode::Lighter));
        assert!(!g.id().is_empty());
        assert!(g.created_at > 0);
    }
}
