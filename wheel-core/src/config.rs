use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Uniform sample from `[min, max)`; a collapsed range yields `min`.
pub(crate) fn sample_between<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min < max {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Ranges the spin parameters are sampled from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Extra full turns, sampled from `min_turns..max_turns`.
    pub min_turns: f64,
    pub max_turns: f64,
    /// Animation length in milliseconds, sampled from `min_duration_ms..max_duration_ms`.
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        SpinConfig {
            min_turns: 5.0,
            max_turns: 10.0,
            min_duration_ms: 4000.0,
            max_duration_ms: 6000.0,
        }
    }
}

/// Kinematics of the confetti rain. Speeds are in pixels (or degrees) per frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    pub count: usize,
    pub min_size: f64,
    pub max_size: f64,
    pub min_fall_speed: f64,
    pub max_fall_speed: f64,
    /// Horizontal speed is sampled from `-max_drift..max_drift`.
    pub max_drift: f64,
    /// Rotation speed is sampled from `-max_spin..max_spin`.
    pub max_spin: f64,
    /// Stop automatically after this many milliseconds. `None` rains until stopped.
    pub auto_stop_ms: Option<f64>,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        ConfettiConfig {
            count: 150,
            min_size: 4.0,
            max_size: 12.0,
            min_fall_speed: 2.0,
            max_fall_speed: 5.0,
            max_drift: 1.0,
            max_spin: 5.0,
            auto_stop_ms: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub spin: SpinConfig,
    pub confetti: ConfettiConfig,
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { field, min, max })
    }
}

/// Like `check_range`, with `lower_ok` deciding whether `min` is allowed.
fn check_bounded_range(
    field: &'static str,
    min: f64,
    max: f64,
    lower_ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
    check_range(field, min, max)?;
    if lower_ok(min) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { field, min, max })
    }
}

impl WheelConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: WheelConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.spin;
        // Rotation only ever moves forward.
        check_bounded_range("spin.turns", s.min_turns, s.max_turns, |v| v >= 0.0)?;
        check_bounded_range(
            "spin.duration_ms",
            s.min_duration_ms,
            s.max_duration_ms,
            |v| v >= 0.0,
        )?;
        let c = &self.confetti;
        if c.count == 0 {
            return Err(ConfigError::NoParticles);
        }
        check_bounded_range("confetti.size", c.min_size, c.max_size, |v| v > 0.0)?;
        // Every particle must eventually fall past the bottom edge to be recycled.
        check_bounded_range(
            "confetti.fall_speed",
            c.min_fall_speed,
            c.max_fall_speed,
            |v| v > 0.0,
        )?;
        check_range("confetti.drift", -c.max_drift, c.max_drift)?;
        check_range("confetti.spin", -c.max_spin, c.max_spin)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(WheelConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = WheelConfig::from_json(r#"{"confetti": {"count": 40, "auto_stop_ms": 4200}}"#)
            .unwrap();
        assert_eq!(cfg.confetti.count, 40);
        assert_eq!(cfg.confetti.auto_stop_ms, Some(4200.0));
        assert_eq!(cfg.confetti.max_size, 12.0);
        assert_eq!(cfg.spin, SpinConfig::default());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = WheelConfig::from_json(r#"{"spin": {"min_turns": 8, "max_turns": 3}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRange { field: "spin.turns", .. }
        ));
    }

    #[test]
    fn collapsed_range_pins_the_value() {
        let cfg = WheelConfig::from_json(
            r#"{"spin": {"min_turns": 6, "max_turns": 6, "min_duration_ms": 10, "max_duration_ms": 10}}"#,
        )
        .unwrap();
        let mut rng = rand::rngs::mock::StepRng::new(1 << 40, 1 << 50);
        assert_eq!(sample_between(&mut rng, cfg.spin.min_turns, cfg.spin.max_turns), 6.0);
    }

    fn rejected_field(json: &str) -> &'static str {
        match WheelConfig::from_json(json) {
            Err(ConfigError::InvalidRange { field, .. }) => field,
            other => panic!("expected a range error for {json}, got {other:?}"),
        }
    }

    #[test]
    fn backwards_turns_are_rejected() {
        assert_eq!(
            rejected_field(r#"{"spin": {"min_turns": -6, "max_turns": -5}}"#),
            "spin.turns"
        );
        assert_eq!(
            rejected_field(r#"{"spin": {"min_turns": -1, "max_turns": 3}}"#),
            "spin.turns"
        );
        assert!(WheelConfig::from_json(r#"{"spin": {"min_turns": 0, "max_turns": 3}}"#).is_ok());
    }

    #[test]
    fn negative_duration_is_rejected() {
        assert_eq!(
            rejected_field(r#"{"spin": {"min_duration_ms": -100, "max_duration_ms": 50}}"#),
            "spin.duration_ms"
        );
        assert!(
            WheelConfig::from_json(r#"{"spin": {"min_duration_ms": 0, "max_duration_ms": 0}}"#)
                .is_ok()
        );
    }

    #[test]
    fn non_positive_size_is_rejected() {
        assert_eq!(
            rejected_field(r#"{"confetti": {"min_size": 0, "max_size": 4}}"#),
            "confetti.size"
        );
        assert_eq!(
            rejected_field(r#"{"confetti": {"min_size": -3, "max_size": 4}}"#),
            "confetti.size"
        );
    }

    #[test]
    fn rising_or_floating_confetti_is_rejected() {
        assert_eq!(
            rejected_field(r#"{"confetti": {"min_fall_speed": -5, "max_fall_speed": -2}}"#),
            "confetti.fall_speed"
        );
        assert_eq!(
            rejected_field(r#"{"confetti": {"min_fall_speed": 0, "max_fall_speed": 2}}"#),
            "confetti.fall_speed"
        );
    }

    #[test]
    fn zero_particles_is_rejected() {
        let err = WheelConfig::from_json(r#"{"confetti": {"count": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoParticles));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            WheelConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
