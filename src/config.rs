use crate::constants::{
    DEFAULT_ACCELERATION, DEFAULT_DECELERATION, DEFAULT_MAX_SPEED, DEFAULT_MIN_DISTANCE,
};
use noisy_float::types::R64;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Physical limits of a body moving on the track.
///
/// Values are checked once at construction and never change afterwards. The
/// TOML form requires all four fields:
///
/// ```toml
/// max_speed = 4.0
/// acceleration = 2.0
/// deceleration = 2.0
/// min_distance = 0.001
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMotionConfig", into = "RawMotionConfig")]
pub struct MotionConfig {
    max_speed: f64,
    acceleration: f64,
    deceleration: f64,
    min_distance: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMotionConfig {
    max_speed: f64,
    acceleration: f64,
    deceleration: f64,
    min_distance: f64,
}

impl MotionConfig {
    pub fn new(
        max_speed: f64,
        acceleration: f64,
        deceleration: f64,
        min_distance: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            max_speed: positive("max_speed", max_speed)?,
            acceleration: positive("acceleration", acceleration)?,
            deceleration: positive("deceleration", deceleration)?,
            min_distance: non_negative("min_distance", min_distance)?,
        })
    }

    /// The parameters the interactive track demo ships with.
    pub fn shipped() -> Self {
        Self {
            max_speed: DEFAULT_MAX_SPEED,
            acceleration: DEFAULT_ACCELERATION,
            deceleration: DEFAULT_DECELERATION,
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Loaded motion configuration from {}", path.display());
        Ok(config)
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    pub fn deceleration(&self) -> f64 {
        self.deceleration
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }
}

impl TryFrom<RawMotionConfig> for MotionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawMotionConfig) -> Result<Self, Self::Error> {
        let RawMotionConfig {
            max_speed,
            acceleration,
            deceleration,
            min_distance,
        } = raw;
        Self::new(max_speed, acceleration, deceleration, min_distance)
    }
}

impl From<MotionConfig> for RawMotionConfig {
    fn from(config: MotionConfig) -> Self {
        let MotionConfig {
            max_speed,
            acceleration,
            deceleration,
            min_distance,
        } = config;
        Self {
            max_speed,
            acceleration,
            deceleration,
            min_distance,
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<R64, ConfigError> {
    R64::try_new(value).ok_or(ConfigError::NonFinite { name, value })
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    let checked = finite(name, value)?;
    if checked.raw() <= 0.0 {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(checked.raw())
}

fn non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    let checked = finite(name, value)?;
    if checked.raw() < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(checked.raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn shipped_values() {
        let config = MotionConfig::shipped();
        assert_eq!(config.max_speed(), 4.0);
        assert_eq!(config.acceleration(), 2.0);
        assert_eq!(config.deceleration(), 2.0);
        assert_eq!(config.min_distance(), 0.001);
        assert_eq!(MotionConfig::new(4.0, 2.0, 2.0, 0.001).unwrap(), config);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            MotionConfig::new(0.0, 2.0, 2.0, 0.0),
            Err(ConfigError::NonPositive {
                name: "max_speed",
                ..
            })
        ));
        assert!(matches!(
            MotionConfig::new(4.0, -1.0, 2.0, 0.0),
            Err(ConfigError::NonPositive {
                name: "acceleration",
                ..
            })
        ));
        assert!(matches!(
            MotionConfig::new(4.0, 2.0, f64::NAN, 0.0),
            Err(ConfigError::NonFinite {
                name: "deceleration",
                ..
            })
        ));
        assert!(matches!(
            MotionConfig::new(f64::INFINITY, 2.0, 2.0, 0.0),
            Err(ConfigError::NonFinite {
                name: "max_speed",
                ..
            })
        ));
        assert!(matches!(
            MotionConfig::new(4.0, 2.0, 2.0, -0.1),
            Err(ConfigError::Negative {
                name: "min_distance",
                ..
            })
        ));
    }

    #[test]
    fn zero_min_distance_is_allowed() {
        let config = MotionConfig::new(1.0, 1.0, 1.0, 0.0).unwrap();
        assert_eq!(config.min_distance(), 0.0);
    }

    #[test]
    fn parse_toml() {
        let config = MotionConfig::from_toml_str(
            r#"
            max_speed = 3.0
            acceleration = 1.5
            deceleration = 2.5
            min_distance = 0.01
            "#,
        )
        .unwrap();
        assert_eq!(config, MotionConfig::new(3.0, 1.5, 2.5, 0.01).unwrap());
    }

    #[test]
    fn toml_requires_every_field() {
        let err = MotionConfig::from_toml_str("max_speed = 3.0\nacceleration = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn toml_rejects_unknown_fields() {
        let err = MotionConfig::from_toml_str(
            "max_speed = 3.0\nacceleration = 1.5\ndeceleration = 1.0\nmin_distance = 0.0\njerk = 9.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn toml_values_are_validated() {
        let err = MotionConfig::from_toml_str(
            "max_speed = -3.0\nacceleration = 1.5\ndeceleration = 1.0\nmin_distance = 0.0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("max_speed must be positive"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "max_speed = 2.0\nacceleration = 0.5\ndeceleration = 1.0\nmin_distance = 0.002"
        )
        .unwrap();

        let config = MotionConfig::load(file.path()).unwrap();
        assert_eq!(config, MotionConfig::new(2.0, 0.5, 1.0, 0.002).unwrap());
    }

    #[test]
    fn load_missing_file() {
        let err = MotionConfig::load("/nonexistent/track-motion.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
