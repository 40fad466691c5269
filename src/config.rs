// Engine configuration - Scheduling constants, persisted as RON

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse RON config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Scheduling constants of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How far past "now" a poll looks for due steps.
    /// Must exceed worst-case timer jitter plus one poll interval.
    pub lookahead_ms: f64,
    /// Delay between poll iterations
    pub poll_interval_ms: f64,
    /// Length of every melodic voice
    pub voice_duration_s: f64,
    /// Peak gain of every melodic voice
    pub voice_gain: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookahead_ms: 75.0,
            poll_interval_ms: 50.0,
            voice_duration_s: 0.2,
            voice_gain: 0.8,
        }
    }
}

impl EngineConfig {
    /// Check the constraints the poll loop relies on
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.poll_interval_ms.is_finite() && self.poll_interval_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "poll_interval_ms must be positive, got {}",
                self.poll_interval_ms
            )));
        }
        if !(self.lookahead_ms.is_finite() && self.lookahead_ms > self.poll_interval_ms) {
            return Err(ConfigError::Invalid(format!(
                "lookahead_ms ({}) must exceed poll_interval_ms ({})",
                self.lookahead_ms, self.poll_interval_ms
            )));
        }
        if !(self.voice_duration_s.is_finite() && self.voice_duration_s > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "voice_duration_s must be positive, got {}",
                self.voice_duration_s
            )));
        }
        if !(0.0..=1.0).contains(&self.voice_gain) {
            return Err(ConfigError::Invalid(format!(
                "voice_gain must be within [0, 1], got {}",
                self.voice_gain
            )));
        }
        Ok(())
    }

    /// Parse and validate a RON document
    pub fn from_ron_str(ron_data: &str) -> ConfigResult<Self> {
        let config: Self = ron::from_str(ron_data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> ConfigResult<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let ron_data = fs::read_to_string(path)?;
        Self::from_ron_str(&ron_data)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        self.validate()?;
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_lookahead_must_exceed_poll_interval() {
        let config = EngineConfig {
            lookahead_ms: 40.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = EngineConfig::from_ron_str("(lookahead_ms: 120.0)").unwrap();
        assert_eq!(config.lookahead_ms, 120.0);
        assert_eq!(config.poll_interval_ms, 50.0);
    }

    #[test]
    fn test_ron_string_round_trip() {
        let config = EngineConfig {
            lookahead_ms: 100.0,
            poll_interval_ms: 25.0,
            voice_duration_s: 0.3,
            voice_gain: 0.5,
        };
        let ron_data = config.to_ron_string().unwrap();
        assert_eq!(EngineConfig::from_ron_str(&ron_data).unwrap(), config);
    }

    #[test]
    fn test_malformed_ron() {
        assert!(matches!(
            EngineConfig::from_ron_str("(lookahead_ms: \"soon\")"),
            Err(ConfigError::Parse(_))
        ));
    }
}
