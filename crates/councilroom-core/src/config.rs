//! Configuration for councilroom-core
//!
//! Centralized settings for glob expansion, the smoothing prior, win-rate
//! series filtering and the card quality formula. Defaults reproduce the
//! constants the site has always used.

use std::path::Path;

use councilroom_stats::{simple_win_prior, StatTuple};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// System-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouncilroomConfig {
    /// Glob expansion settings
    pub glob: GlobConfig,
    /// Prior merged into every series point
    pub prior: PriorConfig,
    /// Win-rate series filtering
    pub series: SeriesConfig,
    /// Card quality formula weights
    pub quality: QualityWeights,
}

/// Glob expansion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobConfig {
    /// Cards never matched by filter expressions (literal names still match)
    pub excluded_cards: Vec<String>,
}

impl Default for GlobConfig {
    fn default() -> Self {
        Self {
            excluded_cards: vec!["Archivist".to_string()],
        }
    }
}

/// Prior pseudo-observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorConfig {
    pub freq: f64,
    pub sum: f64,
    pub sum_sq: f64,
}

impl Default for PriorConfig {
    fn default() -> Self {
        let [freq, sum, sum_sq] = simple_win_prior();
        Self { freq, sum, sum_sq }
    }
}

impl PriorConfig {
    pub fn as_tuple(&self) -> StatTuple {
        [self.freq, self.sum, self.sum_sq]
    }
}

/// Win-rate series configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// A point is plotted only with more than this many observations
    pub min_freq: f64,
    /// A point is plotted only when its error bar is below this
    pub max_error_bar: f64,
    /// Error bar width in standard errors
    pub error_bar_factor: f64,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            min_freq: 50.0,
            max_error_bar: 0.1,
            error_bar_factor: 2.0,
        }
    }
}

/// Coefficients of the card quality formula, fitted offline by the card
/// ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub win_rate: f64,
    pub log_odds_gained: f64,
    pub plus_actions: f64,
    pub victory: f64,
    pub reaction: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            win_rate: 52.926,
            log_odds_gained: 1.358,
            plus_actions: -1.161,
            victory: -1.712,
            reaction: 1.625,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

impl CouncilroomConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load a configuration file if it exists, otherwise use defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load configuration {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prior = &self.prior;
        if [prior.freq, prior.sum, prior.sum_sq]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(ConfigError::OutOfRange(
                "prior values must be finite".to_string(),
            ));
        }

        if prior.freq < 0.0 {
            return Err(ConfigError::OutOfRange(
                "prior.freq must not be negative".to_string(),
            ));
        }

        if !(self.series.max_error_bar > 0.0) {
            return Err(ConfigError::OutOfRange(
                "series.max_error_bar must be positive".to_string(),
            ));
        }

        if !(self.series.error_bar_factor > 0.0) {
            return Err(ConfigError::OutOfRange(
                "series.error_bar_factor must be positive".to_string(),
            ));
        }

        if self.series.min_freq < 0.0 {
            return Err(ConfigError::OutOfRange(
                "series.min_freq must not be negative".to_string(),
            ));
        }

        if self
            .glob
            .excluded_cards
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "glob.excluded_cards contains an empty name".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CouncilroomConfig::default();
        assert_eq!(config.prior.as_tuple(), [2.0, 2.0, 4.0]);
        assert_eq!(config.glob.excluded_cards, vec!["Archivist".to_string()]);
        assert_eq!(config.series.min_freq, 50.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CouncilroomConfig::from_toml(
            r#"
            [glob]
            excluded_cards = []

            [series]
            min_freq = 10.0
            "#,
        )
        .unwrap();
        assert!(config.glob.excluded_cards.is_empty());
        assert_eq!(config.series.min_freq, 10.0);
        assert_eq!(config.series.max_error_bar, 0.1);
        assert_eq!(config.quality, QualityWeights::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = CouncilroomConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(CouncilroomConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_json() {
        let config = CouncilroomConfig::from_json(r#"{"prior": {"freq": 0, "sum": 0, "sum_sq": 0}}"#)
            .unwrap();
        assert_eq!(config.prior.as_tuple(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CouncilroomConfig::default();
        config.prior.freq = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));

        let mut config = CouncilroomConfig::default();
        config.series.max_error_bar = 0.0;
        assert!(config.validate().is_err());

        let mut config = CouncilroomConfig::default();
        config.glob.excluded_cards.push("  ".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            CouncilroomConfig::from_toml("[series]\nmin_freq = \"lots\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
