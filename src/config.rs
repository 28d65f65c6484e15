use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::consistency::ConsistencyThresholds;
use crate::error::GoldenPaceError;
use crate::logging::LogConfig;
use crate::models::CanonicalDistance;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging output
    pub logging: LogConfig,

    /// Single-result calculator defaults
    pub calculator: CalculatorSettings,

    /// Personal record cross-check thresholds
    pub consistency: ConsistencySettings,

    /// Progression projection defaults
    pub progression: ProgressionSettings,
}

/// Calculator defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Distance assumed when none is given
    pub default_distance: CanonicalDistance,

    /// Goal race used to pick zone sources
    pub default_goal: CanonicalDistance,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        CalculatorSettings {
            default_distance: CanonicalDistance::FiveK,
            default_goal: CanonicalDistance::FiveK,
        }
    }
}

/// Variance fractions for consistency issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencySettings {
    pub medium_variance: f64,
    pub high_variance: f64,
}

impl Default for ConsistencySettings {
    fn default() -> Self {
        let thresholds = ConsistencyThresholds::default();
        ConsistencySettings {
            medium_variance: thresholds.medium,
            high_variance: thresholds.high,
        }
    }
}

impl ConsistencySettings {
    pub fn thresholds(&self) -> crate::error::Result<ConsistencyThresholds> {
        ConsistencyThresholds::new(self.medium_variance, self.high_variance)
    }
}

/// Progression defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSettings {
    /// Weekly running volume in miles
    pub weekly_mileage: f64,

    /// Weeks covered by a projection
    pub horizon_weeks: u32,

    /// Weeks between projected points
    pub step_weeks: u32,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        ProgressionSettings {
            weekly_mileage: 20.0,
            horizon_weeks: 26,
            step_weeks: 2,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Reject settings no calculation could use
    pub fn validate(&self) -> crate::error::Result<()> {
        self.consistency
            .thresholds()
            .map_err(|err| GoldenPaceError::Configuration(err.to_string()))?;

        let progression = &self.progression;
        if !progression.weekly_mileage.is_finite() || progression.weekly_mileage < 0.0 {
            return Err(GoldenPaceError::Configuration(format!(
                "progression.weekly_mileage must be non-negative, got {}",
                progression.weekly_mileage
            )));
        }
        if progression.step_weeks == 0 {
            return Err(GoldenPaceError::Configuration(
                "progression.step_weeks must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Load and validate configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML configuration: {}", path.as_ref().display()))?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".goldenpace")
            .join("config.toml")
    }

    /// Load the default configuration file, falling back to defaults
    ///
    /// A missing file is normal. An unreadable or invalid one is reported on
    /// stderr because logging is configured from this file.
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();
        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Ignoring invalid config file, using defaults: {:#}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to default location
    pub fn save_default(&self) -> Result<PathBuf> {
        let config_path = Self::default_config_path();
        self.save_to_file(&config_path)?;
        Ok(config_path)
    }
}
