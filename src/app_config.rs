use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::enrichment::{FlagConfig, PipelineConfig, ScopeConfig};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Enrichment tunables
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Maximum number of corpus shards enriched at once
    #[serde(default = "default_concurrent_shards")]
    pub concurrent_shards: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Thresholds and calibration settings of the enrichment pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EnrichmentConfig {
    /// Risky-role decisions at or below this confidence are flagged
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f32,

    /// Scopes governing more Variantes than this are reported as large
    #[serde(default = "default_large_scope_threshold")]
    pub large_scope_threshold: usize,

    /// Labels with more children than this are reported as large intra scopes
    #[serde(default = "default_large_intra_scope_threshold")]
    pub large_intra_scope_threshold: usize,

    /// Calibration sample size per (role, method) bucket
    #[serde(default = "default_calibration_per_bucket")]
    pub calibration_per_bucket: usize,

    /// Seed of the calibration sampler
    #[serde(default = "default_calibration_seed")]
    pub calibration_seed: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: default_low_confidence_threshold(),
            large_scope_threshold: default_large_scope_threshold(),
            large_intra_scope_threshold: default_large_intra_scope_threshold(),
            calibration_per_bucket: default_calibration_per_bucket(),
            calibration_seed: default_calibration_seed(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_concurrent_shards() -> usize {
    4
}

fn default_low_confidence_threshold() -> f32 {
    crate::enrichment::flags::DEFAULT_LOW_CONFIDENCE_THRESHOLD
}

fn default_large_scope_threshold() -> usize {
    crate::enrichment::scope::DEFAULT_LARGE_SCOPE_THRESHOLD
}

fn default_large_intra_scope_threshold() -> usize {
    crate::enrichment::flags::DEFAULT_LARGE_INTRA_SCOPE_THRESHOLD
}

fn default_calibration_per_bucket() -> usize {
    crate::enrichment::flags::DEFAULT_CALIBRATION_PER_BUCKET
}

fn default_calibration_seed() -> u64 {
    crate::enrichment::flags::DEFAULT_CALIBRATION_SEED
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let threshold = self.enrichment.low_confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(anyhow!(
                "low_confidence_threshold must be between 0 and 1, got {}",
                threshold
            ));
        }

        if self.concurrent_shards == 0 {
            return Err(anyhow!("concurrent_shards must be at least 1"));
        }

        Ok(())
    }

    /// Load a configuration file, creating it with defaults when missing.
    ///
    /// Returns the configuration and whether the file was created.
    pub fn load_or_create(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            return Ok((Self::load(path)?, false));
        }

        let config = Self::default();
        config.save(path)?;
        Ok((config, true))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            enrichment: EnrichmentConfig::default(),
            concurrent_shards: default_concurrent_shards(),
            log_level: LogLevel::default(),
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        let enrichment = &config.enrichment;
        PipelineConfig {
            scope: ScopeConfig {
                large_scope_threshold: enrichment.large_scope_threshold,
            },
            flags: FlagConfig {
                low_confidence_threshold: enrichment.low_confidence_threshold,
                large_scope_threshold: enrichment.large_scope_threshold,
                large_intra_scope_threshold: enrichment.large_intra_scope_threshold,
                calibration_per_bucket: enrichment.calibration_per_bucket,
                calibration_seed: enrichment.calibration_seed,
            },
        }
    }
}
