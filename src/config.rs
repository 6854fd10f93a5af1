//! Configuration management for sharpgate
//!
//! Provides loading, saving, and validation of evaluator thresholds and
//! gate runtime options from a TOML file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::gate::{DEFAULT_MAX_PENDING_FRAMES, DEFAULT_WORKERS};
use crate::sharpness::SharpnessEvaluator;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharpGateConfig {
    pub evaluator: EvaluatorConfig,
    pub gate: GateConfig,
}

/// Evaluator thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Pass threshold on the Laplacian response standard deviation.
    /// Frames must score strictly above this to clear the gate.
    pub pass_threshold: f32,
}

/// Gate runtime options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Number of evaluation worker threads
    pub worker_threads: usize,
    /// Maximum frames queued ahead of the workers before shedding
    pub max_pending_frames: usize,
}

impl Default for SharpGateConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorConfig {
                pass_threshold: 0.0,
            },
            gate: GateConfig {
                worker_threads: DEFAULT_WORKERS,
                max_pending_frames: DEFAULT_MAX_PENDING_FRAMES,
            },
        }
    }
}

impl SharpGateConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read config file: {}", e)))?;

        let config: SharpGateConfig = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Io(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("sharpgate.toml")
    }

    /// Load from the default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.evaluator.pass_threshold.is_finite() {
            return Err("Pass threshold must be finite".to_string());
        }
        if self.gate.worker_threads == 0 || self.gate.worker_threads > 64 {
            return Err("Worker threads must be between 1 and 64".to_string());
        }
        if self.gate.max_pending_frames == 0 || self.gate.max_pending_frames > 4096 {
            return Err("Max pending frames must be between 1 and 4096".to_string());
        }
        Ok(())
    }

    /// Build an evaluator from this configuration.
    ///
    /// `validate` must have accepted the config; a finite threshold cannot
    /// fail evaluator construction.
    pub fn build_evaluator(&self) -> Result<SharpnessEvaluator, crate::errors::InvalidInputError> {
        SharpnessEvaluator::new(self.evaluator.pass_threshold)
    }
}

/// Configuration load/save failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SharpGateConfig::default();
        assert_eq!(config.evaluator.pass_threshold, 0.0);
        assert_eq!(config.gate.worker_threads, DEFAULT_WORKERS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut bad = SharpGateConfig::default();
        bad.evaluator.pass_threshold = f32::NAN;
        assert!(bad.validate().is_err());

        let mut bad = SharpGateConfig::default();
        bad.gate.worker_threads = 0;
        assert!(bad.validate().is_err());

        let mut bad = SharpGateConfig::default();
        bad.gate.max_pending_frames = 100_000;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("test_sharpgate.toml");

        let mut config = SharpGateConfig::default();
        config.evaluator.pass_threshold = 12.5;
        assert!(config.save_to_file(&config_path).is_ok());

        let loaded = SharpGateConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.evaluator.pass_threshold, 12.5);
        assert_eq!(loaded.gate.worker_threads, config.gate.worker_threads);
    }

    #[test]
    fn test_config_toml_format() {
        let config = SharpGateConfig::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        assert!(toml_string.contains("[evaluator]"));
        assert!(toml_string.contains("[gate]"));
        assert!(toml_string.contains("pass_threshold"));
        assert!(toml_string.contains("worker_threads"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = SharpGateConfig::load_from_file("nonexistent_sharpgate.toml");
        assert!(result.is_ok());
        assert_eq!(result.unwrap().evaluator.pass_threshold, 0.0);
    }

    #[test]
    fn test_build_evaluator_from_config() {
        let config = SharpGateConfig::default();
        let evaluator = config.build_evaluator().unwrap();
        assert_eq!(evaluator.threshold(), 0.0);
    }
}
