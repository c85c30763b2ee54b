// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. riopulse.yaml file
//! 3. Environment variables (RIOPULSE_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::compiler::{Compiler, DEFAULT_CLOCK_PERIOD};
use crate::error::{Error, Result};
use crate::timeline::DEFAULT_NCHANNELS;
use crate::transport::DEFAULT_BATCH_SIZE;
use crate::validation::{validate_channel_count, validate_clock_period};

/// Default configuration file locations, tried in order.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "riopulse.yaml",
    "riopulse.yml",
    "/etc/riopulse/config.yaml",
];

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Compiler settings
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Sequencer target
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                config = Self::from_file(path)?;
            }
        } else {
            for path in DEFAULT_CONFIG_PATHS {
                let path = Path::new(path);
                if path.exists() {
                    config = Self::from_file(path)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading configuration");
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("RIOPULSE_CLOCK_PERIOD") {
            if let Ok(dt) = val.parse() {
                self.compiler.clock_period_s = dt;
            }
        }
        if let Ok(val) = env::var("RIOPULSE_CHANNELS") {
            if let Ok(n) = val.parse() {
                self.compiler.nchannels = n;
            }
        }
        if let Ok(val) = env::var("RIOPULSE_RESOURCE") {
            self.transport.resource = val;
        }
        if let Ok(val) = env::var("RIOPULSE_BITFILE") {
            self.transport.bitfile = Some(PathBuf::from(val));
        }
        if let Ok(val) = env::var("RIOPULSE_BATCH_SIZE") {
            if let Ok(n) = val.parse() {
                self.transport.batch_size = n;
            }
        }
        if let Ok(val) = env::var("RIOPULSE_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        validate_clock_period(self.compiler.clock_period_s)
            .map_err(|e| Error::Config(e.to_string()))?;
        validate_channel_count(self.compiler.nchannels)
            .map_err(|e| Error::Config(e.to_string()))?;
        if self.transport.batch_size == 0 {
            return Err(Error::Config("batch_size cannot be 0".into()));
        }
        if self.transport.resource.trim().is_empty() {
            return Err(Error::Config("resource cannot be empty".into()));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(Error::Config(format!(
                "unknown log format '{}' (expected text or json)",
                self.logging.format
            )));
        }
        if let Some(bitfile) = &self.transport.bitfile {
            if !bitfile.exists() {
                tracing::warn!(
                    bitfile = %bitfile.display(),
                    "Configured bitfile does not exist"
                );
            }
        }
        Ok(())
    }
}

/// Compiler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Sequencer clock period in seconds
    #[serde(default = "default_clock_period")]
    pub clock_period_s: f64,

    /// Channel count for sequence files that do not set one
    #[serde(default = "default_nchannels")]
    pub nchannels: usize,
}

impl CompilerConfig {
    /// Compiler for the configured clock.
    pub fn compiler(&self) -> Result<Compiler> {
        Ok(Compiler::new(self.clock_period_s)?)
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            clock_period_s: default_clock_period(),
            nchannels: default_nchannels(),
        }
    }
}

fn default_clock_period() -> f64 {
    DEFAULT_CLOCK_PERIOD
}

fn default_nchannels() -> usize {
    DEFAULT_NCHANNELS
}

/// Sequencer target configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Device resource name
    #[serde(default = "default_resource")]
    pub resource: String,

    /// Sequencer bitfile; the device integration picks its own when unset
    #[serde(default)]
    pub bitfile: Option<PathBuf>,

    /// Words per FIFO write
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            resource: default_resource(),
            bitfile: None,
            batch_size: default_batch_size(),
        }
    }
}

fn default_resource() -> String {
    "RIO0".into()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}
