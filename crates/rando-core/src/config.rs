//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `rando-config.yaml` at the project
//! root. Every section and field has a default, so a missing file or an
//! empty section yields a usable configuration.

use std::path::Path;

use rando_grant::GrantOptions;
use rando_sampler::SamplerSettings;
use serde::Deserialize;
use tracing::warn;

/// Environment variable overriding `run.seed`.
pub const SEED_ENV: &str = "RANDO_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `rando-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RandoConfig {
    /// Per-run settings.
    #[serde(default)]
    pub run: RunConfig,

    /// Pools, modes, start and cost maxima.
    #[serde(default)]
    pub randomization: SamplerSettings,

    /// Runtime patcher toggles.
    #[serde(default)]
    pub patcher: PatcherConfig,

    /// Quality-of-life toggles applied while granting.
    #[serde(default)]
    pub quality_of_life: QualityOfLifeConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RandoConfig {
    /// Load configuration from a YAML file.
    ///
    /// `RANDO_SEED` overrides `run.seed` when set to a valid integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.run.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.run.apply_env_overrides();
        Ok(config)
    }

    /// Interpreter options derived from the quality-of-life section.
    pub const fn grant_options(&self) -> GrantOptions {
        GrantOptions {
            charm_notches: self.quality_of_life.charm_notches,
        }
    }
}

/// Per-run settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// RNG seed for the pre-placement sampler.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl RunConfig {
    /// Apply `RANDO_SEED` if present.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(SEED_ENV) {
            match val.trim().parse::<u64>() {
                Ok(seed) => self.seed = seed,
                Err(e) => warn!(value = %val, error = %e, "Ignoring invalid seed override"),
            }
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

/// Patcher toggles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatcherConfig {
    /// Tick bound for "not enough" polling. Absent means poll until the
    /// prompt is ready or the task is cancelled.
    #[serde(default)]
    pub poll_max_ticks: Option<u64>,

    /// Let Void Heart be unequipped.
    #[serde(default = "default_true")]
    pub void_heart_fix: bool,

    /// Keep shades hostile regardless of Void Heart.
    #[serde(default = "default_true")]
    pub hostile_shades: bool,
}

impl Default for PatcherConfig {
    fn default() -> Self {
        Self {
            poll_max_ticks: None,
            void_heart_fix: true,
            hostile_shades: true,
        }
    }
}

/// Quality-of-life toggles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QualityOfLifeConfig {
    /// Award free notches at 5/10/18/25 charms.
    #[serde(default = "default_true")]
    pub charm_notches: bool,

    /// Give the lantern for free at the start of a run.
    #[serde(default)]
    pub free_lantern: bool,

    /// Start the run with 300 geo.
    #[serde(default)]
    pub early_geo: bool,
}

impl Default for QualityOfLifeConfig {
    fn default() -> Self {
        Self {
            charm_notches: true,
            free_lantern: false,
            early_geo: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_true() -> bool {
    true
}
