//! Layered application configuration.
//!
//! Values are merged with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, else `<config dir>/dupsweep/config.toml`)
//! 3. `DUPSWEEP_*` environment variables (e.g. `DUPSWEEP_PREFIX_BYTES=4096`)
//! 4. CLI flags, applied by [`Config::apply_cli`]
//!
//! A missing default file is skipped; a missing `--config` file is an error.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::scanner::{WalkerConfig, DEFAULT_CHUNK_SIZE, DEFAULT_PREFIX_BYTES};

const ENV_PREFIX: &str = "DUPSWEEP_";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or had the wrong type.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// A size setting was zero.
    #[error("invalid configuration: {0} must be greater than zero")]
    Zero(&'static str),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bytes read from the head of each file for the weak hash.
    pub prefix_bytes: usize,
    /// Streaming chunk size for the strong hash.
    pub chunk_size: usize,
    /// Skip dot-files and dot-directories.
    pub skip_hidden: bool,
    /// Skip zero-byte files.
    pub skip_empty: bool,
    /// Move copies to the trash instead of removing them.
    pub trash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix_bytes: DEFAULT_PREFIX_BYTES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            skip_hidden: false,
            skip_empty: false,
            trash: false,
        }
    }
}

impl Config {
    /// Load defaults, the config file and the environment.
    ///
    /// `explicit` is the `--config` path, if one was given.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit file is missing, a layer fails to
    /// parse, or a size setting is zero.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_from_path(path)
            }
            None => match Self::default_path() {
                Some(path) => Self::load_from_path(&path),
                None => {
                    log::debug!("No platform config directory, using defaults and environment");
                    Self::extract(Self::base())
                }
            },
        }
    }

    /// Load defaults, the given TOML file (skipped if absent) and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a layer fails to parse or a size setting is zero.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading configuration from {}", path.display());
        Self::extract(Self::base().merge(Toml::file(path)))
    }

    /// Default platform-specific config file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupsweep").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)?;
        config.validate()
    }

    /// Reject settings that would make hashing impossible.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Zero` naming the offending key.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.prefix_bytes == 0 {
            return Err(ConfigError::Zero("prefix_bytes"));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Zero("chunk_size"));
        }
        Ok(self)
    }

    /// Overlay CLI flags. Flags only ever switch options on.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(bytes) = cli.prefix_bytes {
            self.prefix_bytes = bytes;
        }
        self.skip_hidden |= cli.skip_hidden;
        self.skip_empty |= cli.skip_empty;
        self.trash |= cli.trash;
    }

    /// Traversal settings.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.skip_hidden, self.skip_empty)
    }
}
