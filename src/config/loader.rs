//! Loading configuration from TOML files and environment variables

use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::Config;
use crate::criteria::{Criteria, Criterion, PatternError, StdoutPattern};

/// Environment variable pointing to the config file (empty means built-in default)
pub const ENV_CONFIG: &str = "MUTE_CONFIG";

/// Environment variable overriding the default exit codes (comma separated)
pub const ENV_EXIT_CODES: &str = "MUTE_EXIT_CODES";

/// Environment variable overriding the default stdout pattern
pub const ENV_STDOUT_PATTERN: &str = "MUTE_STDOUT_PATTERN";

/// Config file used when `MUTE_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "/etc/mute.toml";

/// Errors loading a [`Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML or contains an invalid pattern
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An exit code from the environment is not an integer
    #[error("invalid exit code '{value}': {source}")]
    InvalidExitCode {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl ConfigError {
    /// Whether the error means the config file could not be accessed at all
    pub fn is_access(&self) -> bool {
        matches!(self, ConfigError::Access { .. })
    }
}

impl Config {
    /// Read and parse a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Access {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build a config from the values of the override environment variables
    ///
    /// `exit_codes` is a comma separated list of integers and `pattern` a
    /// regular expression. Empty values contribute nothing, so two empty
    /// strings produce an empty config.
    pub fn from_env_values(exit_codes: &str, pattern: &str) -> Result<Self, ConfigError> {
        let codes = if exit_codes.is_empty() {
            Vec::new()
        } else {
            exit_codes
                .split(',')
                .map(|s| {
                    let s = s.trim();
                    s.parse::<i32>()
                        .map_err(|source| ConfigError::InvalidExitCode {
                            value: s.to_string(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let patterns = if pattern.is_empty() {
            Vec::new()
        } else {
            vec![StdoutPattern::new(pattern)?]
        };

        let criterion = Criterion::from_parts(codes, patterns);
        let mut config = Config::default();
        if !criterion.is_empty() {
            config.default = Criteria::new().with(criterion);
        }
        Ok(config)
    }
}

/// Load the config for the current process environment
///
/// See [`load_with`] for the resolution order.
pub fn load() -> Result<Config, ConfigError> {
    load_with(|name| std::env::var(name).ok())
}

/// Load the config using `lookup` to read environment variables
///
/// 1. `MUTE_EXIT_CODES` / `MUTE_STDOUT_PATTERN`, when they produce a non-empty config
/// 2. `MUTE_CONFIG`: set but empty means [`Config::mute_successful`], otherwise a file path
/// 3. [`DEFAULT_CONFIG_PATH`]
pub fn load_with<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let exit_codes = lookup(ENV_EXIT_CODES).unwrap_or_default();
    let pattern = lookup(ENV_STDOUT_PATTERN).unwrap_or_default();
    let config = Config::from_env_values(&exit_codes, &pattern)?;
    if !config.is_empty() {
        tracing::debug!("using config from environment overrides");
        return Ok(config);
    }

    let path = match lookup(ENV_CONFIG) {
        Some(path) if path.is_empty() => {
            tracing::debug!("{ENV_CONFIG} is empty, using built-in config");
            return Ok(Config::mute_successful());
        }
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(DEFAULT_CONFIG_PATH),
    };

    tracing::debug!(path = %path.display(), "reading config file");
    Config::from_file(&path)
}
