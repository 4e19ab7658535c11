//! Mute configuration and per-command criteria resolution
//!
//! A [`Config`] holds the default [`Criteria`] and per-command overrides keyed by
//! a literal command prefix. The override with the longest key that prefixes
//! the invoked command wins; commands matching no key use the default.

mod loader;

pub use loader::{
    load, load_with, ConfigError, DEFAULT_CONFIG_PATH, ENV_CONFIG, ENV_EXIT_CODES,
    ENV_STDOUT_PATTERN,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::criteria::{Criteria, Criterion};

/// Default criteria plus per-command overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Criteria used when no command override applies
    #[serde(default, alias = "Default")]
    pub default: Criteria,
    /// Overrides keyed by literal command prefix
    #[serde(default, alias = "Commands")]
    pub commands: BTreeMap<String, Criteria>,
}

impl Config {
    /// Configuration used when none is available: mute successful runs only
    pub fn mute_successful() -> Self {
        Self {
            default: Criteria::new().with(Criterion::from_parts(vec![0], Vec::new())),
            commands: BTreeMap::new(),
        }
    }

    /// A config is empty when it has no default criteria and no command overrides
    pub fn is_empty(&self) -> bool {
        self.default.is_empty() && self.commands.is_empty()
    }

    /// Add a command override, returning self for chaining
    pub fn with_command(mut self, prefix: impl Into<String>, criteria: Criteria) -> Self {
        self.commands.insert(prefix.into(), criteria);
        self
    }

    /// Criteria applicable to `command`
    pub fn criteria_for(&self, command: &str) -> &Criteria {
        resolve_criteria(command, self)
    }
}

/// Select the criteria for an invoked command
///
/// Returns the override whose key is the longest literal prefix of `command`,
/// or the config default when no key is a prefix.
pub fn resolve_criteria<'a>(command: &str, config: &'a Config) -> &'a Criteria {
    let matched = config
        .commands
        .iter()
        .filter(|(key, _)| command.starts_with(key.as_str()))
        .max_by_key(|(key, _)| key.len());

    match matched {
        Some((key, criteria)) => {
            tracing::debug!(command, prefix = %key, "using command criteria");
            criteria
        }
        None => {
            tracing::debug!(command, "using default criteria");
            &config.default
        }
    }
}
