pub mod config;
pub mod criteria;
pub mod exec;

pub use config::{load, load_with, resolve_criteria, Config, ConfigError};
pub use criteria::{Criteria, Criterion, PatternError, StdoutPattern};
pub use exec::{execute, ExecOutcome, RunError, RunResult, Target, Termination};

/// Program version reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit code when the command could not be executed or terminated abnormally
pub const EXIT_EXEC_FAILURE: i32 = 127;

/// Exit code used by the CLI when the configuration is invalid
pub const EXIT_CONFIG_ERROR: i32 = 126;
