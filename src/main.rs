use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use mute::{Config, Target, EXIT_CONFIG_ERROR, EXIT_EXEC_FAILURE};
use std::ffi::OsString;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `MUTE_LOG=debug`
const ENV_LOG: &str = "MUTE_LOG";

#[derive(Parser)]
#[command(name = "mute")]
#[command(
    about = "Run a command and mute its output when the exit code or stdout match configured criteria",
    long_about = None
)]
#[command(version = mute::VERSION)]
struct Cli {
    /// Command to execute, followed by its arguments
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        value_name = "COMMAND",
        value_parser = clap::value_parser!(OsString)
    )]
    command: Vec<OsString>,
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize logging")
}

/// Load the config, falling back to muting successful runs if none is accessible
fn load_config() -> Result<Config, mute::ConfigError> {
    match mute::load() {
        Ok(config) => Ok(config),
        Err(e) if e.is_access() => {
            tracing::debug!(error = %e, "no config file, muting successful runs only");
            Ok(Config::mute_successful())
        }
        Err(e) => Err(e),
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    let mut command = cli.command.into_iter();
    let program = command.next().unwrap_or_default();
    if program.is_empty() {
        eprintln!("mute: command is empty");
        return Ok(EXIT_EXEC_FAILURE);
    }

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let outcome = Target::new(program)
        .args(command)
        .execute(&config, &mut out, &mut err);
    if let Some(e) = &outcome.error {
        tracing::debug!(error = %e, "command did not succeed");
    }

    out.flush().context("Failed to flush stdout")?;
    Ok(outcome.exit_code)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_EXEC_FAILURE,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = init_logging() {
        eprintln!("mute: {e:#}");
    }

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("mute: {e:#}");
            EXIT_EXEC_FAILURE
        }
    };
    std::process::exit(code);
}
