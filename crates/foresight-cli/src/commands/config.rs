//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Init { preset, force } => {
            init_config(path, preset.into(), force)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote configuration to {}", path.display()))
            );
        }
        ConfigAction::Show => {
            println!("{}", formatter.info(&format!("Configuration file: {}", path.display())));
            println!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

/// Write a fresh configuration file built on `engine`.
pub fn init_config(path: &Path, engine: foresight_engine::EngineConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists, use --force to overwrite",
            path.display()
        )));
    }
    let config = Config {
        engine,
        ..Config::default()
    };
    config.save_to(path)
}
