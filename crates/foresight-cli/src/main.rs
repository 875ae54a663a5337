//! Foresight CLI - command-line front end for the analytics engine.

use anyhow::Context;
use clap::Parser;
use foresight_cli::cli::{ConfigAction, ConfigArgs};
use foresight_cli::commands;
use foresight_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let path = Config::resolve_path(cli.config.as_deref())?;
    // init must work even when the existing file no longer parses
    let config = match &cli.command {
        Command::Config(ConfigArgs {
            action: ConfigAction::Init { .. },
        }) => Config::default(),
        _ => Config::load_from(&path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Forecast(args) => {
            let history = args.history.clone();
            commands::execute_forecast(args, &config.engine, &formatter)
                .await
                .with_context(|| format!("forecasting from {}", history.display()))?;
        }
        Command::Risk(args) => {
            commands::execute_risk(args, &config.engine, &formatter).await?;
        }
        Command::Benchmark(args) => {
            let metrics = args.metrics.clone();
            commands::execute_benchmark(args, &config.engine, &formatter)
                .await
                .with_context(|| format!("benchmarking {}", metrics.display()))?;
        }
        Command::Trend(args) => {
            let history = args.history.clone();
            commands::execute_trend(args, &config.engine, &formatter)
                .await
                .with_context(|| format!("analyzing trend from {}", history.display()))?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, &path, &formatter)?;
        }
    }

    Ok(())
}
