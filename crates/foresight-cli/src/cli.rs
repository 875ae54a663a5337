//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use foresight_domain::RiskFactor;
use std::path::PathBuf;

/// Foresight - demand forecasting, risk scoring and supplier benchmarking.
#[derive(Debug, Parser)]
#[command(name = "foresight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.foresight/config.toml)
    #[arg(short, long, global = true, env = "FORESIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Forecast demand for one entity
    Forecast(ForecastArgs),

    /// Score a set of risk factors
    Risk(RiskArgs),

    /// Benchmark suppliers against each other
    Benchmark(BenchmarkArgs),

    /// Summarize the recent trend of an entity
    Trend(TrendArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the forecast command.
#[derive(Debug, Parser)]
pub struct ForecastArgs {
    /// Entity to forecast
    pub entity_id: String,

    /// JSON file of historical points
    #[arg(long)]
    pub history: PathBuf,

    /// Number of future steps
    #[arg(short = 'n', long, default_value = "7")]
    pub horizon: usize,

    /// Interval confidence level (0.0-1.0, exclusive)
    #[arg(short = 'l', long)]
    pub confidence: Option<f64>,

    /// Skip prediction intervals
    #[arg(long)]
    pub no_uncertainty: bool,

    /// JSON file of holiday dates
    #[arg(long)]
    pub holidays: Option<PathBuf>,

    /// JSON file of model parameters to load before forecasting
    #[arg(long)]
    pub models: Option<PathBuf>,
}

/// Arguments for the risk command.
#[derive(Debug, Parser)]
pub struct RiskArgs {
    /// What is being assessed
    #[arg(short, long, default_value = "global")]
    pub scope: String,

    /// Risk factor (format: name:score:weight), repeatable
    #[arg(long = "factor", value_parser = parse_factor)]
    pub factors: Vec<RiskFactor>,

    /// JSON file holding a full risk request
    #[arg(long, conflicts_with = "factors")]
    pub file: Option<PathBuf>,

    /// Validity of the assessment, in days
    #[arg(short, long, default_value = "30")]
    pub days: u32,
}

/// Arguments for the benchmark command.
#[derive(Debug, Parser)]
pub struct BenchmarkArgs {
    /// JSON file of supplier metrics
    #[arg(long)]
    pub metrics: PathBuf,

    /// Only benchmark these suppliers, repeatable
    #[arg(short, long = "supplier")]
    pub suppliers: Vec<String>,
}

/// Arguments for the trend command.
#[derive(Debug, Parser)]
pub struct TrendArgs {
    /// Entity to analyze
    pub entity_id: String,

    /// JSON file of historical points
    #[arg(long)]
    pub history: PathBuf,

    /// Also forecast this many steps (30 when given without a value)
    #[arg(long, value_name = "STEPS", num_args = 0..=1, default_missing_value = "30")]
    pub forecast: Option<usize>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write a configuration file
    Init {
        /// Engine preset to start from
        #[arg(long, value_enum, default_value = "default")]
        preset: PresetArg,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}

/// Engine configuration presets.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PresetArg {
    /// Balanced defaults
    Default,
    /// Longer history, wider bounds
    Conservative,
    /// Short budgets, short history
    Responsive,
}

/// Parse a `name:score:weight` risk factor.
pub fn parse_factor(s: &str) -> Result<RiskFactor, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [name, score, weight] = parts.as_slice() else {
        return Err(format!("expected name:score:weight, got '{}'", s));
    };
    let score: f64 = score
        .parse()
        .map_err(|_| format!("invalid score '{}'", score))?;
    let weight: f64 = weight
        .parse()
        .map_err(|_| format!("invalid weight '{}'", weight))?;
    Ok(RiskFactor::new(*name, score, weight))
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<PresetArg> for foresight_engine::EngineConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => foresight_engine::EngineConfig::default(),
            PresetArg::Conservative => foresight_engine::EngineConfig::conservative(),
            PresetArg::Responsive => foresight_engine::EngineConfig::responsive(),
        }
    }
}
