//! Trend command implementation.

use super::file_engine;
use crate::cli::TrendArgs;
use crate::error::Result;
use crate::output::Formatter;
use foresight_domain::TrendAnalysis;
use foresight_engine::{EngineConfig, TrendRequest};

/// Execute the trend command.
pub async fn execute_trend(
    args: TrendArgs,
    config: &EngineConfig,
    formatter: &Formatter,
) -> Result<()> {
    let analysis = trend(args, config).await?;
    println!("{}", formatter.format_trend(&analysis)?);
    Ok(())
}

/// Analyze the trend of one entity.
pub async fn trend(args: TrendArgs, config: &EngineConfig) -> Result<TrendAnalysis> {
    let engine = file_engine(&args.history, None, config)?;
    let mut request = TrendRequest::new(args.entity_id);
    if let Some(steps) = args.forecast {
        request = request.with_forecast(steps);
    }
    Ok(engine.analyze_trend(request).await?.into_payload())
}
