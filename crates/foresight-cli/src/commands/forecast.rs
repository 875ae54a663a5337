//! Forecast command implementation.

use super::file_engine;
use crate::cli::ForecastArgs;
use crate::error::Result;
use crate::output::Formatter;
use foresight_domain::ForecastResult;
use foresight_engine::{EngineConfig, ForecastRequest, JsonFileModelStore};
use tracing::info;

/// Execute the forecast command.
pub async fn execute_forecast(
    args: ForecastArgs,
    config: &EngineConfig,
    formatter: &Formatter,
) -> Result<()> {
    let result = forecast(args, config).await?;
    println!("{}", formatter.format_forecast(&result)?);
    Ok(())
}

/// Run a forecast and return the result.
pub async fn forecast(args: ForecastArgs, config: &EngineConfig) -> Result<ForecastResult> {
    let engine = file_engine(&args.history, args.holidays.as_deref(), config)?;

    if let Some(path) = &args.models {
        let version = engine.reload_models(&JsonFileModelStore::new(path)).await?;
        info!(version = %version, path = %path.display(), "Loaded model parameters");
    }

    let mut request = ForecastRequest::new(args.entity_id, args.horizon);
    if let Some(confidence) = args.confidence {
        request = request.with_confidence(confidence);
    }
    if args.no_uncertainty {
        request = request.without_uncertainty();
    }

    Ok(engine.forecast_demand(request).await?.into_payload())
}
