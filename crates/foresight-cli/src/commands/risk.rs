//! Risk command implementation.

use super::stateless_engine;
use crate::cli::RiskArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use foresight_domain::RiskAssessment;
use foresight_engine::{EngineConfig, RiskRequest};
use std::fs;

/// Execute the risk command.
pub async fn execute_risk(
    args: RiskArgs,
    config: &EngineConfig,
    formatter: &Formatter,
) -> Result<()> {
    let assessment = assess(args, config).await?;
    println!("{}", formatter.format_risk(&assessment)?);
    Ok(())
}

/// Build the request from a file or from inline factors.
pub fn build_request(args: RiskArgs) -> Result<RiskRequest> {
    match args.file {
        Some(path) => {
            let contents = fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        None if args.factors.is_empty() => Err(CliError::InvalidInput(
            "Provide --factor name:score:weight or --file".to_string(),
        )),
        None => Ok(RiskRequest::new(args.scope, args.factors).with_time_horizon(args.days)),
    }
}

/// Score the requested factors.
pub async fn assess(args: RiskArgs, config: &EngineConfig) -> Result<RiskAssessment> {
    let request = build_request(args)?;
    let engine = stateless_engine(config)?;
    Ok(engine.assess_risk(request).await?.into_payload())
}
