//! Benchmark command implementation.

use super::stateless_engine;
use crate::cli::BenchmarkArgs;
use crate::error::Result;
use crate::output::Formatter;
use foresight_domain::{SupplierMetric, SupplierScore};
use foresight_engine::{BenchmarkRequest, EngineConfig};
use std::fs;

/// Execute the benchmark command.
pub async fn execute_benchmark(
    args: BenchmarkArgs,
    config: &EngineConfig,
    formatter: &Formatter,
) -> Result<()> {
    let scores = benchmark(args, config).await?;
    println!("{}", formatter.format_scores(&scores)?);
    Ok(())
}

/// Benchmark the suppliers in a metrics file.
pub async fn benchmark(args: BenchmarkArgs, config: &EngineConfig) -> Result<Vec<SupplierScore>> {
    let contents = fs::read_to_string(&args.metrics)?;
    let metrics: Vec<SupplierMetric> = serde_json::from_str(&contents)?;

    let engine = stateless_engine(config)?;
    let request = BenchmarkRequest {
        supplier_ids: args.suppliers,
        metrics,
    };
    Ok(engine.benchmark_suppliers(request).await?.into_payload())
}
