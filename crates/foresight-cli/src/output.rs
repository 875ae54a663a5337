//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use foresight_domain::{ForecastResult, RiskAssessment, RiskLevel, SupplierScore, Tier, TrendAnalysis};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a demand forecast.
    pub fn format_forecast(&self, result: &ForecastResult) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(result);
        }

        let mut builder = Builder::default();
        builder.push_record(["Timestamp", "Estimate", "Lower", "Upper"]);
        for point in &result.horizon_points {
            builder.push_record([
                point.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                format!("{:.2}", point.point_estimate),
                format_bound(point.lower_bound),
                format_bound(point.upper_bound),
            ]);
        }

        let mut lines = vec![
            format!("Entity: {}", result.entity_id),
            format!(
                "Model: {} (confidence {:.0}%)",
                result.model_version,
                result.confidence_level * 100.0
            ),
            render(builder),
            format!("Total forecasted demand: {:.2}", result.total_forecasted_demand),
        ];
        if let Some(accuracy) = result.accuracy_score {
            lines.push(format!("Backtest accuracy: {:.1}%", accuracy * 100.0));
        }
        if result.degraded {
            lines.push(self.warning("Degraded: not every model could run"));
        }
        if result.low_confidence {
            lines.push(self.warning("Low confidence: too little history to calibrate intervals"));
        }
        if result.gap_filled {
            lines.push(self.info("Gaps in the history were forward-filled"));
        }
        Ok(lines.join("\n"))
    }

    /// Format a risk assessment.
    pub fn format_risk(&self, assessment: &RiskAssessment) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(assessment);
        }

        let mut builder = Builder::default();
        builder.push_record(["Factor", "Score", "Weight", "Contribution"]);
        for factor in &assessment.factors {
            builder.push_record([
                factor.name.clone(),
                format!("{:.1}", factor.normalized_score),
                format!("{:.2}", factor.weight),
                format!("{:.2}", factor.contribution()),
            ]);
        }

        let top: Vec<&str> = assessment.top_risks.iter().map(|r| r.name.as_str()).collect();
        Ok([
            format!("Scope: {}", assessment.scope),
            render(builder),
            format!(
                "Composite: {:.2} ({})",
                assessment.composite_score,
                self.risk_level(assessment.risk_level)
            ),
            format!("Top risks: {}", top.join(", ")),
            format!("Valid until: {}", assessment.expires_at.format("%Y-%m-%d %H:%M")),
        ]
        .join("\n"))
    }

    /// Format supplier benchmark scores.
    pub fn format_scores(&self, scores: &[SupplierScore]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(&scores);
        }
        if scores.is_empty() {
            return Ok(self.colorize("No suppliers found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Supplier", "Composite", "Percentile", "Tier"]);
        for score in scores {
            builder.push_record([
                score.supplier_id.clone(),
                format!("{:.2}", score.composite_score),
                format!("{:.1}", score.percentile_rank),
                self.tier(score.tier),
            ]);
        }
        Ok(render(builder))
    }

    /// Format a trend summary.
    pub fn format_trend(&self, analysis: &TrendAnalysis) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(analysis);
        }

        let mut lines = vec![
            format!("Entity: {}", analysis.entity_id),
            format!("Direction: {}", analysis.direction.as_str()),
            format!("Change: {:+.2}%", analysis.change_percentage),
            format!("Volatility: {:.2}", analysis.volatility),
            format!("Strength: {:.2}", analysis.trend_strength),
            format!("Points: {}", analysis.points),
        ];
        lines.extend(analysis.insights.iter().map(|i| self.info(i)));
        lines.extend(analysis.recommendations.iter().map(|r| format!("→ {}", r)));
        if let Some(forecast) = &analysis.forecast {
            lines.push(String::new());
            lines.push(self.format_forecast(forecast)?);
        }
        Ok(lines.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn risk_level(&self, level: RiskLevel) -> String {
        let color = match level {
            RiskLevel::Low => "green",
            RiskLevel::Medium => "yellow",
            RiskLevel::High => "red",
            RiskLevel::Critical => "magenta",
        };
        self.colorize(level.as_str(), color)
    }

    fn tier(&self, tier: Tier) -> String {
        let color = match tier {
            Tier::Top => "green",
            Tier::Good => "cyan",
            Tier::Average => "yellow",
            Tier::Poor => "red",
        };
        self.colorize(tier.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().bold().to_string(),
            _ => text.to_string(),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn format_bound(bound: Option<f64>) -> String {
    bound.map_or_else(|| "-".to_string(), |b| format!("{:.2}", b))
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
