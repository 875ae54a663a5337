//! Foresight Risk Scorer
//!
//! Combines normalized per-dimension risk signals into a composite score
//! with a discrete [`RiskLevel`](foresight_domain::RiskLevel).
//!
//! ## Rules
//!
//! - Every factor's normalized score lies in [0, 100]
//! - Weights are non-negative and sum to 1.0 within tolerance; they are never
//!   silently renormalized
//! - Levels are banded by configurable thresholds (25 / 50 / 75 by default)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod scorer;

pub use config::RiskConfig;
pub use error::RiskError;
pub use scorer::{RiskScore, RiskScorer};
