//! Gradient-boosted tree ensemble
//!
//! Prediction is `base * (1 + learning_rate * sum(tree(x)))`, where `base`
//! is a weighted sum of named features. Trees are trained offline; this
//! module only evaluates them.

use super::ForecastModel;
use crate::error::ForecastError;
use foresight_domain::{FeatureVector, ModelKind};
use serde::{Deserialize, Serialize};

/// One term of the base estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseTerm {
    /// Feature name
    pub feature: String,
    /// Multiplier
    pub weight: f64,
}

/// A regression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go left when `feature <= threshold`, right otherwise
    Split {
        /// Feature name
        feature: String,
        /// Split threshold
        threshold: f64,
        /// Subtree for values at or below the threshold
        left: Box<TreeNode>,
        /// Subtree for values above the threshold
        right: Box<TreeNode>,
    },
    /// Terminal adjustment
    Leaf {
        /// Leaf output
        value: f64,
    },
}

impl TreeNode {
    /// Build a split node
    pub fn split(feature: impl Into<String>, threshold: f64, left: TreeNode, right: TreeNode) -> Self {
        TreeNode::Split {
            feature: feature.into(),
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build a leaf
    pub fn leaf(value: f64) -> Self {
        TreeNode::Leaf { value }
    }

    fn evaluate(&self, features: &FeatureVector) -> Result<f64, ForecastError> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = lookup(features, feature)?;
                    node = if x <= *threshold { left } else { right };
                }
            }
        }
    }

    fn check(&self) -> Result<(), String> {
        match self {
            TreeNode::Leaf { value } if !value.is_finite() => {
                Err("leaf value must be finite".to_string())
            }
            TreeNode::Leaf { .. } => Ok(()),
            TreeNode::Split {
                threshold,
                left,
                right,
                ..
            } => {
                if threshold.is_nan() {
                    return Err("split threshold must not be NaN".to_string());
                }
                left.check()?;
                right.check()
            }
        }
    }
}

/// Serialized parameters of the tree ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleParams {
    /// Terms of the base estimate
    pub base: Vec<BaseTerm>,
    /// Shrinkage applied to the summed tree outputs
    pub learning_rate: f64,
    /// Boosted trees
    pub trees: Vec<TreeNode>,
}

impl TreeEnsembleParams {
    /// Validate the parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.base.is_empty() {
            return Err("tree ensemble needs at least one base term".to_string());
        }
        if self.base.iter().any(|t| !t.weight.is_finite()) {
            return Err("base weights must be finite".to_string());
        }
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err("learning_rate must be finite and non-negative".to_string());
        }
        self.trees.iter().try_for_each(TreeNode::check)
    }
}

impl Default for TreeEnsembleParams {
    /// Weekly-lag baseline with holiday dip and December uplift
    fn default() -> Self {
        Self {
            base: vec![
                BaseTerm {
                    feature: "lag_7".to_string(),
                    weight: 0.6,
                },
                BaseTerm {
                    feature: "rolling_mean_7".to_string(),
                    weight: 0.4,
                },
            ],
            learning_rate: 0.1,
            trees: vec![
                TreeNode::split("is_holiday", 0.5, TreeNode::leaf(0.0), TreeNode::leaf(-1.5)),
                TreeNode::split("month", 11.5, TreeNode::leaf(0.0), TreeNode::leaf(1.0)),
            ],
        }
    }
}

/// Tree ensemble model
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    params: TreeEnsembleParams,
}

impl TreeEnsemble {
    /// Create a model from validated parameters
    pub fn new(params: TreeEnsembleParams) -> Result<Self, ForecastError> {
        params.validate().map_err(ForecastError::InvalidParameters)?;
        Ok(Self { params })
    }

    /// Get the parameters
    pub fn params(&self) -> &TreeEnsembleParams {
        &self.params
    }

    fn predict_one(&self, features: &FeatureVector) -> Result<f64, ForecastError> {
        let mut base = 0.0;
        for term in &self.params.base {
            base += term.weight * lookup(features, &term.feature)?;
        }
        let mut boost = 0.0;
        for tree in &self.params.trees {
            boost += tree.evaluate(features)?;
        }
        Ok(base * (1.0 + self.params.learning_rate * boost))
    }
}

impl ForecastModel for TreeEnsemble {
    fn kind(&self) -> ModelKind {
        ModelKind::TreeEnsemble
    }

    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, ForecastError> {
        features.iter().map(|f| self.predict_one(f)).collect()
    }
}

fn lookup(features: &FeatureVector, name: &str) -> Result<f64, ForecastError> {
    features.get(name).ok_or_else(|| ForecastError::ModelUnavailable {
        model: ModelKind::TreeEnsemble,
        reason: format!("feature '{}' is not in the feature vector", name),
    })
}
