//! Fixed-weight linear ensemble of the statistical and oracle scorers.

use std::sync::Arc;

use tracing::info;

use crate::error::ConfigError;
use crate::pipeline::types::ScoreResult;
use crate::scoring::FrustrationScorer;

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Ensemble weights. Both non-negative and summing to one.
///
/// Observed tunings are 0.6/0.4 and 0.4/0.6; neither is privileged, so the
/// pair is configuration rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleWeights {
    custom: f64,
    oracle: f64,
}

impl EnsembleWeights {
    pub fn new(custom: f64, oracle: f64) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidWeights {
            custom,
            oracle,
            reason: reason.to_string(),
        };

        if !custom.is_finite() || !oracle.is_finite() {
            return Err(invalid("weights must be finite"));
        }
        if custom < 0.0 || oracle < 0.0 {
            return Err(invalid("weights must be non-negative"));
        }
        if ((custom + oracle) - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(invalid("weights must sum to 1"));
        }
        Ok(Self { custom, oracle })
    }

    /// Weights with the oracle taking the remainder.
    pub fn from_custom(custom: f64) -> Result<Self, ConfigError> {
        Self::new(custom, 1.0 - custom)
    }

    pub fn custom(&self) -> f64 {
        self.custom
    }

    pub fn oracle(&self) -> f64 {
        self.oracle
    }

    /// `custom_weight * custom_score + oracle_weight * oracle_score`.
    pub fn combine(&self, custom_score: f64, oracle_score: f64) -> f64 {
        (self.custom * custom_score + self.oracle * oracle_score).clamp(0.0, 1.0)
    }
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            custom: 0.6,
            oracle: 0.4,
        }
    }
}

/// Combines two scorers into a binary verdict.
pub struct EnsembleClassifier {
    custom: Arc<dyn FrustrationScorer>,
    oracle: Arc<dyn FrustrationScorer>,
}

impl EnsembleClassifier {
    pub fn new(custom: Arc<dyn FrustrationScorer>, oracle: Arc<dyn FrustrationScorer>) -> Self {
        Self { custom, oracle }
    }

    /// Score `raw_text` once with each scorer and combine.
    pub async fn classify(&self, raw_text: &str, weights: EnsembleWeights) -> ScoreResult {
        let custom = self.custom.score(raw_text).await;
        let oracle = self.oracle.score(raw_text).await;
        let combined = weights.combine(custom, oracle);
        let result = ScoreResult::new(custom, oracle, combined);

        info!(
            custom,
            oracle,
            combined,
            is_frustrated = result.is_frustrated,
            "Ensemble classification"
        );
        result
    }
}
