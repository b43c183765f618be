//! Statistical scorer: normalize → TF-IDF → logistic regression.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ModelError;
use crate::scoring::{FallbackPolicy, FrustrationScorer, ModelArtifacts};
use crate::text::normalize_with;

/// Scores text with the locally trained classifier.
pub struct StatisticalScorer {
    artifacts: Arc<ModelArtifacts>,
    policy: FallbackPolicy,
}

impl StatisticalScorer {
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self {
            artifacts,
            policy: FallbackPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Raw classifier probability, without the fallback applied.
    pub fn probability(&self, raw_text: &str) -> Result<f64, ModelError> {
        let cleaned = normalize_with(raw_text, &self.artifacts.lemmas);
        let features = self.artifacts.vectorizer.transform(&cleaned);
        let probability = self.artifacts.classifier.predict_proba(&features)?;
        debug!(
            tokens = cleaned.split_whitespace().count(),
            probability, "Statistical model prediction"
        );
        Ok(probability)
    }

    /// Probability with failures folded into the neutral prior.
    pub fn score_text(&self, raw_text: &str) -> f64 {
        self.policy.recover(self.name(), self.probability(raw_text))
    }
}

#[async_trait]
impl FrustrationScorer for StatisticalScorer {
    fn name(&self) -> &str {
        "custom"
    }

    async fn score(&self, text: &str) -> f64 {
        self.score_text(text)
    }
}
