//! Frustration scorers.
//!
//! Every scorer returns a probability in [0, 1] and never fails: errors are
//! folded into the neutral prior by a [`FallbackPolicy`] so that one bad
//! message cannot stall a batch.

pub mod artifacts;
pub mod fallback;
pub mod logistic;
pub mod statistical;
pub mod tfidf;

pub use artifacts::ModelArtifacts;
pub use fallback::FallbackPolicy;
pub use logistic::LogisticClassifier;
pub use statistical::StatisticalScorer;
pub use tfidf::TfIdfVectorizer;

use async_trait::async_trait;

/// A source of frustration probabilities.
#[async_trait]
pub trait FrustrationScorer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Probability that `text` expresses frustration. Always within [0, 1].
    async fn score(&self, text: &str) -> f64;
}
