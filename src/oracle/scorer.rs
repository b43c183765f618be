//! Oracle-backed frustration scorer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::OracleError;
use crate::oracle::OracleBackend;
use crate::oracle::extract::{extract_json_object, read_confidence, strip_code_fences};
use crate::scoring::{FallbackPolicy, FrustrationScorer};

/// Scores text by asking the oracle for a `{"confidence": p}` reply.
pub struct OracleScorer {
    backend: Arc<dyn OracleBackend>,
    policy: FallbackPolicy,
}

impl OracleScorer {
    pub fn new(backend: Arc<dyn OracleBackend>) -> Self {
        Self {
            backend,
            policy: FallbackPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Invoke the oracle and parse its reply, without the fallback applied.
    pub async fn confidence(&self, text: &str) -> Result<f64, OracleError> {
        let raw = self.backend.invoke(text).await?;
        parse_confidence(&raw)
    }
}

/// Parse a raw oracle reply into a confidence value.
pub fn parse_confidence(raw: &str) -> Result<f64, OracleError> {
    debug!(raw = %raw.trim(), "Raw oracle response");
    debug!(cleaned = %strip_code_fences(raw).trim(), "Cleaned oracle response");

    let object = extract_json_object(raw)
        .ok_or_else(|| OracleError::InvalidResponse("no JSON object in reply".into()))?;

    read_confidence(&object).ok_or_else(|| {
        OracleError::InvalidResponse(format!(
            "missing or non-numeric confidence in {}",
            serde_json::Value::Object(object.clone())
        ))
    })
}

#[async_trait]
impl FrustrationScorer for OracleScorer {
    fn name(&self) -> &str {
        "oracle"
    }

    async fn score(&self, text: &str) -> f64 {
        let result = self.confidence(text).await;
        let score = self.policy.recover(self.name(), result);
        debug!(backend = self.backend.name(), score, "Oracle prediction");
        score
    }
}
