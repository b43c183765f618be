//! Shared types for the frustration pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decision boundary for the combined score. Strictly greater is frustrated.
pub const FRUSTRATION_THRESHOLD: f64 = 0.5;

// ── Raw message ─────────────────────────────────────────────────────

/// An email as delivered by the mail collaborator. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub date: String,
    /// Plain-text body, already decoded.
    #[serde(default)]
    pub body: String,
}

// ── Scores ──────────────────────────────────────────────────────────

/// Per-message ensemble output. All probabilities lie in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(rename = "score_custom")]
    pub custom: f64,
    #[serde(rename = "score_oracle")]
    pub oracle: f64,
    #[serde(rename = "combined_score")]
    pub combined: f64,
    pub is_frustrated: bool,
}

impl ScoreResult {
    /// Build a result from a combined score, applying the threshold.
    pub fn new(custom: f64, oracle: f64, combined: f64) -> Self {
        Self {
            custom,
            oracle,
            combined,
            is_frustrated: combined > FRUSTRATION_THRESHOLD,
        }
    }
}

// ── Classified email ────────────────────────────────────────────────

/// A message together with its scores. Serializes flat, the way the
/// transport layer returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEmail {
    #[serde(flatten)]
    pub message: RawMessage,
    #[serde(flatten)]
    pub score: ScoreResult,
}

impl ClassifiedEmail {
    pub fn is_frustrated(&self) -> bool {
        self.score.is_frustrated
    }
}

// ── Batch outcome ───────────────────────────────────────────────────

/// Result of one orchestration call.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// Correlation id for logs.
    pub batch_id: Uuid,
    pub processed_at: DateTime<Utc>,
    /// Classified messages, in input order.
    pub emails: Vec<ClassifiedEmail>,
    pub summary: String,
}

impl BatchOutcome {
    pub fn frustrated(&self) -> impl Iterator<Item = &ClassifiedEmail> {
        self.emails.iter().filter(|e| e.is_frustrated())
    }
}
