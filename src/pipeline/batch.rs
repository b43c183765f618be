//! Batch orchestrator: classify a handful of emails, then summarise why the
//! frustrated ones are frustrated.
//!
//! Messages are processed strictly one after another. Scorers never fail, so
//! a bad message cannot abort the batch; only structural problems with the
//! batch itself (or with fetching it) surface as `PipelineError`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::mail::MailSource;
use crate::oracle::{NO_FRUSTRATION_SUMMARY, Summarizer};
use crate::pipeline::ensemble::{EnsembleClassifier, EnsembleWeights};
use crate::pipeline::types::{BatchOutcome, ClassifiedEmail, RawMessage};

/// Maximum number of characters of frustrated text handed to the summariser.
pub const SUMMARY_CHAR_BUDGET: usize = 10_000;

/// Default upper bound on a submitted batch.
pub const DEFAULT_MAX_BATCH: usize = 50;

/// Orchestrator settings.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    pub weights: EnsembleWeights,
    /// Largest batch accepted by [`BatchOrchestrator::classify_batch`].
    pub max_batch: usize,
    /// Character budget for the summary input.
    pub summary_budget: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            weights: EnsembleWeights::default(),
            max_batch: DEFAULT_MAX_BATCH,
            summary_budget: SUMMARY_CHAR_BUDGET,
        }
    }
}

/// Runs the ensemble over a batch and produces the narrative summary.
pub struct BatchOrchestrator {
    classifier: EnsembleClassifier,
    summarizer: Arc<dyn Summarizer>,
    config: BatchConfig,
}

impl BatchOrchestrator {
    pub fn new(
        classifier: EnsembleClassifier,
        summarizer: Arc<dyn Summarizer>,
        config: BatchConfig,
    ) -> Self {
        Self {
            classifier,
            summarizer,
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Classify a caller-supplied batch in input order, then summarise the
    /// frustrated subset. Oversized batches and repeated ids are rejected.
    pub async fn classify_batch(
        &self,
        messages: Vec<RawMessage>,
    ) -> Result<BatchOutcome, PipelineError> {
        self.validate(&messages)?;
        Ok(self.run(messages).await)
    }

    async fn run(&self, messages: Vec<RawMessage>) -> BatchOutcome {
        let batch_id = Uuid::new_v4();
        let count = messages.len();
        info!(%batch_id, count, "Classifying email batch");

        let mut emails = Vec::with_capacity(count);
        for message in messages {
            let score = self
                .classifier
                .classify(&message.body, self.config.weights)
                .await;
            info!(
                %batch_id,
                id = %message.id,
                custom = score.custom,
                oracle = score.oracle,
                combined = score.combined,
                is_frustrated = score.is_frustrated,
                "Email classified"
            );
            emails.push(ClassifiedEmail { message, score });
        }

        let summary = self.summarize_frustration(&emails).await;

        let outcome = BatchOutcome {
            batch_id,
            processed_at: Utc::now(),
            emails,
            summary,
        };
        info!(
            %batch_id,
            total = count,
            frustrated = outcome.frustrated().count(),
            "Batch complete"
        );
        outcome
    }

    /// Fetch up to `max_results` unread messages and classify them.
    ///
    /// The fetch is capped at `max_batch`. A message whose id was already
    /// seen in this fetch is dropped; the first copy is kept. Only the fetch
    /// itself can fail.
    pub async fn fetch_and_classify(
        &self,
        source: &dyn MailSource,
        max_results: usize,
    ) -> Result<BatchOutcome, PipelineError> {
        let limit = max_results.min(self.config.max_batch);
        if limit < max_results {
            warn!(
                max_results,
                max_batch = self.config.max_batch,
                "Capping fetch at the batch limit"
            );
        }

        let fetched = source.fetch_unread(limit).await?;
        info!(
            source = source.name(),
            fetched = fetched.len(),
            max_results = limit,
            "Fetched unread messages"
        );

        let mut seen = HashSet::with_capacity(fetched.len());
        let messages: Vec<RawMessage> = fetched
            .into_iter()
            .filter(|message| {
                let fresh = seen.insert(message.id.clone());
                if !fresh {
                    warn!(id = %message.id, "Dropping duplicate fetched message");
                }
                fresh
            })
            .take(limit)
            .collect();

        Ok(self.run(messages).await)
    }

    /// Summarise the frustrated emails, or return the sentinel when none are.
    pub async fn summarize_frustration(&self, emails: &[ClassifiedEmail]) -> String {
        match frustration_digest(emails, self.config.summary_budget) {
            Some(digest) => self.summarizer.summarize(&digest).await,
            None => NO_FRUSTRATION_SUMMARY.to_string(),
        }
    }

    fn validate(&self, messages: &[RawMessage]) -> Result<(), PipelineError> {
        if messages.len() > self.config.max_batch {
            return Err(PipelineError::BatchTooLarge {
                size: messages.len(),
                max: self.config.max_batch,
            });
        }
        let mut seen = HashSet::with_capacity(messages.len());
        for message in messages {
            if !seen.insert(message.id.as_str()) {
                return Err(PipelineError::DuplicateMessage(message.id.clone()));
            }
        }
        Ok(())
    }
}

/// Newline-joined bodies of the frustrated emails, cut to `budget`
/// characters. `None` when nothing is frustrated.
pub fn frustration_digest(emails: &[ClassifiedEmail], budget: usize) -> Option<String> {
    let bodies: Vec<&str> = emails
        .iter()
        .filter(|e| e.is_frustrated())
        .map(|e| e.message.body.as_str())
        .collect();
    if bodies.is_empty() {
        return None;
    }

    let combined = bodies.join("\n");
    let length = combined.chars().count();
    if length > budget {
        warn!(length, budget, "Truncating frustrated text for summary");
        return Some(combined.chars().take(budget).collect());
    }
    Some(combined)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::MailError;
    use crate::pipeline::ensemble::tests::ScriptedScorer;

    /// Summarizer that records its input.
    #[derive(Default)]
    struct RecordingSummarizer {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Summarizer for RecordingSummarizer {
        async fn summarize(&self, text: &str) -> String {
            self.inputs.lock().unwrap().push(text.to_string());
            "Refund delays.".to_string()
        }
    }

    struct FailingSource;

    #[async_trait]
    impl MailSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_unread(&self, _max: usize) -> Result<Vec<RawMessage>, MailError> {
            Err(MailError::Unavailable("token expired".into()))
        }
    }

    struct FixedSource(Vec<RawMessage>);

    #[async_trait]
    impl MailSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_unread(&self, max: usize) -> Result<Vec<RawMessage>, MailError> {
            Ok(self.0.iter().take(max).cloned().collect())
        }
    }

    fn message(id: &str, body: &str) -> RawMessage {
        RawMessage {
            id: id.into(),
            from: format!("{id}@example.com"),
            subject: "subject".into(),
            date: "Mon, 3 Feb 2025 10:00:00 +0000".into(),
            body: body.into(),
        }
    }

    /// Bodies starting with "angry" score high on both scorers.
    fn orchestrator(
        bodies: &[&str],
        config: BatchConfig,
    ) -> (BatchOrchestrator, Arc<RecordingSummarizer>) {
        let mut custom = ScriptedScorer::fixed(0.1);
        let mut oracle = ScriptedScorer::fixed(0.2);
        for body in bodies.iter().filter(|b| b.starts_with("angry")) {
            custom = custom.with(body, 0.9);
            oracle = oracle.with(body, 0.8);
        }
        let summarizer = Arc::new(RecordingSummarizer::default());
        let orchestrator = BatchOrchestrator::new(
            EnsembleClassifier::new(Arc::new(custom), Arc::new(oracle)),
            summarizer.clone(),
            config,
        );
        (orchestrator, summarizer)
    }

    #[tokio::test]
    async fn empty_batch_returns_sentinel() {
        let (orch, summarizer) = orchestrator(&[], BatchConfig::default());
        let outcome = orch.classify_batch(vec![]).await.unwrap();
        assert!(outcome.emails.is_empty());
        assert_eq!(outcome.summary, "No frustrated emails found.");
        assert!(summarizer.inputs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn calm_batch_returns_sentinel_regardless_of_bodies() {
        let bodies = ["thanks a lot", "frustrated!!! but scored low", "see you soon"];
        let (orch, summarizer) = orchestrator(&bodies, BatchConfig::default());
        let batch = bodies
            .iter()
            .enumerate()
            .map(|(i, b)| message(&i.to_string(), b))
            .collect();

        let outcome = orch.classify_batch(batch).await.unwrap();
        assert_eq!(outcome.emails.len(), 3);
        assert!(outcome.emails.iter().all(|e| !e.is_frustrated()));
        assert_eq!(outcome.summary, NO_FRUSTRATION_SUMMARY);
        assert!(summarizer.inputs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn preserves_input_order_and_summarises_frustrated_only() {
        let bodies = ["angry: refund late", "thank you", "angry: still waiting"];
        let (orch, summarizer) = orchestrator(&bodies, BatchConfig::default());
        let batch = vec![
            message("a", bodies[0]),
            message("b", bodies[1]),
            message("c", bodies[2]),
        ];

        let outcome = orch.classify_batch(batch).await.unwrap();
        let ids: Vec<&str> = outcome.emails.iter().map(|e| e.message.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(
            outcome
                .emails
                .iter()
                .map(|e| e.is_frustrated())
                .collect::<Vec<_>>(),
            [true, false, true]
        );
        assert_eq!(outcome.emails[0].score.combined, 0.6 * 0.9 + 0.4 * 0.8);
        assert_eq!(outcome.summary, "Refund delays.");

        let inputs = summarizer.inputs.lock().unwrap();
        assert_eq!(inputs.as_slice(), ["angry: refund late\nangry: still waiting"]);
    }

    #[tokio::test]
    async fn summary_input_is_truncated_to_budget() {
        let long_a = format!("angry {}", "a".repeat(6_000));
        let long_b = format!("angry {}", "b".repeat(6_000));
        let (orch, summarizer) = orchestrator(
            &[long_a.as_str(), long_b.as_str()],
            BatchConfig::default(),
        );

        orch.classify_batch(vec![message("1", &long_a), message("2", &long_b)])
            .await
            .unwrap();

        let inputs = summarizer.inputs.lock().unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].chars().count(), 10_000);
        assert!(inputs[0].starts_with(&long_a));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let email = ClassifiedEmail {
            message: message("1", &"é".repeat(20)),
            score: crate::pipeline::types::ScoreResult::new(1.0, 1.0, 1.0),
        };
        let digest = frustration_digest(&[email], 5).unwrap();
        assert_eq!(digest, "ééééé");
    }

    #[tokio::test]
    async fn weights_come_from_config() {
        let config = BatchConfig {
            weights: EnsembleWeights::new(0.4, 0.6).unwrap(),
            ..BatchConfig::default()
        };
        let (orch, _) = orchestrator(&["angry"], config);
        let outcome = orch.classify_batch(vec![message("x", "angry")]).await.unwrap();
        assert_eq!(outcome.emails[0].score.combined, 0.4 * 0.9 + 0.6 * 0.8);
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected() {
        let config = BatchConfig {
            max_batch: 2,
            ..BatchConfig::default()
        };
        let (orch, _) = orchestrator(&[], config);
        let batch = (0..3).map(|i| message(&i.to_string(), "hi")).collect();
        assert!(matches!(
            orch.classify_batch(batch).await,
            Err(PipelineError::BatchTooLarge { size: 3, max: 2 })
        ));
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let (orch, _) = orchestrator(&[], BatchConfig::default());
        let batch = vec![message("dup", "a"), message("dup", "b")];
        assert!(matches!(
            orch.classify_batch(batch).await,
            Err(PipelineError::DuplicateMessage(id)) if id == "dup"
        ));
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let (orch, _) = orchestrator(&[], BatchConfig::default());
        assert!(matches!(
            orch.fetch_and_classify(&FailingSource, 2).await,
            Err(PipelineError::Fetch(_))
        ));
    }

    #[tokio::test]
    async fn fetch_honours_max_results() {
        let (orch, _) = orchestrator(&[], BatchConfig::default());
        let source = FixedSource((0..5).map(|i| message(&i.to_string(), "hello")).collect());
        let outcome = orch.fetch_and_classify(&source, 2).await.unwrap();
        assert_eq!(outcome.emails.len(), 2);
    }

    #[tokio::test]
    async fn fetched_duplicates_keep_first_copy() {
        let (orch, _) = orchestrator(&["angry: first copy"], BatchConfig::default());
        let source = FixedSource(vec![
            message("same", "angry: first copy"),
            message("same", "redelivered copy"),
            message("other", "hello"),
        ]);

        let outcome = orch.fetch_and_classify(&source, 3).await.unwrap();
        let ids: Vec<&str> = outcome.emails.iter().map(|e| e.message.id.as_str()).collect();
        assert_eq!(ids, ["same", "other"]);
        assert_eq!(outcome.emails[0].message.body, "angry: first copy");
        assert!(outcome.emails[0].is_frustrated());
    }

    #[tokio::test]
    async fn fetch_is_capped_at_batch_limit() {
        let config = BatchConfig {
            max_batch: 2,
            ..BatchConfig::default()
        };
        let (orch, _) = orchestrator(&[], config);
        let source = FixedSource((0..5).map(|i| message(&i.to_string(), "hello")).collect());

        let outcome = orch.fetch_and_classify(&source, 3).await.unwrap();
        assert_eq!(outcome.emails.len(), 2);
    }
}
