//! Shared state for the triage routes, and its construction from config.

use std::sync::Arc;

use tracing::info;

use crate::config::TriageConfig;
use crate::error::Error;
use crate::mail::{MailSource, MaildirSource};
use crate::oracle::{OracleScorer, OracleSummarizer, SubprocessOracle, Summarizer};
use crate::pipeline::{BatchConfig, BatchOrchestrator, EnsembleClassifier};
use crate::scoring::{FrustrationScorer, ModelArtifacts, StatisticalScorer};

/// Everything a request handler needs.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<BatchOrchestrator>,
    /// Statistical scorer used on its own by `/predict`.
    pub statistical: Arc<dyn FrustrationScorer>,
    pub mail: Option<Arc<dyn MailSource>>,
    /// Messages fetched per `/frustration/emails` call.
    pub max_results: usize,
}

impl AppState {
    /// Load the model artifacts and wire the oracle subprocesses.
    pub fn from_config(config: &TriageConfig) -> Result<Self, Error> {
        let artifacts = Arc::new(ModelArtifacts::load(&config.model_dir)?);
        let statistical: Arc<dyn FrustrationScorer> =
            Arc::new(StatisticalScorer::new(artifacts));

        let scoring_backend = SubprocessOracle::new(config.oracle_program.clone())
            .with_script(config.oracle_script.clone())
            .with_timeout(config.oracle_timeout)
            .with_retries(config.oracle_retries, config.oracle_retry_delay);
        let summary_backend = SubprocessOracle::new(config.oracle_program.clone())
            .with_script(config.summary_script.clone())
            .with_timeout(config.summary_timeout);

        let oracle = Arc::new(OracleScorer::new(Arc::new(scoring_backend)));
        let summarizer: Arc<dyn Summarizer> =
            Arc::new(OracleSummarizer::new(Arc::new(summary_backend)));

        let mail = config.maildir.as_ref().map(|dir| {
            info!(dir = %dir.display(), "Using maildir as unread inbox");
            Arc::new(MaildirSource::new(dir.clone())) as Arc<dyn MailSource>
        });

        let orchestrator = BatchOrchestrator::new(
            EnsembleClassifier::new(statistical.clone(), oracle),
            summarizer,
            BatchConfig {
                weights: config.weights,
                max_batch: config.max_batch,
                summary_budget: config.summary_budget,
            },
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            statistical,
            mail,
            max_results: config.max_results,
        })
    }
}
