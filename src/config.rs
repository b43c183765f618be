//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::pipeline::EnsembleWeights;
use crate::pipeline::batch::{DEFAULT_MAX_BATCH, SUMMARY_CHAR_BUDGET};

/// Service configuration, read from `TRIAGE_*` environment variables.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Directory holding `tfidf.json` and `model.json`.
    pub model_dir: PathBuf,
    pub weights: EnsembleWeights,
    /// Interpreter used to run the oracle scripts.
    pub oracle_program: String,
    pub oracle_script: PathBuf,
    pub summary_script: PathBuf,
    pub oracle_timeout: Duration,
    pub summary_timeout: Duration,
    /// Extra attempts per oracle call after the first.
    pub oracle_retries: u32,
    pub oracle_retry_delay: Duration,
    /// Messages fetched per run.
    pub max_results: usize,
    pub max_batch: usize,
    /// Summary input budget, in characters.
    pub summary_budget: usize,
    /// Directory of `.eml` files used as the unread inbox, if any.
    pub maildir: Option<PathBuf>,
    pub port: u16,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("./model"),
            weights: EnsembleWeights::default(),
            oracle_program: "node".to_string(),
            oracle_script: PathBuf::from("./gemini_predict.js"),
            summary_script: PathBuf::from("./gemini_email_summarize.js"),
            oracle_timeout: Duration::from_secs(30),
            summary_timeout: Duration::from_secs(60),
            oracle_retries: 0,
            oracle_retry_delay: Duration::from_millis(1000),
            max_results: 2,
            max_batch: DEFAULT_MAX_BATCH,
            summary_budget: SUMMARY_CHAR_BUDGET,
            maildir: None,
            port: 5000,
        }
    }
}

impl TriageConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment. Unset variables take
    /// their defaults; set but unparsable ones are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let weight_custom: f64 = parse_or(&get, "TRIAGE_WEIGHT_CUSTOM", defaults.weights.custom())?;
        let weight_oracle: f64 = parse_or(&get, "TRIAGE_WEIGHT_ORACLE", 1.0 - weight_custom)?;
        let weights = EnsembleWeights::new(weight_custom, weight_oracle)?;

        let max_batch = positive(
            "TRIAGE_MAX_BATCH",
            parse_or(&get, "TRIAGE_MAX_BATCH", defaults.max_batch)?,
        )?;
        let oracle_timeout_secs = positive(
            "TRIAGE_ORACLE_TIMEOUT_SECS",
            parse_or(
                &get,
                "TRIAGE_ORACLE_TIMEOUT_SECS",
                defaults.oracle_timeout.as_secs(),
            )?,
        )?;
        let summary_timeout_secs = positive(
            "TRIAGE_SUMMARY_TIMEOUT_SECS",
            parse_or(
                &get,
                "TRIAGE_SUMMARY_TIMEOUT_SECS",
                defaults.summary_timeout.as_secs(),
            )?,
        )?;

        Ok(Self {
            model_dir: get("TRIAGE_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            weights,
            oracle_program: get("TRIAGE_ORACLE_PROGRAM").unwrap_or(defaults.oracle_program),
            oracle_script: get("TRIAGE_ORACLE_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.oracle_script),
            summary_script: get("TRIAGE_SUMMARY_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.summary_script),
            oracle_timeout: Duration::from_secs(oracle_timeout_secs),
            summary_timeout: Duration::from_secs(summary_timeout_secs),
            oracle_retries: parse_or(&get, "TRIAGE_ORACLE_RETRIES", defaults.oracle_retries)?,
            oracle_retry_delay: Duration::from_millis(parse_or(
                &get,
                "TRIAGE_ORACLE_RETRY_DELAY_MS",
                defaults.oracle_retry_delay.as_millis() as u64,
            )?),
            max_results: parse_or(&get, "TRIAGE_MAX_RESULTS", defaults.max_results)?,
            max_batch,
            summary_budget: parse_or(&get, "TRIAGE_SUMMARY_BUDGET", defaults.summary_budget)?,
            maildir: get("TRIAGE_MAILDIR").map(PathBuf::from),
            port: parse_or(&get, "TRIAGE_PORT", defaults.port)?,
        })
    }
}

fn positive<T: Default + PartialEq>(key: &str, value: T) -> Result<T, ConfigError> {
    if value == T::default() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be at least 1".into(),
        });
    }
    Ok(value)
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}
