//! Error types for frustration triage.
//!
//! Per-message scoring failures never surface through these types: the
//! scorers convert them to the neutral probability via `FallbackPolicy`.
//! What remains here are startup errors (config, model artifacts), the raw
//! oracle/mail failures that the fallback layers consume, and the batch-level
//! errors the orchestrator hands back to its caller.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid ensemble weights {custom} / {oracle}: {reason}")]
    InvalidWeights {
        custom: f64,
        oracle: f64,
        reason: String,
    },
}

/// Model artifact errors (vectorizer / classifier).
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read artifact {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode artifact {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact: {0}")]
    Invalid(String),

    #[error("Dimension mismatch: vectorizer produces {features} features, classifier expects {expected}")]
    DimensionMismatch { features: usize, expected: usize },

    #[error("Classifier produced a non-finite probability")]
    NonFinite,
}

/// Failures while invoking or reading the generative-model oracle.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Oracle script not found at {0}")]
    MissingScript(String),

    #[error("Failed to spawn {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Oracle exited with status {code}: {output}")]
    NonZeroExit { code: i32, output: String },

    #[error("Oracle timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid oracle response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Mail source errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail source unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Batch-level failures. The only errors the orchestrator propagates.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Batch of {size} messages exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Duplicate message id in batch: {0}")]
    DuplicateMessage(String),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] MailError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
