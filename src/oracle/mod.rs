//! Generative-model oracle.
//!
//! The oracle is anything that turns a prompt into free text. Scoring and
//! summarisation only see [`OracleBackend`]; the subprocess bridge is one
//! implementation of it.
//!
//! Reply handling is split from invocation so the permissive JSON
//! extraction in [`extract`] can be exercised without a process.

pub mod extract;
pub mod scorer;
pub mod subprocess;
pub mod summarizer;

pub use scorer::OracleScorer;
pub use subprocess::SubprocessOracle;
pub use summarizer::{NO_FRUSTRATION_SUMMARY, OracleSummarizer, Summarizer};

use async_trait::async_trait;

use crate::error::OracleError;

/// Something that answers a prompt with raw text.
#[async_trait]
pub trait OracleBackend: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Send `prompt` and return the complete, unparsed reply.
    async fn invoke(&self, prompt: &str) -> Result<String, OracleError>;
}
