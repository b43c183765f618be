//! Narrative summary of why a set of emails is frustrated.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

use crate::oracle::OracleBackend;
use crate::oracle::extract::extract_json_object;

/// Summary returned when no message in a batch was flagged.
pub const NO_FRUSTRATION_SUMMARY: &str = "No frustrated emails found.";

/// Summary returned when the oracle answered without a summary field.
pub const EMPTY_SUMMARY: &str = "No summary generated";

/// Produces a free-text summary. Never fails: problems come back as a
/// readable `Summary error: ...` string.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> String;
}

/// Summarizer that delegates to an oracle expecting `{"summary": ...}` or
/// `{"error": ...}` in reply.
pub struct OracleSummarizer {
    backend: Arc<dyn OracleBackend>,
}

impl OracleSummarizer {
    pub fn new(backend: Arc<dyn OracleBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Summarizer for OracleSummarizer {
    async fn summarize(&self, text: &str) -> String {
        info!(chars = text.chars().count(), "Requesting frustration summary");
        match self.backend.invoke(text).await {
            Ok(raw) => read_summary(&raw),
            Err(e) => {
                error!(backend = self.backend.name(), error = %e, "Summary generation failed");
                format!("Summary error: {e}")
            }
        }
    }
}

/// Interpret a summariser reply.
pub fn read_summary(raw: &str) -> String {
    let Some(object) = extract_json_object(raw) else {
        error!(raw = %raw.trim(), "Invalid summary response");
        return "Summary error: Invalid API response".to_string();
    };

    if let Some(reason) = object.get("error") {
        let reason = match reason {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        error!(reason = %reason, "Summariser reported an error");
        return format!("Summary error: {reason}");
    }

    match object.get("summary") {
        Some(Value::String(summary)) => summary.clone(),
        _ => EMPTY_SUMMARY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;
    use crate::oracle::scorer::tests::CannedBackend;

    #[test]
    fn summary_field_is_returned() {
        assert_eq!(
            read_summary(r#"{"summary": "Late refunds and **unresponsive support**."}"#),
            "Late refunds and **unresponsive support**."
        );
    }

    #[test]
    fn multi_line_summary_survives() {
        let raw = "{\"summary\": \"Shipping delays.\\nBilling errors.\"}\n";
        assert_eq!(read_summary(raw), "Shipping delays.\nBilling errors.");
    }

    #[test]
    fn error_field_becomes_summary_error() {
        assert_eq!(
            read_summary(r#"{"error": "API key not valid"}"#),
            "Summary error: API key not valid"
        );
    }

    #[test]
    fn object_without_fields() {
        assert_eq!(read_summary(r#"{"text": "x"}"#), EMPTY_SUMMARY);
        assert_eq!(read_summary(r#"{"summary": 3}"#), EMPTY_SUMMARY);
    }

    #[test]
    fn garbage_is_invalid_response() {
        assert_eq!(
            read_summary("Traceback (most recent call last)"),
            "Summary error: Invalid API response"
        );
    }

    #[tokio::test]
    async fn backend_failure_is_rendered() {
        let summarizer = OracleSummarizer::new(Arc::new(CannedBackend::failing(|| {
            OracleError::MissingScript("gemini_email_summarize.js".into())
        })));
        assert_eq!(
            summarizer.summarize("text").await,
            "Summary error: Oracle script not found at gemini_email_summarize.js"
        );
    }

    #[tokio::test]
    async fn backend_reply_is_parsed() {
        let summarizer = OracleSummarizer::new(Arc::new(CannedBackend::reply(
            "{\"summary\": \"Password reset issues caused frustration.\"}",
        )));
        assert_eq!(
            summarizer.summarize("text").await,
            "Password reset issues caused frustration."
        );
    }
}
