//! Subprocess bridge to an external generative-model script.
//!
//! Runs `<program> [script] <json-encoded prompt>` with a hard timeout and
//! returns stdout followed by stderr as one blob. The JSON encoding keeps
//! the prompt a single argument whatever quotes or newlines it contains.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::OracleError;
use crate::oracle::OracleBackend;

/// Default timeout for scoring calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default delay between retry attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Oracle backed by a child process.
#[derive(Debug, Clone)]
pub struct SubprocessOracle {
    program: String,
    script: Option<PathBuf>,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
}

impl SubprocessOracle {
    /// Run `program` directly with the prompt as its only argument.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            script: None,
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Pass `script` as the first argument (e.g. `node predict.js`).
    /// The script must exist at invocation time.
    pub fn with_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retry failed calls up to `retries` extra times, waiting `delay`
    /// between attempts.
    pub fn with_retries(mut self, retries: u32, delay: Duration) -> Self {
        self.retries = retries;
        self.retry_delay = delay;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run_once(&self, encoded: &str) -> Result<String, OracleError> {
        let mut command = Command::new(&self.program);
        if let Some(script) = &self.script {
            command.arg(script);
        }
        command
            .arg(encoded)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| OracleError::SpawnFailed {
            program: self.program.clone(),
            reason: e.to_string(),
        })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| OracleError::Timeout(self.timeout))??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
            (_, true) => stdout.into_owned(),
            (true, false) => stderr.into_owned(),
            (false, false) => format!("{stdout}\n{stderr}"),
        };

        if output.status.success() {
            Ok(combined)
        } else {
            Err(OracleError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                output: combined,
            })
        }
    }
}

#[async_trait]
impl OracleBackend for SubprocessOracle {
    /// The script's file name when one is set, so scoring and summary
    /// backends sharing an interpreter stay distinguishable in logs.
    fn name(&self) -> &str {
        self.script
            .as_deref()
            .and_then(|script| script.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or(&self.program)
    }

    async fn invoke(&self, prompt: &str) -> Result<String, OracleError> {
        if let Some(script) = &self.script
            && !tokio::fs::try_exists(script).await.unwrap_or(false)
        {
            return Err(OracleError::MissingScript(script.display().to_string()));
        }

        let encoded = serde_json::to_string(prompt)?;

        let mut attempt = 0;
        loop {
            match self.run_once(&encoded).await {
                Ok(output) => {
                    debug!(
                        backend = self.name(),
                        attempt,
                        bytes = output.len(),
                        "Oracle call succeeded"
                    );
                    return Ok(output);
                }
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        backend = self.name(),
                        attempt,
                        error = %e,
                        "Oracle call failed, retrying in {:?}",
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
