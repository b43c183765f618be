//! Directory of `.eml` files acting as an unread inbox.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mail_parser::MessageParser;
use tracing::{debug, warn};

use crate::error::MailError;
use crate::mail::MailSource;
use crate::pipeline::types::RawMessage;

/// Reads RFC 5322 messages from `*.eml` files, ordered by file name.
#[derive(Debug, Clone)]
pub struct MaildirSource {
    dir: PathBuf,
}

impl MaildirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn list_messages(&self) -> Result<Vec<PathBuf>, MailError> {
        if !self.dir.is_dir() {
            return Err(MailError::Unavailable(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "eml"))
            .collect();
        paths.sort();
        Ok(paths)
    }
}

#[async_trait]
impl MailSource for MaildirSource {
    fn name(&self) -> &str {
        "maildir"
    }

    async fn fetch_unread(&self, max_results: usize) -> Result<Vec<RawMessage>, MailError> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut messages = Vec::new();
            for path in source.list_messages()? {
                if messages.len() >= max_results {
                    break;
                }
                let raw = std::fs::read(&path)?;
                match parse_message(&path, &raw) {
                    Some(message) => messages.push(message),
                    None => warn!(path = %path.display(), "Skipping unparsable message"),
                }
            }
            debug!(
                dir = %source.dir.display(),
                count = messages.len(),
                "Fetched messages from maildir"
            );
            Ok::<_, MailError>(messages)
        })
        .await
        .map_err(|e| MailError::Unavailable(format!("maildir reader panicked: {e}")))?
    }
}

/// Convert raw RFC 5322 bytes into a [`RawMessage`].
pub fn parse_message(path: &Path, raw: &[u8]) -> Option<RawMessage> {
    let parsed = MessageParser::default().parse(raw)?;

    let id = parsed
        .message_id()
        .map(|s| s.to_string())
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let from = parsed
        .from()
        .and_then(|addr| addr.first())
        .map(|a| match (a.name(), a.address()) {
            (Some(name), Some(address)) => format!("{name} <{address}>"),
            (None, Some(address)) => address.to_string(),
            (Some(name), None) => name.to_string(),
            (None, None) => String::new(),
        })
        .unwrap_or_default();

    let subject = parsed.subject().unwrap_or_default().to_string();
    let date = parsed.date().map(|d| d.to_rfc3339()).unwrap_or_default();
    let body = parsed
        .body_text(0)
        .map(|text| text.into_owned())
        .unwrap_or_default();

    Some(RawMessage {
        id,
        from,
        subject,
        date,
        body,
    })
}
