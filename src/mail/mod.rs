//! Mail collaborator interface.
//!
//! The pipeline never talks to a mail provider itself; it asks a
//! [`MailSource`] for at most `max_results` unread messages.

pub mod maildir;

pub use maildir::MaildirSource;

use async_trait::async_trait;

use crate::error::MailError;
use crate::pipeline::types::RawMessage;

/// Supplier of unread messages.
#[async_trait]
pub trait MailSource: Send + Sync {
    /// Source name for logs.
    fn name(&self) -> &str;

    /// Fetch up to `max_results` unread messages, oldest first.
    async fn fetch_unread(&self, max_results: usize) -> Result<Vec<RawMessage>, MailError>;
}
