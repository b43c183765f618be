//! Frustration classification pipeline.
//!
//! Every email in a batch flows through:
//! 1. `MailSource::fetch_unread()` or a caller-supplied batch
//! 2. `EnsembleClassifier::classify()` with the statistical and oracle scorers
//! 3. `BatchOrchestrator::summarize_frustration()` over the frustrated subset
//!
//! Scorers never fail; a broken scorer contributes the neutral 0.5.

pub mod batch;
pub mod ensemble;
pub mod types;

pub use batch::{BatchConfig, BatchOrchestrator};
pub use ensemble::{EnsembleClassifier, EnsembleWeights};
pub use types::{BatchOutcome, ClassifiedEmail, RawMessage, ScoreResult};
