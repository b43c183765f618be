//! Text normalization shared by training and inference.
//!
//! The statistical model was fitted on text passed through exactly this
//! transform, so any change here is a change to the model's input space.

pub mod lemmatize;
pub mod normalize;
pub mod stopwords;

pub use lemmatize::{LemmaTable, lemmatize};
pub use normalize::{normalize, normalize_with};
pub use stopwords::is_stop_word;
