//! Loading the fitted vectorizer and classifier from disk.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::ModelError;
use crate::scoring::{LogisticClassifier, TfIdfVectorizer};
use crate::text::LemmaTable;

/// File name of the serialized vectorizer inside the model directory.
pub const VECTORIZER_FILE: &str = "tfidf.json";

/// File name of the serialized classifier inside the model directory.
pub const CLASSIFIER_FILE: &str = "model.json";

/// Optional surface → lemma table recorded at training time.
pub const LEMMA_FILE: &str = "lemmas.json";

/// The pair of fitted artifacts. Loaded once, shared read-only.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub vectorizer: TfIdfVectorizer,
    pub classifier: LogisticClassifier,
    /// Empty unless the model directory ships `lemmas.json`.
    pub lemmas: LemmaTable,
}

impl ModelArtifacts {
    /// Pair a vectorizer with a classifier, checking that they agree.
    pub fn new(
        vectorizer: TfIdfVectorizer,
        classifier: LogisticClassifier,
    ) -> Result<Self, ModelError> {
        vectorizer.validate()?;
        classifier.validate()?;
        if vectorizer.dimension() != classifier.dimension() {
            return Err(ModelError::DimensionMismatch {
                features: vectorizer.dimension(),
                expected: classifier.dimension(),
            });
        }
        Ok(Self {
            vectorizer,
            classifier,
            lemmas: LemmaTable::default(),
        })
    }

    pub fn with_lemmas(mut self, lemmas: LemmaTable) -> Self {
        self.lemmas = lemmas;
        self
    }

    /// Load `tfidf.json` and `model.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let vectorizer: TfIdfVectorizer = read_json(&dir.join(VECTORIZER_FILE))?;
        let classifier: LogisticClassifier = read_json(&dir.join(CLASSIFIER_FILE))?;
        let lemma_path = dir.join(LEMMA_FILE);
        let lemmas = if lemma_path.is_file() {
            read_json(&lemma_path)?
        } else {
            LemmaTable::default()
        };
        let artifacts = Self::new(vectorizer, classifier)?.with_lemmas(lemmas);

        info!(
            dir = %dir.display(),
            features = artifacts.vectorizer.dimension(),
            ngram_range = ?artifacts.vectorizer.ngram_range,
            lemmas = artifacts.lemmas.len(),
            "Loaded frustration model"
        );
        Ok(artifacts)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelError::Decode {
        path: path.display().to_string(),
        source,
    })
}
