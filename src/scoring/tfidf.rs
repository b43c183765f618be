//! TF-IDF vectorizer applied to already-normalized text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// A fitted TF-IDF vectorizer.
///
/// Tokens shorter than two characters are ignored, matching the tokenizer
/// the vocabulary was built with. N-grams are joined with a single space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Term → feature index.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index.
    pub idf: Vec<f64>,
    /// Inclusive n-gram range.
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    /// Use `1 + ln(tf)` instead of raw counts.
    #[serde(default)]
    pub sublinear_tf: bool,
}

impl TfIdfVectorizer {
    /// Number of features produced by [`transform`](Self::transform).
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ModelError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Invalid(format!(
                "ngram_range ({min_n}, {max_n}) is not a valid range"
            )));
        }
        if self.vocabulary.len() != self.idf.len() {
            return Err(ModelError::Invalid(format!(
                "vocabulary has {} terms but idf has {} entries",
                self.vocabulary.len(),
                self.idf.len()
            )));
        }
        if let Some((term, idx)) = self
            .vocabulary
            .iter()
            .find(|(_, idx)| **idx >= self.idf.len())
        {
            return Err(ModelError::Invalid(format!(
                "term '{term}' maps to index {idx} outside {} features",
                self.idf.len()
            )));
        }
        if self.idf.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Invalid("idf contains non-finite values".into()));
        }
        Ok(())
    }

    /// Transform normalized text into an L2-normalized dense feature vector.
    ///
    /// Text with no vocabulary overlap yields the zero vector.
    pub fn transform(&self, normalized: &str) -> Vec<f64> {
        let mut features: Vec<f64> = vec![0.0; self.dimension()];

        let tokens: Vec<&str> = normalized
            .split_whitespace()
            .filter(|t| t.chars().count() >= 2)
            .collect();

        let (min_n, max_n) = self.ngram_range;
        for n in min_n.max(1)..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&idx) = self.vocabulary.get(&term)
                    && idx < features.len()
                {
                    features[idx] += 1.0;
                }
            }
        }

        for (idx, value) in features.iter_mut().enumerate() {
            if *value > 0.0 {
                let tf = if self.sublinear_tf {
                    1.0 + value.ln()
                } else {
                    *value
                };
                *value = tf * self.idf[idx];
            }
        }

        let norm = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer() -> TfIdfVectorizer {
        TfIdfVectorizer {
            vocabulary: HashMap::from([
                ("refund".to_string(), 0),
                ("late".to_string(), 1),
                ("refund late".to_string(), 2),
            ]),
            idf: vec![1.0, 2.0, 3.0],
            ngram_range: (1, 2),
            sublinear_tf: false,
        }
    }

    #[test]
    fn counts_unigrams_and_bigrams() {
        let v = vectorizer();
        let x = v.transform("refund late");
        let norm = (1.0f64 + 4.0 + 9.0).sqrt();
        assert!((x[0] - 1.0 / norm).abs() < 1e-12);
        assert!((x[1] - 2.0 / norm).abs() < 1e-12);
        assert!((x[2] - 3.0 / norm).abs() < 1e-12);
    }

    #[test]
    fn output_is_unit_length() {
        let x = vectorizer().transform("refund refund late late late");
        let norm: f64 = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_overlap_is_zero_vector() {
        let x = vectorizer().transform("hello world");
        assert_eq!(x, vec![0.0, 0.0, 0.0]);
        assert_eq!(vectorizer().transform(""), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn single_character_tokens_are_ignored() {
        let mut v = vectorizer();
        v.vocabulary.insert("x".into(), 2);
        let x = v.transform("x");
        assert!(x.iter().all(|f| *f == 0.0));
    }

    #[test]
    fn sublinear_tf_dampens_repeats() {
        let mut v = vectorizer();
        v.ngram_range = (1, 1);
        let raw = v.transform("refund refund refund late");
        v.sublinear_tf = true;
        let damped = v.transform("refund refund refund late");
        assert!(damped[0] / damped[1] < raw[0] / raw[1]);
    }

    #[test]
    fn validate_catches_inconsistencies() {
        assert!(vectorizer().validate().is_ok());

        let mut bad = vectorizer();
        bad.idf.pop();
        assert!(bad.validate().is_err());

        let mut bad = vectorizer();
        bad.vocabulary.insert("late".into(), 9);
        assert!(bad.validate().is_err());

        let mut bad = vectorizer();
        bad.ngram_range = (2, 1);
        assert!(bad.validate().is_err());
    }
}
