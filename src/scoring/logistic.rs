//! Binary logistic regression over TF-IDF features.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Fitted binary logistic regression. Positive class = frustrated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticClassifier {
    /// Number of input features the classifier expects.
    pub fn dimension(&self) -> usize {
        self.coef.len()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.coef.is_empty() {
            return Err(ModelError::Invalid("classifier has no coefficients".into()));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid(
                "classifier contains non-finite parameters".into(),
            ));
        }
        Ok(())
    }

    /// Probability of the positive class for one feature vector.
    pub fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coef.len() {
            return Err(ModelError::DimensionMismatch {
                features: features.len(),
                expected: self.coef.len(),
            });
        }

        let z = self
            .coef
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        let p = sigmoid(z);
        if p.is_finite() {
            Ok(p)
        } else {
            Err(ModelError::NonFinite)
        }
    }
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
