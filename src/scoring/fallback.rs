//! Fail-open policy: any scoring failure becomes the neutral prior.

use std::fmt::Display;

use tracing::warn;

/// Converts a fallible probability into one that is always usable.
///
/// `Ok` values that are finite and within [0, 1] pass through untouched.
/// Errors and out-of-range or non-finite values become `neutral` and are
/// logged as degraded scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackPolicy {
    neutral: f64,
}

impl FallbackPolicy {
    /// The neutral prior used everywhere unless overridden.
    pub const NEUTRAL: f64 = 0.5;

    /// Create a policy with a custom neutral value (clamped into [0, 1]).
    pub fn new(neutral: f64) -> Self {
        let neutral = if neutral.is_finite() {
            neutral.clamp(0.0, 1.0)
        } else {
            Self::NEUTRAL
        };
        Self { neutral }
    }

    /// The value substituted on failure.
    pub fn neutral(&self) -> f64 {
        self.neutral
    }

    /// Resolve a scorer result into a probability.
    pub fn recover<E: Display>(&self, scorer: &str, result: Result<f64, E>) -> f64 {
        match result {
            Ok(p) if p.is_finite() && (0.0..=1.0).contains(&p) => p,
            Ok(p) => {
                warn!(scorer, value = p, "Score out of range, using neutral prior");
                self.neutral
            }
            Err(e) => {
                warn!(scorer, error = %e, "Scoring degraded, using neutral prior");
                self.neutral
            }
        }
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::new(Self::NEUTRAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_valid_probabilities_through() {
        let policy = FallbackPolicy::default();
        assert_eq!(policy.recover::<String>("t", Ok(0.0)), 0.0);
        assert_eq!(policy.recover::<String>("t", Ok(0.42)), 0.42);
        assert_eq!(policy.recover::<String>("t", Ok(1.0)), 1.0);
    }

    #[test]
    fn errors_become_neutral() {
        let policy = FallbackPolicy::default();
        assert_eq!(policy.recover("t", Err("boom")), 0.5);
    }

    #[test]
    fn invalid_values_become_neutral() {
        let policy = FallbackPolicy::default();
        assert_eq!(policy.recover::<String>("t", Ok(f64::NAN)), 0.5);
        assert_eq!(policy.recover::<String>("t", Ok(f64::INFINITY)), 0.5);
        assert_eq!(policy.recover::<String>("t", Ok(1.2)), 0.5);
        assert_eq!(policy.recover::<String>("t", Ok(-0.1)), 0.5);
    }

    #[test]
    fn custom_neutral_is_clamped() {
        assert_eq!(FallbackPolicy::new(0.3).neutral(), 0.3);
        assert_eq!(FallbackPolicy::new(7.0).neutral(), 1.0);
        assert_eq!(FallbackPolicy::new(f64::NAN).neutral(), 0.5);
        assert_eq!(FallbackPolicy::new(0.3).recover("t", Err("x")), 0.3);
    }
}
