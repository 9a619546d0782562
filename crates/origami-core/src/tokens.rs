//! Character-length token estimation
//!
//! Exact tokenization is not needed; the estimate only has to be the same
//! function everywhere a fold's token counts are computed, so budget
//! arithmetic is stable across process restarts.

use serde::{Deserialize, Serialize};

/// Default characters per token: ~4 for English prose, ~3.5 for code.
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 3.75;

/// Token estimator based on character count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenEstimator {
    chars_per_token: f64,
}

impl TokenEstimator {
    /// Create an estimator with the given divisor.
    ///
    /// Non-finite or non-positive divisors fall back to the default.
    pub fn new(chars_per_token: f64) -> Self {
        if chars_per_token.is_finite() && chars_per_token > 0.0 {
            Self { chars_per_token }
        } else {
            Self::default()
        }
    }

    /// The divisor this estimator applies
    pub fn chars_per_token(&self) -> f64 {
        self.chars_per_token
    }

    /// Estimate token count from text length.
    ///
    /// Empty text costs zero; any non-empty text costs at least one token.
    pub fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let chars = text.chars().count() as f64;
        ((chars / self.chars_per_token) as usize).max(1)
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self {
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }
}
