//! Offline scoring by stemmed term overlap

use std::collections::HashMap;

use super::{FoldDigest, OracleError, RelevanceOracle};
use crate::fold::FoldId;
use crate::text::stemmed_terms;

/// Scores a fold by the overlap coefficient of its summary terms and the
/// context terms: `|S ∩ C| / min(|S|, |C|)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalOracle;

impl LexicalOracle {
    pub fn new() -> Self {
        Self
    }
}

impl RelevanceOracle for LexicalOracle {
    fn name(&self) -> &str {
        "lexical"
    }

    fn score(
        &self,
        folds: &[FoldDigest],
        context: &str,
    ) -> Result<HashMap<FoldId, f64>, OracleError> {
        let context_terms = stemmed_terms(context);

        Ok(folds
            .iter()
            .map(|fold| {
                let summary_terms = stemmed_terms(&fold.summary);
                let smaller = summary_terms.len().min(context_terms.len());
                let score = if smaller == 0 {
                    0.0
                } else {
                    let shared = summary_terms.intersection(&context_terms).count();
                    shared as f64 / smaller as f64
                };
                (fold.id, score)
            })
            .collect())
    }
}
