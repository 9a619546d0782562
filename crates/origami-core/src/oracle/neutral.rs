use std::collections::HashMap;

use super::{FoldDigest, OracleError, RelevanceOracle};
use crate::fold::FoldId;

/// Gives every fold the same score
#[derive(Debug, Clone, Copy)]
pub struct NeutralOracle {
    score: f64,
}

impl NeutralOracle {
    pub fn new(score: f64) -> Self {
        Self { score }
    }
}

impl RelevanceOracle for NeutralOracle {
    fn name(&self) -> &str {
        "neutral"
    }

    fn score(
        &self,
        folds: &[FoldDigest],
        _context: &str,
    ) -> Result<HashMap<FoldId, f64>, OracleError> {
        Ok(folds.iter().map(|f| (f.id, self.score)).collect())
    }
}
