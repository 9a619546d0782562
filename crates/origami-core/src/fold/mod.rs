//! Fold records: persisted sections held at two resolutions
//!
//! A fold keeps a compact summary that is always resident and points at a
//! full detail blob stored separately under the same id.

mod log;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OrigamiError;
use crate::transcript::TurnRange;

pub use log::{FoldLog, LOG_FORMAT_VERSION};

/// Sequential fold identifier, displayed as `F001`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoldId(u32);

impl FoldId {
    pub fn new(n: u32) -> Self {
        Self(n)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub(crate) fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// File name of this fold's detail blob
    pub fn detail_file_name(&self) -> String {
        format!("fold-{:03}.md", self.0)
    }
}

impl fmt::Display for FoldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{:03}", self.0)
    }
}

impl FromStr for FoldId {
    type Err = OrigamiError;

    /// Accepts `F001`, `f1`, `fold-001` and bare `1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        let digits = lower
            .strip_prefix("fold-")
            .or_else(|| lower.strip_prefix('f'))
            .unwrap_or(&lower);

        match digits.parse::<u32>() {
            Ok(n) if n > 0 && digits.chars().all(|c| c.is_ascii_digit()) => Ok(FoldId(n)),
            _ => Err(OrigamiError::invalid_value("fold id", trimmed)),
        }
    }
}

/// Whether a fold's detail is materialized in the rendered context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldStatus {
    #[default]
    Folded,
    Unfolded,
}

impl FoldStatus {
    /// Upper-case label used in rendered headers
    pub fn label(&self) -> &'static str {
        match self {
            FoldStatus::Folded => "FOLDED",
            FoldStatus::Unfolded => "UNFOLDED",
        }
    }
}

impl fmt::Display for FoldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldStatus::Folded => write!(f, "folded"),
            FoldStatus::Unfolded => write!(f, "unfolded"),
        }
    }
}

/// A persisted section record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fold {
    pub(crate) id: FoldId,
    pub(crate) status: FoldStatus,
    pub(crate) summary: String,
    pub(crate) summary_tokens: usize,
    pub(crate) detail_tokens: usize,
    /// Detail blob location relative to the store root
    pub(crate) detail_file: String,
    pub(crate) turn_range: TurnRange,
    pub(crate) timestamp: DateTime<Utc>,
    #[serde(default)]
    pub(crate) relevance_score: f64,
    #[serde(default)]
    pub(crate) files_touched: BTreeSet<String>,
    #[serde(default)]
    pub(crate) tags: BTreeSet<String>,
}

impl Fold {
    pub fn id(&self) -> FoldId {
        self.id
    }

    pub fn status(&self) -> FoldStatus {
        self.status
    }

    pub fn is_unfolded(&self) -> bool {
        self.status == FoldStatus::Unfolded
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn summary_tokens(&self) -> usize {
        self.summary_tokens
    }

    pub fn detail_tokens(&self) -> usize {
        self.detail_tokens
    }

    pub fn detail_file(&self) -> &str {
        &self.detail_file
    }

    pub fn turn_range(&self) -> TurnRange {
        self.turn_range
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn relevance_score(&self) -> f64 {
        self.relevance_score
    }

    pub fn files_touched(&self) -> &BTreeSet<String> {
        &self.files_touched
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}
