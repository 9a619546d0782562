//! Configuration for origami
//!
//! Configuration is stored in `<store>/config.toml`. Precedence, lowest
//! first: built-in defaults, the file, `ORIGAMI_*` environment variables,
//! then explicit command-line overrides.

pub mod types;

use std::fs;
use std::path::Path;

use crate::error::{OrigamiError, Result};
use crate::tokens::TokenEstimator;
use crate::transcript::{ExtractLimits, SectionerConfig};

pub use types::{
    BudgetConfig, OracleKind, OrigamiConfig, RelevanceConfig, SectioningConfig, SummaryConfig,
    TokensConfig, DEFAULT_ORACLE_ENDPOINT, DEFAULT_ORACLE_MODEL,
};

impl OrigamiConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: OrigamiConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply `ORIGAMI_*` overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Empty or unparseable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key).filter(|v| !v.trim().is_empty())?;
            match raw.trim().parse::<T>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "ignoring unparseable override");
                    None
                }
            }
        }

        if let Some(v) = parsed(&lookup, "ORIGAMI_CONTEXT_WINDOW") {
            self.budget.context_window = v;
        }
        if let Some(v) = parsed(&lookup, "ORIGAMI_BUDGET_FRACTION") {
            self.budget.budget_fraction = v;
        }
        if let Some(v) = parsed(&lookup, "ORIGAMI_MAX_UNFOLDED") {
            self.budget.max_unfolded = v;
        }
        if let Some(v) = parsed(&lookup, "ORIGAMI_CHARS_PER_TOKEN") {
            self.tokens.chars_per_token = v;
        }
        if let Some(v) = parsed(&lookup, "ORIGAMI_ORACLE") {
            self.relevance.oracle = v;
        }
        if let Some(v) = parsed(&lookup, "ORIGAMI_DEFAULT_SCORE") {
            self.relevance.default_score = v;
        }
        if let Some(v) = parsed(&lookup, "ORIGAMI_UNFOLD_THRESHOLD") {
            self.relevance.unfold_threshold = v;
        }
    }

    /// Reject values that would make budget or scoring arithmetic meaningless
    pub fn validate(&self) -> Result<()> {
        let fraction = self.budget.budget_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            crate::bail_invalid!("budget_fraction (expected a value in (0, 1])", fraction);
        }
        if self.budget.context_window == 0 {
            crate::bail_invalid!("context_window (expected a positive token count)", 0);
        }
        if self.sectioning.min_section_turns == 0 {
            crate::bail_invalid!("min_section_turns (expected at least 1)", 0);
        }
        if self.sectioning.min_assistant_turns == 0 {
            crate::bail_invalid!("min_assistant_turns (expected at least 1)", 0);
        }
        let divisor = self.tokens.chars_per_token;
        if !(divisor.is_finite() && divisor > 0.0) {
            crate::bail_invalid!("chars_per_token (expected a positive number)", divisor);
        }
        for (name, value) in [
            ("default_score", self.relevance.default_score),
            ("unfold_threshold", self.relevance.unfold_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(OrigamiError::invalid_value(
                    &format!("{} (expected a value in [0, 1])", name),
                    value,
                ));
            }
        }
        Ok(())
    }

    /// Total restore budget `B` in tokens
    pub fn budget_tokens(&self) -> usize {
        (self.budget.context_window as f64 * self.budget.budget_fraction).floor() as usize
    }

    /// Sectioner thresholds derived from `[sectioning]`
    pub fn sectioner_config(&self) -> SectionerConfig {
        SectionerConfig {
            min_section_turns: self.sectioning.min_section_turns,
            min_assistant_turns: self.sectioning.min_assistant_turns,
            limits: ExtractLimits {
                tool_input_chars: self.sectioning.tool_input_chars,
                tool_result_chars: self.sectioning.tool_result_chars,
            },
        }
    }

    /// Estimator for newly created fold logs
    pub fn estimator(&self) -> TokenEstimator {
        TokenEstimator::new(self.tokens.chars_per_token)
    }
}
