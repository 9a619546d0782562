//! Configuration type definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrigamiError;
use crate::tokens::DEFAULT_CHARS_PER_TOKEN;

/// Default Anthropic messages endpoint
pub const DEFAULT_ORACLE_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// Default model asked to score folds
pub const DEFAULT_ORACLE_MODEL: &str = "claude-haiku-4-5";

/// Origami configuration, stored in `<store>/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrigamiConfig {
    /// Restore budget and expansion cap
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Sectioner thresholds and extraction caps
    #[serde(default)]
    pub sectioning: SectioningConfig,

    /// Token estimation
    #[serde(default)]
    pub tokens: TokensConfig,

    /// Relevance scoring
    #[serde(default)]
    pub relevance: RelevanceConfig,

    /// Placeholder summaries written at ingest
    #[serde(default)]
    pub summary: SummaryConfig,
}

/// Budget constants for the restore pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Host context window in tokens
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Fraction of the context window the projection may use
    #[serde(default = "default_budget_fraction")]
    pub budget_fraction: f64,

    /// Maximum folds expanded at once
    #[serde(default = "default_max_unfolded")]
    pub max_unfolded: usize,
}

/// Sectioner thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectioningConfig {
    #[serde(default = "default_min_section_turns")]
    pub min_section_turns: usize,

    #[serde(default = "default_min_assistant_turns")]
    pub min_assistant_turns: usize,

    /// Character cap for rendered tool invocation arguments
    #[serde(default = "default_tool_chars")]
    pub tool_input_chars: usize,

    /// Character cap for each tool result piece
    #[serde(default = "default_tool_chars")]
    pub tool_result_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokensConfig {
    /// Divisor of the character-length token estimator
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: f64,
}

/// Which relevance oracle scores folds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    /// Remote model via the Anthropic messages API
    #[default]
    Anthropic,
    /// Offline stemmed term overlap
    Lexical,
    /// Default score for every fold
    Neutral,
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleKind::Anthropic => write!(f, "anthropic"),
            OracleKind::Lexical => write!(f, "lexical"),
            OracleKind::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for OracleKind {
    type Err = OrigamiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(OracleKind::Anthropic),
            "lexical" => Ok(OracleKind::Lexical),
            "neutral" | "none" => Ok(OracleKind::Neutral),
            other => Err(OrigamiError::invalid_value(
                "oracle (expected anthropic, lexical, or neutral)",
                other,
            )),
        }
    }
}

/// Relevance oracle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceConfig {
    #[serde(default)]
    pub oracle: OracleKind,

    /// Score substituted when the oracle is unavailable or omits a fold
    #[serde(default = "default_score")]
    pub default_score: f64,

    /// Freshly scored folds at or above this score start unfolded
    #[serde(default = "default_unfold_threshold")]
    pub unfold_threshold: f64,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Characters of section text kept in a placeholder summary
    #[serde(default = "default_placeholder_chars")]
    pub placeholder_chars: usize,
}

fn default_context_window() -> usize {
    200_000
}

fn default_budget_fraction() -> f64 {
    0.20
}

fn default_max_unfolded() -> usize {
    3
}

fn default_min_section_turns() -> usize {
    3
}

fn default_min_assistant_turns() -> usize {
    2
}

fn default_tool_chars() -> usize {
    500
}

fn default_chars_per_token() -> f64 {
    DEFAULT_CHARS_PER_TOKEN
}

fn default_score() -> f64 {
    0.3
}

fn default_unfold_threshold() -> f64 {
    0.7
}

fn default_model() -> String {
    DEFAULT_ORACLE_MODEL.to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ORACLE_ENDPOINT.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_placeholder_chars() -> usize {
    200
}

impl Default for BudgetConfig {
    fn default() -> Self {
        BudgetConfig {
            context_window: default_context_window(),
            budget_fraction: default_budget_fraction(),
            max_unfolded: default_max_unfolded(),
        }
    }
}

impl Default for SectioningConfig {
    fn default() -> Self {
        SectioningConfig {
            min_section_turns: default_min_section_turns(),
            min_assistant_turns: default_min_assistant_turns(),
            tool_input_chars: default_tool_chars(),
            tool_result_chars: default_tool_chars(),
        }
    }
}

impl Default for TokensConfig {
    fn default() -> Self {
        TokensConfig {
            chars_per_token: default_chars_per_token(),
        }
    }
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        RelevanceConfig {
            oracle: OracleKind::default(),
            default_score: default_score(),
            unfold_threshold: default_unfold_threshold(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        SummaryConfig {
            placeholder_chars: default_placeholder_chars(),
        }
    }
}
