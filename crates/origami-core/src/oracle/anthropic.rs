//! Relevance scoring through the Anthropic messages API
//!
//! One synchronous request per scoring pass. No retries: a failure surfaces
//! as an [`OracleError`] and the caller falls back to default scores.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{json, Value};

use super::{FoldDigest, OracleError, RelevanceOracle};
use crate::config::RelevanceConfig;
use crate::fold::FoldId;

/// API version header sent with every request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const MAX_RESPONSE_TOKENS: u32 = 256;

/// Scores folds with a remote model
#[derive(Debug, Clone)]
pub struct AnthropicOracle {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl AnthropicOracle {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            timeout,
        }
    }

    /// Build from `[relevance]`, reading the key from `api_key_env`
    pub fn from_config(config: &RelevanceConfig) -> Self {
        Self::new(
            &config.endpoint,
            &config.model,
            std::env::var(&config.api_key_env).ok(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn prompt(folds: &[FoldDigest], context: &str) -> String {
        let sections = folds
            .iter()
            .map(|f| format!("- {}: {}", f.id, f.summary))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Rate the relevance (0.0-1.0) of each conversation section to the current task. \
             Higher = more likely needed.\n\n\
             Current task/context:\n{context}\n\n\
             Sections:\n{sections}\n\n\
             Return ONLY a JSON object mapping section IDs to scores, \
             e.g. {{\"F001\": 0.8, \"F002\": 0.2}}"
        )
    }

    fn request(&self, api_key: &str, body: &Value) -> Result<Value, OracleError> {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build()
            .into();

        let mut response = agent
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("User-Agent", concat!("origami/", env!("CARGO_PKG_VERSION")))
            .send_json(body)
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => {
                    OracleError::Transport(format!("HTTP {}", status))
                }
                other => OracleError::Transport(other.to_string()),
            })?;

        response
            .body_mut()
            .read_json::<Value>()
            .map_err(|e| OracleError::Malformed(e.to_string()))
    }
}

impl RelevanceOracle for AnthropicOracle {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn score(
        &self,
        folds: &[FoldDigest],
        context: &str,
    ) -> Result<HashMap<FoldId, f64>, OracleError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| OracleError::Unavailable("no API key configured".to_string()))?;

        let body = json!({
            "model": self.model,
            "max_tokens": MAX_RESPONSE_TOKENS,
            "messages": [
                { "role": "user", "content": Self::prompt(folds, context) }
            ],
        });

        tracing::debug!(model = %self.model, folds = folds.len(), "requesting relevance scores");
        let reply = self.request(api_key, &body)?;
        let text = reply["content"][0]["text"]
            .as_str()
            .ok_or_else(|| OracleError::Malformed("missing content text".to_string()))?;

        parse_scores(text)
    }
}

/// Extract the score object from a model reply.
///
/// Takes the span from the first `{` to the last `}` so surrounding prose is
/// tolerated. Keys that do not parse as fold ids and values that are not
/// numbers are dropped.
pub(crate) fn parse_scores(text: &str) -> Result<HashMap<FoldId, f64>, OracleError> {
    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(OracleError::Malformed("no JSON object in reply".to_string())),
    };

    let object: serde_json::Map<String, Value> = serde_json::from_str(&text[start..=end])
        .map_err(|e| OracleError::Malformed(e.to_string()))?;

    Ok(object
        .iter()
        .filter_map(|(key, value)| {
            let id = key.parse::<FoldId>().ok()?;
            let score = match value {
                Value::Number(n) => n.as_f64()?,
                Value::String(s) => s.trim().parse::<f64>().ok()?,
                _ => return None,
            };
            Some((id, score))
        })
        .collect())
}
