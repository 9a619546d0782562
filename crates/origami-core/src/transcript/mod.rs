//! Transcript model and parsing
//!
//! A transcript is an append-only log of turns. Each record is either a turn
//! object (`{"role": ..., "content": ...}`) or a wrapper whose `message`
//! field is a turn. Content is plain text or a list of typed blocks.
//!
//! Parsing is lenient: records that are not valid JSON objects, or whose role
//! is neither `user` nor `assistant`, are skipped without affecting the turns
//! around them.

mod extract;
mod sectioner;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use extract::{file_references, turn_text, user_text, ExtractLimits};
pub use sectioner::{Section, Sectioner, SectionerConfig};

/// Speaker of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// One typed block of structured turn content
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Plain text
    Text(String),
    /// A tool call made by the assistant
    ToolInvocation { name: String, args: Value },
    /// Output returned by a tool, as its text pieces
    ToolResult { content: Vec<String> },
}

/// Turn content: plain text or a sequence of blocks
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Blocks(Vec<Block>),
}

/// A single conversational turn
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: Content,
}

impl Turn {
    /// Build a plain-text turn
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: Content::Text(text.into()),
        }
    }

    /// Build a turn from structured blocks
    pub fn blocks(role: Role, blocks: Vec<Block>) -> Self {
        Self {
            role,
            content: Content::Blocks(blocks),
        }
    }

    /// Interpret one decoded transcript record as a turn.
    ///
    /// Returns `None` for records that are not turns (wrong shape or role).
    pub fn from_record(record: &Value) -> Option<Self> {
        let obj = record.as_object()?;
        let turn = if obj.contains_key("role") {
            obj
        } else {
            obj.get("message")?.as_object()?
        };

        let role = Role::parse(turn.get("role")?.as_str()?)?;
        let content = match turn.get("content") {
            None | Some(Value::Null) => Content::Text(String::new()),
            Some(Value::String(s)) => Content::Text(s.clone()),
            Some(Value::Array(items)) => Content::Blocks(items.iter().filter_map(parse_block).collect()),
            Some(other) => Content::Text(other.to_string()),
        };

        Some(Self { role, content })
    }
}

fn parse_block(value: &Value) -> Option<Block> {
    if let Value::String(s) = value {
        return Some(Block::Text(s.clone()));
    }

    let obj = value.as_object()?;
    match obj.get("type").and_then(Value::as_str)? {
        "text" => Some(Block::Text(
            obj.get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        )),
        "tool_use" => Some(Block::ToolInvocation {
            name: obj
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            args: obj
                .get("input")
                .cloned()
                .unwrap_or_else(|| Value::Object(Default::default())),
        }),
        "tool_result" => {
            let content = match obj.get("content") {
                Some(Value::String(s)) => vec![s.clone()],
                Some(Value::Array(parts)) => parts
                    .iter()
                    .filter_map(|p| {
                        let p = p.as_object()?;
                        if p.get("type").and_then(Value::as_str) != Some("text") {
                            return None;
                        }
                        Some(p.get("text").and_then(Value::as_str).unwrap_or_default().to_string())
                    })
                    .collect(),
                _ => Vec::new(),
            };
            Some(Block::ToolResult { content })
        }
        _ => None,
    }
}

/// Inclusive range of 1-based turn indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct TurnRange {
    pub start: u32,
    pub end: u32,
}

impl TurnRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of turns covered
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    /// Ranges are never empty; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn overlaps(&self, other: &TurnRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl From<[u32; 2]> for TurnRange {
    fn from([start, end]: [u32; 2]) -> Self {
        Self { start, end }
    }
}

impl From<TurnRange> for [u32; 2] {
    fn from(range: TurnRange) -> Self {
        [range.start, range.end]
    }
}

impl fmt::Display for TurnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Result of decoding a raw transcript
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub turns: Vec<Turn>,
    /// Records that were present but could not be used as turns
    pub skipped: usize,
}

impl Transcript {
    /// Decode a transcript: JSONL first, falling back to a single JSON array.
    pub fn parse(input: &str) -> Self {
        let mut turns = Vec::new();
        let mut skipped = 0;

        for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match serde_json::from_str::<Value>(line)
                .ok()
                .as_ref()
                .and_then(Turn::from_record)
            {
                Some(turn) => turns.push(turn),
                None => skipped += 1,
            }
        }

        if turns.is_empty() {
            if let Ok(Value::Array(records)) = serde_json::from_str::<Value>(input) {
                skipped = 0;
                for record in &records {
                    match Turn::from_record(record) {
                        Some(turn) => turns.push(turn),
                        None => skipped += 1,
                    }
                }
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, kept = turns.len(), "skipped transcript records");
        }

        Self { turns, skipped }
    }

    /// Text of the most recent user turn, or an empty string
    pub fn last_user_text(&self) -> String {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(user_text)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain_turns() {
        let input = r#"{"role": "user", "content": "hello"}
{"role": "assistant", "content": "hi"}"#;
        let transcript = Transcript::parse(input);
        assert_eq!(transcript.turns.len(), 2);
        assert_eq!(transcript.turns[0], Turn::text(Role::User, "hello"));
        assert_eq!(transcript.skipped, 0);
    }

    #[test]
    fn test_parse_message_wrapper() {
        let input = r#"{"type": "user", "message": {"role": "user", "content": "wrapped"}}"#;
        let transcript = Transcript::parse(input);
        assert_eq!(transcript.turns, vec![Turn::text(Role::User, "wrapped")]);
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let input = r#"{"role": "user", "content": "one"}
not json at all
{"role": "system", "content": "ignored"}
[1, 2, 3]
{"role": "assistant", "content": "two"}"#;
        let transcript = Transcript::parse(input);
        assert_eq!(transcript.turns.len(), 2);
        assert_eq!(transcript.skipped, 3);
    }

    #[test]
    fn test_json_array_fallback() {
        let input = r#"[
            {"role": "user", "content": "q"},
            {"role": "assistant", "content": "a"},
            "stray"
        ]"#;
        let transcript = Transcript::parse(input);
        assert_eq!(transcript.turns.len(), 2);
        assert_eq!(transcript.skipped, 1);
    }

    #[test]
    fn test_empty_input() {
        let transcript = Transcript::parse("");
        assert!(transcript.turns.is_empty());
        assert_eq!(transcript.skipped, 0);
    }

    #[test]
    fn test_block_content() {
        let record = json!({
            "role": "assistant",
            "content": [
                {"type": "text", "text": "reading"},
                {"type": "tool_use", "name": "Read", "input": {"file_path": "src/a.rs"}},
                {"type": "tool_result", "content": [{"type": "text", "text": "fn main"}, {"type": "image"}]},
                {"type": "thinking", "thinking": "hmm"},
                "bare"
            ]
        });
        let turn = Turn::from_record(&record).unwrap();
        let Content::Blocks(blocks) = turn.content else {
            panic!("expected blocks");
        };
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0], Block::Text("reading".into()));
        assert_eq!(
            blocks[1],
            Block::ToolInvocation {
                name: "Read".into(),
                args: json!({"file_path": "src/a.rs"})
            }
        );
        assert_eq!(
            blocks[2],
            Block::ToolResult {
                content: vec!["fn main".into()]
            }
        );
        assert_eq!(blocks[3], Block::Text("bare".into()));
    }

    #[test]
    fn test_last_user_text() {
        let transcript = Transcript {
            turns: vec![
                Turn::text(Role::User, "first"),
                Turn::text(Role::Assistant, "reply"),
                Turn::blocks(
                    Role::User,
                    vec![Block::Text("second".into()), Block::Text("ask".into())],
                ),
                Turn::text(Role::Assistant, "reply"),
            ],
            skipped: 0,
        };
        assert_eq!(transcript.last_user_text(), "second ask");
    }

    #[test]
    fn test_turn_range_serializes_as_pair() {
        let range = TurnRange::new(3, 7);
        assert_eq!(serde_json::to_value(range).unwrap(), json!([3, 7]));
        let back: TurnRange = serde_json::from_value(json!([3, 7])).unwrap();
        assert_eq!(back, range);
        assert_eq!(range.len(), 5);
        assert!(range.overlaps(&TurnRange::new(7, 9)));
        assert!(!range.overlaps(&TurnRange::new(8, 9)));
    }
}
