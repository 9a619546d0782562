//! Flattening of turn content into text and file references

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::{Block, Content, Turn};
use crate::text::truncate_chars;

/// Length caps applied when rendering tool blocks as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    /// Maximum characters of serialized tool arguments
    pub tool_input_chars: usize,
    /// Maximum characters per tool result text piece
    pub tool_result_chars: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            tool_input_chars: 500,
            tool_result_chars: 500,
        }
    }
}

static FILE_PATH_FIELD: OnceLock<Option<Regex>> = OnceLock::new();
static PATH_FIELD: OnceLock<Option<Regex>> = OnceLock::new();
static HAS_EXTENSION: OnceLock<Option<Regex>> = OnceLock::new();

fn compiled(
    cell: &'static OnceLock<Option<Regex>>,
    name: &str,
    pattern: &str,
) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, name, "failed to compile file reference regex");
            None
        }
    })
    .as_ref()
}

fn file_path_field() -> Option<&'static Regex> {
    compiled(&FILE_PATH_FIELD, "file_path", r#""file_path"\s*:\s*"([^"]+)""#)
}

fn path_field() -> Option<&'static Regex> {
    compiled(&PATH_FIELD, "path", r#""path"\s*:\s*"([^"]+\.\w+)""#)
}

fn has_extension() -> Option<&'static Regex> {
    compiled(&HAS_EXTENSION, "extension", r"\.\w+$")
}

/// Readable text of a turn with tool blocks rendered as bounded descriptors
pub fn turn_text(turn: &Turn, limits: ExtractLimits) -> String {
    match &turn.content {
        Content::Text(text) => text.clone(),
        Content::Blocks(blocks) => {
            let mut parts: Vec<String> = Vec::with_capacity(blocks.len());
            for block in blocks {
                match block {
                    Block::Text(text) => parts.push(text.clone()),
                    Block::ToolInvocation { name, args } => {
                        let args = args.to_string();
                        let rendered = truncate_chars(&args, limits.tool_input_chars);
                        if rendered.len() < args.len() {
                            parts.push(format!("[Tool: {name}] {rendered}..."));
                        } else {
                            parts.push(format!("[Tool: {name}] {rendered}"));
                        }
                    }
                    Block::ToolResult { content } => parts.extend(
                        content
                            .iter()
                            .map(|piece| truncate_chars(piece, limits.tool_result_chars).to_string()),
                    ),
                }
            }
            parts.join("\n")
        }
    }
}

/// Text blocks of a turn only, joined by spaces (used as oracle context)
pub fn user_text(turn: &Turn) -> String {
    match &turn.content {
        Content::Text(text) => text.clone(),
        Content::Blocks(blocks) => blocks
            .iter()
            .filter_map(|b| match b {
                Block::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Collect file paths referenced by a turn into `out`.
///
/// Structured content contributes `file_path` and extension-bearing `path`
/// fields of tool arguments; plain text contributes the same fields when they
/// appear as embedded JSON.
pub fn file_references(turn: &Turn, out: &mut BTreeSet<String>) {
    match &turn.content {
        Content::Text(text) => {
            for re in [file_path_field(), path_field()].into_iter().flatten() {
                for cap in re.captures_iter(text) {
                    out.insert(cap[1].to_string());
                }
            }
        }
        Content::Blocks(blocks) => {
            for block in blocks {
                if let Block::ToolInvocation { args, .. } = block {
                    collect_path_fields(args, out);
                }
            }
        }
    }
}

fn collect_path_fields(value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                match (key.as_str(), v) {
                    ("file_path", Value::String(path)) if !path.is_empty() => {
                        out.insert(path.clone());
                    }
                    ("path", Value::String(path))
                        if has_extension().is_some_and(|re| re.is_match(path)) => {
                        out.insert(path.clone());
                    }
                    _ => collect_path_fields(v, out),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_path_fields(item, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Role;
    use serde_json::json;

    fn invocation(name: &str, args: Value) -> Turn {
        Turn::blocks(
            Role::Assistant,
            vec![Block::ToolInvocation {
                name: name.into(),
                args,
            }],
        )
    }

    #[test]
    fn test_plain_text_passes_through() {
        let turn = Turn::text(Role::User, "fix the bug");
        assert_eq!(turn_text(&turn, ExtractLimits::default()), "fix the bug");
    }

    #[test]
    fn test_tool_invocation_descriptor() {
        let turn = invocation("Read", json!({"file_path": "src/a.rs"}));
        assert_eq!(
            turn_text(&turn, ExtractLimits::default()),
            r#"[Tool: Read] {"file_path":"src/a.rs"}"#
        );
    }

    #[test]
    fn test_tool_invocation_truncated() {
        let turn = invocation("Write", json!({"content": "x".repeat(1000)}));
        let text = turn_text(&turn, ExtractLimits::default());
        assert!(text.ends_with("..."));
        // "[Tool: Write] " + 500 chars + "..."
        assert_eq!(text.chars().count(), 14 + 500 + 3);
    }

    #[test]
    fn test_tool_result_truncated_per_piece() {
        let turn = Turn::blocks(
            Role::User,
            vec![Block::ToolResult {
                content: vec!["y".repeat(800), "short".into()],
            }],
        );
        let limits = ExtractLimits {
            tool_input_chars: 500,
            tool_result_chars: 100,
        };
        let text = turn_text(&turn, limits);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 100);
        assert_eq!(lines[1], "short");
    }

    #[test]
    fn test_file_references_from_tool_args() {
        let mut files = BTreeSet::new();
        file_references(
            &invocation(
                "Edit",
                json!({"file_path": "src/b.rs", "nested": {"path": "docs/a.md"}, "path": "src"}),
            ),
            &mut files,
        );
        assert_eq!(
            files.into_iter().collect::<Vec<_>>(),
            vec!["docs/a.md", "src/b.rs"]
        );
    }

    #[test]
    fn test_file_references_from_embedded_json_text() {
        let mut files = BTreeSet::new();
        let turn = Turn::text(
            Role::Assistant,
            r#"called with {"file_path": "lib/x.ts", "path": "README.md", "path": "dir"}"#,
        );
        file_references(&turn, &mut files);
        assert!(files.contains("lib/x.ts"));
        assert!(files.contains("README.md"));
        assert!(!files.contains("dir"));
    }

    #[test]
    fn test_user_text_ignores_tool_blocks() {
        let turn = Turn::blocks(
            Role::User,
            vec![
                Block::Text("please".into()),
                Block::ToolResult {
                    content: vec!["output".into()],
                },
                Block::Text("continue".into()),
            ],
        );
        assert_eq!(user_text(&turn), "please continue");
    }
}
