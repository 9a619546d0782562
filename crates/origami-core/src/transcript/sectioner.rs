//! Deterministic grouping of turns into topical sections
//!
//! A new section starts on a user turn once the current section holds enough
//! turns and the assistant has answered the previous user turn at least a
//! minimum number of times. Sections are contiguous, never overlap, and cover
//! every input turn exactly once.

use std::collections::BTreeSet;

use super::extract::{file_references, turn_text, ExtractLimits};
use super::{Role, Turn, TurnRange};

/// Thresholds that control where sections are cut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionerConfig {
    /// Minimum turns a section must hold before it can be closed
    pub min_section_turns: usize,
    /// Minimum assistant turns since the previous user turn before a cut
    pub min_assistant_turns: usize,
    /// Caps for rendering tool blocks
    pub limits: ExtractLimits,
}

impl Default for SectionerConfig {
    fn default() -> Self {
        Self {
            min_section_turns: 3,
            min_assistant_turns: 2,
            limits: ExtractLimits::default(),
        }
    }
}

/// A transient group of consecutive turns
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub turns: Vec<Turn>,
    pub turn_range: TurnRange,
    /// Referenced file paths, deduplicated and sorted
    pub files_touched: BTreeSet<String>,
    /// Non-empty turn texts joined by newlines
    pub content: String,
}

struct SectionBuilder {
    start: u32,
    turns: Vec<Turn>,
    files: BTreeSet<String>,
    parts: Vec<String>,
}

impl SectionBuilder {
    fn new(start: u32) -> Self {
        Self {
            start,
            turns: Vec::new(),
            files: BTreeSet::new(),
            parts: Vec::new(),
        }
    }

    fn push(&mut self, turn: &Turn, limits: ExtractLimits) {
        let text = turn_text(turn, limits);
        if !text.is_empty() {
            self.parts.push(text);
        }
        file_references(turn, &mut self.files);
        self.turns.push(turn.clone());
    }

    fn finish(self, end: u32) -> Section {
        Section {
            turns: self.turns,
            turn_range: TurnRange::new(self.start, end),
            files_touched: self.files,
            content: self.parts.join("\n"),
        }
    }
}

/// Splits an ordered turn sequence into sections
#[derive(Debug, Clone, Default)]
pub struct Sectioner {
    config: SectionerConfig,
}

impl Sectioner {
    pub fn new(config: SectionerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SectionerConfig {
        &self.config
    }

    /// Section a complete transcript, numbering turns from 1
    pub fn section(&self, turns: &[Turn]) -> Vec<Section> {
        self.section_from(turns, 0)
    }

    /// Section turns that follow `offset` already-sectioned turns.
    ///
    /// The first turn in `turns` gets index `offset + 1`.
    pub fn section_from(&self, turns: &[Turn], offset: u32) -> Vec<Section> {
        if turns.is_empty() {
            return Vec::new();
        }

        let mut sections = Vec::new();
        let mut current = SectionBuilder::new(offset + 1);
        let mut turn_number = offset;
        let mut assistant_since_user = 0usize;

        for turn in turns {
            turn_number += 1;
            match turn.role {
                Role::User => {
                    if current.turns.len() >= self.config.min_section_turns
                        && assistant_since_user >= self.config.min_assistant_turns
                    {
                        let finished =
                            std::mem::replace(&mut current, SectionBuilder::new(turn_number));
                        sections.push(finished.finish(turn_number - 1));
                    }
                    assistant_since_user = 0;
                }
                Role::Assistant => assistant_since_user += 1,
            }
            current.push(turn, self.config.limits);
        }

        sections.push(current.finish(turn_number));
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(text: &str) -> Turn {
        Turn::text(Role::User, text)
    }

    fn assistant(text: &str) -> Turn {
        Turn::text(Role::Assistant, text)
    }

    fn topic(n: usize, replies: usize) -> Vec<Turn> {
        let mut turns = vec![user(&format!("topic {n}"))];
        for i in 0..replies {
            turns.push(assistant(&format!("reply {n}.{i}")));
        }
        turns
    }

    fn assert_partition(sections: &[Section], total: u32) {
        let mut expected_start = 1;
        for section in sections {
            assert_eq!(section.turn_range.start, expected_start);
            assert!(section.turn_range.end >= section.turn_range.start);
            assert_eq!(section.turn_range.len() as usize, section.turns.len());
            expected_start = section.turn_range.end + 1;
        }
        assert_eq!(expected_start, total + 1);
    }

    #[test]
    fn test_empty_input_yields_no_sections() {
        assert!(Sectioner::default().section(&[]).is_empty());
    }

    #[test]
    fn test_four_topics_split_into_four_sections() {
        let turns: Vec<Turn> = (1..=4)
            .flat_map(|n| topic(n, if n == 4 { 3 } else { 4 }))
            .collect();
        assert_eq!(turns.len(), 19);

        let sections = Sectioner::default().section(&turns);
        let ranges: Vec<_> = sections.iter().map(|s| s.turn_range).collect();
        assert_eq!(
            ranges,
            vec![
                TurnRange::new(1, 5),
                TurnRange::new(6, 10),
                TurnRange::new(11, 15),
                TurnRange::new(16, 19),
            ]
        );
        assert_partition(&sections, 19);
    }

    #[test]
    fn test_short_exchange_does_not_cut() {
        // Only one assistant reply per user turn: never enough to close a section
        let turns: Vec<Turn> = (0..5).flat_map(|n| topic(n, 1)).collect();
        let sections = Sectioner::default().section(&turns);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].turn_range, TurnRange::new(1, 10));
    }

    #[test]
    fn test_final_section_always_flushed() {
        let mut turns = topic(1, 3);
        turns.push(user("trailing question"));
        let sections = Sectioner::default().section(&turns);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].turn_range, TurnRange::new(5, 5));
        assert_eq!(sections[1].content, "trailing question");
    }

    #[test]
    fn test_leading_assistant_turns_stay_in_first_section() {
        let mut turns = vec![assistant("preamble"), assistant("more")];
        turns.extend(topic(1, 2));
        let sections = Sectioner::default().section(&turns);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].turn_range, TurnRange::new(1, 5));
    }

    #[test]
    fn test_section_from_offset_numbers_after_offset() {
        let turns: Vec<Turn> = (1..=2).flat_map(|n| topic(n, 2)).collect();
        let sections = Sectioner::default().section_from(&turns, 10);
        assert_eq!(sections[0].turn_range, TurnRange::new(11, 13));
        assert_eq!(sections[1].turn_range, TurnRange::new(14, 16));
    }

    #[test]
    fn test_custom_thresholds() {
        let config = SectionerConfig {
            min_section_turns: 1,
            min_assistant_turns: 1,
            ..Default::default()
        };
        let turns: Vec<Turn> = (0..3).flat_map(|n| topic(n, 1)).collect();
        let sections = Sectioner::new(config).section(&turns);
        assert_eq!(sections.len(), 3);
        assert_partition(&sections, 6);
    }

    #[test]
    fn test_sectioning_is_deterministic() {
        let turns: Vec<Turn> = (0..6).flat_map(|n| topic(n, n % 3 + 1)).collect();
        let sectioner = Sectioner::default();
        assert_eq!(sectioner.section(&turns), sectioner.section(&turns));
    }

    #[test]
    fn test_files_touched_sorted_and_deduplicated() {
        let turns = vec![
            user("edit files"),
            Turn::blocks(
                Role::Assistant,
                vec![super::super::Block::ToolInvocation {
                    name: "Edit".into(),
                    args: serde_json::json!({"file_path": "z.rs"}),
                }],
            ),
            Turn::blocks(
                Role::Assistant,
                vec![super::super::Block::ToolInvocation {
                    name: "Read".into(),
                    args: serde_json::json!({"file_path": "a.rs"}),
                }],
            ),
            Turn::blocks(
                Role::Assistant,
                vec![super::super::Block::ToolInvocation {
                    name: "Read".into(),
                    args: serde_json::json!({"file_path": "z.rs"}),
                }],
            ),
        ];
        let sections = Sectioner::default().section(&turns);
        let files: Vec<_> = sections[0].files_touched.iter().cloned().collect();
        assert_eq!(files, vec!["a.rs", "z.rs"]);
    }
}
