//! Text rendering of fold state for injection into agent context

use crate::fold::{Fold, FoldId, FoldLog};
use crate::text::truncate_chars;

/// Characters of summary shown per fold in the compaction index
const INDEX_SUMMARY_CHARS: usize = 150;

/// Usage guide printed by `origami guide`
pub const GUIDE: &str = "\
ORIGAMI CONTEXT FOLDING

Your earlier conversation has been folded into numbered sections (F001,
F002, ...). Every section keeps a compact summary in context. A few of the
most relevant ones are also unfolded to full detail, within a lean token
budget. Folding is aggressive: keep only what the current task
needs at full resolution.

Commands:
  origami list                 Show every fold with status, tokens and relevance
  origami show <id>            Print a fold's summary and full detail (read only)
  origami unfold <id>          Mark a fold unfolded and print its full detail
  origami fold <id>            Mark a fold folded and print its summary
  origami summarize <id> TEXT  Replace a fold's summary (reads stdin without TEXT)

Working with folds:
  - Unfold a section when the summary is not enough to continue safely.
  - Fold it again once you are done with it.
  - Rewrite placeholder summaries as dense notes only you need to read:
    topic>action: key.details | outcome | D:files
  - Reference fold ids (\"builds on F003\") so related sections can be found.

Manual unfolds are not budget-checked until the next restore; at that point
the least relevant expansions are folded again to fit the budget.
";

/// One fold in a restore projection
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionBlock {
    pub fold: Fold,
    /// Full detail, present only for expanded folds
    pub detail: Option<String>,
}

/// Rendered-context view of the whole log after a budget pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub blocks: Vec<ProjectionBlock>,
    /// Detail tokens stored across every fold
    pub stored_tokens: usize,
    pub summary_tokens: usize,
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Tokens the rendered projection costs under the budget model
    pub fn rendered_tokens(&self) -> usize {
        self.summary_tokens
            + self
                .blocks
                .iter()
                .filter(|b| b.detail.is_some())
                .map(|b| b.fold.detail_tokens())
                .sum::<usize>()
    }

    /// Render the projection. An empty projection renders as an empty string.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut out = format!(
            "[CONTEXT FOLDING - {} sections, {} tokens stored]\n\n",
            self.blocks.len(),
            self.stored_tokens
        );

        for block in &self.blocks {
            out.push_str(&fold_header(&block.fold));
            out.push('\n');
            out.push_str(block.fold.summary());
            out.push('\n');
            if let Some(detail) = &block.detail {
                out.push_str("\n--- FULL DETAIL ---\n");
                out.push_str(detail);
                if !detail.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("--- END DETAIL ---\n");
            }
            out.push('\n');
        }

        out.push_str(TRAILER);
        out
    }
}

const TRAILER: &str = "\
Run `origami guide` for instructions on context folding.
Tools: origami list | origami unfold <id> | origami fold <id> | origami summarize <id> <text>
";

/// Header line for a fold: `[F001 | UNFOLDED | 340 tok | sum:12 tok | rel:0.90]`
pub fn fold_header(fold: &Fold) -> String {
    format!(
        "[{} | {} | {} tok | sum:{} tok | rel:{:.2}]",
        fold.id(),
        fold.status().label(),
        fold.detail_tokens(),
        fold.summary_tokens(),
        fold.relevance_score()
    )
}

/// Compact index of every fold, shown after ingest
pub fn render_fold_index(log: &FoldLog) -> String {
    let mut out = format!(
        "[FOLD INDEX - {} sections, {} summary tok, {} detail tok stored]\n",
        log.len(),
        log.total_summary_tokens(),
        log.total_detail_tokens()
    );
    for fold in log.folds() {
        out.push('\n');
        out.push_str(&fold_header(fold));
        out.push_str("\n  ");
        out.push_str(truncate_chars(fold.summary(), INDEX_SUMMARY_CHARS));
        out.push('\n');
    }
    out
}

/// Instructions returned to the host before it compacts its context
pub fn render_compaction_instructions(log: &FoldLog, new_folds: &[FoldId]) -> String {
    let new_ids = if new_folds.is_empty() {
        "(none)".to_string()
    } else {
        new_folds
            .iter()
            .map(FoldId::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "CONTEXT FOLDING ACTIVE - {count} sections tracked\n\n\
         {index}\n\
         New folds this compaction: {new_ids}\n\n\
         COMPACTION INSTRUCTIONS - follow these while summarising:\n\n\
         1. For EACH conversation section, write a SELF-COMPRESSED SUMMARY and\n   \
            store it with `origami summarize <id> <text>`.\n   \
            - You are the only reader; maximise information density.\n   \
            - Use abbreviations: >refac, >impl, >fix, >add, >mod, >del\n   \
            - Compress paths: auth.middleware.ts -> auth.mid.ts\n   \
            - Note cross-references: \"builds on F003\"\n   \
            - Format: topic>action: key.details | outcome | D:files\n\n\
         2. Reference fold ids (F001, F002...) so future-you can unfold on demand.\n\n\
         3. Keep the fold index visible in the compacted context so you always\n   \
            know what sections exist and can run `origami unfold <id>` when needed.\n",
        count = log.len(),
        index = render_fold_index(log),
    )
}

/// Listing of every fold for the `list` tool
pub fn render_list(log: &FoldLog) -> String {
    if log.is_empty() {
        return "No folds stored.\n".to_string();
    }

    let mut out = String::new();
    for fold in log.folds() {
        out.push_str(&fold_header(fold));
        out.push_str(&format!(" turns {}\n  {}\n", fold.turn_range(), fold.summary()));
    }
    out.push_str(&format!(
        "\n{} folds, {} unfolded, {} summary tok, {} detail tok stored\n",
        log.len(),
        log.unfolded().count(),
        log.total_summary_tokens(),
        log.total_detail_tokens()
    ));
    out
}

/// A fold with its detail, for `unfold` and `show`
pub fn render_fold_detail(fold: &Fold, detail: &str) -> String {
    let mut out = format!(
        "{}\n{}\n\n--- FULL DETAIL ---\n{}",
        fold_header(fold),
        fold.summary(),
        detail
    );
    if !detail.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("--- END DETAIL ---\n");
    out
}
