//! JSON and records renderings of a single fold

use origami_core::fold::Fold;
use origami_core::format::escape_quotes;
use serde_json::json;

/// JSON object for a fold. Ids are rendered in display form (`F001`).
pub fn fold_to_json(fold: &Fold) -> serde_json::Value {
    let range = fold.turn_range();
    json!({
        "id": fold.id().to_string(),
        "status": fold.status().to_string(),
        "summary": fold.summary(),
        "summary_tokens": fold.summary_tokens(),
        "detail_tokens": fold.detail_tokens(),
        "turn_range": { "start": range.start, "end": range.end },
        "relevance_score": fold.relevance_score(),
        "files_touched": fold.files_touched(),
        "timestamp": fold.timestamp().to_rfc3339(),
    })
}

/// Records line for a fold:
/// `F F001 folded turns=1-5 tok=340 sum=12 rel=0.90 "summary"`
pub fn fold_record_line(fold: &Fold) -> String {
    format!(
        "F {} {} turns={} tok={} sum={} rel={:.2} \"{}\"",
        fold.id(),
        fold.status(),
        fold.turn_range(),
        fold.detail_tokens(),
        fold.summary_tokens(),
        fold.relevance_score(),
        escape_quotes(fold.summary())
    )
}
