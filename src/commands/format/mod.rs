//! Shared output formatting helpers for commands
//!
//! Provides common patterns for JSON status messages, Records headers
//! and per-fold renderings across command modules.

pub mod fold;
pub mod status;

pub use fold::{fold_record_line, fold_to_json};
pub use status::{
    print_json_status, print_records_data, print_records_header, records_header,
    wrap_records_body,
};
