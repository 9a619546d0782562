//! Origami Core Library
//!
//! Multi-resolution conversation memory: transcripts are cut into topical
//! sections, each kept as a fold with a resident summary and a detail blob
//! that is expanded only when relevant and affordable.

pub mod budget;
pub mod config;
pub mod error;
pub mod fold;
pub mod format;
pub mod logging;
pub mod oracle;
pub mod pipeline;
pub mod projection;
pub mod store;
pub mod text;
pub mod tokens;
pub mod tools;
pub mod transcript;
