//! CLI commands for origami

pub mod config;
pub mod dispatch;
pub mod format;
pub mod guide;
pub mod ingest;
pub mod list;
pub mod reset;
pub mod restore;
pub mod tools;
