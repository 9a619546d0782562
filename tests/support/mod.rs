use assert_cmd::{cargo::cargo_bin_cmd, Command};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Get a Command for origami with an offline oracle
pub fn origami() -> Command {
    let mut cmd = cargo_bin_cmd!("origami");
    cmd.env("ORIGAMI_ORACLE", "neutral")
        .env_remove("ORIGAMI_STORE")
        .env_remove("RUST_LOG")
        .env_remove("ORIGAMI_LOG");
    cmd
}

fn user(text: &str) -> Value {
    json!({ "type": "user", "message": { "role": "user", "content": text } })
}

fn assistant(text: &str) -> Value {
    json!({ "type": "assistant", "message": { "role": "assistant", "content": [
        { "type": "text", "text": text }
    ] } })
}

fn tool_call(name: &str, file: &str) -> Value {
    json!({ "type": "assistant", "message": { "role": "assistant", "content": [
        { "type": "tool_use", "name": name, "input": { "file_path": file } }
    ] } })
}

/// Four topics over 19 turns (turns 1-5, 6-10, 11-14, 15-19) plus one
/// unparseable line: auth fix, profile endpoint, migration, caching
pub fn four_topic_records() -> Vec<Value> {
    vec![
        user("Fix the JWT validation bug in the auth middleware"),
        assistant("Looking at the auth middleware to find the validation gap."),
        tool_call("Read", "src/auth/middleware.ts"),
        assistant("jwt.decode skips the signature check; switching to jwt.verify."),
        tool_call("Edit", "src/auth/middleware.ts"),
        user("Now add a user profile endpoint"),
        assistant("Adding GET /users/:id/profile with the existing auth guard."),
        tool_call("Write", "src/routes/profile.ts"),
        assistant("The profile endpoint returns name, email and avatar."),
        tool_call("Edit", "src/routes/index.ts"),
        user("Write a database migration for the avatar column"),
        assistant("Creating a migration that adds avatar_url to users."),
        tool_call("Write", "migrations/004_avatar.sql"),
        assistant("Migration adds a nullable text column and an index."),
        "not a json record".into(),
        user("Cache profile lookups in redis"),
        assistant("Wrapping the profile query with a redis read-through cache."),
        tool_call("Edit", "src/routes/profile.ts"),
        assistant("Cache entries expire after five minutes and are cleared on update."),
        tool_call("Write", "tests/profile_cache.test.ts"),
    ]
}

/// Serialize transcript records as JSONL. Bare strings are written verbatim.
pub fn to_jsonl(records: &[Value]) -> String {
    records
        .iter()
        .map(|r| match r {
            Value::String(raw) => raw.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the four-topic transcript under `dir` and return its path
pub fn write_transcript(dir: &Path) -> PathBuf {
    let path = dir.join("transcript.jsonl");
    fs::write(&path, to_jsonl(&four_topic_records())).unwrap();
    path
}

/// Ingest the four-topic transcript into the default store under `dir`
#[allow(dead_code)]
pub fn ingest_fixture(dir: &Path) {
    let transcript = write_transcript(dir);
    origami()
        .current_dir(dir)
        .arg("ingest")
        .arg(&transcript)
        .assert()
        .success();
}

/// Parse stdout as JSON
#[allow(dead_code)]
pub fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
