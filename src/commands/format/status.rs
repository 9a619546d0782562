//! Status message formatting helpers

use origami_core::error::Result;
use origami_core::format::escape_quotes;
use serde_json::json;

/// Print a JSON status message with optional fields
///
/// # Examples
/// ```ignore
/// print_json_status("reset", Some("fold log cleared"), &[("store", json!(".origami"))])?;
/// ```
pub fn print_json_status(
    status: &str,
    message: Option<&str>,
    extra_fields: &[(&str, serde_json::Value)],
) -> Result<()> {
    let mut output = json!({ "status": status });

    if let Some(obj) = output.as_object_mut() {
        if let Some(msg) = message {
            obj.insert("message".to_string(), json!(msg));
        }
        for (key, value) in extra_fields {
            obj.insert(key.to_string(), value.clone());
        }
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Records header line: `H origami=1 records=1 mode=<mode> k=v ...`
pub fn records_header(mode: &str, extra_fields: &[(&str, String)]) -> String {
    let mut parts = vec!["H origami=1 records=1".to_string(), format!("mode={}", mode)];

    for (key, value) in extra_fields {
        parts.push(format!("{}={}", key, value));
    }

    parts.join(" ")
}

/// Print a Records format header
pub fn print_records_header(mode: &str, extra_fields: &[(&str, String)]) {
    println!("{}", records_header(mode, extra_fields));
}

/// Wrap body content in Records format with B and B-END markers
pub fn wrap_records_body(id: &str, body: &str) {
    println!("B {}", id);
    for line in body.lines() {
        println!("{}", line);
    }
    println!("B-END");
}

/// Print a Records format data line
pub fn print_records_data(key: &str, value: &str) {
    println!("D {} \"{}\"", key, escape_quotes(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_json_status_with_fields() {
        let result = print_json_status(
            "reset",
            Some("fold log cleared"),
            &[("store", serde_json::json!(".origami"))],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_records_header_fields() {
        assert_eq!(
            records_header("list", &[("folds", "3".to_string())]),
            "H origami=1 records=1 mode=list folds=3"
        );
        assert_eq!(records_header("guide", &[]), "H origami=1 records=1 mode=guide");
    }
}
