use serde_json::Value;
use std::io::{self, Read};

/// Read a piped JSON request from stdin.
/// Returns None when stdin is a terminal or nothing was piped.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse request from stdin: {e}"))?;
    tracing::debug!(bytes = trimmed.len(), "read request from stdin");
    Ok(Some(value))
}
