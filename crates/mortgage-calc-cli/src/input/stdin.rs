use serde_json::{Map, Value};
use std::io::{self, Read};

use super::record_from;

/// The JSON record piped on stdin, or None when stdin is a terminal or blank.
pub fn read_record() -> Result<Option<Map<String, Value>>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut raw = String::new();
    io::stdin().lock().read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let record = record_from(serde_json::from_str(&raw)?, "stdin")?;
    tracing::debug!(fields = record.len(), "read input record from stdin");
    Ok(Some(record))
}
