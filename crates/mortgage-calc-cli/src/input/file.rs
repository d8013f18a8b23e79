use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::{record_from, stdin};

/// Load an input record from a JSON file; `-` means stdin.
pub fn read_record(path: &str) -> Result<Map<String, Value>, Box<dyn std::error::Error>> {
    if path == "-" {
        return stdin::read_record()?.ok_or_else(|| "--input - given but nothing was piped".into());
    }

    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?;
    tracing::debug!(path = %resolved.display(), "read input record from file");
    record_from(value, &resolved.display().to_string())
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.is_file() {
        return Err(format!("Input file not found: {}", resolved.display()).into());
    }

    Ok(resolved)
}
