pub mod file;
pub mod stdin;

use serde_json::{Map, Value};

/// Build the raw calculator record.
///
/// Fields come from the `--input` file when given, otherwise from piped stdin.
/// Flag values fill in any field the record leaves out, so defaults such as
/// `--loan-term 30` still apply to a partial record.
pub fn resolve(path: Option<&str>, from_flags: Value) -> Result<Value, Box<dyn std::error::Error>> {
    let record = match path {
        Some(path) => Some(file::read_record(path)?),
        None => stdin::read_record()?,
    };

    Ok(merge(from_flags, record))
}

/// Record fields win; non-null flag values fill the gaps.
fn merge(from_flags: Value, record: Option<Map<String, Value>>) -> Value {
    let mut merged: Map<String, Value> = match from_flags {
        Value::Object(flags) => flags.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        _ => Map::new(),
    };
    if let Some(record) = record {
        merged.extend(record);
    }
    Value::Object(merged)
}

fn record_from(value: Value, source: &str) -> Result<Map<String, Value>, Box<dyn std::error::Error>> {
    match value {
        Value::Object(record) => Ok(record),
        other => Err(format!("{source}: expected a JSON object of fields, got {other}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_rejects_non_objects() {
        assert!(record_from(json!([1, 2]), "stdin").is_err());
        let record = record_from(json!({ "homePrice": 300000 }), "stdin").unwrap();
        assert_eq!(record["homePrice"], 300000);
    }

    #[test]
    fn test_record_fields_win_and_flags_fill_gaps() {
        let flags = json!({ "homePrice": "250000", "loanTerm": "30", "hoa": null });
        let record = record_from(json!({ "homePrice": 300000, "downPayment": 60000 }), "file").unwrap();
        let merged = merge(flags, Some(record));
        assert_eq!(
            merged,
            json!({ "homePrice": 300000, "downPayment": 60000, "loanTerm": "30" })
        );
    }

    #[test]
    fn test_flags_alone_drop_unset_fields() {
        let merged = merge(json!({ "principal": "100000", "interestRate": null }), None);
        assert_eq!(merged, json!({ "principal": "100000" }));
    }
}
