//! JSON and JSON Lines readers.

use serde_json::Value;

use crate::error_handling::SourceError;
use crate::queue::Record;

/// Parses a top-level JSON array of objects.
pub fn parse_json(input: &str) -> Result<Vec<Record>, SourceError> {
    let values: Vec<Value> = serde_json::from_str(input)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(record) => Ok(record),
            _ => Err(SourceError::NotAnObject {
                location: format!("element {index}"),
            }),
        })
        .collect()
}

/// Parses one JSON object per non-blank line.
pub fn parse_jsonl(input: &str) -> Result<Vec<Record>, SourceError> {
    let mut records = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line)? {
            Value::Object(record) => records.push(record),
            _ => {
                return Err(SourceError::NotAnObject {
                    location: format!("line {}", index + 1),
                })
            }
        }
    }
    Ok(records)
}
