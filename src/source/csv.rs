//! CSV reader.

use std::collections::HashSet;
use std::io::Read;

use serde_json::Value;

use crate::error_handling::SourceError;
use crate::queue::Record;

/// Parses CSV with a header row; each data row becomes a record keyed by
/// the header. Values are kept as strings. Blank lines are skipped. A row
/// whose field count differs from the header is an error, and so is a header
/// name that appears twice.
pub fn parse_csv<R: Read>(input: R) -> Result<Vec<Record>, SourceError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let mut seen = HashSet::new();
    if let Some(duplicate) = headers.iter().find(|name| !seen.insert(*name)) {
        return Err(SourceError::DuplicateHeader(duplicate.to_string()));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_become_records_keyed_by_header() {
        let input = "region,product,amount\nnorth,apples,10\nsouth,pears,7\n";
        let records = parse_csv(input.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["region"], json!("north"));
        assert_eq!(records[1]["amount"], json!("7"));
    }

    #[test]
    fn test_quoted_fields_and_blank_lines() {
        let input = "name,note\n\"Smith, J\",\"said \"\"hi\"\"\"\n\nDoe,\n";
        let records = parse_csv(input.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], json!("Smith, J"));
        assert_eq!(records[0]["note"], json!("said \"hi\""));
        assert_eq!(records[1]["note"], json!(""));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        assert!(matches!(
            parse_csv("a,b\n1,2,3\n".as_bytes()),
            Err(SourceError::Csv(_))
        ));
        assert!(matches!(
            parse_csv("a,b,c\n1,2\n".as_bytes()),
            Err(SourceError::Csv(_))
        ));
    }

    #[test]
    fn test_duplicate_header_is_rejected() {
        let err = parse_csv("id,name,id\n1,a,2\n".as_bytes()).unwrap_err();
        match err {
            SourceError::DuplicateHeader(name) => assert_eq!(name, "id"),
            other => panic!("Expected DuplicateHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_yields_no_records() {
        assert!(parse_csv("a,b\n".as_bytes()).unwrap().is_empty());
    }
}
