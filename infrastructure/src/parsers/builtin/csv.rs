//! `csv` parser: header row + records into an array of objects
//!
//! Follows RFC 4180 quoting: fields may be wrapped in double quotes, which
//! then may contain commas, newlines and `""` escapes.

use panel_domain::parser::{CapabilityError, ParseOptions};
use serde_json::{Map, Value};

pub const NAME: &str = "csv";

pub fn parse(raw: &str, _options: ParseOptions) -> Result<Value, CapabilityError> {
    let mut records = split_records(raw)?.into_iter();

    let Some(header) = records.next() else {
        return Ok(Value::Array(Vec::new()));
    };

    let mut rows = Vec::new();
    for (index, record) in records.enumerate() {
        if record.len() != header.len() {
            return Err(CapabilityError::parse_failed(format!(
                "row {} has {} fields, expected {}",
                index + 2,
                record.len(),
                header.len()
            )));
        }
        let row: Map<String, Value> = header
            .iter()
            .cloned()
            .zip(record.into_iter().map(Value::String))
            .collect();
        rows.push(Value::Object(row));
    }

    Ok(Value::Array(rows))
}

/// Split text into records of fields; blank lines between records are dropped
fn split_records(raw: &str) -> Result<Vec<Vec<String>>, CapabilityError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if field_started || !field.is_empty() || !record.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(CapabilityError::parse_failed(
            "unterminated quoted field at end of input",
        ));
    }
    if field_started || !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}
