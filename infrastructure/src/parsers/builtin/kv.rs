//! `kv` parser: `key=value` / `key: value` lines into a flat object

use panel_domain::parser::{CapabilityError, ParseOptions};
use serde_json::{Map, Value};

pub const NAME: &str = "kv";

pub fn parse(raw: &str, options: ParseOptions) -> Result<Value, CapabilityError> {
    let mut out = Map::new();

    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            if !options.quiet {
                tracing::warn!(line = index + 1, "kv: ignoring section header {}", line);
            }
            continue;
        }

        let split_at = line.find(['=', ':']).ok_or_else(|| {
            CapabilityError::parse_failed(format!(
                "line {}: expected 'key=value' or 'key: value', got '{}'",
                index + 1,
                line
            ))
        })?;
        let key = line[..split_at].trim();
        if key.is_empty() {
            return Err(CapabilityError::parse_failed(format!(
                "line {}: empty key",
                index + 1
            )));
        }
        let value = unquote(line[split_at + 1..].trim());
        out.insert(key.to_string(), Value::String(value.to_string()));
    }

    Ok(Value::Object(out))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
