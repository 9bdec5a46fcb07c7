//! Parsers compiled into the binary
//!
//! Each submodule exposes a `NAME` and a plain `parse` function; this module
//! wraps them as [`ParserCapability`] values under a namespace.

pub mod csv;
pub mod hosts;
pub mod kv;

use panel_domain::parser::{CapabilityError, ParseOptions, ParserCapability, qualify};
use serde_json::Value;
use std::sync::Arc;

type ParseFn = fn(&str, ParseOptions) -> Result<Value, CapabilityError>;

const BUILTINS: &[(&str, ParseFn)] = &[
    (csv::NAME, csv::parse),
    (hosts::NAME, hosts::parse),
    (kv::NAME, kv::parse),
];

/// A builtin parse function bound to its qualified name
pub struct BuiltinParser {
    qualified_name: String,
    parse_fn: ParseFn,
}

impl BuiltinParser {
    pub fn new(qualified_name: impl Into<String>, parse_fn: ParseFn) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            parse_fn,
        }
    }
}

impl std::fmt::Debug for BuiltinParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinParser")
            .field("qualified_name", &self.qualified_name)
            .finish_non_exhaustive()
    }
}

impl ParserCapability for BuiltinParser {
    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn parse(&self, raw: &str, options: ParseOptions) -> Result<Value, CapabilityError> {
        (self.parse_fn)(raw, options)
    }
}

/// All builtin parsers keyed by unqualified name
pub fn builtin_parsers(namespace: &str) -> Vec<(String, Arc<dyn ParserCapability>)> {
    BUILTINS
        .iter()
        .map(|(name, parse_fn)| {
            let capability: Arc<dyn ParserCapability> =
                Arc::new(BuiltinParser::new(qualify(namespace, name), *parse_fn));
            (name.to_string(), capability)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_qualified() {
        let parsers = builtin_parsers("jc.parsers");
        let names: Vec<_> = parsers
            .iter()
            .map(|(name, cap)| (name.as_str(), cap.qualified_name()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("csv", "jc.parsers.csv"),
                ("hosts", "jc.parsers.hosts"),
                ("kv", "jc.parsers.kv"),
            ]
        );
    }

    #[test]
    fn test_builtin_dispatches_to_its_function() {
        let parsers = builtin_parsers("x");
        let (_, kv) = parsers.iter().find(|(name, _)| name == "kv").unwrap();
        let value = kv.parse("a=1", ParseOptions::default()).unwrap();
        assert_eq!(value["a"], "1");
    }
}
