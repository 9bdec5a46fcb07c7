//! `hosts` parser: `/etc/hosts` style lines into `[{ip, hostname: [..]}]`

use panel_domain::parser::{CapabilityError, ParseOptions};
use serde_json::{Value, json};
use std::net::IpAddr;

pub const NAME: &str = "hosts";

pub fn parse(raw: &str, _options: ParseOptions) -> Result<Value, CapabilityError> {
    let mut entries = Vec::new();

    for (index, line) in raw.lines().enumerate() {
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let mut fields = content.split_whitespace();
        let Some(ip) = fields.next() else {
            continue;
        };

        // Zone ids (`fe80::1%lo0`) are not part of the address itself
        let address = ip.split('%').next().unwrap_or(ip);
        if address.parse::<IpAddr>().is_err() {
            return Err(CapabilityError::parse_failed(format!(
                "line {}: '{}' is not an IP address",
                index + 1,
                ip
            )));
        }

        let hostnames: Vec<&str> = fields.collect();
        if hostnames.is_empty() {
            return Err(CapabilityError::parse_failed(format!(
                "line {}: no hostname for {}",
                index + 1,
                ip
            )));
        }

        entries.push(json!({ "ip": ip, "hostname": hostnames }));
    }

    Ok(Value::Array(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_entries_and_aliases() {
        let raw = "\
# static entries
127.0.0.1   localhost
10.0.0.5    scanme.internal scanme   # lab box
::1         localhost ip6-localhost
";
        let value = parse(raw, ParseOptions::default()).unwrap();
        assert_eq!(
            value,
            json!([
                {"ip": "127.0.0.1", "hostname": ["localhost"]},
                {"ip": "10.0.0.5", "hostname": ["scanme.internal", "scanme"]},
                {"ip": "::1", "hostname": ["localhost", "ip6-localhost"]}
            ])
        );
    }

    #[test]
    fn test_zone_id_is_accepted() {
        let value = parse("fe80::1%lo0 localhost", ParseOptions::default()).unwrap();
        assert_eq!(value[0]["ip"], "fe80::1%lo0");
    }

    #[test]
    fn test_invalid_address_is_rejected() {
        let err = parse("localhost 127.0.0.1", ParseOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "line 1: 'localhost' is not an IP address");
    }

    #[test]
    fn test_missing_hostname_is_rejected() {
        let err = parse("\n10.0.0.1\n", ParseOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("line 2:"));
    }
}
