//! Mining values out of raw service payloads.
//!
//! Status and metadata documents are parsed structurally; the identifier
//! collectors walk the parsed tree in document order (`serde_json` is built
//! with `preserve_order`, so object fields keep their payload order). A
//! plain text scan remains as a fallback for payloads that do not parse as
//! JSON at all.

use serde_json::Value;

/// Extract the completion percentage from a `progress` string.
///
/// The service reports either a numeric form (`"57% complete"`) or a bare
/// completion marker (`"complete"`). The first contiguous digit run wins;
/// a value with no digits is the completion marker and reads as 100.
pub fn parse_progress(progress: &str) -> u8 {
    let digits: String = progress
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse::<u32>().map_or(100, |p| p.min(100) as u8)
}

/// Pretty-print a JSON payload, returning the input unchanged when it does
/// not parse.
pub fn pretty_json(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

/// Collect every string value stored under `key` anywhere in the document,
/// in document order.
pub fn collect_string_fields(value: &Value, key: &str) -> Vec<String> {
    let mut found = Vec::new();
    walk(value, key, &mut found);
    found
}

fn walk(value: &Value, key: &str, found: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                if name == key {
                    if let Value::String(s) = child {
                        found.push(s.clone());
                    }
                }
                walk(child, key, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, key, found);
            }
        }
        _ => {}
    }
}

/// Text-scan fallback: collect values of `"key": "value"` occurrences in a
/// raw payload that did not parse as JSON. Tolerates arbitrary whitespace
/// around the separating colon.
pub fn scan_string_fields(text: &str, key: &str) -> Vec<String> {
    let needle = format!("\"{key}\"");
    let mut found = Vec::new();
    let mut rest = text;

    while let Some(at) = rest.find(&needle) {
        rest = &rest[at + needle.len()..];
        let after = rest.trim_start();
        let Some(after_colon) = after.strip_prefix(':') else {
            continue;
        };
        let after_colon = after_colon.trim_start();
        let Some(value_start) = after_colon.strip_prefix('"') else {
            continue;
        };
        if let Some(end) = value_start.find('"') {
            found.push(value_start[..end].to_string());
        }
    }

    found
}

/// Structural collection when the payload parses, text scan when it does
/// not.
pub fn mine_string_fields(raw: &str, key: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => collect_string_fields(&value, key),
        Err(_) => scan_string_fields(raw, key),
    }
}

/// De-duplicate, keeping the first occurrence of each value so the result
/// follows payload order.
pub fn dedup_first_seen(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
