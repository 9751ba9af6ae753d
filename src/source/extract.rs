//! Pulls the JSON payloads the source embeds in `data-state` attributes.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// `data-state="..."` or `data-state='...'`.
static DATA_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\sdata-state\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid data-state pattern")
});

/// Every non-empty JSON object found in a `data-state` attribute, in document order.
///
/// Payloads that fail to parse, are not objects, or are `{}` are dropped silently.
pub fn extract_states(html: &str) -> Vec<Map<String, Value>> {
    DATA_STATE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter_map(|raw| serde_json::from_str::<Value>(&decode_entities(raw.as_str())).ok())
        .filter_map(|value| match value {
            Value::Object(map) if !map.is_empty() => Some(map),
            _ => None,
        })
        .collect()
}

/// Folds states into one object. On key collisions the later state wins.
pub fn merge_states(states: impl IntoIterator<Item = Map<String, Value>>) -> Map<String, Value> {
    states.into_iter().fold(Map::new(), |mut merged, state| {
        merged.extend(state);
        merged
    })
}

/// Decode the character references that show up inside attribute values.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi))) {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = match name.strip_prefix('#')? {
                hex if hex.starts_with(['x', 'X']) => u32::from_str_radix(&hex[1..], 16).ok()?,
                dec => dec.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
