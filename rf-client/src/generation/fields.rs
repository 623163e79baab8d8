//! Typed lookups into a parsed LLM reply.
//!
//! Each lookup takes a list of accepted key spellings, since models mix camelCase and
//! snake_case. A value of the wrong type counts as missing.

use serde_json::{Map, Value};

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

/// A string with visible content, trimmed
pub fn text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    lookup(map, keys)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The non-blank strings of an array. `None` unless at least one survives.
pub fn text_list(map: &Map<String, Value>, keys: &[&str]) -> Option<Vec<String>> {
    let items = lookup(map, keys)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    (!items.is_empty()).then_some(items)
}

/// A whole, non-negative number that fits in a u32. `30.0` is accepted, `"30"` is not.
pub fn count(map: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    let value = lookup(map, keys)?;
    let whole = match value.as_u64() {
        Some(n) => n,
        None => {
            let f = value.as_f64()?;
            if !(f.is_finite() && f >= 0.0 && f.fract() == 0.0) {
                return None;
            }
            f as u64
        }
    };
    u32::try_from(whole).ok()
}

/// A finite number inside `[low, high]`
pub fn number_within(map: &Map<String, Value>, keys: &[&str], low: f64, high: f64) -> Option<f64> {
    lookup(map, keys)?
        .as_f64()
        .filter(|f| f.is_finite() && (low..=high).contains(f))
}
