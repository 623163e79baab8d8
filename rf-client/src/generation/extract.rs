use serde_json::{Map, Value};

use crate::errors::{GenerationError, GenerationResult};

/// Interpret an LLM reply as a JSON object.
///
/// The whole reply is tried first. If it is valid JSON but not an object, that's final.
/// Otherwise we look for the first balanced `{...}` span inside it that parses as an
/// object, which covers prose before or after the JSON and markdown code fences.
pub fn parse_object(raw: &str) -> GenerationResult<Map<String, Value>> {
    let trimmed = raw.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(other) => {
            return Err(GenerationError::ParseFailure(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            )))
        }
        Err(_) => {}
    }
    balanced_objects(trimmed)
        .find_map(|candidate| match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
        .ok_or_else(|| GenerationError::ParseFailure("no JSON object in response".into()))
}

/// Every top-level brace-balanced span of `text`, in order.
///
/// Scanning resumes after the closing brace of each span, so objects nested inside a
/// span are never offered on their own. An opening brace that never closes ends the scan.
/// Braces inside string literals don't count, and backslash escapes inside strings are honored.
pub fn balanced_objects(text: &str) -> impl Iterator<Item = &str> {
    let mut from = 0;
    std::iter::from_fn(move || {
        let start = from + text.get(from..)?.find('{')?;
        let end = balanced_end(text, start)?;
        from = end + 1;
        Some(&text[start..=end])
    })
}

/// Find the byte index of the `}` that closes the `{` at `start`.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    // All the delimiters are ASCII, so walking bytes never splits a UTF-8 sequence we care about.
    for (offset, &byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
