//! Normalisation of free-text and structured durations and quantities.
//!
//! Absent or empty input always yields `None`; zero is a real value and is
//! returned as `Some(0)`.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn iso_duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"\bP(?:(\d+(?:\.\d+)?)D)?",
            r"(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?",
        ))
        .expect("valid ISO duration regex")
    })
}

fn unit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*(hour|hr|h|minute|min|m)[a-z]*").expect("valid time unit regex")
    })
}

fn integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid integer regex"))
}

/// Parse a duration expression into whole minutes.
///
/// Tried in order, first match wins:
/// 1. ISO-8601 duration (`PT1H30M`, `P1DT2H`, `PT5400S`)
/// 2. `<number><unit>` tokens with hour-like or minute-like units, summed
/// 3. the first bare integer, read as minutes
pub fn parse_duration(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(minutes) = parse_iso_duration(text) {
        return Some(minutes);
    }

    let mut total: Option<u32> = None;
    for caps in unit_regex().captures_iter(text) {
        let Ok(value) = caps[1].parse::<u32>() else {
            continue;
        };
        let minutes = if caps[2].to_ascii_lowercase().starts_with('h') {
            value.saturating_mul(60)
        } else {
            value
        };
        total = Some(total.unwrap_or(0).saturating_add(minutes));
    }
    if total.is_some() {
        return total;
    }

    first_integer(text)
}

/// Only tokens carrying at least one component count, so a stray `PT`
/// does not read as zero minutes. Components may be fractional (`PT1.5H`).
fn parse_iso_duration(text: &str) -> Option<u32> {
    iso_duration_regex().captures_iter(text).find_map(|caps| {
        let component = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
        let parts = [
            (component(1), 24.0 * 60.0),
            (component(2), 60.0),
            (component(3), 1.0),
            (component(4), 1.0 / 60.0),
        ];

        if parts.iter().all(|(value, _)| value.is_none()) {
            return None;
        }

        let minutes: f64 = parts
            .iter()
            .map(|(value, scale)| value.unwrap_or(0.0) * scale)
            .sum();
        // `as` saturates at u32::MAX
        Some(minutes.round() as u32)
    })
}

/// Duration from a structured-data value: numbers are taken as minutes,
/// strings and `{text}` wrappers go through [`parse_duration`].
pub fn parse_duration_value(value: &Value) -> Option<u32> {
    match value {
        Value::Null | Value::Bool(_) => None,
        Value::Number(_) => number_to_u32(value),
        Value::String(s) => parse_duration(s),
        Value::Array(items) => items.iter().find_map(parse_duration_value),
        Value::Object(_) => parse_duration(&extract_text(value)),
    }
}

/// Extract a count (servings, yield) from a structured-data value.
///
/// Numbers are returned as-is; strings and wrapped text yield their first
/// integer substring; arrays yield the first element carrying a count.
pub fn parse_count(value: &Value) -> Option<u32> {
    match value {
        Value::Null | Value::Bool(_) => None,
        Value::Number(_) => number_to_u32(value),
        Value::String(s) => parse_count_str(s),
        Value::Array(items) => items.iter().find_map(parse_count),
        Value::Object(_) => parse_count_str(&extract_text(value)),
    }
}

/// First integer substring of `text`, if any.
pub fn parse_count_str(text: &str) -> Option<u32> {
    first_integer(text)
}

fn first_integer(text: &str) -> Option<u32> {
    integer_regex()
        .find(text)
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
}

fn number_to_u32(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return Some(u32::try_from(n).unwrap_or(u32::MAX));
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f as u32)
}

/// Coerce a structured-data value to trimmed text.
///
/// Plain strings pass through; `{"text": ..}` and `{"@value": ..}` wrappers
/// are unwrapped; anything else yields an empty string.
pub fn extract_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => map
            .get("text")
            .or_else(|| map.get("@value"))
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}
