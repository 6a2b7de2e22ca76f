//! Value normalisation used by the operators: number/date/boolean/text
//! conversion, truthiness, emptiness and `typeof`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use itertools::Itertools;
use serde_json::{Map, Number, Value};

/// Dates travel as `{"$date": "2020-01-01T00:00:00.000Z"}`.
pub const DATE_KEY: &str = "$date";

// f64 integers are exact up to 2^53
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub fn date_value(dt: DateTime<Utc>) -> Value {
    let mut m = Map::new();
    m.insert(
        DATE_KEY.to_string(),
        Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Value::Object(m)
}

/// Read back a value produced by [`date_value`].
pub fn as_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Object(m) if m.len() == 1 => match m.get(DATE_KEY)? {
            Value::String(s) => parse_date_text(s),
            Value::Number(n) => from_millis(n.as_f64()?),
            _ => None,
        },
        _ => None,
    }
}

fn from_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(ms.trunc() as i64)
}

fn parse_date_text(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|n| n.and_utc())
}

/// Build a date from a literal: epoch milliseconds or a timestamp string.
/// Returns `null` when no date can be made.
pub fn to_date(value: &Value) -> Value {
    let dt = match value {
        Value::Number(n) => n.as_f64().and_then(from_millis),
        Value::String(s) => parse_date_text(s),
        other => as_date(other),
    };
    dt.map(date_value).unwrap_or(Value::Null)
}

/// Dates become epoch milliseconds so they order numerically.
pub fn comparable_form(value: &Value) -> Value {
    match as_date(value) {
        Some(dt) => Value::from(dt.timestamp_millis()),
        None => value.clone(),
    }
}

/// JSON number for `f`, integral when possible. Non-finite values become `null`.
pub fn number_value(f: f64) -> Value {
    if !f.is_finite() {
        return Value::Null;
    }
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        return Value::from(f as i64);
    }
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

fn number_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                0.0
            } else {
                t.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        other => as_date(other)
            .map(|dt| dt.timestamp_millis() as f64)
            .unwrap_or(f64::NAN),
    }
}

pub fn to_number(value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        other => number_value(number_f64(other)),
    }
}

/// `"1"`, `"true"` and `"yes"` (any case) are true; booleans keep their value.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"),
        _ => false,
    }
}

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::Array(a) => a.iter().map(to_text).join(","),
        Value::Object(m) => match m.get(DATE_KEY) {
            Some(Value::String(s)) if m.len() == 1 => s.clone(),
            _ => value.to_string(),
        },
    }
}

pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Empty in the lodash sense: scalars other than non-empty text have no content.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(m)) => m.is_empty(),
        Some(Value::Number(_)) | Some(Value::Bool(_)) => true,
    }
}

/// Name of the runtime category, as `typeof` would report it.
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::String(_)) => "string",
        Some(Value::Number(_)) => "number",
        Some(Value::Bool(_)) => "boolean",
        Some(_) => "object",
    }
}
