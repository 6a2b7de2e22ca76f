//! Operand-level implementations of the built-in operators that do not need
//! the context. The engine resolves field references before calling these.

use crate::coerce::{to_text, truthy};
use crate::comparison::values_equal;
use itertools::Itertools;
use fancy_regex::Regex;
use serde_json::Value;

/// Membership: an array value matches when any of its elements is a candidate.
pub fn contains_any(value: &Value, candidates: &[Value]) -> bool {
    let hit = |v: &Value| candidates.iter().any(|c| values_equal(v, c));
    match value {
        Value::Array(items) => items.iter().any(hit),
        scalar => hit(scalar),
    }
}

/// Regex test with JavaScript-style patterns, lookaround and backreferences
/// included. Flags follow the usual single-letter set; `g`, `y` and `u` have
/// no effect on a yes/no test and are ignored. An invalid pattern, an unknown
/// flag or a match that exceeds the backtracking limit never matches.
pub fn matches(subject: &Value, pattern: &Value, flags: Option<&Value>) -> bool {
    let subject = match subject {
        Value::Null => return false,
        Value::String(s) => s.clone(),
        other => to_text(other),
    };
    let mut inline = String::new();
    if let Some(flags) = flags.filter(|f| !f.is_null()) {
        for flag in to_text(flags).chars() {
            match flag {
                'i' | 'm' | 's' | 'x' if !inline.contains(flag) => inline.push(flag),
                'i' | 'm' | 's' | 'x' | 'g' | 'y' | 'u' => {}
                _ => return false,
            }
        }
    }
    let pattern = if inline.is_empty() {
        to_text(pattern)
    } else {
        format!("(?{inline}){}", to_text(pattern))
    };
    Regex::new(&pattern)
        .ok()
        .and_then(|re| re.is_match(&subject).ok())
        .unwrap_or(false)
}

pub fn all(values: &[Value]) -> bool {
    values.iter().all(truthy)
}

pub fn any(values: &[Value]) -> bool {
    values.iter().any(truthy)
}

pub fn concat(values: &[Value]) -> Value {
    Value::String(values.iter().map(to_text).join(""))
}

/// `(condition, output)` pairs, then an optional fallback.
pub fn case(values: &[Value]) -> Value {
    for chunk in values.chunks(2) {
        match chunk {
            [condition, output] if truthy(condition) => return output.clone(),
            [fallback] => return fallback.clone(),
            _ => {}
        }
    }
    Value::Null
}

pub fn coalesce(values: &[Value]) -> Value {
    values
        .iter()
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

pub fn length(value: Option<&Value>) -> Value {
    let n = match value {
        Some(Value::Array(a)) => a.len(),
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::Object(m)) => m.len(),
        _ => 0,
    };
    Value::from(n)
}

fn index_of(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|i| usize::try_from(i).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `["at", i, a, b, c]` picks from the operand list; `["at", i, [a, b, c]]`
/// picks from the single array operand.
pub fn at(values: &[Value]) -> Value {
    let Some((index, rest)) = values.split_first() else {
        return Value::Null;
    };
    let Some(i) = index_of(index) else {
        return Value::Null;
    };
    let picked = match rest {
        [Value::Array(items)] => items.get(i),
        _ if rest.len() > 1 => rest.get(i),
        _ => None,
    };
    picked.cloned().unwrap_or(Value::Null)
}

/// First operand satisfying `kind`, e.g. `Value::is_string`.
pub fn first_of(values: &[Value], kind: fn(&Value) -> bool) -> Value {
    values
        .iter()
        .find(|v| kind(v))
        .cloned()
        .unwrap_or(Value::Null)
}
