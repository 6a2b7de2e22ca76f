//! Field references: path lookups against the evaluation context and the
//! `name(arg)` modifier shape.

use crate::parser::{ParseError, Parser};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum PathToken {
    Key(String),
    Index(i64),
}

/// Split `a[0].b['c d'].e` into tokens.
pub fn parse_path(path: &str) -> Result<Vec<PathToken>, ParseError> {
    let mut p = Parser::new(path);
    let mut tokens = Vec::new();
    if p.eof() {
        tokens.push(PathToken::Key(String::new()));
        return Ok(tokens);
    }
    loop {
        if p.consume_char('[') {
            p.skip_ws();
            if p.peek_char() == Some('"') || p.peek_char() == Some('\'') {
                let k = p.parse_quoted_string()?;
                p.skip_ws();
                tokens.push(PathToken::Key(k));
            } else {
                let idx = p.parse_int()?;
                tokens.push(PathToken::Index(idx));
            }
            p.expect(']')?;
        } else {
            let k = p.parse_key();
            if k.is_empty() && !tokens.is_empty() {
                return Err(ParseError::InvalidSyntax("empty path segment".into()));
            }
            tokens.push(PathToken::Key(k.to_string()));
        }
        if p.eof() {
            break;
        }
        // `a[0][1]` chains brackets without a dot
        if p.peek_char() != Some('[') {
            p.expect('.')?;
        }
    }
    Ok(tokens)
}

fn step<'v>(node: &'v Value, token: &PathToken) -> Option<&'v Value> {
    match (node, token) {
        (Value::Object(m), PathToken::Key(k)) => m.get(k),
        (Value::Object(m), PathToken::Index(i)) => m.get(&i.to_string()),
        (Value::Array(a), PathToken::Index(i)) => usize::try_from(*i).ok().and_then(|i| a.get(i)),
        (Value::Array(a), PathToken::Key(k)) => k.parse::<usize>().ok().and_then(|i| a.get(i)),
        _ => None,
    }
}

/// Walk `path` from `root`. A key that literally contains dots wins over the
/// path reading of the same text.
pub fn lookup<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    if let Value::Object(m) = root {
        if let Some(v) = m.get(path) {
            return Some(v);
        }
    }
    let tokens = parse_path(path).ok()?;
    tokens.iter().try_fold(root, |node, token| step(node, token))
}

/// Resolve a reference against the context. Text references are looked up
/// when a context object is present; anything else is returned unchanged.
/// `None` means the referenced field does not exist.
pub fn resolve(context: Option<&Value>, reference: &Value) -> Option<Value> {
    match (context, reference) {
        (Some(ctx @ (Value::Object(_) | Value::Array(_))), Value::String(path)) => {
            lookup(ctx, path).cloned()
        }
        _ => Some(reference.clone()),
    }
}

/// Like [`resolve`], but a missing field yields `default`.
pub fn get_or(context: Option<&Value>, reference: &Value, default: Value) -> Value {
    resolve(context, reference).unwrap_or(default)
}

/// Recognise `name(arg)`, e.g. `not(a.b[1])`.
pub fn parse_modifier(text: &str) -> Option<(&str, &str)> {
    let mut p = Parser::new(text);
    let name = p.capture_until('(').ok()?;
    p.expect('(').ok()?;
    let arg = p.capture_until(')').ok()?;
    p.expect(')').ok()?;
    if name.is_empty() || arg.is_empty() || !p.eof() {
        return None;
    }
    Some((name, arg))
}
