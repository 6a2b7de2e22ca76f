// src/expression.rs
use serde_json::Value;

/// How a JSON value reads as part of the grammar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ENode<'a> {
    /// Anything that is not an operator-headed array; returned as-is.
    Literal(&'a Value),
    Call { name: &'a str, operands: &'a [Value] },
}

impl<'a> ENode<'a> {
    /// An array is a call when it is headed by text and has at least one
    /// operand. The combinators also accept no operands: `["all"]` is the
    /// empty conjunction.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => match items.split_first() {
                Some((Value::String(name), operands))
                    if !operands.is_empty() || is_nullary_combinator(name) =>
                {
                    ENode::Call { name, operands }
                }
                _ => ENode::Literal(value),
            },
            _ => ENode::Literal(value),
        }
    }
}

const NULLARY_COMBINATORS: &[&str] = &["all", "any", "none"];

fn is_nullary_combinator(name: &str) -> bool {
    let (_, bare) = split_negation(name);
    NULLARY_COMBINATORS
        .iter()
        .any(|c| bare.eq_ignore_ascii_case(c))
}

/// Split a leading `!` off an operator name. The bare `!` is not a prefix.
pub fn split_negation(name: &str) -> (bool, &str) {
    match name.strip_prefix('!') {
        Some(rest) if !rest.is_empty() => (true, rest),
        _ => (false, name),
    }
}
