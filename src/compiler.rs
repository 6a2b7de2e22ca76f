//! Translate an expression into a MongoDB filter document.
//!
//! Operands are compiled before their parent, so nested combinators become
//! nested `$and`/`$or`/`$nor` documents. Operator names go through the same
//! [`Registry`] as the evaluator, which gives the compiler the same aliases
//! and `!` negation.

use crate::coerce::{to_date, to_text};
use crate::errors::CompileError;
use crate::expression::ENode;
use crate::functions::{Op, Registry};
use crate::options::Options;
use serde_json::{json, Map, Value};
use tracing::{debug, trace};

pub struct Compiler<'a> {
    registry: Registry,
    options: &'a Options,
}

impl<'a> Compiler<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            registry: Registry::with_builtins(),
            options,
        }
    }

    pub fn compile(&self, expr: &Value) -> Result<Value, CompileError> {
        self.compile_node(expr, 0)
    }

    fn compile_node(&self, expr: &Value, depth: usize) -> Result<Value, CompileError> {
        let (name, raw_operands) = match ENode::classify(expr) {
            ENode::Literal(v) => return Ok(v.clone()),
            ENode::Call { name, operands } => (name, operands),
        };
        let max_depth = self.options.settings.max_depth;
        if depth >= max_depth {
            return Err(CompileError::DepthExceeded(max_depth));
        }
        trace!(operator = name, depth, "compile");

        let operands = raw_operands
            .iter()
            .map(|o| self.compile_node(o, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(doc) = self.builtin(name, &operands) {
            return Ok(doc);
        }

        let key = name.to_lowercase();
        if let Some(c) = self.options.converter(&key) {
            debug!(operator = name, "custom converter");
            return Ok(c.convert(&operands));
        }
        Err(CompileError::NoMatch {
            operator: name.to_string(),
        })
    }

    fn builtin(&self, name: &str, operands: &[Value]) -> Option<Value> {
        let entry = self.registry.get(name)?;
        let negated = entry.negated;
        let field = operands.first().map(field_name).unwrap_or_default();
        let value = || operands.get(1).cloned().unwrap_or(Value::Null);
        let rest = || Value::Array(operands.get(1..).unwrap_or(&[]).to_vec());
        let subs = || Value::Array(operands.to_vec());
        // `{field: {op: v}}`, or `{field: {$not: {op: v}}}` when negated
        let predicate = |op: &str, v: Value| {
            let cond = json!({ op: v });
            let cond = if negated { json!({ "$not": cond }) } else { cond };
            scoped(&field, cond)
        };

        let doc = match entry.op {
            Op::Has => scoped(&field, json!({ "$exists": !negated })),
            Op::Eq if negated => scoped(&field, json!({ "$ne": value() })),
            Op::Eq => scoped(&field, json!({ "$eq": value() })),
            Op::Gt => predicate("$gt", value()),
            Op::Lt => predicate("$lt", value()),
            Op::Gte => predicate("$gte", value()),
            Op::Lte => predicate("$lte", value()),
            Op::In if negated => scoped(&field, json!({ "$nin": rest() })),
            Op::In => scoped(&field, json!({ "$in": rest() })),
            Op::Match => {
                let mut cond = Map::new();
                cond.insert("$regex".into(), value());
                if let Some(flags) = operands.get(2).filter(|f| !to_text(f).is_empty()) {
                    cond.insert("$options".into(), flags.clone());
                }
                let cond = Value::Object(cond);
                scoped(&field, if negated { json!({ "$not": cond }) } else { cond })
            }
            Op::All if negated => json!({ "$nor": [{ "$and": subs() }] }),
            Op::All => json!({ "$and": subs() }),
            Op::Any if negated => json!({ "$nor": subs() }),
            Op::Any => json!({ "$or": subs() }),
            Op::None if negated => json!({ "$or": subs() }),
            Op::None => json!({ "$nor": subs() }),
            Op::ToDate => to_date(operands.first().unwrap_or(&Value::Null)),
            _ => return None,
        };
        Some(doc)
    }
}

fn field_name(v: &Value) -> String {
    to_text(v)
}

fn scoped(field: &str, cond: Value) -> Value {
    let mut m = Map::new();
    m.insert(field.to_string(), cond);
    Value::Object(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn c(expr: Value) -> Value {
        Compiler::new(&Options::default()).compile(&expr).unwrap()
    }

    #[test]
    fn negated_ordering_wraps_in_not() {
        assert_eq!(c(json!(["!>", "age", 3])), json!({ "age": { "$not": { "$gt": 3 } } }));
        assert_eq!(
            c(json!(["!match", "name", "^a", "i"])),
            json!({ "name": { "$not": { "$regex": "^a", "$options": "i" } } })
        );
    }

    #[test]
    fn aliases_compile_like_canonical_names() {
        assert_eq!(c(json!(["eq", "a", 1])), c(json!(["==", "a", 1])));
        assert_eq!(c(json!(["EXISTS", "a"])), json!({ "a": { "$exists": true } }));
        assert_eq!(c(json!(["gte", "n", 2])), json!({ "n": { "$gte": 2 } }));
    }

    #[test]
    fn negated_combinators() {
        assert_eq!(c(json!(["!any", ["==", "a", 1]])), json!({ "$nor": [{ "a": { "$eq": 1 } }] }));
        assert_eq!(c(json!(["!none", ["==", "a", 1]])), json!({ "$or": [{ "a": { "$eq": 1 } }] }));
        assert_eq!(
            c(json!(["!all", ["==", "a", 1]])),
            json!({ "$nor": [{ "$and": [{ "a": { "$eq": 1 } }] }] })
        );
    }

    #[test]
    fn non_text_fields_use_their_text_form() {
        assert_eq!(c(json!(["==", 3, 1])), json!({ "3": { "$eq": 1 } }));
    }

    #[test]
    fn evaluator_only_operators_do_not_compile() {
        let opts = Options::default();
        let err = Compiler::new(&opts)
            .compile(&json!(["geo-within", "loc", { "type": "Point", "coordinates": [0, 0] }]))
            .unwrap_err();
        assert_eq!(err, CompileError::NoMatch { operator: "geo-within".into() });
    }
}
