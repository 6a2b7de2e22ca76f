use crate::bindings::Bindings;
use crate::coerce::{self, to_boolean, to_text, truthy};
use crate::comparison::{cmp_values, values_equal};
use crate::errors::{EvalError, Result};
use crate::expression::{split_negation, ENode};
use crate::functions::spatial::{self, GeoPredicate};
use crate::functions::{builtins, Op, Registry};
use crate::options::Options;
use crate::resolver::{self, parse_modifier};
use crate::settings::UnknownOperatorPolicy;
use serde_json::Value;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// An operand after evaluation, remembering whether it was written inline
/// (and so may name a field) or computed by a nested expression.
struct Operand<'e> {
    raw: &'e Value,
    value: Value,
    computed: bool,
}

impl Operand<'_> {
    /// Text written directly in the expression: a candidate field reference.
    fn reference(&self) -> Option<&str> {
        match self.raw {
            Value::String(s) if !self.computed => Some(s.as_str()),
            _ => None,
        }
    }
}

/// One top-level walk: the options in force, the context and the binding
/// stack it owns.
pub(crate) struct Walk<'a> {
    registry: &'a Registry,
    options: &'a Options,
    context: Option<&'a Value>,
    bindings: Bindings,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(registry: &'a Registry, options: &'a Options, context: Option<&'a Value>) -> Self {
        Self {
            registry,
            options,
            context,
            bindings: Bindings::new(),
        }
    }

    pub(crate) fn eval(&mut self, expr: &Value, depth: usize) -> Result<Value> {
        let (name, raw_operands) = match ENode::classify(expr) {
            ENode::Literal(v) => return Ok(v.clone()),
            ENode::Call { name, operands } => (name, operands),
        };
        let max_depth = self.options.settings.max_depth;
        if depth >= max_depth {
            return Err(EvalError::DepthExceeded(max_depth));
        }
        trace!(operator = name, depth, "evaluate");

        let mut operands = Vec::with_capacity(raw_operands.len());
        for raw in raw_operands {
            let computed = matches!(ENode::classify(raw), ENode::Call { .. });
            let value = self.eval(raw, depth + 1)?;
            operands.push(Operand { raw, value, computed });
        }

        if name == "!" {
            let first = operands.first().map(|o| &o.value).unwrap_or(&Value::Null);
            return Ok(Value::Bool(!to_boolean(first)));
        }

        if let Some(entry) = self.registry.get(name) {
            let result = self.apply(entry.op, &operands);
            return Ok(if entry.negated {
                Value::Bool(!truthy(&result))
            } else {
                result
            });
        }

        self.extension(name, &operands)
    }

    /// Host comparisons, then host operators, then the unknown-operator policy.
    fn extension(&self, name: &str, operands: &[Operand]) -> Result<Value> {
        let key = name.to_lowercase();
        let values: Vec<Value> = operands.iter().map(|o| o.value.clone()).collect();

        let comparison = match self.options.comparison(&key) {
            Some(c) => Some((c, false)),
            None => match split_negation(&key) {
                (true, bare) => self.options.comparison(bare).map(|c| (c, true)),
                _ => None,
            },
        };
        if let Some((c, negated)) = comparison {
            debug!(operator = name, negated, "custom comparison");
            let comparative = operands.first().map(|o| self.comparative(o)).unwrap_or(Value::Null);
            let rest = values.get(1..).unwrap_or(&[]);
            return Ok(Value::Bool(c.compare(&comparative, rest) != negated));
        }

        if let Some(o) = self.options.operator(&key) {
            debug!(operator = name, "custom operator");
            return Ok(o.apply(self.context, &values));
        }

        match self.options.settings.unknown_operator {
            UnknownOperatorPolicy::PassThrough => {
                debug!(operator = name, "unknown operator passed through");
                let mut node = Vec::with_capacity(values.len() + 1);
                node.push(Value::String(name.to_string()));
                node.extend(values);
                Ok(Value::Array(node))
            }
            UnknownOperatorPolicy::Strict => Err(EvalError::UnknownOperator(name.to_string())),
        }
    }

    /// `name(arg)` with a registered modifier `name`.
    fn modified(&self, operand: &Operand) -> Option<Value> {
        let (name, arg) = parse_modifier(operand.reference()?)?;
        let modifier = self.options.modifier(name)?;
        let arg = Value::String(arg.to_string());
        let value = resolver::resolve(self.context, &arg).unwrap_or(Value::Null);
        Some(modifier.modify(&value, self.context))
    }

    /// The value an operator compares: a written field name is looked up,
    /// falling back to the text itself when the field is missing.
    fn comparative(&self, operand: &Operand) -> Value {
        if let Some(v) = self.modified(operand) {
            return v;
        }
        match operand.reference() {
            Some(_) => resolver::resolve(self.context, operand.raw).unwrap_or_else(|| operand.value.clone()),
            None => operand.value.clone(),
        }
    }

    /// Like `comparative`, but a missing field stays missing.
    fn field(&self, operand: &Operand) -> Option<Value> {
        if let Some(v) = self.modified(operand) {
            return Some(v);
        }
        match operand.reference() {
            Some(_) => resolver::resolve(self.context, operand.raw),
            None => Some(operand.value.clone()),
        }
    }

    fn apply(&mut self, op: Op, operands: &[Operand]) -> Value {
        let values: Vec<Value> = operands.iter().map(|o| o.value.clone()).collect();
        let nth = |i: usize| values.get(i).unwrap_or(&Value::Null);

        if op == Op::Let {
            let name = to_text(nth(0));
            trace!(name = %name, "let");
            self.bindings.bind(name, nth(1).clone());
            return Value::Bool(true);
        }

        let first = operands.first();
        let comparative = || first.map(|o| self.comparative(o)).unwrap_or(Value::Null);
        let field = || first.and_then(|o| self.field(o));
        let ordered = |pred: fn(Ordering) -> bool| Value::Bool(cmp_values(&comparative(), nth(1), pred));
        let geo = |p: GeoPredicate| Value::Bool(spatial::evaluate(p, &comparative(), nth(1)));
        let rest = values.get(1..).unwrap_or(&[]);

        match op {
            Op::Has => Value::Bool(field().map(|v| !v.is_null()).unwrap_or(false)),
            Op::Empty => Value::Bool(coerce::is_empty(field().as_ref())),
            Op::Eq => Value::Bool(values_equal(&comparative(), nth(1))),
            Op::Lt => ordered(Ordering::is_lt),
            Op::Lte => ordered(Ordering::is_le),
            Op::Gt => ordered(Ordering::is_gt),
            Op::Gte => ordered(Ordering::is_ge),
            Op::In => Value::Bool(builtins::contains_any(&comparative(), rest)),
            Op::Match => Value::Bool(builtins::matches(&comparative(), nth(1), values.get(2))),
            Op::All => Value::Bool(builtins::all(&values)),
            Op::Any => Value::Bool(builtins::any(&values)),
            Op::None => Value::Bool(!builtins::any(&values)),
            Op::ToDate => coerce::to_date(nth(0)),
            Op::ToNumber => coerce::to_number(nth(0)),
            Op::ToBoolean => Value::Bool(to_boolean(nth(0))),
            Op::ToText => Value::String(to_text(nth(0))),
            Op::TypeOf => Value::String(coerce::type_name(values.first()).to_string()),
            Op::Concat => builtins::concat(&values),
            Op::Uppercase => Value::String(to_text(nth(0)).to_uppercase()),
            Op::Lowercase => Value::String(to_text(nth(0)).to_lowercase()),
            Op::Case => builtins::case(&values),
            Op::Coalesce => builtins::coalesce(&values),
            Op::Let => Value::Bool(true),
            Op::Var => self.bindings.lookup(&to_text(nth(0))).cloned().unwrap_or(Value::Null),
            Op::Get => resolver::get_or(self.context, nth(0), nth(1).clone()),
            Op::Length => builtins::length(field().as_ref()),
            Op::At => builtins::at(&values),
            Op::StringOf => builtins::first_of(&values, Value::is_string),
            Op::NumberOf => builtins::first_of(&values, Value::is_number),
            Op::ObjectOf => builtins::first_of(&values, Value::is_object),
            Op::BooleanOf => builtins::first_of(&values, Value::is_boolean),
            Op::ArrayOf => builtins::first_of(&values, Value::is_array),
            Op::GeoWithin => geo(GeoPredicate::Within),
            Op::GeoContains => geo(GeoPredicate::Contains),
            Op::GeoDisjoint => geo(GeoPredicate::Disjoint),
            Op::GeoCrosses => geo(GeoPredicate::Crosses),
            Op::GeoOverlap => geo(GeoPredicate::Overlap),
        }
    }
}
