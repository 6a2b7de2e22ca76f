use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

pub mod builtins;
pub mod spatial;

/// Built-in operators. Every alias in [`ALIASES`] resolves to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Has,
    Empty,
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Match,
    All,
    Any,
    None,
    ToDate,
    ToNumber,
    ToBoolean,
    ToText,
    TypeOf,
    Concat,
    Uppercase,
    Lowercase,
    Case,
    Coalesce,
    Let,
    Var,
    Get,
    Length,
    At,
    StringOf,
    NumberOf,
    ObjectOf,
    BooleanOf,
    ArrayOf,
    GeoWithin,
    GeoContains,
    GeoDisjoint,
    GeoCrosses,
    GeoOverlap,
}

impl Op {
    /// Only predicates can be negated with a `!` prefix.
    pub fn produces_boolean(self) -> bool {
        matches!(
            self,
            Op::Has
                | Op::Empty
                | Op::Eq
                | Op::Lt
                | Op::Lte
                | Op::Gt
                | Op::Gte
                | Op::In
                | Op::Match
                | Op::All
                | Op::Any
                | Op::None
                | Op::ToBoolean
                | Op::GeoWithin
                | Op::GeoContains
                | Op::GeoDisjoint
                | Op::GeoCrosses
                | Op::GeoOverlap
        )
    }
}

/// Operator names as written in expressions (lower case).
pub const ALIASES: &[(&str, Op)] = &[
    ("has", Op::Has),
    ("have", Op::Has),
    ("exist", Op::Has),
    ("exists", Op::Has),
    ("empty", Op::Empty),
    ("==", Op::Eq),
    ("=", Op::Eq),
    ("eq", Op::Eq),
    ("<", Op::Lt),
    ("lt", Op::Lt),
    ("<=", Op::Lte),
    ("lte", Op::Lte),
    (">", Op::Gt),
    ("gt", Op::Gt),
    (">=", Op::Gte),
    ("gte", Op::Gte),
    ("in", Op::In),
    ("match", Op::Match),
    ("all", Op::All),
    ("any", Op::Any),
    ("none", Op::None),
    ("to-date", Op::ToDate),
    ("todate", Op::ToDate),
    ("date", Op::ToDate),
    ("to-number", Op::ToNumber),
    ("tonumber", Op::ToNumber),
    ("to-boolean", Op::ToBoolean),
    ("toboolean", Op::ToBoolean),
    ("to-string", Op::ToText),
    ("tostring", Op::ToText),
    ("typeof", Op::TypeOf),
    ("concat", Op::Concat),
    ("uppercase", Op::Uppercase),
    ("upcase", Op::Uppercase),
    ("lowercase", Op::Lowercase),
    ("downcase", Op::Lowercase),
    ("case", Op::Case),
    ("coalesce", Op::Coalesce),
    ("let", Op::Let),
    ("var", Op::Var),
    ("get", Op::Get),
    ("length", Op::Length),
    ("at", Op::At),
    ("string", Op::StringOf),
    ("number", Op::NumberOf),
    ("object", Op::ObjectOf),
    ("boolean", Op::BooleanOf),
    ("array", Op::ArrayOf),
    ("geo-within", Op::GeoWithin),
    ("geo-contains", Op::GeoContains),
    ("geo-disjoint", Op::GeoDisjoint),
    ("geo-crosses", Op::GeoCrosses),
    ("geo-overlap", Op::GeoOverlap),
];

/// A registry hit: the operator and whether its result is inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub op: Op,
    pub negated: bool,
}

/// Name → operator table. Registering a predicate also registers its
/// `!`-prefixed inverse, so `!=` and `!in` fall out of `=` and `in`.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<String, Entry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table. Built once; every call shares the same map.
    pub fn with_builtins() -> Self {
        BUILTINS.clone()
    }

    pub fn register(&mut self, name: &str, op: Op) {
        let name = name.to_lowercase();
        let map = Arc::make_mut(&mut self.inner);
        if op.produces_boolean() {
            map.insert(format!("!{name}"), Entry { op, negated: true });
        }
        map.insert(name, Entry { op, negated: false });
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<Entry> {
        self.inner.get(&name.to_lowercase()).copied()
    }
}

static BUILTINS: LazyLock<Registry> = LazyLock::new(|| {
    let mut registry = Registry::new();
    for (name, op) in ALIASES {
        registry.register(name, *op);
    }
    registry
});

/// Caller-defined predicate: `(comparative, rest) -> bool`.
pub trait Comparison: Send + Sync {
    fn compare(&self, value: &Value, rest: &[Value]) -> bool;
}

impl<F> Comparison for F
where
    F: Fn(&Value, &[Value]) -> bool + Send + Sync,
{
    fn compare(&self, value: &Value, rest: &[Value]) -> bool {
        self(value, rest)
    }
}

/// Caller-defined value producer: `(context, operands) -> value`.
pub trait Operator: Send + Sync {
    fn apply(&self, context: Option<&Value>, operands: &[Value]) -> Value;
}

impl<F> Operator for F
where
    F: Fn(Option<&Value>, &[Value]) -> Value + Send + Sync,
{
    fn apply(&self, context: Option<&Value>, operands: &[Value]) -> Value {
        self(context, operands)
    }
}

/// Transform applied to a field written as `name(field)`.
pub trait Modifier: Send + Sync {
    fn modify(&self, value: &Value, context: Option<&Value>) -> Value;
}

impl<F> Modifier for F
where
    F: Fn(&Value, Option<&Value>) -> Value + Send + Sync,
{
    fn modify(&self, value: &Value, context: Option<&Value>) -> Value {
        self(value, context)
    }
}

/// Compiler fallback for operators without a query mapping.
pub trait Converter: Send + Sync {
    fn convert(&self, operands: &[Value]) -> Value;
}

impl<F> Converter for F
where
    F: Fn(&[Value]) -> Value + Send + Sync,
{
    fn convert(&self, operands: &[Value]) -> Value {
        self(operands)
    }
}
