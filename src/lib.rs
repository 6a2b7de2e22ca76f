pub mod bindings;
pub mod coerce;
pub mod comparison;
pub mod compiler;
pub mod errors;
pub mod expression;
pub mod functions; // operator registry and extension traits
pub mod options;
pub mod resolver;
pub mod settings;
mod engine;
mod parser;

use serde_json::Value;
use tracing::warn;

pub use compiler::Compiler;
pub use errors::{CompileError, EvalError, Result};
pub use functions::{Comparison, Converter, Modifier, Operator, Registry};
pub use options::Options;
pub use settings::{Settings, UnknownOperatorPolicy};

/// Evaluates expressions with a fixed set of options. Each call gets its own
/// binding stack; the evaluator itself holds no per-call state.
#[derive(Debug, Clone)]
pub struct Evaluator {
    registry: Registry,
    options: Options,
}

impl Evaluator {
    pub fn new(options: Options) -> Self {
        Self {
            registry: Registry::with_builtins(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Evaluate, reporting strict-mode unknown operators and runaway nesting.
    pub fn try_eval(&self, expr: &Value, context: Option<&Value>) -> Result<Value> {
        walk(&self.registry, &self.options, expr, context)
    }

    /// Evaluate; anything `try_eval` would report becomes `false`.
    pub fn eval(&self, expr: &Value, context: Option<&Value>) -> Value {
        or_false(self.try_eval(expr, context))
    }
}

fn walk(registry: &Registry, options: &Options, expr: &Value, context: Option<&Value>) -> Result<Value> {
    engine::Walk::new(registry, options, context).eval(expr, 0)
}

fn or_false(result: Result<Value>) -> Value {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "expression evaluation failed");
        Value::Bool(false)
    })
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Convenience: evaluate once with the given options. Never fails.
pub fn evaluate(expr: &Value, context: Option<&Value>, options: &Options) -> Value {
    or_false(try_evaluate(expr, context, options))
}

pub fn try_evaluate(expr: &Value, context: Option<&Value>, options: &Options) -> Result<Value> {
    walk(&Registry::with_builtins(), options, expr, context)
}

/// Compile to a MongoDB filter document.
pub fn compile(expr: &Value, options: &Options) -> std::result::Result<Value, CompileError> {
    Compiler::new(options).compile(expr)
}
