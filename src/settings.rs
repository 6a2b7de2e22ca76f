use serde::{Deserialize, Serialize};

/// What the evaluator does with an operator nothing knows how to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownOperatorPolicy {
    /// Return the node with its operands resolved, e.g. `["foo", 1, true]`.
    #[default]
    PassThrough,
    /// Report `EvalError::UnknownOperator`.
    Strict,
}

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Evaluation knobs shared by the evaluator and the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub unknown_operator: UnknownOperatorPolicy,
    /// Maximum expression nesting before the walk gives up.
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unknown_operator: UnknownOperatorPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Settings {
    pub fn strict() -> Self {
        Self {
            unknown_operator: UnknownOperatorPolicy::Strict,
            ..Self::default()
        }
    }
}
