use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

// Errors an evaluation can report when the caller asks for them
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    // Operator name with no built-in, comparison or operator match (strict policy only)
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    // Expression nested deeper than the configured limit
    #[error("expression nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),
}

// Errors produced while compiling to a query document
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    // No target mapping and no converter for this operator
    #[error("no query mapping for operator: {operator}")]
    NoMatch { operator: String },

    #[error("expression nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),
}

// Type alias for results that use `EvalError` as the error type
pub type Result<T> = std::result::Result<T, EvalError>;
