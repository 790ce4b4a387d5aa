use crate::ast::Operator;
use thiserror::Error;

/// Malformed expression text or token stream, raised while tokenizing or parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("Illegal character before number: '{found}' at position {position}")]
    IllegalBeforeNumber { found: char, position: usize },

    #[error("Illegal character before variable: '{found}' at position {position}")]
    IllegalBeforeVariable { found: char, position: usize },

    #[error("Illegal character before operator: '{found}' at position {position}")]
    IllegalBeforeOperator { found: char, position: usize },

    #[error("Illegal comma at position {position}")]
    IllegalComma { position: usize },

    #[error("unknown character '{found}' at position {position}")]
    UnknownCharacter { found: char, position: usize },

    #[error("unmatched right parenthesis at position {position}")]
    UnmatchedRightParenthesis { position: usize },

    #[error("unmatched left parenthesis ({open} left open)")]
    UnmatchedLeftParenthesis { open: usize },

    #[error("invalid number literal '{literal}' at position {position}")]
    InvalidNumber { literal: String, position: usize },

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("empty expression")]
    EmptyExpression,

    #[error("expression cannot end on operator '{operator}'")]
    TrailingOperator { operator: String },

    #[error("missing operand for '{operator}'")]
    MissingOperand { operator: String },

    #[error("comma outside of a function call at position {position}")]
    MisplacedComma { position: usize },

    #[error("unbalanced parentheses in token stream")]
    UnbalancedParentheses,

    #[error("malformed expression: {operands} operands left after parsing")]
    MalformedExpression { operands: usize },

    #[error("expression nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Failure while evaluating a parsed expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("variable '{0}' is not bound")]
    UnboundVariable(String),

    #[error("division by near-zero value {divisor}")]
    DivisionByZero { divisor: f64 },

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{function}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("operator '{0}' cannot be used as a unary operator")]
    InvalidUnaryOperator(Operator),

    #[error("equation must have exactly one variable, found {found}")]
    ExpectedSingleVariable { found: usize },

    #[error("variable count mismatch: expected {expected}, found {found}")]
    VariableCountMismatch { expected: usize, found: usize },

    #[error("malformed program: {0}")]
    MalformedProgram(&'static str),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
