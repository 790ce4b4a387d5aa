use crate::ast::{Token, TokenKind};
use crate::error::{EvaluationError, SyntaxError};
use std::fmt;

/// Divisors whose absolute value is below this are rejected instead of divided by.
pub const DIVISION_EPSILON: f64 = 1e-8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Operator {
    pub fn apply(&self, left: f64, right: f64) -> Result<f64, EvaluationError> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide => {
                if right.abs() < DIVISION_EPSILON {
                    Err(EvaluationError::DivisionByZero { divisor: right })
                } else {
                    Ok(left / right)
                }
            }
            Operator::Power => Ok(left.powf(right)),
        }
    }

    /// Only `Subtract` (negation) has a unary form.
    pub fn apply_unary(&self, operand: f64) -> Result<f64, EvaluationError> {
        match self {
            Operator::Subtract => Ok(-operand),
            other => Err(EvaluationError::InvalidUnaryOperator(*other)),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Power => '^',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<&str> for Operator {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "^" => Ok(Operator::Power),
            _ => Err(SyntaxError::UnknownOperator(value.to_string())),
        }
    }
}

impl TryFrom<&Token> for Operator {
    type Error = SyntaxError;

    fn try_from(token: &Token) -> Result<Self, Self::Error> {
        match token.kind {
            TokenKind::Operator | TokenKind::UnaryMinus => Operator::try_from(token.text.as_str()),
            _ => Err(SyntaxError::UnknownOperator(token.text.clone())),
        }
    }
}

/// Binding strength of an operator token; higher binds tighter.
/// Tokens that are not operators get 0.
pub fn precedence(token: &Token) -> u8 {
    match token.kind {
        TokenKind::UnaryMinus => 3,
        TokenKind::Operator => match token.text.as_str() {
            "^" => 4,
            "*" | "/" => 2,
            "+" | "-" => 1,
            _ => 0,
        },
        _ => 0,
    }
}

/// `^` and the prefix minus group right-to-left, everything else left-to-right.
pub fn associativity(token: &Token) -> Associativity {
    match token.kind {
        TokenKind::UnaryMinus => Associativity::Right,
        TokenKind::Operator if token.text == "^" => Associativity::Right,
        _ => Associativity::Left,
    }
}
