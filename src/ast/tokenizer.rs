use crate::error::SyntaxError;
use log::{debug, trace};
use std::collections::HashSet;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Variable,
    Operator,
    LeftParen,
    RightParen,
    UnaryMinus,
    Function,
    Comma,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Zero-based character offset of the token's first character.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

/// Numbers and identifiers may start an expression or follow an operator,
/// an opening parenthesis, a negation or a comma.
fn operand_allowed(previous: Option<&Token>) -> bool {
    match previous {
        None => true,
        Some(token) => matches!(
            token.kind,
            TokenKind::Operator | TokenKind::LeftParen | TokenKind::UnaryMinus | TokenKind::Comma
        ),
    }
}

/// Binary operators and commas need a completed operand on their left.
fn follows_operand(previous: Option<&Token>) -> bool {
    match previous {
        None => false,
        Some(token) => matches!(
            token.kind,
            TokenKind::RightParen | TokenKind::Number | TokenKind::Variable
        ),
    }
}

fn is_unary_minus(previous: Option<&Token>) -> bool {
    match previous {
        None => true,
        Some(token) => matches!(
            token.kind,
            TokenKind::Operator | TokenKind::LeftParen | TokenKind::UnaryMinus | TokenKind::Comma
        ),
    }
}

/// Splits an expression into tokens, rejecting illegal character
/// sequences at the first offending character.
pub fn tokenize(text: &str) -> Result<Vec<Token>, SyntaxError> {
    debug!("Tokenizing expression: {}", text);

    let chars: Vec<char> = text.chars().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut open_parens = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }

            if !operand_allowed(tokens.last()) {
                return Err(SyntaxError::IllegalBeforeNumber {
                    found: c,
                    position: start,
                });
            }

            let literal: String = chars[start..i].iter().collect();
            if literal.matches('.').count() > 1 {
                return Err(SyntaxError::InvalidNumber {
                    literal,
                    position: start,
                });
            }

            tokens.push(Token::new(TokenKind::Number, literal, start));
        } else if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                i += 1;
            }

            if !operand_allowed(tokens.last()) {
                return Err(SyntaxError::IllegalBeforeVariable {
                    found: c,
                    position: start,
                });
            }

            let name: String = chars[start..i].iter().collect();
            let kind = if chars.get(i) == Some(&'(') {
                TokenKind::Function
            } else {
                TokenKind::Variable
            };
            tokens.push(Token::new(kind, name, start));
        } else {
            match c {
                '+' | '*' | '/' | '^' => {
                    if !follows_operand(tokens.last()) {
                        return Err(SyntaxError::IllegalBeforeOperator {
                            found: c,
                            position: i,
                        });
                    }
                    tokens.push(Token::new(TokenKind::Operator, c, i));
                }
                '-' => {
                    let kind = if is_unary_minus(tokens.last()) {
                        TokenKind::UnaryMinus
                    } else {
                        TokenKind::Operator
                    };
                    tokens.push(Token::new(kind, c, i));
                }
                '(' => {
                    open_parens += 1;
                    tokens.push(Token::new(TokenKind::LeftParen, c, i));
                }
                ')' => {
                    if open_parens == 0 {
                        return Err(SyntaxError::UnmatchedRightParenthesis { position: i });
                    }
                    open_parens -= 1;
                    tokens.push(Token::new(TokenKind::RightParen, c, i));
                }
                ',' => {
                    if !follows_operand(tokens.last()) {
                        return Err(SyntaxError::IllegalComma { position: i });
                    }
                    tokens.push(Token::new(TokenKind::Comma, c, i));
                }
                other => {
                    return Err(SyntaxError::UnknownCharacter {
                        found: other,
                        position: i,
                    })
                }
            }
            i += 1;
        }

        if let Some(token) = tokens.last() {
            trace!("token: {:?}", token);
        }
    }

    if open_parens > 0 {
        return Err(SyntaxError::UnmatchedLeftParenthesis { open: open_parens });
    }

    match tokens.last() {
        None => Err(SyntaxError::EmptyExpression),
        Some(token) if matches!(token.kind, TokenKind::Operator | TokenKind::UnaryMinus) => {
            Err(SyntaxError::TrailingOperator {
                operator: token.text.clone(),
            })
        }
        Some(_) => Ok(tokens),
    }
}

/// Distinct variable names in order of first appearance.
pub fn collect_variables(tokens: &[Token]) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Variable)
        .filter(|token| seen.insert(token.text.as_str()))
        .map(|token| token.text.clone())
        .collect()
}
