use crate::ast::{
    associativity, precedence, tokenize, ASTNode, Associativity, Operator, Token, TokenKind,
};
use crate::error::SyntaxError;
use log::{debug, trace};

/// Deepest tree the parser will build. Deeper input is rejected so that the
/// recursive compile, evaluate and drop passes stay within the thread stack.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Operator-precedence (shunting-yard) parser over the tokenizer's output.
pub struct Parser;

impl Parser {
    pub fn parse_expression(input: &str) -> Result<ASTNode, SyntaxError> {
        debug!("Parsing expression: {}", input);
        let tokens = tokenize(input)?;
        Self::parse(&tokens)
    }

    pub fn parse(tokens: &[Token]) -> Result<ASTNode, SyntaxError> {
        let mut state = ParserState::default();

        for (i, token) in tokens.iter().enumerate() {
            let previous = i.checked_sub(1).map(|p| &tokens[p]);

            match token.kind {
                TokenKind::Number => {
                    let value = parse_number(token)?;
                    state.push_operand(ASTNode::Constant(value), 1)?;
                }
                TokenKind::Variable => {
                    state.push_operand(ASTNode::Variable(token.text.clone()), 1)?;
                }
                // A prefix minus has no left operand, so nothing on the stack can be reduced yet.
                // This is what makes `--2` = 2 and `2^-1` = 0.5 parse instead of failing.
                TokenKind::UnaryMinus | TokenKind::Function => state.operators.push(token),
                TokenKind::Operator => {
                    state.reduce_while_binds_tighter(token)?;
                    state.operators.push(token);
                }
                TokenKind::LeftParen => {
                    if state.top_is(TokenKind::Function) {
                        state.arg_counts.push(0);
                    }
                    state.operators.push(token);
                }
                TokenKind::Comma => state.close_argument(token)?,
                TokenKind::RightParen => state.close_group(previous)?,
            }

            trace!(
                "after {:?}: {} operator(s), {} operand(s), arg counts {:?}",
                token.text,
                state.operators.len(),
                state.operands.len(),
                state.arg_counts
            );
        }

        let ast = state.finish()?;
        debug!("Parse result: {:?}", ast);
        Ok(ast)
    }
}

fn parse_number(token: &Token) -> Result<f64, SyntaxError> {
    token
        .text
        .parse::<f64>()
        .map_err(|_| SyntaxError::InvalidNumber {
            literal: token.text.clone(),
            position: token.position,
        })
}

#[derive(Default)]
struct ParserState<'a> {
    /// Operators, negations, open parentheses and pending function names.
    operators: Vec<&'a Token>,
    /// Completed sub-expressions.
    operands: Vec<ASTNode>,
    /// Tree depth of each entry in `operands`.
    depths: Vec<usize>,
    /// One argument counter per open function call.
    arg_counts: Vec<usize>,
}

impl<'a> ParserState<'a> {
    fn top_is(&self, kind: TokenKind) -> bool {
        self.operators.last().is_some_and(|top| top.kind == kind)
    }

    fn push_operand(&mut self, node: ASTNode, depth: usize) -> Result<(), SyntaxError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(SyntaxError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.operands.push(node);
        self.depths.push(depth);
        Ok(())
    }

    fn pop_operand(&mut self) -> Option<(ASTNode, usize)> {
        let node = self.operands.pop()?;
        let depth = self.depths.pop().unwrap_or(1);
        Some((node, depth))
    }

    fn reduce_while_binds_tighter(&mut self, incoming: &Token) -> Result<(), SyntaxError> {
        let incoming_precedence = precedence(incoming);
        let left_associative = associativity(incoming) == Associativity::Left;

        while let Some(top) = self.operators.last().copied() {
            if !matches!(top.kind, TokenKind::Operator | TokenKind::UnaryMinus) {
                break;
            }

            let top_precedence = precedence(top);
            if top_precedence > incoming_precedence
                || (top_precedence == incoming_precedence && left_associative)
            {
                self.operators.pop();
                self.reduce(top)?;
            } else {
                break;
            }
        }

        Ok(())
    }

    /// Pops operands for `token` and pushes the resulting node.
    fn reduce(&mut self, token: &Token) -> Result<(), SyntaxError> {
        let operator = Operator::try_from(token)?;
        let missing = || SyntaxError::MissingOperand {
            operator: token.text.clone(),
        };

        trace!("reducing {:?}", token.text);

        if token.kind == TokenKind::UnaryMinus {
            let (operand, depth) = self.pop_operand().ok_or_else(missing)?;
            let node = ASTNode::UnaryOperation {
                operator,
                operand: Box::new(operand),
            };
            self.push_operand(node, depth + 1)
        } else {
            if self.operands.len() < 2 {
                return Err(missing());
            }
            let (right, right_depth) = self.pop_operand().ok_or_else(missing)?;
            let (left, left_depth) = self.pop_operand().ok_or_else(missing)?;
            self.push_operand(
                ASTNode::binary(left, operator, right),
                left_depth.max(right_depth) + 1,
            )
        }
    }

    fn reduce_to_left_paren(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.operators.last().copied() {
                Some(top) if top.kind == TokenKind::LeftParen => return Ok(()),
                Some(top) if matches!(top.kind, TokenKind::Operator | TokenKind::UnaryMinus) => {
                    self.operators.pop();
                    self.reduce(top)?;
                }
                _ => return Err(SyntaxError::UnbalancedParentheses),
            }
        }
    }

    fn close_argument(&mut self, comma: &Token) -> Result<(), SyntaxError> {
        if self.arg_counts.is_empty() {
            return Err(SyntaxError::MisplacedComma {
                position: comma.position,
            });
        }

        self.reduce_to_left_paren()?;

        if let Some(count) = self.arg_counts.last_mut() {
            *count += 1;
        }
        Ok(())
    }

    fn close_group(&mut self, previous: Option<&Token>) -> Result<(), SyntaxError> {
        self.reduce_to_left_paren()?;
        self.operators.pop();

        let Some(function) = self.operators.last().copied() else {
            return Ok(());
        };
        if function.kind != TokenKind::Function {
            return Ok(());
        }
        self.operators.pop();

        let mut count = self
            .arg_counts
            .pop()
            .ok_or(SyntaxError::UnbalancedParentheses)?;

        // `f()` and a trailing `f(a,)` add no argument of their own
        if previous.is_some_and(|p| !matches!(p.kind, TokenKind::LeftParen | TokenKind::Comma)) {
            count += 1;
        }

        if self.operands.len() < count {
            return Err(SyntaxError::MissingOperand {
                operator: function.text.clone(),
            });
        }

        let split = self.operands.len() - count;
        let args = self.operands.split_off(split);
        let depth = self.depths.split_off(split).into_iter().max().unwrap_or(0) + 1;
        self.push_operand(
            ASTNode::FunctionCall {
                name: function.text.clone(),
                args,
            },
            depth,
        )
    }

    fn finish(mut self) -> Result<ASTNode, SyntaxError> {
        while let Some(top) = self.operators.pop() {
            if !matches!(top.kind, TokenKind::Operator | TokenKind::UnaryMinus) {
                return Err(SyntaxError::UnbalancedParentheses);
            }
            self.reduce(top)?;
        }

        let operands = self.operands.len();
        if operands != 1 {
            return Err(SyntaxError::MalformedExpression { operands });
        }

        self.operands
            .pop()
            .ok_or(SyntaxError::MalformedExpression { operands })
    }
}
