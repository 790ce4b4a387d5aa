mod compiler;
mod evaluator;
mod operator;
mod parser;
mod tokenizer;

pub use compiler::*;
pub use evaluator::*;
pub use operator::*;
pub use parser::{Parser, MAX_NESTING_DEPTH};
pub use tokenizer::*;

/// Parsed expression tree. Every node owns its children; there is no sharing.
#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Constant(f64),
    Variable(String),
    UnaryOperation {
        operator: Operator,
        operand: Box<ASTNode>,
    },
    BinaryOperation {
        left: Box<ASTNode>,
        operator: Operator,
        right: Box<ASTNode>,
    },
    FunctionCall {
        name: String,
        args: Vec<ASTNode>,
    },
}

impl ASTNode {
    pub fn negate(operand: ASTNode) -> Self {
        ASTNode::UnaryOperation {
            operator: Operator::Subtract,
            operand: Box::new(operand),
        }
    }

    pub fn binary(left: ASTNode, operator: Operator, right: ASTNode) -> Self {
        ASTNode::BinaryOperation {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// Distinct variable names referenced by the tree, in left-to-right order
    /// of first occurrence.
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut Vec<String>) {
        match self {
            ASTNode::Constant(_) => {}
            ASTNode::Variable(name) => {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            ASTNode::UnaryOperation { operand, .. } => operand.collect_variables(names),
            ASTNode::BinaryOperation { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            ASTNode::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
        }
    }
}
