use crate::ast::{ASTNode, Operator, Parser};
use crate::error::{EvaluationError, SyntaxError};
use crate::functions;
use log::debug;

/// Postfix instruction with variables already resolved to slot indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Push(f64),
    Load(usize),
    /// A variable missing from the slot layout; fails when executed.
    Unbound(String),
    Unary(Operator),
    Binary(Operator),
    CallFunction { name: String, args: usize },
}

/// Immutable compiled form of an expression. Each `execute` call uses its
/// own stack, so one program can serve many threads at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    instructions: Vec<Instruction>,
    variables: Vec<String>,
    max_stack: usize,
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Slot layout: `slots[i]` is the value of `variables()[i]`.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn execute(&self, slots: &[f64]) -> Result<f64, EvaluationError> {
        let mut stack: Vec<f64> = Vec::with_capacity(self.max_stack);

        for instr in &self.instructions {
            match instr {
                Instruction::Push(value) => stack.push(*value),

                Instruction::Load(slot) => {
                    let value = slots.get(*slot).copied().ok_or_else(|| {
                        EvaluationError::UnboundVariable(
                            self.variables.get(*slot).cloned().unwrap_or_default(),
                        )
                    })?;
                    stack.push(value);
                }

                Instruction::Unbound(name) => {
                    return Err(EvaluationError::UnboundVariable(name.clone()))
                }

                Instruction::Unary(operator) => {
                    let operand = pop_value(&mut stack)?;
                    stack.push(operator.apply_unary(operand)?);
                }

                Instruction::Binary(operator) => {
                    let right = pop_value(&mut stack)?;
                    let left = pop_value(&mut stack)?;
                    stack.push(operator.apply(left, right)?);
                }

                Instruction::CallFunction { name, args } => {
                    if stack.len() < *args {
                        return Err(EvaluationError::MalformedProgram(
                            "stack underflow in function call",
                        ));
                    }
                    let arguments = stack.split_off(stack.len() - args);
                    stack.push(functions::call(name, &arguments)?);
                }
            }
        }

        let result = pop_value(&mut stack)?;
        if !stack.is_empty() {
            return Err(EvaluationError::MalformedProgram(
                "values left on the stack",
            ));
        }
        Ok(result)
    }
}

fn pop_value(stack: &mut Vec<f64>) -> Result<f64, EvaluationError> {
    stack
        .pop()
        .ok_or(EvaluationError::MalformedProgram("expected a value on the stack"))
}

pub struct Compiler;

impl Compiler {
    /// Parses and compiles, using the expression's own variables (source order) as the slot layout.
    pub fn compile_expression(expression: &str) -> Result<Program, SyntaxError> {
        let ast = Parser::parse_expression(expression)?;
        let variables = ast.variables();
        Ok(Self::compile(&ast, &variables))
    }

    pub fn compile(ast: &ASTNode, variables: &[String]) -> Program {
        let mut emitter = Emitter {
            variables,
            instructions: Vec::new(),
            depth: 0,
            max_depth: 0,
        };
        emitter.compile_node(ast);

        debug!(
            "compiled {} instruction(s), max stack {}",
            emitter.instructions.len(),
            emitter.max_depth
        );

        Program {
            instructions: emitter.instructions,
            variables: variables.to_vec(),
            max_stack: emitter.max_depth,
        }
    }
}

struct Emitter<'a> {
    variables: &'a [String],
    instructions: Vec<Instruction>,
    depth: usize,
    max_depth: usize,
}

impl Emitter<'_> {
    fn emit(&mut self, instr: Instruction, pops: usize) {
        self.depth = self.depth.saturating_sub(pops) + 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.instructions.push(instr);
    }

    fn compile_node(&mut self, node: &ASTNode) {
        match node {
            ASTNode::Constant(value) => self.emit(Instruction::Push(*value), 0),
            ASTNode::Variable(name) => {
                let instr = match self.variables.iter().position(|v| v == name) {
                    Some(slot) => Instruction::Load(slot),
                    None => Instruction::Unbound(name.clone()),
                };
                self.emit(instr, 0);
            }
            ASTNode::UnaryOperation { operator, operand } => {
                self.compile_node(operand);
                self.emit(Instruction::Unary(*operator), 1);
            }
            ASTNode::BinaryOperation {
                left,
                operator,
                right,
            } => {
                self.compile_node(left);
                self.compile_node(right);
                self.emit(Instruction::Binary(*operator), 2);
            }
            ASTNode::FunctionCall { name, args } => {
                for arg in args {
                    self.compile_node(arg);
                }
                self.emit(
                    Instruction::CallFunction {
                        name: name.clone(),
                        args: args.len(),
                    },
                    args.len(),
                );
            }
        }
    }
}
