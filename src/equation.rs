use crate::ast::{collect_variables, tokenize, ASTNode, Compiler, Context, Parser, Program, Token};
use crate::config::EvalConfig;
use crate::error::{EvaluationError, SyntaxError};
use crate::table::SampleTable;
use log::debug;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// An expression parsed once and evaluated many times.
///
/// Free variables are kept in order of first appearance in the source text.
/// Scalar, batch and table evaluation bind values to them by position.
#[derive(Debug, Clone)]
pub struct Equation {
    source: String,
    tokens: Vec<Token>,
    variables: Vec<String>,
    ast: ASTNode,
    program: Program,
    config: EvalConfig,
}

impl Equation {
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        Self::with_config(source, EvalConfig::default())
    }

    pub fn with_config(source: &str, config: EvalConfig) -> Result<Self, SyntaxError> {
        debug!("Building equation: {}", source);

        let tokens = tokenize(source)?;
        let variables = collect_variables(&tokens);
        let ast = Parser::parse(&tokens)?;
        let program = Compiler::compile(&ast, &variables);

        debug!("Equation '{}' has variables {:?}", source, variables);

        Ok(Self {
            source: source.to_string(),
            tokens,
            variables,
            ast,
            program,
            config,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn ast(&self) -> &ASTNode {
        &self.ast
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluates the tree with name-keyed bindings.
    pub fn evaluate<C: Context + ?Sized>(&self, context: &C) -> Result<f64, EvaluationError> {
        self.ast.evaluate(context)
    }

    fn require_single_variable(&self) -> Result<(), EvaluationError> {
        match self.variables.len() {
            1 => Ok(()),
            found => Err(EvaluationError::ExpectedSingleVariable { found }),
        }
    }

    pub fn eval_scalar(&self, value: f64) -> Result<f64, EvaluationError> {
        self.require_single_variable()?;
        self.program.execute(&[value])
    }

    /// Evaluates every value in order. Any failing sample fails the whole batch.
    pub fn eval_batch(&self, values: &[f64]) -> Result<Vec<f64>, EvaluationError> {
        self.require_single_variable()?;

        let program = &self.program;
        if self.config.is_parallel(values.len()) {
            debug!("Evaluating {} samples in parallel", values.len());
            values
                .par_iter()
                .map(|value| program.execute(std::slice::from_ref(value)))
                .collect()
        } else {
            values
                .iter()
                .map(|value| program.execute(std::slice::from_ref(value)))
                .collect()
        }
    }

    /// Binds column `i` of every row to the `i`-th free variable and
    /// returns one result per row, in row order. A table with no rows
    /// yields no results whatever its column count.
    pub fn eval_table<T>(&self, table: &T) -> Result<Vec<f64>, EvaluationError>
    where
        T: SampleTable + Sync + ?Sized,
    {
        let rows = table.row_count();
        if rows == 0 {
            return Ok(Vec::new());
        }

        let expected = self.variables.len();
        let found = table.column_count();
        if found != expected {
            return Err(EvaluationError::VariableCountMismatch { expected, found });
        }

        let program = &self.program;
        let eval_row = |index: usize| {
            let row = table.row(index);
            if row.len() != expected {
                return Err(EvaluationError::VariableCountMismatch {
                    expected,
                    found: row.len(),
                });
            }
            program.execute(row)
        };

        if self.config.is_parallel(rows) {
            debug!("Evaluating {} rows in parallel", rows);
            (0..rows).into_par_iter().map(eval_row).collect()
        } else {
            (0..rows).map(eval_row).collect()
        }
    }
}

impl FromStr for Equation {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Equation::new(s)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
