pub mod ast;
pub mod cache;
pub mod config;
pub mod equation;
pub mod error;
pub mod functions;
pub mod table;

pub use cache::EquationCache;
pub use config::EvalConfig;
pub use equation::Equation;
pub use error::{Error, EvaluationError, SyntaxError};
pub use table::SampleTable;

use ast::{Context, Parser};

/// Parses and evaluates `expression` in one step.
pub fn evaluate_expression<C: Context + ?Sized>(
    expression: &str,
    context: &C,
) -> Result<f64, Error> {
    let ast = Parser::parse_expression(expression)?;
    Ok(ast.evaluate(context)?)
}
