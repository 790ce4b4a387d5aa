use crate::ast::ASTNode;
use crate::error::EvaluationError;
use crate::functions;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Variable bindings consulted during evaluation. Supplied per call and never retained.
pub trait Context {
    fn get(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> Context for HashMap<String, f64, S> {
    fn get(&self, name: &str) -> Option<f64> {
        HashMap::get(self, name).copied()
    }
}

impl Context for BTreeMap<String, f64> {
    fn get(&self, name: &str) -> Option<f64> {
        BTreeMap::get(self, name).copied()
    }
}

/// Binds `names[i]` to `values[i]` without building a map.
#[derive(Debug, Clone, Copy)]
pub struct PositionalContext<'a> {
    names: &'a [String],
    values: &'a [f64],
}

impl<'a> PositionalContext<'a> {
    pub fn new(names: &'a [String], values: &'a [f64]) -> Self {
        Self { names, values }
    }
}

impl Context for PositionalContext<'_> {
    fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .and_then(|index| self.values.get(index).copied())
    }
}

/// Recursively evaluates `ast` against `context`.
///
/// Function arguments are evaluated left to right before the function name
/// is resolved, so an unbound variable inside an unknown call reports the
/// variable first.
pub fn evaluate<C: Context + ?Sized>(ast: &ASTNode, context: &C) -> Result<f64, EvaluationError> {
    match ast {
        ASTNode::Constant(value) => Ok(*value),

        ASTNode::Variable(name) => context
            .get(name)
            .ok_or_else(|| EvaluationError::UnboundVariable(name.clone())),

        ASTNode::UnaryOperation { operator, operand } => {
            let value = evaluate(operand, context)?;
            operator.apply_unary(value)
        }

        ASTNode::BinaryOperation {
            left,
            operator,
            right,
        } => {
            let left_value = evaluate(left, context)?;
            let right_value = evaluate(right, context)?;
            operator.apply(left_value, right_value)
        }

        ASTNode::FunctionCall { name, args } => {
            let values = args
                .iter()
                .map(|arg| evaluate(arg, context))
                .collect::<Result<Vec<f64>, EvaluationError>>()?;
            functions::call(name, &values)
        }
    }
}

impl ASTNode {
    pub fn evaluate<C: Context + ?Sized>(&self, context: &C) -> Result<f64, EvaluationError> {
        evaluate(self, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Operator, Parser};

    fn eval_str(input: &str, context: &HashMap<String, f64>) -> Result<f64, EvaluationError> {
        Parser::parse_expression(input).unwrap().evaluate(context)
    }

    fn eval_const(input: &str) -> Result<f64, EvaluationError> {
        eval_str(input, &HashMap::new())
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval_const("2+3*4").unwrap(), 14.0);
        assert_eq!(eval_const("(2+3)*4").unwrap(), 20.0);
        assert_eq!(eval_const("2^3^2").unwrap(), 512.0);
        assert_eq!(eval_const("2-3-4").unwrap(), -5.0);
        assert_eq!(eval_const("16/4/2").unwrap(), 2.0);
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(eval_const("-3+5").unwrap(), 2.0);
        assert_eq!(eval_const("3*-2").unwrap(), -6.0);
        assert_eq!(eval_const("3--2").unwrap(), 5.0);
        assert_eq!(eval_const("-2^2").unwrap(), -4.0);
        assert_eq!(eval_const("2^-1").unwrap(), 0.5);
        assert_eq!(eval_const("--2").unwrap(), 2.0);
        assert_eq!(eval_const("max(1,-2)").unwrap(), 1.0);
    }

    #[test]
    fn test_functions() {
        assert_eq!(eval_const("max(3,7)").unwrap(), 7.0);
        assert_eq!(eval_const("max(7,3)").unwrap(), 7.0);
        assert_eq!(eval_const("sin(0)").unwrap(), 0.0);
        assert_eq!(eval_const("max(sin(0), 2) * 10").unwrap(), 20.0);
    }

    #[test]
    fn test_function_errors() {
        assert_eq!(
            eval_const("max(1,2,3)"),
            Err(EvaluationError::ArityMismatch {
                function: "max".to_string(),
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            eval_const("sin()"),
            Err(EvaluationError::ArityMismatch {
                function: "sin".to_string(),
                expected: 1,
                found: 0
            })
        );
        assert_eq!(
            eval_const("foo(1)"),
            Err(EvaluationError::UnknownFunction("foo".to_string()))
        );
    }

    #[test]
    fn test_arguments_evaluated_before_dispatch() {
        assert_eq!(
            eval_const("foo(y)"),
            Err(EvaluationError::UnboundVariable("y".to_string()))
        );
    }

    #[test]
    fn test_division_guard() {
        assert!(matches!(
            eval_const("5/0"),
            Err(EvaluationError::DivisionByZero { .. })
        ));
        assert!(matches!(
            eval_const("5/0.00000000001"),
            Err(EvaluationError::DivisionByZero { .. })
        ));
        assert_eq!(eval_const("5/0.1").unwrap(), 50.0);

        let context = HashMap::from([("x".to_string(), 1e-10)]);
        assert!(matches!(
            eval_str("5/x", &context),
            Err(EvaluationError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_variables() {
        let context = HashMap::from([("x1".to_string(), 3.0), ("y".to_string(), -2.0)]);
        assert_eq!(eval_str("x1^2 + y", &context).unwrap(), 7.0);
        assert_eq!(
            eval_str("x1 + z", &context),
            Err(EvaluationError::UnboundVariable("z".to_string()))
        );
    }

    #[test]
    fn test_mixed_function_expression() {
        let context = HashMap::from([("x1".to_string(), 3.0)]);
        let expected = 9.0 + 1.0 + (3.0f64).sin().max(2.0) * 10.0;
        assert_eq!(
            eval_str("3^2 + 1 + max(sin(x1), 2) * 10", &context).unwrap(),
            expected
        );
    }

    #[test]
    fn test_direct_ast() {
        let ast = ASTNode::binary(
            ASTNode::Variable("x".to_string()),
            Operator::Add,
            ASTNode::Constant(20.0),
        );
        let context = BTreeMap::from([("x".to_string(), 50.0)]);
        assert_eq!(ast.evaluate(&context).unwrap(), 70.0);

        let bad_unary = ASTNode::UnaryOperation {
            operator: Operator::Multiply,
            operand: Box::new(ASTNode::Constant(1.0)),
        };
        assert_eq!(
            bad_unary.evaluate(&context),
            Err(EvaluationError::InvalidUnaryOperator(Operator::Multiply))
        );
    }

    #[test]
    fn test_positional_context() {
        let names = vec!["a".to_string(), "b".to_string()];
        let values = [2.0, 5.0];
        let context = PositionalContext::new(&names, &values);
        let ast = Parser::parse_expression("b - a").unwrap();
        assert_eq!(ast.evaluate(&context).unwrap(), 3.0);

        let short = PositionalContext::new(&names, &values[..1]);
        assert_eq!(
            ast.evaluate(&short),
            Err(EvaluationError::UnboundVariable("b".to_string()))
        );
    }

    #[test]
    fn test_repeated_evaluation_is_bit_identical() {
        let ast = Parser::parse_expression("sin(1.5)^3 / 7 - max(0.1, 2^0.5)").unwrap();
        let context: HashMap<String, f64> = HashMap::new();
        let first = ast.evaluate(&context).unwrap();
        for _ in 0..100 {
            assert_eq!(ast.evaluate(&context).unwrap().to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_concurrent_evaluation() {
        let ast = Parser::parse_expression("x^2 + 1").unwrap();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let ast = &ast;
                    scope.spawn(move || {
                        let context = HashMap::from([("x".to_string(), i as f64)]);
                        ast.evaluate(&context).unwrap()
                    })
                })
                .collect();
            let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            assert_eq!(results, vec![1.0, 2.0, 5.0, 10.0]);
        });
    }
}
