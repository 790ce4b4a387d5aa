mod extrema;
mod trig;

use crate::error::EvaluationError;
use std::fmt;

/// A function callable from expressions. `call` checks the argument count itself.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub call: fn(&[f64]) -> Result<f64, EvaluationError>,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

const BUILTINS: &[Builtin] = &[trig::SIN, extrema::MAX];

pub fn builtins() -> &'static [Builtin] {
    BUILTINS
}

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

/// Resolves `name` and applies it to already evaluated arguments.
pub fn call(name: &str, args: &[f64]) -> Result<f64, EvaluationError> {
    let builtin =
        lookup(name).ok_or_else(|| EvaluationError::UnknownFunction(name.to_string()))?;
    (builtin.call)(args)
}
