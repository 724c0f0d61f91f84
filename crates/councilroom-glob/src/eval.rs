//! Expression evaluation
//!
//! Evaluates filter expressions against one record at a time. The record is
//! supplied through [`EvalContext`], which resolves variable names to values.

use crate::ast::*;
use std::collections::HashMap;
use thiserror::Error;

/// Evaluation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    #[error("Type error: cannot compare {lhs} {op} {rhs}")]
    TypeMismatch {
        lhs: &'static str,
        op: &'static str,
        rhs: &'static str,
    },
}

/// Result type for evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Context for evaluation - provides variable values
pub trait EvalContext {
    /// Resolve a variable, or `None` if the record has no such attribute
    fn variable(&self, name: &str) -> Option<Scalar>;
}

impl EvalContext for HashMap<String, Scalar> {
    fn variable(&self, name: &str) -> Option<Scalar> {
        self.get(name).cloned()
    }
}

/// Evaluator for filter expressions
pub struct Evaluator<'a, C: EvalContext + ?Sized> {
    context: &'a C,
}

impl<'a, C: EvalContext + ?Sized> Evaluator<'a, C> {
    /// Create a new evaluator
    pub fn new(context: &'a C) -> Self {
        Self { context }
    }

    /// Evaluate an expression against the context
    pub fn evaluate(&self, expr: &FilterExpr) -> EvalResult<bool> {
        match expr {
            FilterExpr::And(left, right) => Ok(self.evaluate(left)? && self.evaluate(right)?),

            FilterExpr::Or(left, right) => Ok(self.evaluate(left)? || self.evaluate(right)?),

            FilterExpr::Not(inner) => Ok(!self.evaluate(inner)?),

            FilterExpr::Comparison(cmp) => self.evaluate_comparison(cmp),

            FilterExpr::Truthy(operand) => Ok(self.resolve(operand)?.is_truthy()),
        }
    }

    /// Evaluate a comparison predicate
    fn evaluate_comparison(&self, cmp: &Comparison) -> EvalResult<bool> {
        let lhs = self.resolve(&cmp.lhs)?;
        let rhs = self.resolve(&cmp.rhs)?;

        match (&lhs, &rhs) {
            (Scalar::Number(l), Scalar::Number(r)) => Ok(cmp.op.evaluate(*l, *r)),
            (Scalar::Text(l), Scalar::Text(r)) => Ok(cmp.op.evaluate_str(l, r)),
            (Scalar::Bool(l), Scalar::Bool(r)) if cmp.op.is_equality() => {
                Ok((l == r) == (cmp.op == ComparisonOp::Eq))
            }
            // Values of different types are never equal
            _ if cmp.op.is_equality() => Ok(cmp.op == ComparisonOp::Ne),
            _ => Err(EvalError::TypeMismatch {
                lhs: lhs.type_name(),
                op: cmp.op.as_str(),
                rhs: rhs.type_name(),
            }),
        }
    }

    /// Resolve an operand to a value
    fn resolve(&self, operand: &Operand) -> EvalResult<Scalar> {
        match operand {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Variable(name) => self
                .context
                .variable(name)
                .ok_or_else(|| EvalError::VariableNotFound(name.clone())),
        }
    }
}

/// Evaluate an expression against a single context
pub fn evaluate<C: EvalContext + ?Sized>(expr: &FilterExpr, context: &C) -> EvalResult<bool> {
    Evaluator::new(context).evaluate(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_filter;

    fn card(pairs: &[(&str, &str)]) -> HashMap<String, Scalar> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Scalar::from_attribute(v)))
            .collect()
    }

    fn matches(filter: &str, ctx: &HashMap<String, Scalar>) -> EvalResult<bool> {
        evaluate(&parse_filter(filter).unwrap(), ctx)
    }

    #[test]
    fn test_evaluate_comparison() {
        let village = card(&[("Actions", "2"), ("Cards", "1"), ("Cost", "3")]);
        assert_eq!(matches("Actions>=2", &village), Ok(true));
        assert_eq!(matches("Actions>2", &village), Ok(false));
        assert_eq!(matches("Cost==3 && Actions>=1 && Cards >= 1", &village), Ok(true));
    }

    #[test]
    fn test_evaluate_or_and_not() {
        let estate = card(&[("Victory", "1"), ("Reaction", "0")]);
        assert_eq!(matches("Victory || Reaction", &estate), Ok(true));
        assert_eq!(matches("!Victory", &estate), Ok(false));
        assert_eq!(matches("!(Reaction)", &estate), Ok(true));
    }

    #[test]
    fn test_string_comparison() {
        let golem = card(&[("Cost", "4P"), ("Expansion", "Alchemy")]);
        assert_eq!(matches("Cost == '4P'", &golem), Ok(true));
        assert_eq!(matches("Expansion != 'Base'", &golem), Ok(true));
    }

    #[test]
    fn test_missing_variable() {
        let ctx = card(&[("Actions", "1")]);
        assert_eq!(
            matches("Cards > 1", &ctx),
            Err(EvalError::VariableNotFound("Cards".to_string()))
        );
    }

    #[test]
    fn test_short_circuit_skips_missing_variable() {
        let ctx = card(&[("Actions", "1")]);
        assert_eq!(matches("Actions > 1 && Cards > 1", &ctx), Ok(false));
        assert_eq!(matches("Actions == 1 || Cards > 1", &ctx), Ok(true));
    }

    #[test]
    fn test_type_mismatch() {
        let ctx = card(&[("Actions", "?")]);
        assert_eq!(
            matches("Actions >= 2", &ctx),
            Err(EvalError::TypeMismatch {
                lhs: "string",
                op: ">=",
                rhs: "number"
            })
        );
    }

    #[test]
    fn test_mixed_type_equality() {
        let golem = card(&[("Cost", "4P")]);
        assert_eq!(matches("Cost == 4", &golem), Ok(false));
        assert_eq!(matches("Cost != 4", &golem), Ok(true));
        assert!(matches("Cost < 5", &golem).is_err());
    }

    #[test]
    fn test_bool_equality() {
        let ctx = card(&[]);
        assert_eq!(matches("true == true", &ctx), Ok(true));
        assert_eq!(matches("true != false", &ctx), Ok(true));
        assert!(matches("true < false", &ctx).is_err());
    }
}
