//! Abstract Syntax Tree for card filter expressions

use serde::{Deserialize, Serialize};

/// A filter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    /// Logical AND of two expressions
    And(Box<FilterExpr>, Box<FilterExpr>),

    /// Logical OR of two expressions
    Or(Box<FilterExpr>, Box<FilterExpr>),

    /// Logical NOT of an expression
    Not(Box<FilterExpr>),

    /// A comparison predicate
    Comparison(Comparison),

    /// A bare operand, tested for truthiness
    Truthy(Operand),
}

impl FilterExpr {
    /// Create an AND expression
    pub fn and(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::And(Box::new(left), Box::new(right))
    }

    /// Create an OR expression
    pub fn or(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::Or(Box::new(left), Box::new(right))
    }

    /// Create a NOT expression
    pub fn not(expr: FilterExpr) -> Self {
        FilterExpr::Not(Box::new(expr))
    }

    /// Check if this is an atomic expression (no operators)
    pub fn is_atomic(&self) -> bool {
        matches!(self, FilterExpr::Comparison(_) | FilterExpr::Truthy(_))
    }

    /// Names of every variable the expression reads, in order of appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterExpr::And(l, r) | FilterExpr::Or(l, r) => {
                l.collect_variables(out);
                r.collect_variables(out);
            }
            FilterExpr::Not(inner) => inner.collect_variables(out),
            FilterExpr::Comparison(c) => {
                for operand in [&c.lhs, &c.rhs] {
                    if let Operand::Variable(name) = operand {
                        out.push(name);
                    }
                }
            }
            FilterExpr::Truthy(Operand::Variable(name)) => out.push(name),
            FilterExpr::Truthy(_) => {}
        }
    }
}

/// A comparison predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Left-hand side (usually a card attribute)
    pub lhs: Operand,
    /// Comparison operator
    pub op: ComparisonOp,
    /// Right-hand side (usually a literal)
    pub rhs: Operand,
}

impl Comparison {
    /// Create a new comparison
    pub fn new(lhs: Operand, op: ComparisonOp, rhs: Operand) -> Self {
        Self { lhs, op, rhs }
    }

    /// Create a `variable op number` comparison
    pub fn variable(name: &str, op: ComparisonOp, value: f64) -> Self {
        Self::new(
            Operand::Variable(name.to_string()),
            op,
            Operand::Literal(Scalar::Number(value)),
        )
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    Ne,
}

impl ComparisonOp {
    /// Evaluate the comparison for two f64 values
    pub fn evaluate(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Le => lhs <= rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Eq => lhs == rhs,
            ComparisonOp::Ne => lhs != rhs,
        }
    }

    /// Evaluate the comparison for two strings (byte-wise ordering)
    pub fn evaluate_str(&self, lhs: &str, rhs: &str) -> bool {
        match self {
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Le => lhs <= rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Eq => lhs == rhs,
            ComparisonOp::Ne => lhs != rhs,
        }
    }

    /// Whether the operator only tests equality
    pub fn is_equality(&self) -> bool {
        matches!(self, ComparisonOp::Eq | ComparisonOp::Ne)
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
        }
    }
}

/// An operand in an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// A variable bound by the evaluation context
    Variable(String),
    /// A literal value
    Literal(Scalar),
}

/// A runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Scalar {
    /// Bind a raw attribute string: numbers become [`Scalar::Number`],
    /// anything else stays text.
    pub fn from_attribute(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Scalar::Number(n),
            _ => Scalar::Text(raw.to_string()),
        }
    }

    /// Truthiness of a bare value
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Number(n) => *n != 0.0 && !n.is_nan(),
            Scalar::Text(s) => !s.is_empty(),
            Scalar::Bool(b) => *b,
        }
    }

    /// Name of the value's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Number(_) => "number",
            Scalar::Text(_) => "string",
            Scalar::Bool(_) => "bool",
        }
    }
}
