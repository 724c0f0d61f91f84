//! councilroom-glob - Card filter expressions
//!
//! Card globs may contain boolean filters over card attributes, such as
//! `Cost==3 && Actions>=1 && Cards >= 1`. This crate parses those filters
//! into an AST and evaluates them against one record at a time.
//!
//! # Expression Syntax
//!
//! - **Comparisons**: `actions >= 2`, `Expansion == 'Intrigue'`
//! - **Boolean operators**: `&&`, `||`, `!` and parentheses
//! - **Truthiness**: a bare attribute such as `Victory` is true when non-zero
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use councilroom_glob::{evaluate, parse_filter, Scalar};
//!
//! let expr = parse_filter("actions >= 2 && !victory").unwrap();
//! let mut card = HashMap::new();
//! card.insert("actions".to_string(), Scalar::Number(2.0));
//! card.insert("victory".to_string(), Scalar::Number(0.0));
//! assert_eq!(evaluate(&expr, &card), Ok(true));
//! ```

pub mod ast;
pub mod eval;
pub mod parser;

pub use ast::*;
pub use eval::*;
pub use parser::*;
