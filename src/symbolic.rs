//! Exact symbolic algebra for kernel derivations
pub mod expression;
pub mod polynomial;
pub mod simplify;
pub mod substitution;

pub use expression::{Expr, Rational, Symbol};
pub use polynomial::{Monomial, Polynomial};
pub use simplify::{simplify, Factored};
pub use substitution::{EvaluationPoint, Substitution};
