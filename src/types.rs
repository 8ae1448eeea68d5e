//! Types specific to sph-kernels

use num::traits::FloatConst;
use std::fmt::Debug;

/// Real scalar type that kernels can be evaluated in.
pub trait RealScalar: num::Float + FloatConst + Debug + Send + Sync {}

impl<T: num::Float + FloatConst + Debug + Send + Sync> RealScalar for T {}

/// Generic error type
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A symbol has no value at the evaluation point.
    #[error("symbol `{0}` has no value at the evaluation point")]
    UnboundSymbol(String),
    /// Zero raised to a negative power.
    #[error("division by zero while evaluating `{0}`")]
    DivisionByZero(String),
    /// A sum survived under a negative or fractional power.
    #[error("`{0}` is not a Laurent polynomial in its generators")]
    NotPolynomial(String),
    /// Integration would produce a logarithm.
    #[error("cannot integrate `{0}`: term has exponent -1")]
    LogarithmicTerm(String),
    /// No quadrature rule with the requested number of points.
    #[error("no Gauss-Legendre rule with {0} points")]
    InvalidQuadrature(usize),
    /// A neighbour grid cannot be built with the given cell size or bounds.
    #[error("invalid neighbour grid: {0}")]
    InvalidGrid(String),
}

/// Result Type
pub type Result<T> = std::result::Result<T, Error>;

/// Evaluation Mode.
///
/// - `Value`: Declares that only values required.
/// - `ValueDeriv`: Both values and gradients required.
/// - `Laplacian`: Only the Laplacian required.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvalType {
    /// Kernel values.
    Value,
    /// Kernel values followed by the gradient components.
    ValueDeriv,
    /// Kernel Laplacian.
    Laplacian,
}
