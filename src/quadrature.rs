//! Numerical quadrature
pub mod gauss_legendre;
pub mod types;

pub use gauss_legendre::{available_rules, gauss_legendre_rule, radial_integral};
pub use types::NumericalQuadratureDefinition;
