//! SPH kernels
//!
//! Symbolic derivation of smoothing kernel gradients and Laplacians, and the
//! compiled kernels that use the derived closed forms.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod derivation;
pub mod kernel;
pub mod quadrature;
pub mod symbolic;
pub mod traits;
pub mod types;
