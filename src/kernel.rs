//! Compiled smoothing kernels
mod cell_grid;
mod density;
mod helpers;
mod pressure;
mod wendland;

pub use cell_grid::{grid_particle_densities, CellGrid};
pub use density::{density, particle_densities};
pub use pressure::EquationOfState;
pub use wendland::WendlandKernel2d;

pub(crate) use helpers::{check_dimensions_evaluate, evaluate_one_target};
