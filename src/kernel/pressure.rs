//! Equation of state
use rayon::prelude::*;

/// Linear equation of state `p = k (rho - rho_0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EquationOfState {
    /// Rest density `rho_0`.
    pub rest_density: f64,
    /// Gas constant `k`.
    pub gas_constant: f64,
}

impl Default for EquationOfState {
    fn default() -> Self {
        Self {
            rest_density: 1000.0,
            gas_constant: 2000.0,
        }
    }
}

impl EquationOfState {
    /// Pressure at `density`.
    pub fn pressure(&self, density: f64) -> f64 {
        self.gas_constant * (density - self.rest_density)
    }

    /// Pressures for a slice of densities.
    pub fn pressures(&self, densities: &[f64]) -> Vec<f64> {
        densities
            .par_iter()
            .map(|density| self.pressure(*density))
            .collect()
    }
}
