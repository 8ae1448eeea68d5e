//! SPH density summation
use crate::traits::SmoothingKernel;
use crate::types::EvalType;
use num::Zero;

/// Density `sum_j m_j W(|at - x_j|)` at a single point.
///
/// `particles` is component-major, `[x_1, ..., x_N, y_1, ..., y_N]`, with one
/// mass per particle.
pub fn density<K: SmoothingKernel>(
    kernel: &K,
    particles: &[K::T],
    masses: &[K::T],
    at: [K::T; 2],
) -> K::T {
    let mut result = [K::T::zero()];
    kernel.evaluate_st(EvalType::Value, particles, &at, masses, &mut result);
    result[0]
}

/// Density at every particle position, including the self contribution.
pub fn particle_densities<K: SmoothingKernel>(
    kernel: &K,
    particles: &[K::T],
    masses: &[K::T],
) -> Vec<K::T> {
    let mut result = vec![K::T::zero(); masses.len()];
    kernel.evaluate_mt(EvalType::Value, particles, particles, masses, &mut result);
    result
}
