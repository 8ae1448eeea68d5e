//! Gauss-Legendre rules on the interval [0, 1].

use crate::quadrature::types::NumericalQuadratureDefinition;
use crate::types::{Error, Result};
use log::debug;
use std::collections::HashMap;

/// Largest number of points for which a rule is available.
pub const MAX_POINTS: usize = 32;

const NEWTON_TOLERANCE: f64 = 1e-15;
const NEWTON_MAX_ITERATIONS: usize = 100;

lazy_static! {
    /// Rules keyed by number of points, stored as `(order, points, weights)`.
    static ref GAUSS_LEGENDRE_RULES: HashMap<usize, (usize, Vec<f64>, Vec<f64>)> =
        (1..=MAX_POINTS)
            .map(|npoints| {
                let (points, weights) = compute_rule(npoints);
                (npoints, (2 * npoints - 1, points, weights))
            })
            .collect();
}

/// Legendre polynomial `P_n(x)` and its derivative.
fn legendre(npoints: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = x;
    for k in 2..=npoints {
        let k = k as f64;
        let p2 = ((2.0 * k - 1.0) * x * p1 - (k - 1.0) * p0) / k;
        p0 = p1;
        p1 = p2;
    }
    let n = npoints as f64;
    (p1, n * (x * p1 - p0) / (x * x - 1.0))
}

/// Nodes and weights on [0, 1], nodes in increasing order.
fn compute_rule(npoints: usize) -> (Vec<f64>, Vec<f64>) {
    let n = npoints as f64;
    let mut points = vec![0.0; npoints];
    let mut weights = vec![0.0; npoints];

    for index in 0..npoints {
        let mut x = (std::f64::consts::PI * (index as f64 + 0.75) / (n + 0.5)).cos();
        for _ in 0..NEWTON_MAX_ITERATIONS {
            let (value, derivative) = legendre(npoints, x);
            let step = value / derivative;
            x -= step;
            if step.abs() < NEWTON_TOLERANCE {
                break;
            }
        }
        let (_, derivative) = legendre(npoints, x);

        // The initial guesses run from +1 towards -1.
        let position = npoints - 1 - index;
        points[position] = 0.5 * (1.0 + x);
        weights[position] = 1.0 / ((1.0 - x * x) * derivative * derivative);
    }
    debug!("Computed Gauss-Legendre rule with {} points", npoints);
    (points, weights)
}

/// Return a Gauss-Legendre rule on [0, 1] with `npoints` points.
///
/// The rule integrates polynomials up to degree `2 * npoints - 1` exactly.
pub fn gauss_legendre_rule(npoints: usize) -> Result<NumericalQuadratureDefinition> {
    if let Some((order, points, weights)) = GAUSS_LEGENDRE_RULES.get(&npoints) {
        Ok(NumericalQuadratureDefinition {
            dim: 1,
            order: *order,
            npoints,
            weights: weights.to_vec(),
            points: points.to_vec(),
        })
    } else {
        Err(Error::InvalidQuadrature(npoints))
    }
}

/// Return the numbers of points for which rules are available.
pub fn available_rules() -> Vec<usize> {
    let mut rules: Vec<usize> = GAUSS_LEGENDRE_RULES.keys().copied().collect();
    rules.sort_unstable();
    rules
}

/// Integrate a radial function over a disk of radius `radius`.
///
/// Computes `int_0^radius f(r) 2 pi r dr` with the given rule.
pub fn radial_integral<F: Fn(f64) -> f64>(
    f: F,
    radius: f64,
    rule: &NumericalQuadratureDefinition,
) -> f64 {
    let scale = 2.0 * std::f64::consts::PI * radius * radius;
    scale * rule.integrate(|t| f(radius * t) * t)
}
