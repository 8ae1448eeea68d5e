//! Type definitions.

/// Definition of a numerical quadrature rule.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericalQuadratureDefinition {
    /// The dimension d of a single point.
    pub dim: usize,

    /// The order of the quadrature rule.
    pub order: usize,

    /// The number of points of the quadrature rule.
    pub npoints: usize,

    /// The weights of the quadrature rule.
    pub weights: Vec<f64>,
    /// The point coordinates of the quadrature rule.
    ///
    /// The points of a rule of dimension d are stored consecutively, the
    /// first point at position zero, the second at position d.
    pub points: Vec<f64>,
}

impl NumericalQuadratureDefinition {
    /// Apply a one dimensional rule to `f` on the reference interval.
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F) -> f64 {
        self.points
            .iter()
            .zip(self.weights.iter())
            .map(|(point, weight)| weight * f(*point))
            .sum()
    }
}
