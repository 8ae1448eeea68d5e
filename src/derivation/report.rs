//! Printable derivation results
use crate::symbolic::{EvaluationPoint, Expr};
use std::fmt;

/// Closed forms of the kernel derivatives and their values at one point.
///
/// The closed forms are divided by the normalization constant.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivationReport {
    /// Simplified `grad_x / alpha`.
    pub grad_x: Expr,
    /// Simplified `grad_y / alpha`.
    pub grad_y: Expr,
    /// The evaluation point.
    pub point: EvaluationPoint,
    /// `grad_x` at the evaluation point.
    pub grad_x_value: f64,
    /// `grad_y` at the evaluation point.
    pub grad_y_value: f64,
    /// Simplified `laplacian / alpha`.
    pub laplacian: Expr,
    /// Laplacian at the evaluation point.
    pub laplacian_value: f64,
}

impl fmt::Display for DerivationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grad x: {}", self.grad_x)?;
        writeln!(f, "Grad y: {}", self.grad_y)?;
        writeln!(f, "{}", self.point)?;
        writeln!(f, "grad_x = {:.15e}", self.grad_x_value)?;
        writeln!(f, "grad_y = {:.15e}", self.grad_y_value)?;
        writeln!(f, "{}", self.laplacian)?;
        writeln!(f, "laplacian_1 = {:.15e}", self.laplacian_value)
    }
}

#[cfg(test)]
mod test {
    use crate::derivation::KernelDerivation;
    use approx::assert_relative_eq;

    fn value_after(line: &str, label: &str) -> f64 {
        line.strip_prefix(label).unwrap().parse().unwrap()
    }

    #[test]
    fn test_report_layout() {
        let derivation = KernelDerivation::default();
        let report = derivation.report(&derivation.default_point()).unwrap();
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Grad x: 5*x*(Q - 2)^3/(8*h^2)");
        assert_eq!(lines[1], "Grad y: 5*y*(Q - 2)^3/(8*h^2)");
        assert_eq!(lines[2], "{x: 1, y: 2, r: sqrt(5), h: 10}");
        assert_relative_eq!(
            value_after(lines[3], "grad_x = "),
            -0.000195157614586787,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            value_after(lines[4], "grad_y = "),
            -0.000390315229173573,
            max_relative = 1e-12
        );
        assert_eq!(lines[5], "5*(5*Q - 4)*(Q - 2)^2/(8*h^2)");
        assert_relative_eq!(
            value_after(lines[6], "laplacian_1 = "),
            -0.000316617746208086,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_values_use_scientific_notation() {
        let derivation = KernelDerivation::default();
        let report = derivation.report(&derivation.default_point()).unwrap();
        let text = report.to_string();

        assert!(text.contains("grad_x = -1.951576145867867e-4"));
        assert!(text.contains("grad_y = -3.903152291735734e-4"));
        assert!(text.contains("laplacian_1 = -3.166177462080864e-4"));
    }
}
