//! Derivation of kernel gradients and Laplacians
//!
//! The kernel is rewritten in Cartesian displacement components,
//! differentiated, and the derivatives are re-canonicalized into closed forms
//! in the normalized radius `Q = r/h`.
mod definition;
mod report;

pub use definition::{KernelDefinition, KernelSymbols};
pub use report::DerivationReport;

use crate::symbolic::{simplify, EvaluationPoint, Expr, Polynomial, Rational};
use crate::types::Result;
use log::debug;

/// Symbolic gradient and Laplacian of a kernel.
///
/// All derivatives are stored in their un-simplified Cartesian form, which is
/// also the form used for numeric evaluation.
#[derive(Clone, Debug)]
pub struct KernelDerivation {
    definition: KernelDefinition,
    kernel: Expr,
    cartesian: Expr,
    grad_x: Expr,
    grad_y: Expr,
    laplacian: Expr,
}

impl KernelDerivation {
    /// Derive the gradient and Laplacian of a kernel.
    pub fn new(definition: KernelDefinition) -> Self {
        let symbols = definition.symbols().clone();
        let x = Expr::from(&symbols.x);
        let y = Expr::from(&symbols.y);

        let kernel = definition.kernel();
        let cartesian = kernel.subs(
            &Expr::from(&symbols.r),
            &(x.powi(2) + y.powi(2)).sqrt(),
        );
        debug!("Cartesian form of {}: {}", definition.name(), cartesian);

        let grad_x = cartesian.diff(&symbols.x);
        let grad_y = cartesian.diff(&symbols.y);
        // Second derivatives are taken from the un-simplified first derivatives.
        let laplacian = grad_x.diff(&symbols.x) + grad_y.diff(&symbols.y);
        debug!("Differentiated {} twice", definition.name());

        Self {
            definition,
            kernel,
            cartesian,
            grad_x,
            grad_y,
            laplacian,
        }
    }

    /// The kernel definition.
    pub fn definition(&self) -> &KernelDefinition {
        &self.definition
    }

    /// The kernel in `r` and `h`.
    pub fn kernel(&self) -> &Expr {
        &self.kernel
    }

    /// The kernel in `x`, `y` and `h`.
    pub fn cartesian(&self) -> &Expr {
        &self.cartesian
    }

    /// `dW/dx` in Cartesian form.
    pub fn grad_x(&self) -> &Expr {
        &self.grad_x
    }

    /// `dW/dy` in Cartesian form.
    pub fn grad_y(&self) -> &Expr {
        &self.grad_y
    }

    /// `d2W/dx2 + d2W/dy2` in Cartesian form.
    pub fn laplacian(&self) -> &Expr {
        &self.laplacian
    }

    /// The normalization constant.
    pub fn alpha(&self) -> &Expr {
        self.definition.alpha()
    }

    /// Rewrite a Cartesian expression in the normalized radius and simplify.
    ///
    /// The substitutions run in the order `sqrt(x^2 + y^2) -> r`,
    /// `x^2 -> r^2 - y^2`, `r -> Q*h`. Replacing `r` first would leave
    /// radicals in `x` and `y` behind.
    pub fn simp(&self, expr: &Expr) -> Result<Expr> {
        let symbols = self.definition.symbols();
        let x = Expr::from(&symbols.x);
        let y = Expr::from(&symbols.y);
        let r = Expr::from(&symbols.r);
        let h = Expr::from(&symbols.h);
        let big_q = Expr::from(&symbols.big_q);

        let result = expr
            .subs(&(x.powi(2) + y.powi(2)).sqrt(), &r)
            .subs(&x.powi(2), &(r.powi(2) - y.powi(2)))
            .subs(&r, &(big_q * h));
        simplify(&result)
    }

    /// Simplified form of `expr / alpha`.
    pub fn normalized(&self, expr: &Expr) -> Result<Expr> {
        self.simp(&(expr.clone() / self.alpha().clone()))
    }

    /// Evaluate an expression at a point.
    pub fn evaluate(&self, expr: &Expr, point: &EvaluationPoint) -> Result<f64> {
        point.evaluate(expr)
    }

    /// Value of the kernel at a point binding `r` and `h`.
    pub fn kernel_value(&self, point: &EvaluationPoint) -> Result<f64> {
        point.evaluate(&self.kernel)
    }

    /// The point `x = 1`, `y = 2`, `r = sqrt(5)`, `h = 10`.
    pub fn default_point(&self) -> EvaluationPoint {
        let symbols = self.definition.symbols();
        EvaluationPoint::new()
            .with(&symbols.x, Expr::integer(1))
            .with(&symbols.y, Expr::integer(2))
            .with(&symbols.r, Expr::integer(5).sqrt())
            .with(&symbols.h, Expr::integer(10))
    }

    /// Exact integral of the kernel over its two dimensional support.
    ///
    /// Computes `int_0^support W(Q h) 2 pi Q h^2 dQ`, which is `1` for a
    /// correctly normalized kernel.
    pub fn normalization(&self) -> Result<Expr> {
        let symbols = self.definition.symbols();
        let h = Expr::from(&symbols.h);
        let big_q = Expr::from(&symbols.big_q);

        let radial = self
            .kernel
            .subs(&Expr::from(&symbols.r), &(big_q.clone() * h.clone()));
        let integrand = radial * Expr::integer(2) * Expr::pi() * big_q.clone() * h.powi(2);
        let integral = Polynomial::from_expr(&integrand)?.definite_integral(
            &big_q,
            Rational::from_integer(0),
            self.definition.support(),
        )?;
        Ok(integral.to_expr())
    }

    /// Closed forms and numeric values at `point`.
    pub fn report(&self, point: &EvaluationPoint) -> Result<DerivationReport> {
        Ok(DerivationReport {
            grad_x: self.normalized(&self.grad_x)?,
            grad_y: self.normalized(&self.grad_y)?,
            point: point.clone(),
            grad_x_value: point.evaluate(&self.grad_x)?,
            grad_y_value: point.evaluate(&self.grad_y)?,
            laplacian: self.normalized(&self.laplacian)?,
            laplacian_value: point.evaluate(&self.laplacian)?,
        })
    }
}

impl Default for KernelDerivation {
    fn default() -> Self {
        Self::new(KernelDefinition::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Error;
    use approx::assert_relative_eq;

    #[test]
    fn test_closed_forms() {
        let derivation = KernelDerivation::default();

        assert_eq!(
            derivation.normalized(derivation.grad_x()).unwrap().to_string(),
            "5*x*(Q - 2)^3/(8*h^2)"
        );
        assert_eq!(
            derivation.normalized(derivation.grad_y()).unwrap().to_string(),
            "5*y*(Q - 2)^3/(8*h^2)"
        );
        assert_eq!(
            derivation
                .normalized(derivation.laplacian())
                .unwrap()
                .to_string(),
            "5*(5*Q - 4)*(Q - 2)^2/(8*h^2)"
        );
    }

    #[test]
    fn test_simp_of_kernel() {
        let derivation = KernelDerivation::default();
        let big_q = Expr::from(&derivation.definition().symbols().big_q);

        // The kernel itself in Q: (1 - Q/2)^4 (2Q + 1) == (Q - 2)^4 (2Q + 1) / 16
        let expected = (big_q.clone() - 2).powi(4) * (big_q * 2 + 1) / 16;
        assert_eq!(
            derivation.normalized(derivation.cartesian()).unwrap(),
            expected
        );
    }

    #[test]
    fn test_golden_values() {
        let derivation = KernelDerivation::default();
        let point = derivation.default_point();

        assert_relative_eq!(
            derivation.evaluate(derivation.grad_x(), &point).unwrap(),
            -0.000195157614586787,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            derivation.evaluate(derivation.grad_y(), &point).unwrap(),
            -0.000390315229173573,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            derivation.evaluate(derivation.laplacian(), &point).unwrap(),
            -0.000316617746208086,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_normalization_is_exact() {
        let derivation = KernelDerivation::default();
        assert_eq!(derivation.normalization().unwrap(), Expr::one());
    }

    #[test]
    fn test_zero_smoothing_length() {
        let derivation = KernelDerivation::default();
        let point = derivation
            .default_point()
            .with(&derivation.definition().symbols().h, Expr::zero());

        assert!(matches!(
            derivation.evaluate(derivation.grad_x(), &point),
            Err(Error::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_unmatched_radical_is_an_error() {
        let derivation = KernelDerivation::default();
        let symbols = derivation.definition().symbols();
        let x = Expr::from(&symbols.x);
        let h = Expr::from(&symbols.h);

        // sqrt(x^2 + h^2) is not the radius and cannot be rewritten.
        let expr = (x.powi(2) + h.powi(2)).sqrt();
        assert!(matches!(
            derivation.simp(&expr),
            Err(Error::NotPolynomial(_))
        ));
    }
}
