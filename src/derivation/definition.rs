//! Kernel definitions

use crate::symbolic::{Expr, Rational, Symbol};

/// The symbols used throughout a kernel derivation.
#[derive(Clone, Debug, PartialEq)]
pub struct KernelSymbols {
    /// Smoothing length.
    pub h: Symbol,
    /// Radius.
    pub r: Symbol,
    /// First displacement component.
    pub x: Symbol,
    /// Second displacement component.
    pub y: Symbol,
    /// Normalized radius `r/h` in which kernel shapes are written.
    pub q: Symbol,
    /// Fresh ratio symbol of re-canonicalized results.
    pub big_q: Symbol,
}

impl Default for KernelSymbols {
    fn default() -> Self {
        Self {
            h: Symbol::new("h"),
            r: Symbol::new("r"),
            x: Symbol::new("x"),
            y: Symbol::new("y"),
            q: Symbol::new("q"),
            big_q: Symbol::new("Q"),
        }
    }
}

/// A radially symmetric kernel `W(r, h) = shape(r/h) * alpha(h)`.
///
/// The shape is only meaningful on `0 <= q <= support`; the kernel vanishes
/// outside.
#[derive(Clone, Debug, PartialEq)]
pub struct KernelDefinition {
    name: String,
    symbols: KernelSymbols,
    shape: Expr,
    alpha: Expr,
    support: Rational,
    dimension: usize,
}

impl KernelDefinition {
    /// Create a new kernel definition.
    ///
    /// `shape` is written in `symbols.q`, `alpha` in `symbols.h`.
    pub fn new(
        name: &str,
        symbols: KernelSymbols,
        shape: Expr,
        alpha: Expr,
        support: Rational,
        dimension: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            symbols,
            shape,
            alpha,
            support,
            dimension,
        }
    }

    /// The Wendland C2 kernel in two dimensions.
    ///
    /// `W = 7/(4 pi h^2) * (1 - q/2)^4 * (2q + 1)` for `0 <= q <= 2`.
    pub fn wendland_c2() -> Self {
        let symbols = KernelSymbols::default();
        let q = Expr::from(&symbols.q);
        let h = Expr::from(&symbols.h);

        let shape = (Expr::one() - q.clone() / 2).powi(4) * (q * 2 + 1);
        let alpha = Expr::rational(7, 4) / Expr::pi() * (Expr::one() / h).powi(2);

        Self::new(
            "Wendland C2",
            symbols,
            shape,
            alpha,
            Rational::from_integer(2),
            2,
        )
    }

    /// Name of the kernel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The symbols of the definition.
    pub fn symbols(&self) -> &KernelSymbols {
        &self.symbols
    }

    /// Dimensionless shape in `q`.
    pub fn shape(&self) -> &Expr {
        &self.shape
    }

    /// Normalization constant in `h`.
    pub fn alpha(&self) -> &Expr {
        &self.alpha
    }

    /// Support radius in units of `h`.
    pub fn support(&self) -> Rational {
        self.support
    }

    /// Space dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The kernel as a function of `r` and `h`.
    pub fn kernel(&self) -> Expr {
        let ratio = Expr::from(&self.symbols.r) / Expr::from(&self.symbols.h);
        self.shape.subs(&Expr::from(&self.symbols.q), &ratio) * self.alpha.clone()
    }
}

impl Default for KernelDefinition {
    fn default() -> Self {
        Self::wendland_c2()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_wendland_kernel_values() {
        let definition = KernelDefinition::wendland_c2();
        let kernel = definition.kernel();
        let symbols = definition.symbols();

        for (r, h, expected) in [
            (0.5, 0.5, 0.4177817256162253),
            (1.0, 0.5, 0.0),
            (0.0, 1.0, 0.5570423008216338),
            (1.0, 1.0, 0.1044454314040563),
            (2.0, 1.0, 0.0),
        ] {
            let values = BTreeMap::from([(symbols.r.clone(), r), (symbols.h.clone(), h)]);
            assert_relative_eq!(kernel.evalf(&values).unwrap(), expected, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_kernel_symbols() {
        let definition = KernelDefinition::default();
        let symbols = definition.kernel().free_symbols();
        assert!(symbols.contains(&definition.symbols().r));
        assert!(symbols.contains(&definition.symbols().h));
        assert!(!symbols.contains(&definition.symbols().q));
        assert_eq!(definition.dimension(), 2);
    }
}
