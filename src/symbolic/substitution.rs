//! Substitution of sub-expressions and numeric evaluation points

use crate::symbolic::expression::{Expr, Rational, Symbol};
use crate::types::Result;
use itertools::Itertools;
use num::{Signed, Zero};
use std::collections::BTreeMap;
use std::fmt;

/// A set of `pattern -> replacement` rules applied simultaneously.
///
/// A pattern matches any node that is structurally equal to it. A power
/// pattern `b^p` (a bare `b` counts as `b^1`) additionally matches `b^e`
/// whenever `e/p` is an integer `k`, which is rewritten to `replacement^k`.
/// For integer exponents of the same sign and `|e| > |p|` the power is split,
/// so `x^3` under `x^2 -> z` becomes `z*x`. Replacements are not searched
/// again.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    rules: Vec<(Expr, Expr)>,
}

impl Substitution {
    /// Create an empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule.
    pub fn with(mut self, pattern: Expr, replacement: Expr) -> Self {
        self.rules.push((pattern, replacement));
        self
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Return true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply all rules to `expr`.
    pub fn apply(&self, expr: &Expr) -> Expr {
        for (pattern, replacement) in &self.rules {
            if let Some(result) = match_rule(expr, pattern, replacement) {
                return result;
            }
        }
        match expr {
            Expr::Add(terms) => Expr::sum(terms.iter().map(|term| self.apply(term)).collect()),
            Expr::Mul(factors) => {
                Expr::product(factors.iter().map(|factor| self.apply(factor)).collect())
            }
            Expr::Pow(base, exponent) => Expr::power(self.apply(base), *exponent),
            _ => expr.clone(),
        }
    }
}

fn match_rule(expr: &Expr, pattern: &Expr, replacement: &Expr) -> Option<Expr> {
    if expr == pattern {
        return Some(replacement.clone());
    }
    if matches!(pattern, Expr::Number(_)) {
        return None;
    }

    let (pattern_base, pattern_exponent) = match pattern {
        Expr::Pow(base, exponent) => (base.as_ref(), *exponent),
        _ => (pattern, Rational::from_integer(1)),
    };
    let (base, exponent) = match expr {
        Expr::Pow(base, exponent) => (base.as_ref(), *exponent),
        _ => return None,
    };
    if base != pattern_base {
        return None;
    }

    let ratio = exponent / pattern_exponent;
    if ratio.is_integer() {
        return Some(Expr::power(replacement.clone(), ratio));
    }
    if exponent.is_integer()
        && pattern_exponent.is_integer()
        && exponent.signum() == pattern_exponent.signum()
    {
        let count = ratio.trunc();
        if !count.is_zero() {
            return Some(Expr::product(vec![
                Expr::power(replacement.clone(), count),
                Expr::power(base.clone(), exponent - count * pattern_exponent),
            ]));
        }
    }
    None
}

impl Expr {
    /// Replace `pattern` by `replacement`.
    pub fn subs(&self, pattern: &Expr, replacement: &Expr) -> Expr {
        Substitution::new()
            .with(pattern.clone(), replacement.clone())
            .apply(self)
    }

    /// Apply a substitution mapping.
    pub fn subs_all(&self, substitution: &Substitution) -> Expr {
        substitution.apply(self)
    }
}

/// Concrete values for free symbols.
///
/// Values are kept exact (e.g. `r = sqrt(5)`) and collapsed to `f64` when an
/// expression is evaluated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationPoint {
    values: Vec<(Symbol, Expr)>,
}

impl EvaluationPoint {
    /// Create an empty evaluation point.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `symbol` to `value`, replacing an earlier binding.
    pub fn with(mut self, symbol: &Symbol, value: Expr) -> Self {
        match self.values.iter_mut().find(|(bound, _)| bound == symbol) {
            Some((_, old)) => *old = value,
            None => self.values.push((symbol.clone(), value)),
        }
        self
    }

    /// The value bound to `symbol`.
    pub fn get(&self, symbol: &Symbol) -> Option<&Expr> {
        self.values
            .iter()
            .find(|(bound, _)| bound == symbol)
            .map(|(_, value)| value)
    }

    /// The bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Expr)> {
        self.values.iter().map(|(symbol, value)| (symbol, value))
    }

    /// Numeric values of all bindings.
    pub fn numeric_values(&self) -> Result<BTreeMap<Symbol, f64>> {
        let empty = BTreeMap::new();
        self.values
            .iter()
            .map(|(symbol, value)| Ok((symbol.clone(), value.evalf(&empty)?)))
            .collect()
    }

    /// Evaluate `expr` at this point.
    pub fn evaluate(&self, expr: &Expr) -> Result<f64> {
        expr.evalf(&self.numeric_values()?)
    }
}

impl fmt::Display for EvaluationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.values
                .iter()
                .map(|(symbol, value)| format!("{symbol}: {value}"))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Error;
    use approx::assert_relative_eq;

    #[test]
    fn test_subs_symbol() {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let expr = Expr::from(&x).powi(2) + Expr::from(&x);

        let result = expr.subs(&Expr::from(&x), &(Expr::from(&y) + 1));
        let y = Expr::from(&y);
        assert_eq!(result, (y.clone() + 1).powi(2) + y + 1);
    }

    #[test]
    fn test_subs_radical_powers() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let r = Expr::symbol("r");
        let squared = x.powi(2) + y.powi(2);
        let expr = squared.pow(Rational::new(-3, 2)) * x.clone() + squared.sqrt();

        let result = expr.subs(&squared.sqrt(), &r);
        assert_eq!(result, r.powi(-3) * x + r);
    }

    #[test]
    fn test_subs_splits_integer_powers() {
        let x = Expr::symbol("x");
        let z = Expr::symbol("z");

        assert_eq!(x.powi(4).subs(&x.powi(2), &z), z.powi(2));
        assert_eq!(x.powi(3).subs(&x.powi(2), &z), z.clone() * x.clone());
        assert_eq!(x.subs(&x.powi(2), &z), x);
        assert_eq!(x.powi(-2).subs(&x.powi(2), &z), z.powi(-1));
    }

    #[test]
    fn test_subs_simultaneous() {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let ex = Expr::from(&x);
        let ey = Expr::from(&y);
        let swap = Substitution::new()
            .with(ex.clone(), ey.clone())
            .with(ey.clone(), ex.clone());

        let expr = ex.powi(2) * ey.clone();
        assert_eq!(expr.subs_all(&swap), ey.powi(2) * ex);
        assert_eq!(swap.len(), 2);
    }

    #[test]
    fn test_evaluation_point() {
        let x = Symbol::new("x");
        let r = Symbol::new("r");
        let point = EvaluationPoint::new()
            .with(&x, Expr::integer(1))
            .with(&r, Expr::integer(5).sqrt());

        assert_eq!(point.to_string(), "{x: 1, r: sqrt(5)}");
        assert_relative_eq!(
            point
                .evaluate(&(Expr::from(&x) + Expr::from(&r)))
                .unwrap(),
            1.0 + 5.0_f64.sqrt(),
            epsilon = 1e-14
        );
        assert_eq!(
            point.evaluate(&Expr::symbol("h")),
            Err(Error::UnboundSymbol("h".to_string()))
        );

        let point = point.with(&x, Expr::integer(2));
        assert_eq!(point.get(&x), Some(&Expr::integer(2)));
    }
}
