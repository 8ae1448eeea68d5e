//! Symbolic expressions

use crate::types::{Error, Result};
use num::rational::Rational64;
use num::{One, Signed, Zero};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Exact rational number used for coefficients and exponents.
pub type Rational = Rational64;

/// A named scalar free variable.
///
/// Symbols are treated as positive reals, which is the domain of every
/// quantity appearing in a smoothing kernel.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol.
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The name of the symbol.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable symbolic expression.
///
/// Expressions should be built through [Expr::sum], [Expr::product],
/// [Expr::power] or the arithmetic operators. These keep every node in
/// canonical form: nested sums and products are flattened, numbers are folded
/// exactly, like terms are collected, equal bases have their exponents added
/// and operands are sorted. Two equal expressions built this way compare equal
/// structurally, which substitution relies on.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    /// Exact rational constant.
    Number(Rational),
    /// The constant pi.
    Pi,
    /// A free variable.
    Symbol(Symbol),
    /// Sum of terms.
    Add(Vec<Expr>),
    /// Product of factors. A numeric coefficient, if any, comes first.
    Mul(Vec<Expr>),
    /// Base raised to a rational power. Square roots have exponent `1/2`.
    Pow(Box<Expr>, Rational),
}

impl Expr {
    /// The integer `value`.
    pub fn integer(value: i64) -> Self {
        Expr::Number(Rational::from_integer(value))
    }

    /// The rational `numer / denom`.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    pub fn rational(numer: i64, denom: i64) -> Self {
        assert!(denom != 0, "Rational {numer}/{denom} has a zero denominator.");
        Expr::Number(Rational::new(numer, denom))
    }

    /// A symbol with the given name.
    pub fn symbol(name: &str) -> Self {
        Expr::Symbol(Symbol::new(name))
    }

    /// The constant pi.
    pub fn pi() -> Self {
        Expr::Pi
    }

    /// Zero.
    pub fn zero() -> Self {
        Expr::integer(0)
    }

    /// One.
    pub fn one() -> Self {
        Expr::integer(1)
    }

    /// Return true if this is the number zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Number(value) if value.is_zero())
    }

    /// Return true if this is the number one.
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Number(value) if value.is_one())
    }

    /// Canonical sum of `terms`.
    pub fn sum(terms: Vec<Expr>) -> Self {
        let mut constant = Rational::zero();
        let mut collected = BTreeMap::<Expr, Rational>::new();

        for term in flatten(terms, |term| match term {
            Expr::Add(inner) => Ok(inner),
            other => Err(other),
        }) {
            match term {
                Expr::Number(value) => constant += value,
                other => {
                    let (coefficient, rest) = other.split_coefficient();
                    *collected.entry(rest).or_insert_with(Rational::zero) += coefficient;
                }
            }
        }

        let mut result = Vec::with_capacity(collected.len() + 1);
        if !constant.is_zero() {
            result.push(Expr::Number(constant));
        }
        result.extend(
            collected
                .into_iter()
                .filter(|(_, coefficient)| !coefficient.is_zero())
                .map(|(rest, coefficient)| with_coefficient(coefficient, rest)),
        );

        match result.len() {
            0 => Expr::zero(),
            1 => result.remove(0),
            _ => Expr::Add(result),
        }
    }

    /// Canonical product of `factors`.
    pub fn product(factors: Vec<Expr>) -> Self {
        let mut coefficient = Rational::one();
        let mut powers = BTreeMap::<Expr, Rational>::new();

        for factor in flatten(factors, |factor| match factor {
            Expr::Mul(inner) => Ok(inner),
            other => Err(other),
        }) {
            match factor {
                Expr::Number(value) => coefficient *= value,
                Expr::Pow(base, exponent) => {
                    *powers.entry(*base).or_insert_with(Rational::zero) += exponent
                }
                other => *powers.entry(other).or_insert_with(Rational::zero) += Rational::one(),
            }
        }

        if coefficient.is_zero() {
            return Expr::zero();
        }

        let mut rest = Vec::with_capacity(powers.len());
        for (base, exponent) in powers {
            match Expr::power(base, exponent) {
                Expr::Number(value) => coefficient *= value,
                Expr::Mul(inner) => {
                    for factor in inner {
                        match factor {
                            Expr::Number(value) => coefficient *= value,
                            other => rest.push(other),
                        }
                    }
                }
                other => rest.push(other),
            }
        }
        if coefficient.is_zero() {
            return Expr::zero();
        }
        rest.sort();

        if rest.is_empty() {
            Expr::Number(coefficient)
        } else if coefficient.is_one() && rest.len() == 1 {
            rest.remove(0)
        } else if coefficient.is_one() {
            Expr::Mul(rest)
        } else {
            let mut factors = Vec::with_capacity(rest.len() + 1);
            factors.push(Expr::Number(coefficient));
            factors.extend(rest);
            Expr::Mul(factors)
        }
    }

    /// Canonical power `base^exponent`.
    pub fn power(base: Expr, exponent: Rational) -> Self {
        if exponent.is_zero() {
            return Expr::one();
        }
        if exponent.is_one() {
            return base;
        }
        match base {
            Expr::Number(value) => number_power(value, exponent),
            Expr::Pow(inner, inner_exponent) => Expr::power(*inner, inner_exponent * exponent),
            Expr::Mul(factors) => Expr::product(
                factors
                    .into_iter()
                    .map(|factor| Expr::power(factor, exponent))
                    .collect(),
            ),
            other => Expr::Pow(Box::new(other), exponent),
        }
    }

    /// Raise to a rational power.
    pub fn pow(&self, exponent: Rational) -> Self {
        Expr::power(self.clone(), exponent)
    }

    /// Raise to an integer power.
    pub fn powi(&self, exponent: i64) -> Self {
        self.pow(Rational::from_integer(exponent))
    }

    /// Square root.
    pub fn sqrt(&self) -> Self {
        self.pow(Rational::new(1, 2))
    }

    /// Split off the numeric coefficient of a term.
    pub fn split_coefficient(&self) -> (Rational, Expr) {
        match self {
            Expr::Number(value) => (*value, Expr::one()),
            Expr::Mul(factors) => match factors.split_first() {
                Some((Expr::Number(value), rest)) => {
                    let rest = if rest.len() == 1 {
                        rest[0].clone()
                    } else {
                        Expr::Mul(rest.to_vec())
                    };
                    (*value, rest)
                }
                _ => (Rational::one(), self.clone()),
            },
            _ => (Rational::one(), self.clone()),
        }
    }

    /// Partial derivative with respect to `symbol`.
    pub fn diff(&self, symbol: &Symbol) -> Expr {
        match self {
            Expr::Number(_) | Expr::Pi => Expr::zero(),
            Expr::Symbol(name) => {
                if name == symbol {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            Expr::Add(terms) => Expr::sum(terms.iter().map(|term| term.diff(symbol)).collect()),
            Expr::Mul(factors) => Expr::sum(
                factors
                    .iter()
                    .enumerate()
                    .filter_map(|(index, factor)| {
                        let derivative = factor.diff(symbol);
                        if derivative.is_zero() {
                            return None;
                        }
                        let mut rest: Vec<Expr> = factors
                            .iter()
                            .enumerate()
                            .filter(|(other, _)| *other != index)
                            .map(|(_, other)| other.clone())
                            .collect();
                        rest.push(derivative);
                        Some(Expr::product(rest))
                    })
                    .collect(),
            ),
            Expr::Pow(base, exponent) => {
                let derivative = base.diff(symbol);
                if derivative.is_zero() {
                    Expr::zero()
                } else {
                    Expr::product(vec![
                        Expr::Number(*exponent),
                        Expr::power((**base).clone(), *exponent - Rational::one()),
                        derivative,
                    ])
                }
            }
        }
    }

    /// The free symbols of the expression.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, symbols: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Number(_) | Expr::Pi => (),
            Expr::Symbol(symbol) => {
                symbols.insert(symbol.clone());
            }
            Expr::Add(children) | Expr::Mul(children) => children
                .iter()
                .for_each(|child| child.collect_symbols(symbols)),
            Expr::Pow(base, _) => base.collect_symbols(symbols),
        }
    }

    /// Evaluate to a floating point number.
    ///
    /// Every free symbol needs a value in `values`.
    pub fn evalf(&self, values: &BTreeMap<Symbol, f64>) -> Result<f64> {
        match self {
            Expr::Number(value) => Ok(rational_to_f64(value)),
            Expr::Pi => Ok(std::f64::consts::PI),
            Expr::Symbol(symbol) => values
                .get(symbol)
                .copied()
                .ok_or_else(|| Error::UnboundSymbol(symbol.name().to_string())),
            Expr::Add(terms) => terms.iter().map(|term| term.evalf(values)).sum(),
            Expr::Mul(factors) => factors.iter().map(|factor| factor.evalf(values)).product(),
            Expr::Pow(base, exponent) => {
                let base_value = base.evalf(values)?;
                if base_value == 0.0 && exponent.is_negative() {
                    return Err(Error::DivisionByZero(self.to_string()));
                }
                if exponent.is_integer() {
                    Ok(base_value.powi(exponent.to_integer() as i32))
                } else {
                    Ok(base_value.powf(rational_to_f64(exponent)))
                }
            }
        }
    }

    fn is_negative_term(&self) -> bool {
        match self {
            Expr::Number(value) => value.is_negative(),
            Expr::Mul(factors) => {
                matches!(factors.first(), Some(Expr::Number(value)) if value.is_negative())
            }
            _ => false,
        }
    }
}

/// Flatten one level of nested operands.
fn flatten<F>(operands: Vec<Expr>, unpack: F) -> Vec<Expr>
where
    F: Fn(Expr) -> std::result::Result<Vec<Expr>, Expr>,
{
    let mut flat = Vec::with_capacity(operands.len());
    for operand in operands {
        match unpack(operand) {
            Ok(inner) => flat.extend(inner),
            Err(other) => flat.push(other),
        }
    }
    flat
}

/// Attach a coefficient to a canonical term without a numeric factor.
fn with_coefficient(coefficient: Rational, term: Expr) -> Expr {
    if coefficient.is_one() {
        return term;
    }
    match term {
        Expr::Number(value) => Expr::Number(coefficient * value),
        Expr::Mul(factors) => {
            let mut result = Vec::with_capacity(factors.len() + 1);
            result.push(Expr::Number(coefficient));
            result.extend(factors);
            Expr::Mul(result)
        }
        other => Expr::Mul(vec![Expr::Number(coefficient), other]),
    }
}

pub(crate) fn rational_to_f64(value: &Rational) -> f64 {
    *value.numer() as f64 / *value.denom() as f64
}

/// Exact integer power of a rational. `value` must be nonzero if `exponent < 0`.
pub(crate) fn rational_powi(value: Rational, exponent: i64) -> Rational {
    let mut base = if exponent < 0 { value.recip() } else { value };
    let mut remaining = exponent.unsigned_abs();
    let mut result = Rational::one();
    while remaining > 0 {
        if remaining & 1 == 1 {
            result *= base;
        }
        base = base * base;
        remaining >>= 1;
    }
    result
}

fn integer_root(value: i64, degree: u32) -> Option<i64> {
    if value < 0 {
        return None;
    }
    let guess = (value as f64).powf(1.0 / degree as f64).round() as i64;
    (guess.saturating_sub(1)..=guess + 1)
        .find(|candidate| *candidate >= 0 && candidate.checked_pow(degree) == Some(value))
}

fn number_power(value: Rational, exponent: Rational) -> Expr {
    if value.is_zero() {
        return if exponent.is_negative() {
            Expr::Pow(Box::new(Expr::Number(value)), exponent)
        } else {
            Expr::zero()
        };
    }
    if value.is_one() {
        return Expr::one();
    }
    if exponent.is_integer() {
        return Expr::Number(rational_powi(value, exponent.to_integer()));
    }

    let degree = *exponent.denom() as u32;
    if let (Some(numer), Some(denom)) = (
        integer_root(*value.numer(), degree),
        integer_root(*value.denom(), degree),
    ) {
        return Expr::Number(rational_powi(
            Rational::new(numer, denom),
            *exponent.numer(),
        ));
    }
    Expr::Pow(Box::new(Expr::Number(value)), exponent)
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::integer(value)
    }
}

impl From<Rational> for Expr {
    fn from(value: Rational) -> Self {
        Expr::Number(value)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Expr::Symbol(symbol)
    }
}

impl From<&Symbol> for Expr {
    fn from(symbol: &Symbol) -> Self {
        Expr::Symbol(symbol.clone())
    }
}

impl<R: Into<Expr>> Add<R> for Expr {
    type Output = Expr;

    fn add(self, rhs: R) -> Expr {
        Expr::sum(vec![self, rhs.into()])
    }
}

impl<R: Into<Expr>> Sub<R> for Expr {
    type Output = Expr;

    fn sub(self, rhs: R) -> Expr {
        Expr::sum(vec![self, -rhs.into()])
    }
}

impl<R: Into<Expr>> Mul<R> for Expr {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        Expr::product(vec![self, rhs.into()])
    }
}

impl<R: Into<Expr>> Div<R> for Expr {
    type Output = Expr;

    fn div(self, rhs: R) -> Expr {
        Expr::product(vec![self, rhs.into().powi(-1)])
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::product(vec![Expr::integer(-1), self])
    }
}

fn format_rational(value: &Rational) -> String {
    if value.is_integer() {
        value.numer().to_string()
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}

fn format_factor(expr: &Expr) -> String {
    match expr {
        Expr::Add(_) => format!("({expr})"),
        Expr::Pow(base, exponent) if exponent.is_positive() => format_power(base, exponent),
        _ => expr.to_string(),
    }
}

/// Format `base^exponent` for a positive exponent.
fn format_power(base: &Expr, exponent: &Rational) -> String {
    if exponent.is_one() {
        return format_factor(base);
    }
    if *exponent == Rational::new(1, 2) {
        return format!("sqrt({base})");
    }
    let base = match base {
        Expr::Number(value) if value.is_integer() && !value.is_negative() => base.to_string(),
        Expr::Pi | Expr::Symbol(_) => base.to_string(),
        _ => format!("({base})"),
    };
    if exponent.is_integer() {
        format!("{base}^{}", exponent.numer())
    } else {
        format!("{base}^({})", format_rational(exponent))
    }
}

fn format_product(f: &mut fmt::Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    let (coefficient, rest) = match factors.split_first() {
        Some((Expr::Number(value), rest)) => (*value, rest),
        _ => (Rational::one(), factors),
    };

    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    if !coefficient.numer().abs().is_one() {
        numerator.push(coefficient.numer().abs().to_string());
    }
    if !coefficient.denom().is_one() {
        denominator.push(coefficient.denom().to_string());
    }
    for factor in rest {
        match factor {
            Expr::Pow(base, exponent) if exponent.is_negative() => {
                denominator.push(format_power(base, &-exponent))
            }
            _ => numerator.push(format_factor(factor)),
        }
    }

    if coefficient.is_negative() {
        write!(f, "-")?;
    }
    if numerator.is_empty() {
        write!(f, "1")?;
    } else {
        write!(f, "{}", numerator.join("*"))?;
    }
    match denominator.len() {
        0 => Ok(()),
        1 => write!(f, "/{}", denominator[0]),
        _ => write!(f, "/({})", denominator.join("*")),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{}", format_rational(value)),
            Expr::Pi => write!(f, "pi"),
            Expr::Symbol(symbol) => write!(f, "{symbol}"),
            Expr::Add(terms) => {
                // Constants go last.
                let ordered = terms
                    .iter()
                    .filter(|term| !matches!(term, Expr::Number(_)))
                    .chain(terms.iter().filter(|term| matches!(term, Expr::Number(_))));
                for (index, term) in ordered.enumerate() {
                    let negative = term.is_negative_term();
                    let magnitude = if negative {
                        -(term.clone())
                    } else {
                        term.clone()
                    };
                    match (index, negative) {
                        (0, true) => write!(f, "-{magnitude}")?,
                        (0, false) => write!(f, "{magnitude}")?,
                        (_, true) => write!(f, " - {magnitude}")?,
                        (_, false) => write!(f, " + {magnitude}")?,
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => format_product(f, factors),
            Expr::Pow(base, exponent) => {
                if exponent.is_negative() {
                    write!(f, "1/{}", format_power(base, &-exponent))
                } else {
                    write!(f, "{}", format_power(base, exponent))
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn symbols() -> (Symbol, Symbol) {
        (Symbol::new("x"), Symbol::new("y"))
    }

    #[test]
    fn test_like_terms_collect() {
        let (x, _) = symbols();
        let x = Expr::from(&x);
        let expr = x.clone() + x.clone() * 3 - x.clone() * 4;
        assert!(expr.is_zero());

        let expr = x.clone() * 2 + 1 + x.clone();
        assert_eq!(expr, x * 3 + 1);
    }

    #[test]
    fn test_powers_combine() {
        let (x, y) = symbols();
        let x = Expr::from(&x);
        let y = Expr::from(&y);
        let radius = (x.powi(2) + y.powi(2)).sqrt();

        assert_eq!(radius.clone() * radius.clone(), x.powi(2) + y.powi(2));
        assert!((radius.clone() / radius).is_one());
        assert_eq!((x.clone() * y.clone()).powi(2), x.powi(2) * y.powi(2));
    }

    #[test]
    fn test_exact_roots() {
        assert_eq!(Expr::integer(4).sqrt(), Expr::integer(2));
        assert_eq!(Expr::rational(9, 16).sqrt(), Expr::rational(3, 4));
        assert_eq!(
            Expr::integer(5).sqrt(),
            Expr::Pow(Box::new(Expr::integer(5)), Rational::new(1, 2))
        );
        assert_eq!(Expr::integer(5).sqrt() * Expr::integer(5).sqrt(), Expr::integer(5));
    }

    #[test]
    fn test_diff_product_rule() {
        let (x, y) = symbols();
        let ex = Expr::from(&x);
        let ey = Expr::from(&y);
        let expr = ex.powi(3) * ey.clone();

        assert_eq!(expr.diff(&x), ex.powi(2) * ey.clone() * 3);
        assert_eq!(expr.diff(&y), ex.powi(3));
        assert!(Expr::pi().diff(&x).is_zero());
    }

    #[test]
    fn test_diff_chain_rule() {
        let (x, y) = symbols();
        let ex = Expr::from(&x);
        let ey = Expr::from(&y);
        let radius = (ex.powi(2) + ey.powi(2)).sqrt();

        assert_eq!(radius.diff(&x), ex / radius);
    }

    #[test]
    fn test_evalf() {
        let (x, y) = symbols();
        let ex = Expr::from(&x);
        let ey = Expr::from(&y);
        let expr = (ex.powi(2) + ey.powi(2)).sqrt() * Expr::pi();

        let values = BTreeMap::from([(x, 3.0), (y.clone(), 4.0)]);
        assert_relative_eq!(
            expr.evalf(&values).unwrap(),
            5.0 * std::f64::consts::PI,
            epsilon = 1e-14
        );

        let values = BTreeMap::from([(y, 4.0)]);
        assert_eq!(
            expr.evalf(&values),
            Err(Error::UnboundSymbol("x".to_string()))
        );
    }

    #[test]
    fn test_evalf_division_by_zero() {
        let (x, _) = symbols();
        let expr = Expr::one() / Expr::from(&x);
        let values = BTreeMap::from([(x, 0.0)]);
        assert!(matches!(expr.evalf(&values), Err(Error::DivisionByZero(_))));
    }

    #[test]
    #[should_panic(expected = "zero denominator")]
    fn test_rational_zero_denominator() {
        Expr::rational(3, 0);
    }

    #[test]
    fn test_display() {
        let (x, y) = symbols();
        let ex = Expr::from(&x);
        let ey = Expr::from(&y);

        assert_eq!((ex.clone() - 2).to_string(), "x - 2");
        assert_eq!((ex.clone() * 5 - 4).to_string(), "5*x - 4");
        assert_eq!((ex.clone() / 2).to_string(), "x/2");
        assert_eq!(
            (ex.clone() * 5 / (ey.powi(2) * 8)).to_string(),
            "5*x/(8*y^2)"
        );
        assert_eq!((ex.powi(2) + ey.powi(2)).sqrt().to_string(), "sqrt(x^2 + y^2)");
        assert_eq!(
            (Expr::one() - ex.clone() / 2).powi(4).to_string(),
            "(-x/2 + 1)^4"
        );
        assert_eq!(ex.powi(-1).to_string(), "1/x");
    }
}
