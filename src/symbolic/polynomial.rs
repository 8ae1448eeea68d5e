//! Multivariate Laurent polynomials with exact rational coefficients

use crate::symbolic::expression::{rational_powi, Expr, Rational};
use crate::types::{Error, Result};
use num::{One, Zero};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Add, Mul, Neg, Sub};

/// A product of generators raised to integer powers.
///
/// Generators are atoms: symbols, `pi`, or irrational powers such as
/// `sqrt(5)` that cannot be expanded further.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeMap<Expr, i64>);

impl Monomial {
    /// The empty monomial.
    pub fn one() -> Self {
        Self::default()
    }

    /// `generator^exponent`.
    pub fn generator(generator: Expr, exponent: i64) -> Self {
        let mut exponents = BTreeMap::new();
        if exponent != 0 {
            exponents.insert(generator, exponent);
        }
        Self(exponents)
    }

    /// Return true if no generator appears.
    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    /// The exponent of `generator`.
    pub fn degree(&self, generator: &Expr) -> i64 {
        self.0.get(generator).copied().unwrap_or(0)
    }

    /// Sum of all exponents.
    pub fn total_degree(&self) -> i64 {
        self.0.values().sum()
    }

    /// Generators with their exponents.
    pub fn exponents(&self) -> impl Iterator<Item = (&Expr, i64)> {
        self.0.iter().map(|(generator, exponent)| (generator, *exponent))
    }

    /// This monomial with `generator` removed.
    pub fn without(&self, generator: &Expr) -> Self {
        let mut exponents = self.0.clone();
        exponents.remove(generator);
        Self(exponents)
    }

    /// This monomial with the exponent of `generator` set to `exponent`.
    pub fn with_degree(&self, generator: &Expr, exponent: i64) -> Self {
        let mut result = self.without(generator);
        if exponent != 0 {
            result.0.insert(generator.clone(), exponent);
        }
        result
    }

    /// Product of two monomials.
    pub fn times(&self, other: &Monomial) -> Self {
        let mut exponents = self.0.clone();
        for (generator, exponent) in &other.0 {
            let entry = exponents.entry(generator.clone()).or_insert(0);
            *entry += exponent;
            if *entry == 0 {
                exponents.remove(generator);
            }
        }
        Self(exponents)
    }

    /// Inverse monomial.
    pub fn inverse(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(generator, exponent)| (generator.clone(), -exponent))
                .collect(),
        )
    }

    /// Largest monomial dividing both, allowing negative exponents.
    pub fn gcd(&self, other: &Monomial) -> Self {
        let generators: BTreeSet<&Expr> = self.0.keys().chain(other.0.keys()).collect();
        Self(
            generators
                .into_iter()
                .map(|generator| {
                    (
                        generator.clone(),
                        self.degree(generator).min(other.degree(generator)),
                    )
                })
                .filter(|(_, exponent)| *exponent != 0)
                .collect(),
        )
    }

    /// Convert to an expression.
    pub fn to_expr(&self) -> Expr {
        Expr::product(
            self.0
                .iter()
                .map(|(generator, exponent)| generator.powi(*exponent))
                .collect(),
        )
    }
}

/// A multivariate Laurent polynomial.
///
/// Terms with zero coefficients are never stored, so structural equality is
/// mathematical equality.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, Rational>,
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A constant.
    pub fn constant(value: Rational) -> Self {
        Self::term(Monomial::one(), value)
    }

    /// A single term.
    pub fn term(monomial: Monomial, coefficient: Rational) -> Self {
        let mut terms = BTreeMap::new();
        if !coefficient.is_zero() {
            terms.insert(monomial, coefficient);
        }
        Self { terms }
    }

    /// `generator^exponent`.
    pub fn generator(generator: Expr, exponent: i64) -> Self {
        Self::term(Monomial::generator(generator, exponent), Rational::one())
    }

    /// Return true if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The constant value, if the polynomial has no generators.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(Rational::zero()),
            1 => self.terms.get(&Monomial::one()).copied(),
            _ => None,
        }
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Return true if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in monomial order.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Rational)> {
        self.terms.iter()
    }

    /// All generators that appear.
    pub fn generators(&self) -> BTreeSet<Expr> {
        self.terms
            .keys()
            .flat_map(|monomial| monomial.exponents().map(|(generator, _)| generator.clone()))
            .collect()
    }

    /// Multiply by a rational.
    pub fn scale(&self, factor: Rational) -> Self {
        if factor.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(monomial, coefficient)| (monomial.clone(), *coefficient * factor))
                .collect(),
        }
    }

    /// Multiply by a monomial.
    pub fn shift(&self, monomial: &Monomial) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(other, coefficient)| (other.times(monomial), *coefficient))
                .collect(),
        }
    }

    /// Raise to a non-negative integer power.
    pub fn powi(&self, exponent: u32) -> Self {
        let mut result = Self::constant(Rational::one());
        let mut base = self.clone();
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            remaining >>= 1;
        }
        result
    }

    fn insert(&mut self, monomial: Monomial, coefficient: Rational) {
        match self.terms.entry(monomial) {
            Entry::Occupied(mut entry) => {
                *entry.get_mut() += coefficient;
                if entry.get().is_zero() {
                    entry.remove();
                }
            }
            Entry::Vacant(entry) => {
                if !coefficient.is_zero() {
                    entry.insert(coefficient);
                }
            }
        }
    }

    /// Expand an expression into a Laurent polynomial.
    ///
    /// Positive integer powers of sums are expanded. A sum under a negative
    /// or fractional power has no Laurent expansion and is an error, as is
    /// zero under a negative power.
    pub fn from_expr(expr: &Expr) -> Result<Self> {
        match expr {
            Expr::Number(value) => Ok(Self::constant(*value)),
            Expr::Pi | Expr::Symbol(_) => Ok(Self::generator(expr.clone(), 1)),
            Expr::Add(terms) => terms.iter().try_fold(Self::zero(), |sum, term| {
                Ok(&sum + &Self::from_expr(term)?)
            }),
            Expr::Mul(factors) => factors
                .iter()
                .try_fold(Self::constant(Rational::one()), |product, factor| {
                    Ok(&product * &Self::from_expr(factor)?)
                }),
            Expr::Pow(base, exponent) => {
                if !exponent.is_integer() {
                    return match base.as_ref() {
                        Expr::Add(_) | Expr::Mul(_) => Err(Error::NotPolynomial(expr.to_string())),
                        _ => Ok(Self::generator(expr.clone(), 1)),
                    };
                }
                let exponent = exponent.to_integer();
                match base.as_ref() {
                    Expr::Number(value) => {
                        if value.is_zero() && exponent < 0 {
                            Err(Error::DivisionByZero(expr.to_string()))
                        } else {
                            Ok(Self::constant(rational_powi(*value, exponent)))
                        }
                    }
                    Expr::Pi | Expr::Symbol(_) => Ok(Self::generator((**base).clone(), exponent)),
                    Expr::Add(_) | Expr::Mul(_) if exponent > 0 => {
                        Ok(Self::from_expr(base)?.powi(exponent as u32))
                    }
                    _ => Err(Error::NotPolynomial(expr.to_string())),
                }
            }
        }
    }

    /// Convert back to an expanded expression.
    pub fn to_expr(&self) -> Expr {
        Expr::sum(
            self.terms
                .iter()
                .map(|(monomial, coefficient)| {
                    Expr::product(vec![Expr::Number(*coefficient), monomial.to_expr()])
                })
                .collect(),
        )
    }

    /// Antiderivative with respect to `generator`.
    pub fn integrate(&self, generator: &Expr) -> Result<Self> {
        let mut result = Self::zero();
        for (monomial, coefficient) in &self.terms {
            let degree = monomial.degree(generator);
            if degree == -1 {
                return Err(Error::LogarithmicTerm(
                    Self::term(monomial.clone(), *coefficient)
                        .to_expr()
                        .to_string(),
                ));
            }
            result.insert(
                monomial.with_degree(generator, degree + 1),
                *coefficient / Rational::from_integer(degree + 1),
            );
        }
        Ok(result)
    }

    /// Replace `generator` by an exact value.
    pub fn substitute(&self, generator: &Expr, value: Rational) -> Result<Self> {
        let mut result = Self::zero();
        for (monomial, coefficient) in &self.terms {
            let degree = monomial.degree(generator);
            if degree < 0 && value.is_zero() {
                return Err(Error::DivisionByZero(generator.powi(degree).to_string()));
            }
            result.insert(
                monomial.without(generator),
                *coefficient * rational_powi(value, degree),
            );
        }
        Ok(result)
    }

    /// Integral of the polynomial over `[lower, upper]` in `generator`.
    pub fn definite_integral(
        &self,
        generator: &Expr,
        lower: Rational,
        upper: Rational,
    ) -> Result<Self> {
        let antiderivative = self.integrate(generator)?;
        Ok(&antiderivative.substitute(generator, upper)?
            - &antiderivative.substitute(generator, lower)?)
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let mut result = self.clone();
        for (monomial, coefficient) in &rhs.terms {
            result.insert(monomial.clone(), *coefficient);
        }
        result
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        self + &(-rhs)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scale(-Rational::one())
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut result = Polynomial::zero();
        for (left, left_coefficient) in &self.terms {
            for (right, right_coefficient) in &rhs.terms {
                result.insert(left.times(right), *left_coefficient * *right_coefficient);
            }
        }
        result
    }
}
