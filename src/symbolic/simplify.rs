//! Canonical simplification
//!
//! An expression is expanded into a Laurent polynomial, which performs all
//! cancellations exactly, and then factored into
//! `coefficient * monomial * (linear factors)^k * remainder`.

use crate::symbolic::expression::{Expr, Rational};
use crate::symbolic::polynomial::{Monomial, Polynomial};
use crate::types::Result;
use log::debug;
use num::integer::Integer;
use num::{One, Signed, Zero};

/// A polynomial in factored form.
#[derive(Clone, Debug, PartialEq)]
pub struct Factored {
    coefficient: Rational,
    monomial: Monomial,
    factors: Vec<(Polynomial, u32)>,
    remainder: Polynomial,
}

impl Factored {
    /// Factor a polynomial.
    ///
    /// The rational content and the monomial gcd of all terms are pulled out
    /// first. If what remains is univariate, its rational roots are split off
    /// as integer linear factors `q*v - p`.
    pub fn new(polynomial: &Polynomial) -> Self {
        if polynomial.is_zero() {
            return Self {
                coefficient: Rational::zero(),
                monomial: Monomial::one(),
                factors: Vec::new(),
                remainder: Polynomial::constant(Rational::one()),
            };
        }

        let monomial = polynomial
            .terms()
            .map(|(monomial, _)| monomial.clone())
            .reduce(|gcd, monomial| gcd.gcd(&monomial))
            .unwrap_or_default();
        let reduced = polynomial.shift(&monomial.inverse());

        let content = content(&reduced);
        let mut remainder = reduced.scale(content.recip());
        let mut coefficient = content;
        let mut factors = Vec::new();

        let generators = remainder.generators();
        if generators.len() == 1 {
            if let Some(generator) = generators.into_iter().next() {
                let mut dense = dense_coefficients(&remainder, &generator);
                for root in rational_roots(&mut dense) {
                    let linear = &Polynomial::term(
                        Monomial::generator(generator.clone(), 1),
                        Rational::from_integer(*root.denom()),
                    ) + &Polynomial::constant(Rational::from_integer(-*root.numer()));
                    match factors.last_mut() {
                        Some((last, multiplicity)) if *last == linear => *multiplicity += 1,
                        _ => factors.push((linear, 1)),
                    }
                }
                remainder = sparse_polynomial(&dense, &generator);
            }
        }

        if let Some(value) = remainder.as_constant() {
            coefficient *= value;
            remainder = Polynomial::constant(Rational::one());
        }

        Self {
            coefficient,
            monomial,
            factors,
            remainder,
        }
    }

    /// The numeric coefficient.
    pub fn coefficient(&self) -> Rational {
        self.coefficient
    }

    /// The monomial factor.
    pub fn monomial(&self) -> &Monomial {
        &self.monomial
    }

    /// Linear factors with their multiplicities.
    pub fn factors(&self) -> &[(Polynomial, u32)] {
        &self.factors
    }

    /// The part that could not be factored.
    pub fn remainder(&self) -> &Polynomial {
        &self.remainder
    }

    /// Convert to an expression.
    pub fn to_expr(&self) -> Expr {
        let mut parts = vec![Expr::Number(self.coefficient), self.monomial.to_expr()];
        parts.extend(
            self.factors
                .iter()
                .map(|(factor, multiplicity)| factor.to_expr().powi(*multiplicity as i64)),
        );
        parts.push(self.remainder.to_expr());
        Expr::product(parts)
    }
}

/// Rational content, signed so that the leading coefficient becomes positive.
fn content(polynomial: &Polynomial) -> Rational {
    let (numer, denom) = polynomial
        .terms()
        .fold((0_i64, 1_i64), |(numer, denom), (_, value)| {
            (numer.gcd(value.numer()), denom.lcm(value.denom()))
        });
    let leading = polynomial
        .terms()
        .max_by_key(|(monomial, _)| monomial.total_degree())
        .map(|(_, value)| *value)
        .unwrap_or_else(Rational::one);
    let content = Rational::new(numer.max(1), denom);
    if leading.is_negative() {
        -content
    } else {
        content
    }
}

/// Coefficients of a univariate polynomial, constant term first.
fn dense_coefficients(polynomial: &Polynomial, generator: &Expr) -> Vec<Rational> {
    let degree = polynomial
        .terms()
        .map(|(monomial, _)| monomial.degree(generator))
        .max()
        .unwrap_or(0)
        .max(0) as usize;
    let mut dense = vec![Rational::zero(); degree + 1];
    for (monomial, value) in polynomial.terms() {
        dense[monomial.degree(generator) as usize] = *value;
    }
    dense
}

fn sparse_polynomial(dense: &[Rational], generator: &Expr) -> Polynomial {
    dense
        .iter()
        .enumerate()
        .fold(Polynomial::zero(), |sum, (degree, value)| {
            &sum + &Polynomial::term(
                Monomial::generator(generator.clone(), degree as i64),
                *value,
            )
        })
}

/// Largest constant or leading coefficient whose divisors are searched.
const MAX_ROOT_SEARCH: i64 = 1 << 20;

fn divisors(value: i64) -> Vec<i64> {
    let value = value.abs();
    (1..=value).filter(|candidate| value % candidate == 0).collect()
}

fn evaluate_dense(dense: &[Rational], point: Rational) -> Rational {
    dense
        .iter()
        .rev()
        .fold(Rational::zero(), |acc, value| acc * point + value)
}

/// Divide by `(v - root)`, dropping the zero remainder.
fn deflate(dense: &mut Vec<Rational>, root: Rational) {
    let degree = dense.len() - 1;
    let mut quotient = vec![Rational::zero(); degree];
    let mut carry = Rational::zero();
    for index in (1..=degree).rev() {
        carry = carry * root + dense[index];
        quotient[index - 1] = carry;
    }
    *dense = quotient;
}

/// Split off all rational roots, with multiplicity.
///
/// `dense` must have integer coefficients and a nonzero constant term. On
/// return it holds the quotient scaled back to integer coefficients.
fn rational_roots(dense: &mut Vec<Rational>) -> Vec<Rational> {
    let mut roots = Vec::new();
    'search: while dense.len() > 1 {
        let constant = dense[0];
        let leading = dense[dense.len() - 1];
        if !constant.is_integer() || !leading.is_integer() || constant.is_zero() {
            break;
        }
        if constant.abs().to_integer() > MAX_ROOT_SEARCH
            || leading.abs().to_integer() > MAX_ROOT_SEARCH
        {
            break;
        }
        for denom in divisors(leading.to_integer()) {
            for numer in divisors(constant.to_integer()) {
                for root in [Rational::new(numer, denom), Rational::new(-numer, denom)] {
                    if evaluate_dense(dense, root).is_zero() {
                        deflate(dense, root);
                        // (v - p/q) * quotient == (q*v - p) * (quotient / q)
                        let scale = Rational::from_integer(*root.denom());
                        dense.iter_mut().for_each(|value| *value /= scale);
                        roots.push(root);
                        continue 'search;
                    }
                }
            }
        }
        break;
    }
    roots
}

/// Simplify an expression to its factored canonical form.
pub fn simplify(expr: &Expr) -> Result<Expr> {
    let polynomial = Polynomial::from_expr(expr)?;
    debug!("Expanded expression into {} terms", polynomial.len());
    let factored = Factored::new(&polynomial);
    debug!(
        "Factored into {} linear factors with coefficient {}",
        factored.factors().len(),
        factored.coefficient()
    );
    Ok(factored.to_expr())
}
