//! Content and square-free factorisation of multivariate polynomials and rational functions.
//!
//! Square-free parts are further split into linear factors `q*N1*v + p*N0` when the
//! leading and trailing coefficients in `v` are single terms. Other irreducible
//! factors of degree two or more are left whole.

use std::fmt;

use crate::error::Result;
use crate::expr::{Expr, Rational};
use crate::polynomial::{Monomial, Polynomial};
use crate::rational::RationalFunction;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use tracing::debug;

const LINEAR_CANDIDATE_LIMIT: usize = 256;
const DIVISOR_SEARCH_LIMIT: u64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Factor {
    pub poly: Polynomial,
    pub multiplicity: usize,
}

impl Factor {
    pub fn base_expr(&self) -> Expr {
        self.poly.to_expr()
    }

    fn to_expr(&self) -> Expr {
        let base = self.base_expr();
        if self.multiplicity == 1 {
            base
        } else {
            Expr::Pow(
                base.boxed(),
                Expr::integer(BigInt::from(self.multiplicity)).boxed(),
            )
        }
    }
}

/// `constant * Π poly^multiplicity`, every `poly` primitive with positive leading
/// coefficient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Factorization {
    pub constant: Rational,
    pub factors: Vec<Factor>,
}

impl Factorization {
    pub fn expand(&self) -> Polynomial {
        self.factors
            .iter()
            .fold(Polynomial::constant(self.constant.clone()), |acc, f| {
                &acc * &f.poly.pow(f.multiplicity as u32)
            })
    }
}

/// Factored rational function: `constant * Π numerator / Π denominator`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Factored {
    pub constant: Rational,
    pub numerator: Vec<Factor>,
    pub denominator: Vec<Factor>,
}

impl Factored {
    /// Unexpanded product form; not passed through `simplify`, which would distribute it.
    /// A negative constant is folded into the first simple numerator factor when there is one.
    pub fn to_expr(&self) -> Expr {
        if self.constant.is_zero() {
            return crate::expr::zero();
        }
        let mut numerator = self.numerator.clone();
        let mut negative = self.constant.is_negative();
        if negative {
            if let Some(f) = numerator
                .iter_mut()
                .find(|f| f.multiplicity == 1 && f.poly.term_count() > 1)
            {
                f.poly = -&f.poly;
                negative = false;
            }
        }

        let magnitude = self.constant.abs();
        let top = product(Rational::from_integer(magnitude.numer().clone()), &numerator);
        let body = if self.denominator.is_empty() && magnitude.denom().is_one() {
            top
        } else {
            let bottom = product(
                Rational::from_integer(magnitude.denom().clone()),
                &self.denominator,
            );
            Expr::Div(top.boxed(), bottom.boxed())
        };
        if negative {
            Expr::Neg(body.boxed())
        } else {
            body
        }
    }

    /// Multiply the factors back out. Fails only if a denominator factor is zero,
    /// which [`factor`] never produces.
    pub fn expand(&self) -> Result<RationalFunction> {
        let numer = Factorization {
            constant: self.constant.clone(),
            factors: self.numerator.clone(),
        }
        .expand();
        let denom = Factorization {
            constant: Rational::one(),
            factors: self.denominator.clone(),
        }
        .expand();
        RationalFunction::new(numer, denom)
    }
}

impl fmt::Display for Factored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty(&self.to_expr()))
    }
}

fn product(coeff: Rational, factors: &[Factor]) -> Expr {
    let lead = (!coeff.is_one() || factors.is_empty()).then(|| Expr::Constant(coeff));
    lead.into_iter()
        .chain(factors.iter().map(Factor::to_expr))
        .reduce(|acc, f| Expr::Mul(acc.boxed(), f.boxed()))
        .unwrap_or_else(crate::expr::one)
}

pub fn factor(rf: &RationalFunction) -> Factored {
    let numer = factor_polynomial(rf.numerator());
    let denom = factor_polynomial(rf.denominator());
    let constant = if denom.constant.is_zero() {
        Rational::zero()
    } else {
        numer.constant / denom.constant
    };
    Factored {
        constant,
        numerator: numer.factors,
        denominator: denom.factors,
    }
}

pub fn factor_polynomial(poly: &Polynomial) -> Factorization {
    let (constant, primitive) = poly.integer_content();
    if primitive.is_zero() {
        return Factorization {
            constant,
            factors: Vec::new(),
        };
    }

    let mut factors = Vec::new();
    let mono = primitive.monomial_content();
    for (var, exp) in mono.powers() {
        push_factor(&mut factors, Polynomial::var(var), exp as usize);
    }
    let rest = if mono.is_one() {
        primitive
    } else {
        divide_monomial(&primitive, &mono)
    };
    split(&rest, &mut factors);

    factors.sort_by(|a, b| {
        a.poly
            .total_degree()
            .cmp(&b.poly.total_degree())
            .then_with(|| a.poly.term_count().cmp(&b.poly.term_count()))
            .then_with(|| a.poly.to_expr().cmp(&b.poly.to_expr()))
            .then_with(|| a.multiplicity.cmp(&b.multiplicity))
    });
    debug!(
        terms = poly.term_count(),
        factors = factors.len(),
        "factored polynomial"
    );
    Factorization { constant, factors }
}

fn divide_monomial(poly: &Polynomial, mono: &Monomial) -> Polynomial {
    poly.div_exact(&Polynomial::from_term(mono.clone(), Rational::one()))
        .unwrap_or_else(|| poly.clone())
}

/// Split a normalised polynomial into content factors and square-free parts.
fn split(poly: &Polynomial, out: &mut Vec<Factor>) {
    if poly.is_constant() {
        return;
    }

    for var in poly.variables() {
        let content = poly.content_in(&var);
        if content.is_constant() {
            continue;
        }
        let Some(primitive) = poly.div_exact(&content) else {
            continue;
        };
        split(&content, out);
        split(&primitive, out);
        return;
    }

    let Some(var) = poly.variables().into_iter().next() else {
        return;
    };
    for (part, k) in square_free(poly, &var) {
        for piece in split_linear(part) {
            push_factor(out, piece, k);
        }
    }
}

/// Peel linear factors off a square-free part; the pieces multiply back to `poly`.
fn split_linear(poly: Polynomial) -> Vec<Polynomial> {
    let mut pieces = Vec::new();
    let mut rest = poly;
    'search: loop {
        for var in rest.variables() {
            if rest.degree_in(&var) < 2 {
                continue;
            }
            for candidate in linear_candidates(&rest, &var) {
                if let Some(quotient) = rest.div_exact(&candidate) {
                    pieces.push(candidate);
                    rest = quotient;
                    continue 'search;
                }
            }
        }
        break;
    }
    pieces.push(rest);
    pieces
}

/// Every `q*N1*var ± p*N0` with `q*N1` dividing the leading and `p*N0` the trailing
/// coefficient in `var`. Empty when either coefficient has several terms or the
/// search would be too large.
fn linear_candidates(poly: &Polynomial, var: &str) -> Vec<Polynomial> {
    let coeffs = poly.coefficients_in(var);
    let (Some((_, lead)), Some(trail)) = (coeffs.iter().next_back(), coeffs.get(&0)) else {
        return Vec::new();
    };
    let (Some((lead_mono, lead_coeff)), Some((trail_mono, trail_coeff))) =
        (single_term(lead), single_term(trail))
    else {
        return Vec::new();
    };
    let (Some(qs), Some(ps)) = (small_divisors(lead_coeff), small_divisors(trail_coeff)) else {
        return Vec::new();
    };
    let heads = monomial_divisors(lead_mono);
    let tails = monomial_divisors(trail_mono);
    if qs.len() * ps.len() * heads.len() * tails.len() * 2 > LINEAR_CANDIDATE_LIMIT {
        return Vec::new();
    }

    let mut out = Vec::new();
    for q in &qs {
        for n1 in &heads {
            let head = Polynomial::from_term(
                n1.mul(&Monomial::var(var)),
                Rational::from_integer(BigInt::from(*q)),
            );
            for p in &ps {
                for n0 in &tails {
                    for sign in [1i64, -1] {
                        let tail = Polynomial::from_term(
                            n0.clone(),
                            Rational::from_integer(BigInt::from(sign * *p as i64)),
                        );
                        out.push(&head + &tail);
                    }
                }
            }
        }
    }
    out
}

fn single_term(poly: &Polynomial) -> Option<(&Monomial, &Rational)> {
    let mut terms = poly.terms();
    let first = terms.next()?;
    terms.next().is_none().then_some(first)
}

/// Positive divisors of an integer coefficient, `None` past the search limit.
fn small_divisors(coeff: &Rational) -> Option<Vec<u64>> {
    if !coeff.is_integer() {
        return None;
    }
    let n = coeff.to_integer().abs().to_u64()?;
    if n == 0 || n > DIVISOR_SEARCH_LIMIT {
        return None;
    }
    Some((1..=n).filter(|d| n % d == 0).collect())
}

fn monomial_divisors(mono: &Monomial) -> Vec<Monomial> {
    let mut out = vec![Monomial::one()];
    for (var, exp) in mono.powers() {
        out = out
            .iter()
            .flat_map(|m| (0..=exp).map(move |k| m.mul(&Monomial::var_pow(var, k))))
            .collect();
    }
    out
}

/// Yun's square-free decomposition in `var` of a polynomial primitive in `var`.
fn square_free(poly: &Polynomial, var: &str) -> Vec<(Polynomial, usize)> {
    let derivative = poly.derivative(var);
    let c = Polynomial::gcd(poly, &derivative);
    if c.is_constant() {
        return vec![(poly.normalized(), 1)];
    }
    let (Some(mut w), Some(mut y)) = (poly.div_exact(&c), derivative.div_exact(&c)) else {
        return vec![(poly.normalized(), 1)];
    };

    let mut parts = Vec::new();
    let mut k = 1;
    while !w.is_constant() {
        let z = &y - &w.derivative(var);
        let g = Polynomial::gcd(&w, &z);
        if !g.is_constant() {
            parts.push((g.clone(), k));
        }
        let (Some(next_w), Some(next_y)) = (w.div_exact(&g), z.div_exact(&g)) else {
            break;
        };
        w = next_w;
        y = next_y;
        k += 1;
    }
    parts
}

fn push_factor(out: &mut Vec<Factor>, poly: Polynomial, multiplicity: usize) {
    if poly.is_constant() || multiplicity == 0 {
        return;
    }
    let poly = poly.normalized();
    if let Some(existing) = out.iter_mut().find(|f| f.poly == poly) {
        existing.multiplicity += multiplicity;
    } else {
        out.push(Factor { poly, multiplicity });
    }
}
