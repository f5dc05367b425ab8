//! Sparse multivariate polynomials with exact rational coefficients.
//!
//! A polynomial is a map from [`Monomial`] to a non-zero coefficient. Monomials never
//! store zero exponents and the map never stores zero coefficients, so two polynomials
//! are mathematically equal exactly when they compare equal.
//!
//! Algorithms that need a main variable (exact division, gcd, content) view the
//! polynomial recursively as univariate in one variable with polynomial coefficients.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{CasError, Result};
use crate::expr::{Expr, Rational};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Product of variables raised to positive exponents.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeMap<String, u32>);

impl Monomial {
    pub fn one() -> Self {
        Monomial(BTreeMap::new())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Monomial::var_pow(name, 1)
    }

    pub fn var_pow(name: impl Into<String>, exp: u32) -> Self {
        let mut powers = BTreeMap::new();
        if exp > 0 {
            powers.insert(name.into(), exp);
        }
        Monomial(powers)
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn degree_in(&self, var: &str) -> u32 {
        self.0.get(var).copied().unwrap_or(0)
    }

    pub fn total_degree(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn powers(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.0.iter().map(|(v, e)| (v.as_str(), *e))
    }

    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut powers = self.0.clone();
        for (var, exp) in &other.0 {
            *powers.entry(var.clone()).or_insert(0) += exp;
        }
        Monomial(powers)
    }

    /// Exact quotient, `None` if `other` does not divide `self`.
    pub fn div(&self, other: &Monomial) -> Option<Monomial> {
        let mut powers = self.0.clone();
        for (var, exp) in &other.0 {
            let have = powers.get_mut(var)?;
            if *have < *exp {
                return None;
            }
            *have -= exp;
            if *have == 0 {
                powers.remove(var);
            }
        }
        Some(Monomial(powers))
    }

    pub fn gcd(&self, other: &Monomial) -> Monomial {
        Monomial(
            self.0
                .iter()
                .filter_map(|(var, exp)| {
                    let shared = (*exp).min(other.degree_in(var));
                    (shared > 0).then(|| (var.clone(), shared))
                })
                .collect(),
        )
    }

    /// Lexicographic order on exponent vectors, variables taken in name order.
    /// Unlike the derived `Ord`, this order is compatible with multiplication.
    pub fn lex_cmp(&self, other: &Monomial) -> Ordering {
        let mut a = self.0.iter();
        let mut b = other.0.iter();
        let mut next_a = a.next();
        let mut next_b = b.next();
        loop {
            match (next_a, next_b) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some((va, ea)), Some((vb, eb))) => match va.cmp(vb) {
                    Ordering::Less => return Ordering::Greater,
                    Ordering::Greater => return Ordering::Less,
                    Ordering::Equal if ea != eb => return ea.cmp(eb),
                    Ordering::Equal => {
                        next_a = a.next();
                        next_b = b.next();
                    }
                },
            }
        }
    }

    pub fn without(&self, var: &str) -> Monomial {
        let mut powers = self.0.clone();
        powers.remove(var);
        Monomial(powers)
    }

    fn to_factors(&self) -> Vec<Expr> {
        self.0
            .iter()
            .map(|(var, exp)| {
                let base = Expr::Variable(var.clone());
                if *exp == 1 {
                    base
                } else {
                    Expr::Pow(base.boxed(), Expr::integer(*exp).boxed())
                }
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, Rational>,
}

pub type MPoly = Polynomial;

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial {
            terms: BTreeMap::new(),
        }
    }

    pub fn one() -> Self {
        Polynomial::constant(Rational::one())
    }

    pub fn constant(c: Rational) -> Self {
        Polynomial::from_term(Monomial::one(), c)
    }

    pub fn integer(n: i64) -> Self {
        Polynomial::constant(Rational::from_integer(BigInt::from(n)))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Polynomial::from_term(Monomial::var(name), Rational::one())
    }

    pub fn from_term(mono: Monomial, coeff: Rational) -> Self {
        let mut terms = BTreeMap::new();
        if !coeff.is_zero() {
            terms.insert(mono, coeff);
        }
        Polynomial { terms }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.as_constant().is_some_and(|c| c.is_one())
    }

    pub fn is_constant(&self) -> bool {
        self.as_constant().is_some()
    }

    /// The value of a constant polynomial (zero included).
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(Rational::zero()),
            1 => self
                .terms
                .get(&Monomial::one())
                .cloned(),
            _ => None,
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Rational)> + '_ {
        self.terms.iter()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn variables(&self) -> BTreeSet<String> {
        self.terms
            .keys()
            .flat_map(|m| m.0.keys().cloned())
            .collect()
    }

    pub fn contains_var(&self, var: &str) -> bool {
        self.terms.keys().any(|m| m.0.contains_key(var))
    }

    pub fn degree_in(&self, var: &str) -> u32 {
        self.terms.keys().map(|m| m.degree_in(var)).max().unwrap_or(0)
    }

    pub fn total_degree(&self) -> u32 {
        self.terms.keys().map(Monomial::total_degree).max().unwrap_or(0)
    }

    /// View as a univariate polynomial in `var`: exponent → coefficient free of `var`.
    pub fn coefficients_in(&self, var: &str) -> BTreeMap<u32, Polynomial> {
        let mut out: BTreeMap<u32, Polynomial> = BTreeMap::new();
        for (mono, coeff) in &self.terms {
            out.entry(mono.degree_in(var))
                .or_default()
                .terms
                .insert(mono.without(var), coeff.clone());
        }
        out
    }

    pub fn from_coefficients(var: &str, coeffs: BTreeMap<u32, Polynomial>) -> Polynomial {
        let mut out = Polynomial::zero();
        for (exp, coeff) in coeffs {
            out = &out + &coeff.mul_monomial(&Monomial::var_pow(var, exp));
        }
        out
    }

    pub fn leading_coeff_in(&self, var: &str) -> Polynomial {
        self.coefficients_in(var)
            .into_iter()
            .next_back()
            .map(|(_, c)| c)
            .unwrap_or_default()
    }

    pub fn scale(&self, k: &Rational) -> Polynomial {
        if k.is_zero() {
            return Polynomial::zero();
        }
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), c * k))
                .collect(),
        }
    }

    pub fn mul_monomial(&self, mono: &Monomial) -> Polynomial {
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.mul(mono), c.clone()))
                .collect(),
        }
    }

    pub fn pow(&self, exp: u32) -> Polynomial {
        let mut result = Polynomial::one();
        let mut base = self.clone();
        let mut n = exp;
        while n > 0 {
            if n % 2 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            n /= 2;
        }
        result
    }

    pub fn derivative(&self, var: &str) -> Polynomial {
        let mut terms = BTreeMap::new();
        for (mono, coeff) in &self.terms {
            let exp = mono.degree_in(var);
            if exp == 0 {
                continue;
            }
            let mut powers = mono.0.clone();
            if exp == 1 {
                powers.remove(var);
            } else {
                powers.insert(var.to_string(), exp - 1);
            }
            terms.insert(
                Monomial(powers),
                coeff * Rational::from_integer(BigInt::from(exp)),
            );
        }
        Polynomial { terms }
    }

    /// Replace `var` by `value` (Horner evaluation over the coefficients in `var`).
    pub fn evaluate_var(&self, var: &str, value: &Polynomial) -> Polynomial {
        let coeffs = self.coefficients_in(var);
        let top = coeffs.keys().next_back().copied().unwrap_or(0);
        let mut acc = Polynomial::zero();
        for exp in (0..=top).rev() {
            acc = &acc * value;
            if let Some(c) = coeffs.get(&exp) {
                acc = &acc + c;
            }
        }
        acc
    }

    /// Exact quotient `self / divisor`, or `None` when the division leaves a remainder.
    pub fn div_exact(&self, divisor: &Polynomial) -> Option<Polynomial> {
        if divisor.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Polynomial::zero());
        }
        if let Some(c) = divisor.as_constant() {
            return Some(self.scale(&c.recip()));
        }
        if self.total_degree() < divisor.total_degree() {
            return None;
        }

        let var = divisor.variables().into_iter().next()?;
        let d_deg = divisor.degree_in(&var);
        let d_lead = divisor.leading_coeff_in(&var);
        let mut remainder = self.clone();
        let mut quotient = Polynomial::zero();
        while !remainder.is_zero() {
            let r_deg = remainder.degree_in(&var);
            if r_deg < d_deg {
                return None;
            }
            let q_coeff = remainder.leading_coeff_in(&var).div_exact(&d_lead)?;
            let term = q_coeff.mul_monomial(&Monomial::var_pow(var.clone(), r_deg - d_deg));
            remainder = &remainder - &(&term * divisor);
            quotient = &quotient + &term;
        }
        Some(quotient)
    }

    /// Pseudo-remainder of `self` by `divisor`, both viewed as univariate in `var`.
    pub fn pseudo_remainder(&self, divisor: &Polynomial, var: &str) -> Polynomial {
        let d_deg = divisor.degree_in(var);
        let d_lead = divisor.leading_coeff_in(var);
        let mut r = self.clone();
        while !r.is_zero() {
            let r_deg = r.degree_in(var);
            if r_deg < d_deg {
                break;
            }
            let r_lead = r.leading_coeff_in(var);
            let shifted = r_lead.mul_monomial(&Monomial::var_pow(var, r_deg - d_deg));
            r = &(&r * &d_lead) - &(&shifted * divisor);
        }
        r
    }

    /// Gcd of the coefficients in `var`, normalised.
    pub fn content_in(&self, var: &str) -> Polynomial {
        let mut content = Polynomial::zero();
        for coeff in self.coefficients_in(var).into_values() {
            content = Polynomial::gcd(&content, &coeff);
            if content.is_one() {
                break;
            }
        }
        content
    }

    pub fn primitive_part_in(&self, var: &str) -> Polynomial {
        let content = self.content_in(var);
        self.div_exact(&content).unwrap_or_else(|| self.clone())
    }

    /// Largest monomial dividing every term.
    pub fn monomial_content(&self) -> Monomial {
        let mut iter = self.terms.keys();
        let Some(first) = iter.next() else {
            return Monomial::one();
        };
        iter.fold(first.clone(), |acc, m| acc.gcd(m))
    }

    /// Split `self = c * p` where `p` has coprime integer coefficients and a positive
    /// leading coefficient.
    pub fn integer_content(&self) -> (Rational, Polynomial) {
        if self.is_zero() {
            return (Rational::zero(), Polynomial::zero());
        }
        let mut lcm = BigInt::one();
        for coeff in self.terms.values() {
            lcm = lcm.lcm(coeff.denom());
        }
        let mut gcd = BigInt::zero();
        for coeff in self.terms.values() {
            let scaled = (coeff * Rational::from_integer(lcm.clone())).to_integer();
            gcd = gcd.gcd(&scaled);
        }
        let mut content = Rational::new(gcd, lcm);
        if self.leading_coeff().is_negative() {
            content = -content;
        }
        let primitive = self.scale(&content.recip());
        (content, primitive)
    }

    /// `self` divided by its [`integer_content`](Self::integer_content).
    pub fn normalized(&self) -> Polynomial {
        self.integer_content().1
    }

    /// Coefficient of the lexicographically largest monomial.
    pub fn leading_coeff(&self) -> Rational {
        self.terms
            .iter()
            .max_by(|(a, _), (b, _)| a.lex_cmp(b))
            .map(|(_, c)| c.clone())
            .unwrap_or_else(Rational::zero)
    }

    /// Greatest common divisor, normalised; `gcd(0, 0) = 0`.
    pub fn gcd(a: &Polynomial, b: &Polynomial) -> Polynomial {
        if a.is_zero() {
            return b.normalized();
        }
        if b.is_zero() {
            return a.normalized();
        }
        if a.is_constant() || b.is_constant() {
            return Polynomial::one();
        }
        if a.div_exact(b).is_some() {
            return b.normalized();
        }
        if b.div_exact(a).is_some() {
            return a.normalized();
        }

        let ma = a.monomial_content();
        let mb = b.monomial_content();
        let shared = ma.gcd(&mb);
        let a = a.div_monomial(&ma);
        let b = b.div_monomial(&mb);
        let rest = gcd_recursive(&a, &b);
        rest.mul_monomial(&shared).normalized()
    }

    fn div_monomial(&self, mono: &Monomial) -> Polynomial {
        Polynomial {
            terms: self
                .terms
                .iter()
                .filter_map(|(m, c)| m.div(mono).map(|q| (q, c.clone())))
                .collect(),
        }
    }

    pub fn from_expr(expr: &Expr) -> Result<Polynomial> {
        match expr {
            Expr::Variable(name) => Ok(Polynomial::var(name.clone())),
            Expr::Constant(c) => Ok(Polynomial::constant(c.clone())),
            Expr::Add(a, b) => Ok(&Polynomial::from_expr(a)? + &Polynomial::from_expr(b)?),
            Expr::Sub(a, b) => Ok(&Polynomial::from_expr(a)? - &Polynomial::from_expr(b)?),
            Expr::Mul(a, b) => Ok(&Polynomial::from_expr(a)? * &Polynomial::from_expr(b)?),
            Expr::Neg(a) => Ok(-&Polynomial::from_expr(a)?),
            Expr::Div(a, b) => {
                let denom = Polynomial::from_expr(b)?;
                match denom.as_constant() {
                    Some(c) if c.is_zero() => Err(CasError::DivisionByZero),
                    Some(c) => Ok(Polynomial::from_expr(a)?.scale(&c.recip())),
                    None => Err(CasError::Unsupported(format!(
                        "division by non-constant {} in a polynomial",
                        crate::format::pretty(b)
                    ))),
                }
            }
            Expr::Pow(base, exp) => {
                let power = match &**exp {
                    Expr::Constant(e) if e.is_integer() && !e.is_negative() => {
                        e.to_integer().to_u32()
                    }
                    _ => None,
                };
                match power {
                    Some(k) => Ok(Polynomial::from_expr(base)?.pow(k)),
                    None => Err(CasError::Unsupported(format!(
                        "exponent {} in a polynomial",
                        crate::format::pretty(exp)
                    ))),
                }
            }
        }
    }

    /// Expression form with terms ordered by descending degree, constant last.
    pub fn to_expr(&self) -> Expr {
        let mut entries: Vec<(&Monomial, &Rational)> = self.terms.iter().collect();
        entries.sort_by_key(|(m, _)| (Reverse(m.total_degree()), (*m).clone()));
        entries
            .into_iter()
            .map(|(mono, coeff)| term_expr(mono, coeff))
            .reduce(|acc, t| Expr::Add(acc.boxed(), t.boxed()))
            .unwrap_or_else(crate::expr::zero)
    }
}

fn term_expr(mono: &Monomial, coeff: &Rational) -> Expr {
    let magnitude = coeff.abs();
    let mut factors = mono.to_factors();
    if !magnitude.is_one() || factors.is_empty() {
        factors.insert(0, Expr::Constant(magnitude));
    }
    let body = factors
        .into_iter()
        .reduce(|acc, f| Expr::Mul(acc.boxed(), f.boxed()))
        .unwrap_or_else(crate::expr::one);
    if coeff.is_negative() {
        Expr::Neg(body.boxed())
    } else {
        body
    }
}

fn gcd_recursive(a: &Polynomial, b: &Polynomial) -> Polynomial {
    if a.is_zero() {
        return b.normalized();
    }
    if b.is_zero() {
        return a.normalized();
    }
    if a.is_constant() || b.is_constant() {
        return Polynomial::one();
    }

    let mut vars = a.variables();
    vars.extend(b.variables());
    let Some(var) = vars.into_iter().next() else {
        return Polynomial::one();
    };

    // A gcd free of `var` must divide every coefficient in `var`.
    if !b.contains_var(&var) {
        return gcd_recursive(&a.content_in(&var), b);
    }
    if !a.contains_var(&var) {
        return gcd_recursive(a, &b.content_in(&var));
    }

    let ca = a.content_in(&var);
    let cb = b.content_in(&var);
    let content = Polynomial::gcd(&ca, &cb);
    let mut p = a.div_exact(&ca).unwrap_or_else(|| a.clone());
    let mut q = b.div_exact(&cb).unwrap_or_else(|| b.clone());
    if p.degree_in(&var) < q.degree_in(&var) {
        std::mem::swap(&mut p, &mut q);
    }

    loop {
        let r = p.pseudo_remainder(&q, &var);
        if r.is_zero() {
            break;
        }
        if !r.contains_var(&var) {
            q = Polynomial::one();
            break;
        }
        p = q;
        q = r.primitive_part_in(&var);
    }

    (&content * &q.primitive_part_in(&var)).normalized()
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty(&self.to_expr()))
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: &Polynomial) -> Polynomial {
        let mut terms = self.terms.clone();
        for (mono, coeff) in &rhs.terms {
            let slot = terms.entry(mono.clone()).or_insert_with(Rational::zero);
            *slot += coeff;
            if slot.is_zero() {
                terms.remove(mono);
            }
        }
        Polynomial { terms }
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let mut terms = self.terms.clone();
        for (mono, coeff) in &rhs.terms {
            let slot = terms.entry(mono.clone()).or_insert_with(Rational::zero);
            *slot -= coeff;
            if slot.is_zero() {
                terms.remove(mono);
            }
        }
        Polynomial { terms }
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;
    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut terms: BTreeMap<Monomial, Rational> = BTreeMap::new();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &rhs.terms {
                *terms.entry(ma.mul(mb)).or_insert_with(Rational::zero) += ca * cb;
            }
        }
        terms.retain(|_, c| !c.is_zero());
        Polynomial { terms }
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;
    fn neg(self) -> Polynomial {
        Polynomial {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }
}

impl Add for Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: Polynomial) -> Polynomial {
        &self + &rhs
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: Polynomial) -> Polynomial {
        &self - &rhs
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;
    fn mul(self, rhs: Polynomial) -> Polynomial {
        &self * &rhs
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;
    fn neg(self) -> Polynomial {
        -&self
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn small_poly() -> impl Strategy<Value = Polynomial> {
        prop::collection::vec((-3i64..=3, 0u32..3, 0u32..3), 0..4).prop_map(|terms| {
            terms
                .into_iter()
                .fold(Polynomial::zero(), |acc, (c, ex, ey)| {
                    let mono = Monomial::var_pow("x", ex).mul(&Monomial::var_pow("y", ey));
                    &acc + &Polynomial::from_term(mono, Rational::from_integer(c.into()))
                })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn multiplication_distributes(a in small_poly(), b in small_poly(), c in small_poly()) {
            prop_assert_eq!(&(&a + &b) * &c, &(&a * &c) + &(&b * &c));
        }

        #[test]
        fn product_divides_exactly(a in small_poly(), b in small_poly()) {
            prop_assume!(!b.is_zero());
            prop_assert_eq!((&a * &b).div_exact(&b), Some(a));
        }

        #[test]
        fn gcd_divides_both(a in small_poly(), b in small_poly()) {
            let g = Polynomial::gcd(&a, &b);
            prop_assume!(!g.is_zero());
            prop_assert!(a.div_exact(&g).is_some());
            prop_assert!(b.div_exact(&g).is_some());
        }

        #[test]
        fn common_factor_survives_gcd(a in small_poly(), b in small_poly(), c in small_poly()) {
            prop_assume!(!a.is_zero() && !b.is_zero() && !c.is_zero());
            let g = Polynomial::gcd(&(&a * &c), &(&b * &c));
            prop_assert!(g.div_exact(&c).is_some());
        }

        #[test]
        fn integer_content_reassembles(a in small_poly()) {
            let (content, primitive) = a.integer_content();
            prop_assert_eq!(primitive.scale(&content), a);
        }
    }
}
