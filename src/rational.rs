//! Quotients of multivariate polynomials kept in lowest terms.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::{CasError, Result};
use crate::expr::{Expr, Rational};
use crate::polynomial::Polynomial;
use num_traits::{Signed, ToPrimitive};

/// `numerator / denominator` with the gcd removed and the denominator scaled to a
/// primitive integer polynomial with positive leading coefficient.
#[derive(Clone, Debug)]
pub struct RationalFunction {
    numer: Polynomial,
    denom: Polynomial,
}

impl RationalFunction {
    pub fn new(numer: Polynomial, denom: Polynomial) -> Result<Self> {
        if denom.is_zero() {
            return Err(CasError::DivisionByZero);
        }
        Ok(RationalFunction::reduced(numer, denom))
    }

    fn reduced(numer: Polynomial, denom: Polynomial) -> Self {
        if numer.is_zero() {
            return RationalFunction::zero();
        }
        let (numer, denom) = if denom.is_constant() {
            (numer, denom)
        } else {
            let g = Polynomial::gcd(&numer, &denom);
            if g.is_one() {
                (numer, denom)
            } else {
                (
                    numer.div_exact(&g).unwrap_or(numer),
                    denom.div_exact(&g).unwrap_or(denom),
                )
            }
        };
        RationalFunction::coprime(numer, denom)
    }

    /// Build from a coprime pair, only normalising the denominator.
    fn coprime(numer: Polynomial, denom: Polynomial) -> Self {
        let (unit, denom) = denom.integer_content();
        RationalFunction {
            numer: numer.scale(&unit.recip()),
            denom,
        }
    }

    pub fn from_poly(poly: Polynomial) -> Self {
        RationalFunction {
            numer: poly,
            denom: Polynomial::one(),
        }
    }

    pub fn zero() -> Self {
        RationalFunction::from_poly(Polynomial::zero())
    }

    pub fn one() -> Self {
        RationalFunction::from_poly(Polynomial::one())
    }

    pub fn constant(c: Rational) -> Self {
        RationalFunction::from_poly(Polynomial::constant(c))
    }

    pub fn var(name: impl Into<String>) -> Self {
        RationalFunction::from_poly(Polynomial::var(name))
    }

    pub fn numerator(&self) -> &Polynomial {
        &self.numer
    }

    pub fn denominator(&self) -> &Polynomial {
        &self.denom
    }

    pub fn into_parts(self) -> (Polynomial, Polynomial) {
        (self.numer, self.denom)
    }

    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    pub fn is_constant(&self) -> bool {
        self.numer.is_constant() && self.denom.is_constant()
    }

    pub fn as_constant(&self) -> Option<Rational> {
        let n = self.numer.as_constant()?;
        let d = self.denom.as_constant()?;
        Some(n / d)
    }

    pub fn is_polynomial(&self) -> bool {
        self.denom.is_one()
    }

    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = self.numer.variables();
        vars.extend(self.denom.variables());
        vars
    }

    pub fn contains_var(&self, var: &str) -> bool {
        self.numer.contains_var(var) || self.denom.contains_var(var)
    }

    pub fn from_expr(expr: &Expr) -> Result<Self> {
        match expr {
            Expr::Variable(name) => Ok(RationalFunction::var(name.clone())),
            Expr::Constant(c) => Ok(RationalFunction::constant(c.clone())),
            Expr::Add(a, b) => Ok(RationalFunction::from_expr(a)?.add(&RationalFunction::from_expr(b)?)),
            Expr::Sub(a, b) => Ok(RationalFunction::from_expr(a)?.sub(&RationalFunction::from_expr(b)?)),
            Expr::Mul(a, b) => Ok(RationalFunction::from_expr(a)?.mul(&RationalFunction::from_expr(b)?)),
            Expr::Div(a, b) => RationalFunction::from_expr(a)?.div(&RationalFunction::from_expr(b)?),
            Expr::Neg(a) => Ok(RationalFunction::from_expr(a)?.neg()),
            Expr::Pow(base, exp) => {
                let power = match &**exp {
                    Expr::Constant(e) if e.is_integer() => e.to_integer().to_i32(),
                    Expr::Neg(inner) => match &**inner {
                        Expr::Constant(e) if e.is_integer() => e.to_integer().to_i32().map(|k| -k),
                        _ => None,
                    },
                    _ => None,
                };
                match power {
                    Some(k) => RationalFunction::from_expr(base)?.pow_i32(k),
                    None => Err(CasError::Unsupported(format!(
                        "non-integer exponent {}",
                        crate::format::pretty(exp)
                    ))),
                }
            }
        }
    }

    pub fn add(&self, other: &RationalFunction) -> RationalFunction {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        if self.denom == other.denom {
            return RationalFunction::reduced(&self.numer + &other.numer, self.denom.clone());
        }
        let g = Polynomial::gcd(&self.denom, &other.denom);
        let left = self.denom.div_exact(&g).unwrap_or_else(|| self.denom.clone());
        let right = other.denom.div_exact(&g).unwrap_or_else(|| other.denom.clone());
        let numer = &(&self.numer * &right) + &(&other.numer * &left);
        RationalFunction::reduced(numer, &self.denom * &right)
    }

    pub fn sub(&self, other: &RationalFunction) -> RationalFunction {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &RationalFunction) -> RationalFunction {
        if self.is_zero() || other.is_zero() {
            return RationalFunction::zero();
        }
        let g1 = Polynomial::gcd(&self.numer, &other.denom);
        let g2 = Polynomial::gcd(&other.numer, &self.denom);
        let n1 = self.numer.div_exact(&g1).unwrap_or_else(|| self.numer.clone());
        let d2 = other.denom.div_exact(&g1).unwrap_or_else(|| other.denom.clone());
        let n2 = other.numer.div_exact(&g2).unwrap_or_else(|| other.numer.clone());
        let d1 = self.denom.div_exact(&g2).unwrap_or_else(|| self.denom.clone());
        RationalFunction::coprime(&n1 * &n2, &d1 * &d2)
    }

    pub fn div(&self, other: &RationalFunction) -> Result<RationalFunction> {
        Ok(self.mul(&other.inv()?))
    }

    pub fn neg(&self) -> RationalFunction {
        RationalFunction {
            numer: -&self.numer,
            denom: self.denom.clone(),
        }
    }

    pub fn inv(&self) -> Result<RationalFunction> {
        RationalFunction::new(self.denom.clone(), self.numer.clone())
    }

    pub fn pow_i32(&self, exp: i32) -> Result<RationalFunction> {
        let base = if exp < 0 { self.inv()? } else { self.clone() };
        let k = exp.unsigned_abs();
        // Powers of a reduced fraction stay reduced.
        Ok(RationalFunction {
            numer: base.numer.pow(k),
            denom: base.denom.pow(k),
        })
    }

    pub fn scale(&self, k: &Rational) -> RationalFunction {
        RationalFunction {
            numer: self.numer.scale(k),
            denom: self.denom.clone(),
        }
    }

    /// Replace `var` by `value`.
    pub fn substitute(&self, var: &str, value: &RationalFunction) -> Result<RationalFunction> {
        if !self.contains_var(var) {
            return Ok(self.clone());
        }
        let (numer, n_deg) = homogenize(&self.numer, var, value);
        let (denom, d_deg) = homogenize(&self.denom, var, value);
        let q = &value.denom;
        // numer / q^n_deg divided by denom / q^d_deg
        let (numer, denom) = if d_deg >= n_deg {
            (&numer * &q.pow(d_deg - n_deg), denom)
        } else {
            (numer, &denom * &q.pow(n_deg - d_deg))
        };
        RationalFunction::new(numer, denom)
    }

    /// Substitute every entry of `values` in turn; replacements must not mention
    /// the variables being replaced.
    pub fn substitute_all(&self, values: &HashMap<String, RationalFunction>) -> Result<RationalFunction> {
        let mut names: Vec<&String> = values.keys().collect();
        names.sort();
        let mut out = self.clone();
        for name in names {
            out = out.substitute(name, &values[name])?;
        }
        Ok(out)
    }

    pub fn to_expr(&self) -> Expr {
        if self.denom.is_one() {
            return self.numer.to_expr();
        }
        let top = self.numer.to_expr();
        let bottom = self.denom.to_expr();
        match top {
            Expr::Neg(inner) => Expr::Neg(Expr::Div(inner, bottom.boxed()).boxed()),
            Expr::Constant(c) if c.is_negative() => Expr::Neg(
                Expr::Div(Expr::Constant(-c).boxed(), bottom.boxed()).boxed(),
            ),
            top => Expr::Div(top.boxed(), bottom.boxed()),
        }
    }
}

/// `poly(p/q) * q^deg`, where `deg` is the degree of `poly` in `var`.
fn homogenize(poly: &Polynomial, var: &str, value: &RationalFunction) -> (Polynomial, u32) {
    let coeffs = poly.coefficients_in(var);
    let top = coeffs.keys().next_back().copied().unwrap_or(0);
    let p = &value.numer;
    let q = &value.denom;
    let mut acc = Polynomial::zero();
    let mut q_pow = Polynomial::one();
    for exp in (0..=top).rev() {
        acc = &acc * p;
        if let Some(c) = coeffs.get(&exp) {
            acc = &acc + &(c * &q_pow);
        }
        if exp > 0 {
            q_pow = &q_pow * q;
        }
    }
    (acc, top)
}

impl PartialEq for RationalFunction {
    fn eq(&self, other: &Self) -> bool {
        &self.numer * &other.denom == &other.numer * &self.denom
    }
}

impl Eq for RationalFunction {}

impl From<Polynomial> for RationalFunction {
    fn from(poly: Polynomial) -> Self {
        RationalFunction::from_poly(poly)
    }
}

impl fmt::Display for RationalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty(&self.to_expr()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn rf(input: &str) -> RationalFunction {
        RationalFunction::from_expr(&parse_expr(input).expect("parse")).expect("rational function")
    }

    #[test]
    fn cancels_common_factors() {
        let r = rf("(x^2 - y^2)/(x + y)");
        assert!(r.is_polynomial());
        assert_eq!(r, rf("x - y"));
    }

    #[test]
    fn denominator_is_normalised() {
        let r = rf("1/(-2*x - 4)");
        assert_eq!(r.denominator(), &Polynomial::from_expr(&parse_expr("x + 2").unwrap()).unwrap());
        assert_eq!(r.numerator().as_constant(), Some(Rational::new((-1).into(), 2.into())));
    }

    #[test]
    fn negative_powers_invert() {
        assert_eq!(rf("x^-2 * x^3"), rf("x"));
        assert!(matches!(
            RationalFunction::from_expr(&parse_expr("x^(1/2)").unwrap()),
            Err(CasError::Unsupported(_))
        ));
    }

    #[test]
    fn division_by_zero_is_reported() {
        let err = RationalFunction::from_expr(&parse_expr("x/(y - y)").unwrap()).unwrap_err();
        assert!(matches!(err, CasError::DivisionByZero));
    }

    #[test]
    fn substitution_handles_rational_values() {
        let r = rf("(a + b)/(a - b)");
        let s = r.substitute("a", &rf("1/b")).unwrap();
        assert_eq!(s, rf("(1 + b^2)/(1 - b^2)"));
    }
}
