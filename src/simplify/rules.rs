use std::collections::{BTreeMap, HashMap};

use crate::expr::{Expr, Rational, one, zero};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

const DISTRIBUTE_TERM_LIMIT: usize = 64;

type Powers = BTreeMap<Expr, Rational>;

/// A rational coefficient times a product of bases raised to rational powers.
#[derive(Clone, Debug)]
struct Product {
    coeff: Rational,
    powers: Powers,
}

impl Product {
    fn constant(coeff: Rational) -> Self {
        Product {
            coeff,
            powers: BTreeMap::new(),
        }
    }

    fn factor(base: Expr, exp: Rational) -> Self {
        let mut powers = BTreeMap::new();
        if !exp.is_zero() {
            powers.insert(base, exp);
        }
        Product {
            coeff: Rational::one(),
            powers,
        }
    }

    fn merge(mut self, other: Product) -> Self {
        self.coeff *= other.coeff;
        for (base, exp) in other.powers {
            *self.powers.entry(base).or_insert_with(Rational::zero) += exp;
        }
        self.powers.retain(|_, e| !e.is_zero());
        self
    }

    /// `None` when the power would divide by zero or the exponent is out of range.
    fn raise(self, n: &BigInt) -> Option<Self> {
        if self.coeff.is_zero() && n.is_negative() {
            return None;
        }
        let k = n.abs().to_u32()?;
        let magnitude = Rational::new(self.coeff.numer().pow(k), self.coeff.denom().pow(k));
        let coeff = if n.is_negative() {
            magnitude.recip()
        } else {
            magnitude
        };
        let scale = Rational::from_integer(n.clone());
        let powers = self
            .powers
            .into_iter()
            .map(|(base, e)| (base, e * scale.clone()))
            .filter(|(_, e)| !e.is_zero())
            .collect();
        Some(Product { coeff, powers })
    }
}

pub fn simplify(expr: Expr) -> Expr {
    let mut cache = HashMap::new();
    simplify_cached(expr, &mut cache)
}

fn simplify_cached(expr: Expr, cache: &mut HashMap<Expr, Expr>) -> Expr {
    if let Some(hit) = cache.get(&expr) {
        return hit.clone();
    }

    let key = expr.clone();
    let result = match expr {
        Expr::Add(a, b) => simplify_add(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Sub(a, b) => simplify_sub(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Mul(a, b) => simplify_mul(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Div(a, b) => simplify_div(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Pow(a, b) => simplify_pow(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Neg(a) => simplify_neg(simplify_cached(*a, cache)),
        e => e,
    };

    cache.insert(key, result.clone());
    result
}

/// Apply simplification passes until the expression stops changing or we hit the iteration cap.
pub fn simplify_fully(expr: Expr) -> Expr {
    simplify_with_limit(expr, 32)
}

/// Apply simplification passes up to `max_iters`, returning the last value if convergence is not reached.
pub fn simplify_with_limit(expr: Expr, max_iters: usize) -> Expr {
    let mut cache = HashMap::new();
    let mut current = expr;
    for _ in 0..max_iters {
        let next = simplify_cached(current.clone(), &mut cache);
        if next == current {
            return current;
        }
        current = next;
    }
    current
}

pub fn simplify_add(x: Expr, y: Expr) -> Expr {
    let mut terms = flatten_sum(&x);
    terms.extend(flatten_sum(&y));
    rebuild_sum(collect_terms(terms))
}

pub fn simplify_sub(x: Expr, y: Expr) -> Expr {
    simplify_add(x, simplify_neg(y))
}

pub fn simplify_mul(x: Expr, y: Expr) -> Expr {
    let left = flatten_sum(&x);
    let right = flatten_sum(&y);
    let distribute = (left.len() > 1 || right.len() > 1)
        && left.len() * right.len() <= DISTRIBUTE_TERM_LIMIT
        && !has_reciprocal(&x)
        && !has_reciprocal(&y);

    if distribute {
        let mut products = Vec::with_capacity(left.len() * right.len());
        for a in &left {
            for b in &right {
                products.push(rebuild_product(product_of(a).merge(product_of(b))));
            }
        }
        return rebuild_sum(collect_terms(products));
    }

    rebuild_product(product_of(&x).merge(product_of(&y)))
}

pub fn simplify_div(x: Expr, y: Expr) -> Expr {
    if y.is_zero() {
        return Expr::Div(x.boxed(), y.boxed());
    }
    simplify_mul(x, simplify_pow(y, Expr::integer(-1)))
}

pub fn simplify_pow(x: Expr, y: Expr) -> Expr {
    if let Expr::Constant(e) = &y {
        if e.is_zero() {
            return one();
        }
        if e.is_one() {
            return x;
        }
        if e.is_integer() {
            if let Some(p) = product_of(&x).raise(&e.to_integer()) {
                return rebuild_product(p);
            }
        }
    }
    if x.is_one() {
        return one();
    }
    Expr::Pow(x.boxed(), y.boxed())
}

pub fn simplify_neg(expr: Expr) -> Expr {
    match expr {
        Expr::Constant(x) => Expr::Constant(-x),
        Expr::Neg(x) => *x,
        other => Expr::Neg(other.boxed()),
    }
}

fn flatten_sum(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Add(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b));
            out
        }
        Expr::Sub(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b).into_iter().map(simplify_neg));
            out
        }
        Expr::Neg(a) => flatten_sum(a).into_iter().map(simplify_neg).collect(),
        other => vec![other.clone()],
    }
}

fn product_of(expr: &Expr) -> Product {
    match expr {
        Expr::Constant(c) => Product::constant(c.clone()),
        Expr::Neg(inner) => {
            let mut p = product_of(inner);
            p.coeff = -p.coeff;
            p
        }
        Expr::Mul(a, b) => product_of(a).merge(product_of(b)),
        Expr::Div(a, b) => match product_of(b).raise(&BigInt::from(-1)) {
            Some(inverse) => product_of(a).merge(inverse),
            None => product_of(a).merge(Product::factor(
                Expr::Div(one().boxed(), b.clone()),
                Rational::one(),
            )),
        },
        Expr::Pow(base, exp) => match &**exp {
            Expr::Constant(e) if e.is_integer() => product_of(base)
                .raise(&e.to_integer())
                .unwrap_or_else(|| Product::factor(expr.clone(), Rational::one())),
            Expr::Constant(e) => Product::factor((**base).clone(), e.clone()),
            _ => Product::factor(expr.clone(), Rational::one()),
        },
        other => Product::factor(other.clone(), Rational::one()),
    }
}

fn has_reciprocal(expr: &Expr) -> bool {
    product_of(expr).powers.values().any(|e| e.is_negative())
}

fn collect_terms(terms: Vec<Expr>) -> BTreeMap<Powers, Rational> {
    let mut map: BTreeMap<Powers, Rational> = BTreeMap::new();
    for term in terms {
        let p = product_of(&term);
        if p.coeff.is_zero() {
            continue;
        }
        *map.entry(p.powers).or_insert_with(Rational::zero) += p.coeff;
    }
    map.retain(|_, c| !c.is_zero());
    map
}

fn rebuild_sum(map: BTreeMap<Powers, Rational>) -> Expr {
    let mut constant = None;
    let mut terms = Vec::with_capacity(map.len());
    for (powers, coeff) in map {
        if powers.is_empty() {
            constant = Some(coeff);
        } else {
            terms.push(rebuild_product(Product { coeff, powers }));
        }
    }
    if let Some(c) = constant {
        terms.push(Expr::Constant(c));
    }
    terms
        .into_iter()
        .reduce(|acc, t| Expr::Add(acc.boxed(), t.boxed()))
        .unwrap_or_else(zero)
}

fn rebuild_product(p: Product) -> Expr {
    if p.coeff.is_zero() {
        return zero();
    }
    let mut numer = Vec::new();
    let mut denom = Vec::new();
    for (base, exp) in p.powers {
        if exp.is_negative() {
            denom.push(power_expr(base, -exp));
        } else {
            numer.push(power_expr(base, exp));
        }
    }

    let magnitude = p.coeff.abs();
    let body = if denom.is_empty() {
        mul_list(magnitude, numer)
    } else {
        let top = mul_list(Rational::from_integer(magnitude.numer().clone()), numer);
        let bottom = mul_list(Rational::from_integer(magnitude.denom().clone()), denom);
        Expr::Div(top.boxed(), bottom.boxed())
    };

    if p.coeff.is_negative() {
        Expr::Neg(body.boxed())
    } else {
        body
    }
}

fn power_expr(base: Expr, exp: Rational) -> Expr {
    if exp.is_one() {
        base
    } else {
        Expr::Pow(base.boxed(), Expr::Constant(exp).boxed())
    }
}

fn mul_list(coeff: Rational, factors: Vec<Expr>) -> Expr {
    let lead = if coeff.is_one() && !factors.is_empty() {
        None
    } else {
        Some(Expr::Constant(coeff))
    };
    lead.into_iter()
        .chain(factors)
        .reduce(|acc, f| Expr::Mul(acc.boxed(), f.boxed()))
        .unwrap_or_else(one)
}
