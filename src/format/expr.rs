use crate::expr::{Expr, Rational};
use num_traits::Signed;

/// Render an expression with the minimum number of brackets.
///
/// Precedence contexts: 0 top level, 1 sum operand, 2 product operand,
/// 3 divisor or exponent, 4 power base.
pub fn pretty(expr: &Expr) -> String {
    fn pp(ctx: u8, expr: &Expr) -> String {
        match expr {
            Expr::Variable(v) => v.clone(),
            Expr::Constant(r) => {
                let text = show_rational(r);
                let prec = if r.is_negative() {
                    1
                } else if r.is_integer() {
                    5
                } else {
                    2
                };
                bracket(ctx, prec, text)
            }

            Expr::Add(a, b) => {
                let (neg_b, b_inner) = split_neg(b);
                let op = if neg_b { "-" } else { "+" };
                bracket(ctx, 1, format!("{} {op} {}", pp(1, a), pp(2, &b_inner)))
            }

            Expr::Sub(a, b) => {
                let (neg_b, b_inner) = split_neg(b);
                let op = if neg_b { "+" } else { "-" };
                bracket(ctx, 1, format!("{} {op} {}", pp(1, a), pp(2, &b_inner)))
            }

            Expr::Mul(a, b) => {
                let (na, a_inner) = split_neg(a);
                let (nb, b_inner) = split_neg(b);
                let body = format!("{}*{}", pp(2, &a_inner), pp(2, &b_inner));
                signed(ctx, na ^ nb, body)
            }

            Expr::Div(a, b) => {
                let (na, a_inner) = split_neg(a);
                let (nb, b_inner) = split_neg(b);
                let body = format!("{}/{}", pp(2, &a_inner), pp(3, &b_inner));
                signed(ctx, na ^ nb, body)
            }

            Expr::Pow(a, b) => bracket(ctx, 3, format!("{}^{}", pp(4, a), pp(4, b))),

            Expr::Neg(a) => {
                let (is_neg, inner) = split_neg(a);
                if is_neg {
                    pp(ctx, &inner)
                } else {
                    signed(ctx, true, pp(2, &inner))
                }
            }
        }
    }

    pp(0, expr)
}

fn signed(ctx: u8, negative: bool, body: String) -> String {
    if negative {
        bracket(ctx, 1, format!("-{body}"))
    } else {
        bracket(ctx, 2, body)
    }
}

fn split_neg(expr: &Expr) -> (bool, Expr) {
    match expr {
        Expr::Neg(inner) => (true, *inner.clone()),
        Expr::Constant(r) if r.is_negative() => (true, Expr::Constant(-r)),
        other => (false, other.clone()),
    }
}

fn bracket(ctx: u8, prec: u8, body: String) -> String {
    if prec < ctx {
        format!("({body})")
    } else {
        body
    }
}

fn show_rational(r: &Rational) -> String {
    if r.is_integer() {
        format!("{}", r.numer())
    } else {
        format!("{}/{}", r.numer(), r.denom())
    }
}
