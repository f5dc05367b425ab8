use std::collections::HashMap;

use crate::expr::Expr;

/// Substitute variable `var` with `replacement` throughout `expr`.
pub fn substitute(expr: &Expr, var: &str, replacement: &Expr) -> Expr {
    map_variables(expr, &|name| (name == var).then(|| replacement.clone()))
}

/// Replace every variable named in `bindings` simultaneously.
pub fn substitute_all(expr: &Expr, bindings: &HashMap<String, Expr>) -> Expr {
    map_variables(expr, &|name| bindings.get(name).cloned())
}

fn map_variables(expr: &Expr, lookup: &dyn Fn(&str) -> Option<Expr>) -> Expr {
    match expr {
        Expr::Variable(name) => lookup(name).unwrap_or_else(|| expr.clone()),
        Expr::Constant(_) => expr.clone(),
        Expr::Add(a, b) => Expr::Add(
            map_variables(a, lookup).boxed(),
            map_variables(b, lookup).boxed(),
        ),
        Expr::Sub(a, b) => Expr::Sub(
            map_variables(a, lookup).boxed(),
            map_variables(b, lookup).boxed(),
        ),
        Expr::Mul(a, b) => Expr::Mul(
            map_variables(a, lookup).boxed(),
            map_variables(b, lookup).boxed(),
        ),
        Expr::Div(a, b) => Expr::Div(
            map_variables(a, lookup).boxed(),
            map_variables(b, lookup).boxed(),
        ),
        Expr::Pow(a, b) => Expr::Pow(
            map_variables(a, lookup).boxed(),
            map_variables(b, lookup).boxed(),
        ),
        Expr::Neg(a) => Expr::Neg(map_variables(a, lookup).boxed()),
    }
}
