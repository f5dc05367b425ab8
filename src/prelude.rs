//! String-based convenience API for quick experimentation.

use crate::error::Result;
use crate::expr::Expr;
use crate::factor::factor as factor_rf;
use crate::format::{pretty, pretty_solve_result};
use crate::parser::{parse_equation, parse_expr};
use crate::rational::RationalFunction;
use crate::simplify::simplify_fully;
use crate::solver::{SolveResult, solve_system};

pub fn parse(input: &str) -> Result<Expr> {
    parse_expr(input)
}

pub fn simp(input: &str) -> Result<String> {
    Ok(pretty(&simplify_fully(parse_expr(input)?)))
}

/// Factor the rational function written in `input`.
pub fn factor(input: &str) -> Result<String> {
    let rf = RationalFunction::from_expr(&parse_expr(input)?)?;
    Ok(factor_rf(&rf).to_string())
}

pub fn solve_system_eqs(vars: &[&str], equations: &[&str]) -> Result<SolveResult> {
    let parsed = equations
        .iter()
        .map(|eq| parse_equation(eq))
        .collect::<Result<Vec<_>>>()?;
    solve_system(vars.to_vec(), parsed)
}

pub fn solve_eqs(vars: &[&str], equations: &[&str]) -> Result<Vec<String>> {
    Ok(pretty_solve_result(&solve_system_eqs(vars, equations)?))
}
