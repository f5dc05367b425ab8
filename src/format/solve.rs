use crate::factor::factor;
use crate::rational::RationalFunction;
use crate::solver::{LinearDiagnostics, LinearResult, SolveResult};

/// Render a `SolveResult` into human-readable lines. Values are shown factored.
pub fn pretty_solve_result(result: &SolveResult) -> Vec<String> {
    match result {
        SolveResult::Linear(linear) => pretty_linear_result(linear),
        SolveResult::NonLinear(info) => {
            let mut lines = vec!["Non-linear system; only linear systems are solved.".to_string()];
            if !info.nonlinear_equations.is_empty() {
                lines.push(format!(
                    "Non-linear equations (0-based indices): {:?}",
                    info.nonlinear_equations
                ));
            }
            lines
        }
    }
}

fn pretty_linear_result(result: &LinearResult) -> Vec<String> {
    match result {
        LinearResult::Unique(sol) => {
            let mut lines = vec!["Unique solution:".to_string()];
            for (var, value) in sol.variables.iter().zip(&sol.values) {
                lines.push(format!("{var} = {}", factor(value)));
            }
            push_diag(&mut lines, &sol.diagnostics);
            lines
        }
        LinearResult::Infinite(family) => {
            let mut lines = vec![format!(
                "Infinite solutions (params: {}):",
                family.params.join(", ")
            )];
            for (i, var) in family.variables.iter().enumerate() {
                let mut parts = Vec::new();
                if !family.particular[i].is_zero() {
                    parts.push(factor(&family.particular[i]).to_string());
                }
                for (param, basis_vec) in family.params.iter().zip(&family.basis) {
                    let coeff = &basis_vec[i];
                    if coeff.is_zero() {
                        continue;
                    }
                    if *coeff == RationalFunction::one() {
                        parts.push(param.clone());
                    } else {
                        parts.push(format!("({})*{param}", factor(coeff)));
                    }
                }
                if parts.is_empty() {
                    parts.push("0".to_string());
                }
                lines.push(format!("{var} = {}", parts.join(" + ")));
            }
            push_diag(&mut lines, &family.diagnostics);
            lines
        }
        LinearResult::Inconsistent(info) => {
            let mut lines = vec!["No solution (inconsistent system).".to_string()];
            if let Some(row) = info.diagnostics.inconsistent_row {
                lines.push(format!("Inconsistent reduced row index: {row}"));
            }
            push_diag(&mut lines, &info.diagnostics);
            lines
        }
    }
}

fn push_diag(lines: &mut Vec<String>, diag: &LinearDiagnostics) {
    lines.push(format!("Rank: {}", diag.rank));
    if let Some(det) = &diag.determinant {
        lines.push(format!("Determinant: {}", factor(det)));
    }
    if !diag.pivot_columns.is_empty() {
        lines.push(format!("Pivot columns: {:?}", diag.pivot_columns));
    }
    if !diag.free_columns.is_empty() {
        lines.push(format!("Free columns: {:?}", diag.free_columns));
    }
}
