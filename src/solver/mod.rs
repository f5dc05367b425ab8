use std::collections::{HashMap, HashSet};

use crate::error::{CasError, Result};
use crate::expr::Expr;
use crate::polynomial::Polynomial;
use crate::rational::RationalFunction;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub enum SolveResult {
    Linear(LinearResult),
    NonLinear(NonLinearResult),
}

#[derive(Debug, Clone)]
pub enum LinearResult {
    Unique(LinearSolution),
    Infinite(LinearFamily),
    Inconsistent(LinearInconsistent),
}

#[derive(Debug, Clone)]
pub struct LinearSolution {
    pub variables: Vec<String>,
    pub values: Vec<RationalFunction>,
    pub diagnostics: LinearDiagnostics,
    system: LinearSystem,
    scaled: Vec<Polynomial>,
    scale: Polynomial,
}

#[derive(Debug, Clone)]
pub struct LinearFamily {
    pub variables: Vec<String>,
    pub particular: Vec<RationalFunction>,
    pub params: Vec<String>,
    pub basis: Vec<Vec<RationalFunction>>,
    pub diagnostics: LinearDiagnostics,
}

#[derive(Debug, Clone)]
pub struct LinearInconsistent {
    pub diagnostics: LinearDiagnostics,
}

#[derive(Debug, Clone, Default)]
pub struct LinearDiagnostics {
    pub rank: usize,
    pub pivot_rows: Vec<usize>,
    pub pivot_columns: Vec<usize>,
    pub free_columns: Vec<usize>,
    /// Determinant of the coefficient matrix, for square systems.
    pub determinant: Option<RationalFunction>,
    pub inconsistent_row: Option<usize>,
    pub normalized_equations: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct NonLinearResult {
    pub variables: Vec<String>,
    pub normalized_equations: Vec<Expr>,
    pub nonlinear_equations: Vec<usize>,
}

impl SolveResult {
    pub fn unique(&self) -> Option<&LinearSolution> {
        match self {
            SolveResult::Linear(LinearResult::Unique(sol)) => Some(sol),
            _ => None,
        }
    }
}

impl LinearSolution {
    pub fn value(&self, name: &str) -> Option<&RationalFunction> {
        self.variables
            .iter()
            .position(|v| v == name)
            .map(|idx| &self.values[idx])
    }

    /// `lhs - rhs` of every equation with the solution substituted.
    pub fn residuals(&self) -> Result<Vec<RationalFunction>> {
        (0..self.system.rows.len())
            .map(|r| {
                // row · (scale * x) - scale * rhs, over scale * denominator
                let mut numer = -&(&self.system.rhs[r] * &self.scale);
                for (coeff, y) in self.system.rows[r].iter().zip(&self.scaled) {
                    if !coeff.is_zero() {
                        numer = &numer + &(coeff * y);
                    }
                }
                let denom = &self.scale * &self.system.denominators[r];
                RationalFunction::new(numer, denom)
            })
            .collect()
    }

    /// Every residual is identically zero. A residual that cannot be formed counts
    /// as a failure.
    pub fn is_verified(&self) -> bool {
        self.residuals()
            .is_ok_and(|residuals| residuals.iter().all(RationalFunction::is_zero))
    }
}

/// Linearised rows: `Σ rows[r][c] * x_c = rhs[r]`, each row scaled by `denominators[r]`
/// relative to the original `lhs - rhs`.
#[derive(Debug, Clone)]
struct LinearSystem {
    rows: Vec<Vec<Polynomial>>,
    rhs: Vec<Polynomial>,
    denominators: Vec<Polynomial>,
}

/// Solve a system of equations given as `(lhs, rhs)` pairs with exact fraction-free
/// elimination. Coefficients may be arbitrary rational functions of symbols that are not
/// unknowns. Non-linear input is reported as a [`NonLinearResult`].
pub fn solve_system(
    vars: Vec<impl Into<String>>,
    equations: Vec<(Expr, Expr)>,
) -> Result<SolveResult> {
    let variables: Vec<String> = vars.into_iter().map(Into::into).collect();
    let mut seen = HashSet::new();
    for v in &variables {
        if !seen.insert(v.as_str()) {
            return Err(CasError::DuplicateUnknown(v.clone()));
        }
    }
    let var_map: HashMap<&str, usize> = variables
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut normalized_equations = Vec::with_capacity(equations.len());
    let mut nonlinear_eqs = Vec::new();
    let mut system = LinearSystem {
        rows: Vec::with_capacity(equations.len()),
        rhs: Vec::with_capacity(equations.len()),
        denominators: Vec::with_capacity(equations.len()),
    };

    for (idx, (lhs, rhs)) in equations.into_iter().enumerate() {
        let difference = RationalFunction::from_expr(&lhs)?.sub(&RationalFunction::from_expr(&rhs)?);
        normalized_equations.push(difference.to_expr());
        let denom_has_unknown = variables.iter().any(|v| difference.denominator().contains_var(v));
        match decompose_linear(difference.numerator(), &var_map) {
            Some((coeffs, constant)) if !denom_has_unknown => {
                system.rows.push(coeffs);
                system.rhs.push(-&constant);
                system.denominators.push(difference.denominator().clone());
            }
            _ => nonlinear_eqs.push(idx),
        }
    }

    if !nonlinear_eqs.is_empty() {
        debug!(equations = ?nonlinear_eqs, "non-linear equations detected");
        return Ok(SolveResult::NonLinear(NonLinearResult {
            variables,
            normalized_equations,
            nonlinear_equations: nonlinear_eqs,
        }));
    }

    let n_vars = variables.len();
    let mut matrix = Matrix::augmented(&system, n_vars);
    let mut diagnostics = LinearDiagnostics {
        normalized_equations,
        ..LinearDiagnostics::default()
    };
    let sign = bareiss(&mut matrix, n_vars, &mut diagnostics)?;
    diagnostics.free_columns = free_columns(n_vars, &diagnostics.pivot_columns);

    if matrix.rows == n_vars {
        diagnostics.determinant = Some(determinant(&matrix, &system, &diagnostics, sign)?);
    }
    debug!(
        rank = diagnostics.rank,
        pivots = ?diagnostics.pivot_columns,
        free = ?diagnostics.free_columns,
        "eliminated linear system"
    );

    if diagnostics.inconsistent_row.is_some() {
        return Ok(SolveResult::Linear(LinearResult::Inconsistent(
            LinearInconsistent { diagnostics },
        )));
    }

    if diagnostics.rank == n_vars {
        let (scaled, scale) = back_substitute(&matrix, n_vars)?;
        let values = scaled
            .iter()
            .map(|y| RationalFunction::new(y.clone(), scale.clone()))
            .collect::<Result<Vec<_>>>()?;
        return Ok(SolveResult::Linear(LinearResult::Unique(LinearSolution {
            variables,
            values,
            diagnostics,
            system,
            scaled,
            scale,
        })));
    }

    let params: Vec<String> = (1..=diagnostics.free_columns.len())
        .map(|i| format!("t{i}"))
        .collect();
    let particular = family_vector(&matrix, &diagnostics, None)?;
    let basis = diagnostics
        .free_columns
        .iter()
        .map(|&free| family_vector(&matrix, &diagnostics, Some(free)))
        .collect::<Result<Vec<_>>>()?;

    Ok(SolveResult::Linear(LinearResult::Infinite(LinearFamily {
        variables,
        particular,
        params,
        basis,
        diagnostics,
    })))
}

/// Coefficients of each unknown and the constant part, or `None` if some term has
/// degree above one in the unknowns.
fn decompose_linear(
    numer: &Polynomial,
    var_map: &HashMap<&str, usize>,
) -> Option<(Vec<Polynomial>, Polynomial)> {
    let mut coeffs = vec![Polynomial::zero(); var_map.len()];
    let mut constant = Polynomial::zero();
    for (mono, c) in numer.terms() {
        let mut unknown = None;
        for (var, exp) in mono.powers() {
            if let Some(&idx) = var_map.get(var) {
                if exp > 1 || unknown.is_some() {
                    return None;
                }
                unknown = Some((idx, var));
            }
        }
        match unknown {
            Some((idx, var)) => {
                let term = Polynomial::from_term(mono.without(var), c.clone());
                coeffs[idx] = &coeffs[idx] + &term;
            }
            None => {
                constant = &constant + &Polynomial::from_term(mono.clone(), c.clone());
            }
        }
    }
    Some((coeffs, constant))
}

/// Fraction-free row echelon form. Returns the sign of the row permutation.
fn bareiss(matrix: &mut Matrix, n_vars: usize, diag: &mut LinearDiagnostics) -> Result<i32> {
    let rows = matrix.rows;
    let cols = matrix.cols;
    let mut sign = 1;
    let mut previous = Polynomial::one();
    let mut row = 0;

    for col in 0..n_vars {
        if row >= rows {
            break;
        }

        // Prefer the sparsest non-zero pivot.
        let pivot = (row..rows)
            .filter(|&r| !matrix.get(r, col).is_zero())
            .min_by_key(|&r| matrix.get(r, col).term_count());
        let Some(pivot_idx) = pivot else {
            continue;
        };
        if pivot_idx != row {
            matrix.swap_rows(row, pivot_idx);
            sign = -sign;
        }

        let pivot_value = matrix.get(row, col).clone();
        for r in row + 1..rows {
            let factor = matrix.get(r, col).clone();
            for c in col + 1..cols {
                let updated = &(&pivot_value * matrix.get(r, c)) - &(&factor * matrix.get(row, c));
                *matrix.get_mut(r, c) = updated.div_exact(&previous).ok_or_else(|| {
                    CasError::Unsupported("inexact fraction-free elimination step".to_string())
                })?;
            }
            *matrix.get_mut(r, col) = Polynomial::zero();
        }
        trace!(row, col, pivot_terms = pivot_value.term_count(), "pivot");

        previous = pivot_value;
        diag.pivot_rows.push(row);
        diag.pivot_columns.push(col);
        row += 1;
    }

    diag.rank = diag.pivot_columns.len();
    for r in row..rows {
        let row_slice = matrix.row(r);
        let all_zero = row_slice[..n_vars].iter().all(Polynomial::is_zero);
        if all_zero && !row_slice[n_vars].is_zero() {
            diag.inconsistent_row = Some(r);
            break;
        }
    }
    Ok(sign)
}

/// `det(A)` where row `r` of `A` is the echelon input divided by its denominator.
fn determinant(
    matrix: &Matrix,
    system: &LinearSystem,
    diag: &LinearDiagnostics,
    sign: i32,
) -> Result<RationalFunction> {
    let n = matrix.rows;
    if diag.rank < n || n == 0 {
        return Ok(if n == 0 {
            RationalFunction::one()
        } else {
            RationalFunction::zero()
        });
    }
    let mut last = matrix.get(n - 1, n - 1).clone();
    if sign < 0 {
        last = -&last;
    }
    let denominator = system
        .denominators
        .iter()
        .fold(Polynomial::one(), |acc, d| &acc * d);
    RationalFunction::new(last, denominator)
}

/// Back substitution on the echelon form of a full-rank system. Returns `(y, d)` with
/// `x_i = y_i / d`, where `d` is the last pivot and every `y_i` is a polynomial.
fn back_substitute(matrix: &Matrix, n: usize) -> Result<(Vec<Polynomial>, Polynomial)> {
    if n == 0 {
        return Ok((Vec::new(), Polynomial::one()));
    }
    let scale = matrix.get(n - 1, n - 1).clone();
    let mut scaled = vec![Polynomial::zero(); n];
    for i in (0..n).rev() {
        let mut acc = &scale * matrix.get(i, n);
        for (j, y) in scaled.iter().enumerate().skip(i + 1) {
            let coeff = matrix.get(i, j);
            if !coeff.is_zero() {
                acc = &acc - &(coeff * y);
            }
        }
        scaled[i] = acc.div_exact(matrix.get(i, i)).ok_or_else(|| {
            CasError::Unsupported("inexact fraction-free back substitution".to_string())
        })?;
    }
    Ok((scaled, scale))
}

/// Particular solution (`free = None`) or the basis vector for one free column.
fn family_vector(
    matrix: &Matrix,
    diag: &LinearDiagnostics,
    free: Option<usize>,
) -> Result<Vec<RationalFunction>> {
    let n_vars = matrix.cols - 1;
    let mut values = vec![RationalFunction::zero(); n_vars];
    if let Some(f) = free {
        values[f] = RationalFunction::one();
    }
    for (&row, &col) in diag.pivot_rows.iter().zip(&diag.pivot_columns).rev() {
        let mut acc = match free {
            None => RationalFunction::from_poly(matrix.get(row, n_vars).clone()),
            Some(_) => RationalFunction::zero(),
        };
        for (c, value) in values.iter().enumerate().skip(col + 1) {
            let coeff = matrix.get(row, c);
            if !coeff.is_zero() && !value.is_zero() {
                acc = acc.sub(&RationalFunction::from_poly(coeff.clone()).mul(value));
            }
        }
        values[col] = acc.div(&RationalFunction::from_poly(matrix.get(row, col).clone()))?;
    }
    Ok(values)
}

fn free_columns(n_vars: usize, pivots: &[usize]) -> Vec<usize> {
    let mut is_pivot = vec![false; n_vars];
    for &p in pivots {
        is_pivot[p] = true;
    }
    (0..n_vars).filter(|&c| !is_pivot[c]).collect()
}

struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Polynomial>,
}

impl Matrix {
    fn augmented(system: &LinearSystem, n_vars: usize) -> Self {
        let cols = n_vars + 1;
        let mut data = Vec::with_capacity(system.rows.len() * cols);
        for (row, rhs) in system.rows.iter().zip(&system.rhs) {
            data.extend(row.iter().cloned());
            data.push(rhs.clone());
        }
        Matrix {
            rows: system.rows.len(),
            cols,
            data,
        }
    }

    fn idx(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    fn get(&self, r: usize, c: usize) -> &Polynomial {
        &self.data[self.idx(r, c)]
    }

    fn get_mut(&mut self, r: usize, c: usize) -> &mut Polynomial {
        let idx = self.idx(r, c);
        &mut self.data[idx]
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.cols {
            let ia = self.idx(a, c);
            let ib = self.idx(b, c);
            self.data.swap(ia, ib);
        }
    }

    fn row(&self, r: usize) -> &[Polynomial] {
        let start = r * self.cols;
        &self.data[start..start + self.cols]
    }
}
