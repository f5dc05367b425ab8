//! Catalogue of three-phase elastic continuity problems and their closed-form solutions.
//!
//! Each [`Problem`] holds the boundary and continuity equations of one layered
//! (planar) or concentric (cylindrical) alpha/beta/gamma arrangement. Solving a
//! problem yields a [`Derivation`] with every unknown in closed form.

mod catalog;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::{CasError, Result};
use crate::expr::Expr;
use crate::factor::{Factored, factor};
use crate::parser::{parse_equation, parse_expr};
use crate::rational::RationalFunction;
use crate::simplify::{simplify, substitute_all};
use crate::solver::{LinearResult, LinearSolution, SolveResult, solve_system};
use tracing::info;

pub use catalog::{
    aniso_planar_eigenstrain, aniso_shear_components, catalog, cylindrical_applied_strain,
    cylindrical_eigenstrain, planar_applied_displacement, planar_eigenstrain,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Planar,
    Cylindrical,
}

/// Displacement component driven by the boundary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    X,
    Y,
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    Isotropic,
    Anisotropic,
}

/// Physical condition an equation encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Boundary,
    DisplacementContinuity,
    StressContinuity,
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Geometry::Planar => "planar",
            Geometry::Cylindrical => "cylindrical",
        })
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Component::X => "x",
            Component::Y => "y",
            Component::Radial => "radial",
        })
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Symmetry::Isotropic => "isotropic",
            Symmetry::Anisotropic => "anisotropic",
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Condition::Boundary => "boundary",
            Condition::DisplacementContinuity => "displacement continuity",
            Condition::StressContinuity => "stress continuity",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Equation {
    pub condition: Condition,
    pub text: &'static str,
}

#[derive(Debug, Clone)]
pub struct Problem {
    pub id: &'static str,
    pub title: &'static str,
    pub geometry: Geometry,
    pub component: Component,
    pub symmetry: Symmetry,
    pub eigenstrain: bool,
    pub unknowns: Vec<&'static str>,
    pub equations: Vec<Equation>,
    pub reported: Vec<&'static str>,
    substitutions: Vec<(String, Expr)>,
}

/// Which lines [`Derivation::report`] prints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub all_unknowns: bool,
    pub verify: bool,
}

pub fn find(id: &str) -> Result<Problem> {
    catalog()
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CasError::UnknownProblem(id.to_string()))
}

impl Problem {
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: &'static str,
        title: &'static str,
        geometry: Geometry,
        component: Component,
        symmetry: Symmetry,
        eigenstrain: bool,
        unknowns: &[&'static str],
        equations: Vec<Equation>,
        reported: &[&'static str],
    ) -> Self {
        Problem {
            id,
            title,
            geometry,
            component,
            symmetry,
            eigenstrain,
            unknowns: unknowns.to_vec(),
            equations,
            reported: reported.to_vec(),
            substitutions: Vec::new(),
        }
    }

    /// Parsed `(lhs, rhs)` pairs with any parameter specialisation applied.
    pub fn equations(&self) -> Result<Vec<(Expr, Expr)>> {
        let bindings: HashMap<String, Expr> = self.substitutions.iter().cloned().collect();
        self.equations
            .iter()
            .map(|eq| {
                let (lhs, rhs) = parse_equation(eq.text)?;
                if bindings.is_empty() {
                    return Ok((lhs, rhs));
                }
                Ok((substitute_all(&lhs, &bindings), substitute_all(&rhs, &bindings)))
            })
            .collect()
    }

    /// Symbols other than the unknowns, sorted.
    pub fn parameters(&self) -> Result<BTreeSet<String>> {
        let mut params = BTreeSet::new();
        for (lhs, rhs) in self.equations()? {
            params.extend(lhs.variables());
            params.extend(rhs.variables());
        }
        for unknown in &self.unknowns {
            params.remove(*unknown);
        }
        Ok(params)
    }

    /// Copy of the problem with parameters replaced, e.g. `[("eT", "0"), ("x2", "x1")]`.
    /// Values are expression text and may mention other parameters. The replacements of
    /// one call happen simultaneously, so `[("a", "b"), ("b", "a")]` swaps `a` and `b`;
    /// a later call applies on top of earlier ones.
    pub fn with_parameters(&self, values: &[(&str, &str)]) -> Result<Problem> {
        let params = self.parameters()?;
        let mut batch: Vec<(String, Expr)> = Vec::with_capacity(values.len());
        for (name, text) in values {
            if !params.contains(*name) {
                return Err(CasError::UnknownVariable((*name).to_string()));
            }
            let value = parse_expr(text)?;
            match batch.iter_mut().find(|(existing, _)| existing.as_str() == *name) {
                Some(entry) => entry.1 = value,
                None => batch.push(((*name).to_string(), value)),
            }
        }

        let bindings: HashMap<String, Expr> = batch.iter().cloned().collect();
        let mut specialised = self.clone();
        for (_, value) in &mut specialised.substitutions {
            *value = substitute_all(value, &bindings);
        }
        specialised.substitutions.extend(batch);
        Ok(specialised)
    }

    pub fn solve(&self) -> Result<Derivation> {
        info!(problem = self.id, "solving");
        if self.equations.len() != self.unknowns.len() {
            return Err(CasError::Mismatch {
                equations: self.equations.len(),
                unknowns: self.unknowns.len(),
            });
        }

        let solution = match solve_system(self.unknowns.clone(), self.equations()?)? {
            SolveResult::NonLinear(info) => {
                return Err(CasError::NonLinear {
                    equations: info.nonlinear_equations,
                });
            }
            SolveResult::Linear(LinearResult::Infinite(family)) => {
                return Err(CasError::Singular {
                    rank: family.diagnostics.rank,
                    unknowns: self.unknowns.len(),
                });
            }
            SolveResult::Linear(LinearResult::Inconsistent(info)) => {
                return Err(CasError::Inconsistent {
                    row: info.diagnostics.inconsistent_row.unwrap_or_default(),
                });
            }
            SolveResult::Linear(LinearResult::Unique(solution)) => solution,
        };
        info!(problem = self.id, "solved");
        Ok(Derivation {
            problem: self.clone(),
            solution,
        })
    }

    /// Human-readable description of the equation system.
    pub fn describe(&self) -> Result<Vec<String>> {
        let mut lines = vec![
            format!("{}: {}", self.id, self.title),
            format!(
                "geometry: {}, component: {}, moduli: {}, eigenstrain: {}",
                self.geometry,
                self.component,
                self.symmetry,
                if self.eigenstrain { "yes" } else { "no" }
            ),
            format!("unknowns: {}", self.unknowns.join(", ")),
        ];
        for (i, eq) in self.equations.iter().enumerate() {
            lines.push(format!("eq{} [{}]: {}", i + 1, eq.condition, eq.text));
        }
        if self.substitutions.is_empty() {
            return Ok(lines);
        }
        for (name, value) in &self.substitutions {
            lines.push(format!("with {name} = {value}"));
        }
        for (i, (lhs, rhs)) in self.equations()?.into_iter().enumerate() {
            lines.push(format!("eq{}': {} = {}", i + 1, simplify(lhs), simplify(rhs)));
        }
        Ok(lines)
    }
}

/// A solved problem.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub problem: Problem,
    pub solution: LinearSolution,
}

impl Derivation {
    pub fn closed_form(&self, unknown: &str) -> Result<&RationalFunction> {
        self.solution
            .value(unknown)
            .ok_or_else(|| CasError::UnknownVariable(unknown.to_string()))
    }

    pub fn factored(&self, unknown: &str) -> Result<Factored> {
        Ok(factor(self.closed_form(unknown)?))
    }

    /// `"<unknown> = <factored closed form>"` lines.
    pub fn report(&self, options: ReportOptions) -> Result<Vec<String>> {
        let names = if options.all_unknowns {
            &self.problem.unknowns
        } else {
            &self.problem.reported
        };
        let mut lines = names
            .iter()
            .map(|name| Ok(format!("{name} = {}", self.factored(name)?)))
            .collect::<Result<Vec<_>>>()?;
        if options.verify {
            let residuals = self.solution.residuals()?;
            let failing: Vec<usize> = residuals
                .iter()
                .enumerate()
                .filter(|(_, r)| !r.is_zero())
                .map(|(i, _)| i + 1)
                .collect();
            if failing.is_empty() {
                lines.push(format!(
                    "residual check: all {} equations satisfied",
                    residuals.len()
                ));
            } else {
                lines.push(format!("residual check: failed for equations {failing:?}"));
            }
        }
        Ok(lines)
    }
}
