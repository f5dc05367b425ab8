//! Closed-form continuity solutions for three-phase (alpha/beta/gamma) elastic systems,
//! built on a small exact computer-algebra core: expressions, multivariate polynomials,
//! rational functions, a fraction-free linear solver and a content/square-free factoriser.

pub mod cli;
pub mod error;
pub mod expr;
pub mod factor;
pub mod format;
pub mod parser;
pub mod polynomial;
pub mod prelude;
pub mod rational;
pub mod simplify;
pub mod solver;
pub mod threephase;

pub use error::{CasError, Result};
pub use expr::{Expr, Rational, add, div, mul, neg, one, pow, rational, sub, zero};
pub use factor::{Factor, Factored, Factorization, factor, factor_polynomial};
pub use format::{pretty, pretty_solve_result};
pub use parser::{parse_equation, parse_expr};
pub use polynomial::{MPoly, Monomial, Polynomial};
pub use rational::RationalFunction;
pub use simplify::{simplify, simplify_fully, simplify_with_limit, substitute, substitute_all};
pub use solver::{
    LinearDiagnostics, LinearFamily, LinearInconsistent, LinearResult, LinearSolution,
    NonLinearResult, SolveResult, solve_system,
};
pub use threephase::{
    Component, Condition, Derivation, Equation, Geometry, Problem, ReportOptions, Symmetry,
    catalog, find,
};
