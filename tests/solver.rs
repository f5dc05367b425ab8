use threephase::prelude::{solve_eqs, solve_system_eqs};
use threephase::{
    CasError, Expr, LinearResult, RationalFunction, SolveResult, parse_expr, pretty_solve_result,
    solve_system,
};

fn parse(input: &str) -> Expr {
    parse_expr(input).unwrap_or_else(|e| panic!("failed to parse {input}: {e}"))
}

fn rf(input: &str) -> RationalFunction {
    RationalFunction::from_expr(&parse(input)).expect("rational function")
}

#[test]
fn numeric_two_by_two() {
    let equations = vec![(parse("2*x+3*y"), parse("7")), (parse("x-4*y"), parse("1"))];
    let result = solve_system(vec!["x", "y"], equations).expect("solve");
    let sol = result.unique().expect("unique solution");
    assert_eq!(sol.value("x"), Some(&rf("31/11")));
    assert_eq!(sol.value("y"), Some(&rf("5/11")));
    assert_eq!(sol.diagnostics.rank, 2);
    assert_eq!(sol.diagnostics.determinant, Some(rf("-11")));
    assert!(sol.is_verified());

    let lines = pretty_solve_result(&result);
    assert_eq!(
        lines,
        [
            "Unique solution:",
            "x = 31/11",
            "y = 5/11",
            "Rank: 2",
            "Determinant: -11",
            "Pivot columns: [0, 1]",
        ]
    );
}

#[test]
fn numeric_four_by_four() {
    let equations = [
        "x + y + z + w = 10",
        "2*x + 3*y - z + 4*w = 20",
        "-x + y + 5*z - 2*w = 3",
        "3*x - y + 2*z + w = 14",
    ];
    let result = solve_system_eqs(&["x", "y", "z", "w"], &equations).expect("solve");
    let sol = result.unique().expect("unique solution");
    let expected = ["55/7", "40/7", "-2/7", "-23/7"];
    for (value, text) in sol.values.iter().zip(expected) {
        assert_eq!(value, &rf(text));
    }
    assert!(sol.is_verified());
}

#[test]
fn symbolic_coefficients() {
    let result = solve_system_eqs(&["u", "v"], &["a*u + b*v = c", "u - v = 0"]).expect("solve");
    let sol = result.unique().expect("unique solution");
    assert_eq!(sol.value("u"), Some(&rf("c/(a + b)")));
    assert_eq!(sol.value("v"), Some(&rf("c/(a + b)")));
    assert_eq!(sol.diagnostics.determinant, Some(rf("-a - b")));
    let residuals = sol.residuals().expect("residuals");
    assert_eq!(residuals.len(), 2);
    assert!(residuals.iter().all(RationalFunction::is_zero));
}

#[test]
fn equations_with_parameter_denominators() {
    let result = solve_system_eqs(&["A", "B"], &["A*x1 - B/x1 = 1", "A + B/x1^2 = 0"])
        .expect("solve");
    let sol = result.unique().expect("unique solution");
    assert_eq!(sol.value("A"), Some(&rf("1/(2*x1)")));
    assert_eq!(sol.value("B"), Some(&rf("-x1/2")));
    assert!(sol.is_verified());
}

#[test]
fn inconsistent_system() {
    let result = solve_system_eqs(&["x", "y"], &["x + y = 1", "2*x + 2*y = 3"]).expect("solve");
    let SolveResult::Linear(LinearResult::Inconsistent(info)) = &result else {
        panic!("expected inconsistency, got {result:?}");
    };
    assert_eq!(info.diagnostics.rank, 1);
    assert_eq!(info.diagnostics.inconsistent_row, Some(1));
    assert_eq!(pretty_solve_result(&result)[0], "No solution (inconsistent system).");
}

#[test]
fn underdetermined_system_gives_family() {
    let result = solve_system_eqs(&["x", "y"], &["x + y = 2"]).expect("solve");
    let SolveResult::Linear(LinearResult::Infinite(family)) = &result else {
        panic!("expected a family, got {result:?}");
    };
    assert_eq!(family.params, ["t1"]);
    assert_eq!(family.diagnostics.free_columns, [1]);
    assert_eq!(family.particular, [rf("2"), rf("0")]);
    assert_eq!(family.basis, [vec![rf("-1"), rf("1")]]);
    assert_eq!(family.diagnostics.determinant, None);
}

#[test]
fn dependent_square_system_has_zero_determinant() {
    let result = solve_system_eqs(&["x", "y"], &["x + k*y = 1", "2*x + 2*k*y = 2"]).expect("solve");
    let SolveResult::Linear(LinearResult::Infinite(family)) = &result else {
        panic!("expected a family, got {result:?}");
    };
    assert_eq!(family.diagnostics.determinant, Some(RationalFunction::zero()));
    assert_eq!(family.basis, [vec![rf("-k"), rf("1")]]);
}

#[test]
fn non_linear_equations_are_reported() {
    let result = solve_system_eqs(&["x", "y"], &["x*y = 1", "x + y = 2", "1/x = 3"]).expect("solve");
    let SolveResult::NonLinear(info) = &result else {
        panic!("expected non-linear detection, got {result:?}");
    };
    assert_eq!(info.nonlinear_equations, [0, 2]);
    let lines = pretty_solve_result(&result);
    assert_eq!(lines[1], "Non-linear equations (0-based indices): [0, 2]");
}

#[test]
fn duplicate_unknowns_are_rejected() {
    let err = solve_system(vec!["x", "x"], vec![(parse("x"), parse("1"))]).unwrap_err();
    assert!(matches!(err, CasError::DuplicateUnknown(name) if name == "x"));
}

#[test]
fn string_api_renders_summary() {
    let lines = solve_eqs(&["x", "y", "z"], &["2*x + 3*y + 8*z = 7", "x - 4*y + 6*z = 1", "3*x-y-z=8"])
        .expect("solve");
    assert_eq!(&lines[..4], ["Unique solution:", "x = 31/11", "y = 5/11", "z = 0"]);
}
