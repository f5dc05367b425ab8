use std::collections::BTreeSet;

use threephase::{
    CasError, Problem, RationalFunction, ReportOptions, catalog, find, parse_expr,
};
use threephase::threephase::{
    aniso_planar_eigenstrain, aniso_shear_components, cylindrical_applied_strain,
    cylindrical_eigenstrain, planar_applied_displacement, planar_eigenstrain,
};

fn rf(input: &str) -> RationalFunction {
    RationalFunction::from_expr(&parse_expr(input).expect("parse")).expect("rational function")
}

fn specialise(problem: Problem, values: &[(&str, &str)]) -> Problem {
    problem.with_parameters(values).expect("known parameters")
}

#[test]
fn catalogue_has_six_distinct_problems() {
    let problems = catalog();
    assert_eq!(problems.len(), 6);
    let ids: BTreeSet<_> = problems.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 6);
    for p in &problems {
        assert_eq!(p.equations.len(), p.unknowns.len(), "{}", p.id);
        assert_eq!(find(p.id).expect("listed problem").title, p.title);
    }
    assert!(matches!(find("spherical"), Err(CasError::UnknownProblem(id)) if id == "spherical"));
}

#[test]
fn every_problem_has_a_verified_closed_form() {
    for problem in catalog() {
        let derivation = problem.solve().expect("unique solution");
        assert!(derivation.solution.is_verified(), "{}", problem.id);
        for unknown in &problem.unknowns {
            let value = derivation.closed_form(unknown).expect("solved unknown");
            for symbol in value.variables() {
                assert!(
                    !problem.unknowns.iter().any(|u| *u == symbol),
                    "{unknown} of {} mentions {symbol}",
                    problem.id
                );
            }
        }
    }
}

#[test]
fn report_prints_reported_unknowns() {
    let derivation = planar_eigenstrain().solve().expect("solve");
    let lines = derivation.report(ReportOptions::default()).expect("report");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("A_alpha = "), "{}", lines[0]);

    let options = ReportOptions {
        all_unknowns: true,
        verify: true,
    };
    let lines = derivation.report(options).expect("report");
    assert_eq!(lines.len(), 7);
    assert!(lines[5].starts_with("B_gamma = "));
    assert_eq!(lines[6], "residual check: all 6 equations satisfied");
    assert!(matches!(
        derivation.closed_form("C_alpha"),
        Err(CasError::UnknownVariable(_))
    ));
}

#[test]
fn parameters_exclude_unknowns() {
    let params = planar_eigenstrain().parameters().expect("parameters");
    let names: Vec<&str> = params.iter().map(String::as_str).collect();
    assert_eq!(
        names,
        ["Lx", "eT", "lambda_beta", "mod_alpha", "mod_beta", "mod_gamma", "mu_beta", "x1", "x2"]
    );
}

#[test]
fn specialisation_within_one_call_is_simultaneous() {
    let plain = planar_applied_displacement().solve().expect("solve");
    let swapped = specialise(
        planar_applied_displacement(),
        &[("ux_left", "ux_right"), ("ux_right", "ux_left")],
    );
    let equations = swapped.equations().expect("equations");
    assert_eq!(equations[0].1, parse_expr("ux_right").expect("parse"));
    assert_eq!(equations[5].1, parse_expr("ux_left").expect("parse"));

    let derivation = swapped.solve().expect("solve");
    assert_eq!(
        derivation.closed_form("A_beta").expect("A_beta"),
        &plain.closed_form("A_beta").expect("A_beta").neg()
    );
}

#[test]
fn later_specialisations_apply_on_top() {
    let gap = specialise(planar_eigenstrain(), &[("x2", "x1 + h")]);
    assert!(gap.parameters().expect("parameters").contains("h"));
    let closed = specialise(gap, &[("h", "0")]);
    assert!(!closed.parameters().expect("parameters").contains("h"));
    let derivation = closed.solve().expect("solve");
    assert!(derivation.closed_form("A_alpha").expect("A_alpha").is_zero());
}

#[test]
fn specialising_an_unknown_symbol_fails() {
    for name in ["nu", "A_alpha"] {
        let err = planar_eigenstrain().with_parameters(&[(name, "0")]).unwrap_err();
        assert!(matches!(err, CasError::UnknownVariable(n) if n == name));
    }
}

#[test]
fn vanishing_eigenstrain_gives_zero_field() {
    for problem in [planar_eigenstrain(), cylindrical_eigenstrain()] {
        let derivation = specialise(problem, &[("eT", "0")]).solve().expect("solve");
        assert!(derivation.solution.values.iter().all(RationalFunction::is_zero));
    }
    let fixed = specialise(
        planar_applied_displacement(),
        &[("ux_left", "0"), ("ux_right", "0")],
    );
    let derivation = fixed.solve().expect("solve");
    assert!(derivation.solution.values.iter().all(RationalFunction::is_zero));
}

#[test]
fn collapsed_beta_layer_leaves_alpha_unstrained() {
    let derivation = specialise(planar_eigenstrain(), &[("x2", "x1")]).solve().expect("solve");
    assert!(derivation.closed_form("A_alpha").expect("A_alpha").is_zero());

    let derivation = specialise(aniso_planar_eigenstrain(), &[("x2", "x1")])
        .solve()
        .expect("solve");
    let gamma = derivation.closed_form("Ax_gamma").expect("Ax_gamma");
    for symbol in ["mod_beta", "muprime_beta", "zeta_beta", "eT"] {
        assert!(!gamma.contains_var(symbol), "Ax_gamma depends on {symbol}");
    }
}

#[test]
fn collapsed_beta_layer_leaves_a_two_phase_slab() {
    let two_phase = "(Lx*mod_alpha + Lx*mod_gamma - 2*mod_alpha*x1 + 2*mod_gamma*x1)";
    let derivation = specialise(planar_applied_displacement(), &[("x2", "x1")])
        .solve()
        .expect("solve");
    assert_eq!(
        derivation.closed_form("A_alpha").expect("A_alpha"),
        &rf(&format!("2*mod_gamma*(ux_right - ux_left)/{two_phase}"))
    );
    assert_eq!(
        derivation.closed_form("A_gamma").expect("A_gamma"),
        &rf(&format!("2*mod_alpha*(ux_right - ux_left)/{two_phase}"))
    );

    let derivation = specialise(aniso_shear_components(), &[("x2", "x1")])
        .solve()
        .expect("solve");
    for name in ["Ay_alpha", "Ay_gamma"] {
        let value = derivation.closed_form(name).expect(name);
        assert!(!value.contains_var("mu_beta"), "{name} depends on mu_beta");
    }
    assert_eq!(
        derivation.closed_form("Ay_alpha").expect("Ay_alpha"),
        &rf("2*mu_gamma*(uyR - uyL)/(Lx*mu_alpha + Lx*mu_gamma - 2*mu_alpha*x1 + 2*mu_gamma*x1)")
    );
}

#[test]
fn uniform_moduli_give_uniform_strain() {
    let shear = specialise(
        aniso_shear_components(),
        &[("mu_beta", "mu_alpha"), ("mu_gamma", "mu_alpha")],
    );
    let derivation = shear.solve().expect("solve");
    assert_eq!(derivation.closed_form("Ay_beta").expect("Ay_beta"), &rf("(uyR - uyL)/Lx"));

    let slab = specialise(
        planar_applied_displacement(),
        &[("mod_beta", "mod_alpha"), ("mod_gamma", "mod_alpha")],
    );
    let derivation = slab.solve().expect("solve");
    assert_eq!(
        derivation.closed_form("A_beta").expect("A_beta"),
        &rf("(ux_right - ux_left)/Lx")
    );

    let cylinders = specialise(
        cylindrical_applied_strain(),
        &[
            ("mod_beta", "mod_alpha"),
            ("mod_gamma", "mod_alpha"),
            ("lambda_beta", "lambda_alpha"),
            ("lambda_gamma", "lambda_alpha"),
        ],
    );
    let derivation = cylinders.solve().expect("solve");
    for name in ["A_alpha", "A_beta", "A_gamma"] {
        assert_eq!(derivation.closed_form(name).expect(name), &rf("erg"));
    }
    for name in ["B_beta", "B_gamma"] {
        assert!(derivation.closed_form(name).expect(name).is_zero());
    }
}

#[test]
fn rigid_middle_layer_without_load_is_singular() {
    let problem = specialise(
        aniso_shear_components(),
        &[("mu_beta", "0"), ("x2", "x1"), ("uyR", "uyL")],
    );
    let err = problem.solve().unwrap_err();
    assert!(matches!(err, CasError::Singular { rank: 5, unknowns: 6 }), "{err}");
}

#[test]
fn malformed_systems_are_rejected() {
    let mut short = planar_eigenstrain();
    short.equations.pop();
    assert!(matches!(
        short.solve(),
        Err(CasError::Mismatch { equations: 5, unknowns: 6 })
    ));

    let mut coupled = planar_eigenstrain();
    coupled.equations[0].text = "A_alpha*B_alpha = 0";
    match coupled.solve() {
        Err(CasError::NonLinear { equations }) => assert_eq!(equations, [0]),
        other => panic!("expected non-linear error, got {other:?}"),
    }
}

#[test]
fn describe_lists_equations_and_specialisations() {
    let lines = planar_eigenstrain().describe().expect("describe");
    assert_eq!(lines.len(), 9);
    assert_eq!(
        lines[0],
        "planar_eigenstrain: Planar slab with fixed ends and beta-phase eigenstrain"
    );
    assert_eq!(
        lines[1],
        "geometry: planar, component: x, moduli: isotropic, eigenstrain: yes"
    );
    assert_eq!(lines[2], "unknowns: A_alpha, B_alpha, A_beta, B_beta, A_gamma, B_gamma");
    assert_eq!(lines[3], "eq1 [boundary]: A_alpha*(Lx/2) - B_alpha = 0");

    let lines = specialise(planar_eigenstrain(), &[("eT", "0")])
        .describe()
        .expect("describe");
    assert_eq!(lines.len(), 16);
    assert_eq!(lines[9], "with eT = 0");
    assert!(lines[10].starts_with("eq1': "));
}

// Reference closed forms of the reported unknowns, with any left-boundary
// displacement set to zero.

const OUTER: &str = "((lambda_alpha - lambda_beta + mod_alpha + mod_beta)\
    *(lambda_beta - lambda_gamma + mod_beta + mod_gamma)*x2^2 \
    - (lambda_alpha - lambda_beta + mod_alpha - mod_beta)\
    *(lambda_beta - lambda_gamma - mod_beta + mod_gamma)*x1^2)*radius^2";
const INNER: &str = "((lambda_alpha - lambda_beta + mod_alpha - mod_beta)\
    *(lambda_beta - lambda_gamma - mod_beta - mod_gamma)*x1^2 \
    - (lambda_alpha - lambda_beta + mod_alpha + mod_beta)\
    *(lambda_beta - lambda_gamma + mod_beta - mod_gamma)*x2^2)*x2^2";

fn reported(problem: Problem, values: &[(&str, &str)]) -> RationalFunction {
    let name = problem.reported[0];
    let problem = if values.is_empty() {
        problem
    } else {
        specialise(problem, values)
    };
    problem
        .solve()
        .expect("solve")
        .closed_form(name)
        .expect("reported unknown")
        .clone()
}

#[test]
fn planar_eigenstrain_matches_reference() {
    assert_eq!(
        reported(planar_eigenstrain(), &[]),
        rf("4*eT*mod_gamma*(lambda_beta + mu_beta)*(x1 - x2)/(Lx*mod_alpha*mod_beta \
            + Lx*mod_beta*mod_gamma - 2*mod_alpha*mod_beta*x2 - 2*mod_alpha*mod_gamma*x1 \
            + 2*mod_alpha*mod_gamma*x2 + 2*mod_beta*mod_gamma*x1)")
    );
}

#[test]
fn planar_applied_displacement_matches_series_compliance() {
    assert_eq!(
        reported(planar_applied_displacement(), &[]),
        rf("2*mod_alpha*mod_gamma*(ux_right - ux_left)/(mod_beta*mod_gamma*(Lx + 2*x1) \
            + 2*mod_alpha*mod_gamma*(x2 - x1) + mod_alpha*mod_beta*(Lx - 2*x2))")
    );
}

#[test]
fn aniso_planar_eigenstrain_matches_reference() {
    assert_eq!(
        reported(aniso_planar_eigenstrain(), &[("uxL", "0")]),
        rf("2*(mod_alpha + muprime_alpha)*(eT*zeta_beta*(x1 - x2) + (mod_beta + muprime_beta)*uxR)\
            /(Lx*(mod_alpha + muprime_alpha)*(mod_beta + muprime_beta) \
            + Lx*(mod_beta + muprime_beta)*(mod_gamma + muprime_gamma) \
            - 2*(mod_alpha + muprime_alpha)*(mod_beta + muprime_beta)*x2 \
            - 2*(mod_alpha + muprime_alpha)*(mod_gamma + muprime_gamma)*(x1 - x2) \
            + 2*(mod_beta + muprime_beta)*(mod_gamma + muprime_gamma)*x1)")
    );
}

#[test]
fn aniso_shear_matches_reference() {
    let denominator = "(Lx*mu_alpha*mu_beta + Lx*mu_beta*mu_gamma - 2*mu_alpha*mu_beta*x2 \
        - 2*mu_alpha*mu_gamma*x1 + 2*mu_alpha*mu_gamma*x2 + 2*mu_beta*mu_gamma*x1)";
    assert_eq!(
        reported(aniso_shear_components(), &[("uyL", "0")]),
        rf(&format!("2*mu_alpha*mu_gamma*uyR/{denominator}"))
    );
    assert_eq!(
        reported(aniso_shear_components(), &[]),
        rf(&format!("2*mu_alpha*mu_gamma*(uyR - uyL)/{denominator}"))
    );
}

#[test]
fn cylindrical_eigenstrain_matches_reference() {
    assert_eq!(
        reported(cylindrical_eigenstrain(), &[]),
        rf(&format!(
            "2*eT*(lambda_beta + mu_beta)*(lambda_gamma - mod_gamma)\
             *(lambda_alpha - lambda_beta + mod_alpha + mod_beta)*x2^2*(x1^2 - x2^2)\
             /((lambda_gamma + mod_gamma)*{OUTER} + (lambda_gamma - mod_gamma)*{INNER})"
        ))
    );
}

#[test]
fn cylindrical_applied_strain_matches_reference() {
    assert_eq!(
        reported(cylindrical_applied_strain(), &[]),
        rf(&format!("erg*{OUTER}/({OUTER} + {INNER})"))
    );
}
