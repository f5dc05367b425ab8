use std::collections::BTreeMap;

use threephase::{CasError, Polynomial, Rational, parse_expr};

fn poly(input: &str) -> Polynomial {
    let expr = parse_expr(input).expect("parse polynomial");
    Polynomial::from_expr(&expr).expect("build polynomial")
}

#[test]
fn multivariate_division_exact() {
    let quotient = poly("x^2 - y^2").div_exact(&poly("x - y"));
    assert_eq!(quotient, Some(poly("x + y")));

    let quotient = poly("a*x*y + a*b").div_exact(&poly("x*y + b"));
    assert_eq!(quotient, Some(poly("a")));
}

#[test]
fn multivariate_division_non_exact() {
    assert!(poly("x^2 + y").div_exact(&poly("x + y")).is_none());
    assert!(poly("x").div_exact(&poly("x*y")).is_none());
    assert!(poly("x").div_exact(&Polynomial::zero()).is_none());
}

#[test]
fn gcd_finds_common_factor() {
    let a = poly("(x + y)*(x - 2*y)");
    let b = poly("(x + y)*(3*x + 1)");
    assert_eq!(Polynomial::gcd(&a, &b), poly("x + y"));
}

#[test]
fn gcd_ignores_content() {
    let a = poly("6*x*y + 4*y");
    let b = poly("2*y^2");
    assert_eq!(Polynomial::gcd(&a, &b), poly("y"));
}

#[test]
fn gcd_edge_cases() {
    assert!(Polynomial::gcd(&Polynomial::zero(), &Polynomial::zero()).is_zero());
    assert_eq!(Polynomial::gcd(&Polynomial::zero(), &poly("-2*x")), poly("x"));
    assert!(Polynomial::gcd(&poly("7"), &poly("x + 1")).is_one());
    assert!(Polynomial::gcd(&poly("x + 1"), &poly("x - 1")).is_one());
}

#[test]
fn gcd_of_coefficient_polynomials() {
    // Shape of the moduli combinations that appear in the layered problems.
    let a = poly("(mod_alpha + muprime_alpha)*(x1 - x2)*Lx");
    let b = poly("(mod_alpha + muprime_alpha)*(Lx + 2*x1)");
    assert_eq!(Polynomial::gcd(&a, &b), poly("mod_alpha + muprime_alpha"));
}

#[test]
fn integer_content_and_sign() {
    let polynomial = poly("2/3*x^2 + 4/3*x*y + 2/3*y^2");
    let (content, primitive) = polynomial.integer_content();
    assert_eq!(content, Rational::new(2.into(), 3.into()));
    assert_eq!(primitive, poly("x^2 + 2*x*y + y^2"));

    let (content, primitive) = poly("y - x").integer_content();
    assert_eq!(content, Rational::from_integer((-1).into()));
    assert_eq!(primitive, poly("x - y"));
}

#[test]
fn content_in_variable() {
    let p = poly("a*x^2 + a*b*x");
    assert_eq!(p.content_in("x"), poly("a"));
    assert_eq!(p.primitive_part_in("x"), poly("x^2 + b*x"));
}

#[test]
fn coefficients_in_variable() {
    let p = poly("a*x^2 + b*x + c");
    let expected: BTreeMap<u32, Polynomial> =
        [(0, poly("c")), (1, poly("b")), (2, poly("a"))].into_iter().collect();
    assert_eq!(p.coefficients_in("x"), expected);
    assert_eq!(p.degree_in("x"), 2);
    assert_eq!(p.total_degree(), 3);
    assert_eq!(p.leading_coeff_in("x"), poly("a"));
}

#[test]
fn derivative_and_evaluation() {
    let p = poly("x^2*y + x");
    assert_eq!(p.derivative("x"), poly("2*x*y + 1"));
    assert_eq!(p.evaluate_var("x", &poly("y + 1")), poly("(y + 1)^2*y + y + 1"));
}

#[test]
fn expression_conversion_limits() {
    assert!(matches!(
        Polynomial::from_expr(&parse_expr("1/x").unwrap()),
        Err(CasError::Unsupported(_))
    ));
    assert!(matches!(
        Polynomial::from_expr(&parse_expr("x^(1/2)").unwrap()),
        Err(CasError::Unsupported(_))
    ));
    assert!(matches!(
        Polynomial::from_expr(&parse_expr("x/0").unwrap()),
        Err(CasError::DivisionByZero)
    ));
    assert_eq!(poly("x/2 + x/2"), poly("x"));
}

#[test]
fn display_orders_by_degree() {
    assert_eq!(poly("3 + x*y - 2*x^2").to_string(), "x*y - 2*x^2 + 3");
    assert_eq!(Polynomial::zero().to_string(), "0");
}
