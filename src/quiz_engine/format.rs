//! LaTeX-flavoured rendering of the engine's math objects.
//!
//! Pure functions: no randomness, no validation of malformed input.

use crate::quiz_engine::{
    matrix::{Eigenvalues, Matrix2},
    models::BifurcationType,
    polynomial::Polynomial,
};

/// Integers print bare; everything else to at most 3 decimals.
pub fn format_number(x: f64) -> String {
    let rounded = (x * 1000.0).round() / 1000.0 + 0.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{:.3}", rounded);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a.abs() } else { gcd(b, a % b) }
}

/// `n/d` in lowest terms: `2`, `-\frac{1}{2}`.
///
/// Panics when `d == 0`.
pub fn format_fraction(n: i64, d: i64) -> String {
    assert!(d != 0, "format_fraction: zero denominator");
    let g = gcd(n, d).max(1);
    let (mut n, mut d) = (n / g, d / g);
    if d < 0 {
        n = -n;
        d = -d;
    }
    if d == 1 {
        n.to_string()
    } else if n < 0 {
        format!("-\\frac{{{}}}{{{}}}", -n, d)
    } else {
        format!("\\frac{{{}}}{{{}}}", n, d)
    }
}

/// Join `(coefficient, monomial)` pairs into `3x^2 - x + 2` form.
///
/// An empty monomial marks a constant. Unit coefficients on non-constant
/// monomials are suppressed; zero coefficients are skipped; an all-zero
/// input renders as `0`.
pub fn join_terms(terms: &[(f64, String)]) -> String {
    let mut out = String::new();
    for (coefficient, monomial) in terms {
        if *coefficient == 0.0 {
            continue;
        }
        let magnitude = coefficient.abs();
        let body = if monomial.is_empty() {
            format_number(magnitude)
        } else if magnitude == 1.0 {
            monomial.clone()
        } else {
            format!("{}{}", format_number(magnitude), monomial)
        };
        if out.is_empty() {
            if *coefficient < 0.0 {
                out.push('-');
            }
        } else if *coefficient < 0.0 {
            out.push_str(" - ");
        } else {
            out.push_str(" + ");
        }
        out.push_str(&body);
    }
    if out.is_empty() {
        "0".to_string()
    } else {
        out
    }
}

pub fn monomial(var: &str, power: u32) -> String {
    match power {
        0 => String::new(),
        1 => var.to_string(),
        p if p < 10 => format!("{var}^{p}"),
        p => format!("{var}^{{{p}}}"),
    }
}

pub fn format_polynomial(p: &Polynomial, var: &str) -> String {
    let terms: Vec<(f64, String)> = p
        .normalized()
        .terms
        .iter()
        .map(|t| (t.coefficient, monomial(var, t.power)))
        .collect();
    join_terms(&terms)
}

pub fn format_matrix(m: &Matrix2) -> String {
    format!(
        "\\begin{{pmatrix}} {} & {} \\\\ {} & {} \\end{{pmatrix}}",
        format_number(m.a),
        format_number(m.b),
        format_number(m.c),
        format_number(m.d)
    )
}

/// `\dot{x} = ax + by,\quad \dot{y} = cx + dy`
pub fn format_linear_system(m: &Matrix2) -> String {
    let x_rhs = join_terms(&[(m.a, "x".into()), (m.b, "y".into())]);
    let y_rhs = join_terms(&[(m.c, "x".into()), (m.d, "y".into())]);
    format!("\\dot{{x}} = {x_rhs},\\quad \\dot{{y}} = {y_rhs}")
}

fn imaginary(magnitude: f64) -> String {
    if magnitude == 1.0 {
        "i".to_string()
    } else {
        format!("{}i", format_number(magnitude))
    }
}

pub fn format_eigenvalues(eigenvalues: &Eigenvalues) -> String {
    match *eigenvalues {
        Eigenvalues::Real { first, second } if first == second => {
            format!("\\lambda_{{1,2}} = {}", format_number(first))
        }
        Eigenvalues::Real { first, second } => format!(
            "\\lambda_1 = {},\\ \\lambda_2 = {}",
            format_number(first),
            format_number(second)
        ),
        Eigenvalues::Complex { re, im } if re == 0.0 => {
            format!("\\lambda = \\pm {}", imaginary(im))
        }
        Eigenvalues::Complex { re, im } => {
            format!("\\lambda = {} \\pm {}", format_number(re), imaginary(im))
        }
    }
}

/// The textbook normal form of a named bifurcation family.
pub fn format_normal_form(kind: BifurcationType) -> &'static str {
    match kind {
        BifurcationType::SaddleNode             => "\\dot{x} = r + x^2",
        BifurcationType::Transcritical          => "\\dot{x} = rx - x^2",
        BifurcationType::SupercriticalPitchfork => "\\dot{x} = rx - x^3",
        BifurcationType::SubcriticalPitchfork   => "\\dot{x} = rx + x^3",
        BifurcationType::SupercriticalHopf      => "\\dot{r} = \\mu r - r^3,\\ \\dot{\\theta} = \\omega",
        BifurcationType::SubcriticalHopf        => "\\dot{r} = \\mu r + r^3,\\ \\dot{\\theta} = \\omega",
    }
}

/// `\dot{x} = <p>` with the variable spelled `var`.
pub fn format_ode(p: &Polynomial, var: &str) -> String {
    format!("\\dot{{{var}}} = {}", format_polynomial(p, var))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz_engine::polynomial::Term;

    #[test]
    fn numbers() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.3333333), "0.333");
    }

    #[test]
    fn fractions_reduce() {
        assert_eq!(format_fraction(4, 2), "2");
        assert_eq!(format_fraction(3, -6), "-\\frac{1}{2}");
        assert_eq!(format_fraction(-3, -9), "\\frac{1}{3}");
        assert_eq!(format_fraction(0, 5), "0");
    }

    #[test]
    fn polynomial_signs_and_unit_coefficients() {
        let p = Polynomial::new(vec![
            Term::new(-1.0, 3),
            Term::new(1.0, 1),
            Term::new(-2.0, 0),
        ]);
        assert_eq!(format_polynomial(&p, "x"), "-x^3 + x - 2");
    }

    #[test]
    fn polynomial_merges_like_powers() {
        let p = Polynomial::new(vec![Term::new(2.0, 1), Term::new(3.0, 2), Term::new(-2.0, 1)]);
        assert_eq!(format_polynomial(&p, "x"), "3x^2");
    }

    #[test]
    fn zero_polynomial_renders_zero() {
        let p = Polynomial::new(vec![Term::new(0.0, 0)]);
        assert_eq!(format_polynomial(&p, "x"), "0");
    }

    #[test]
    fn matrix_and_system() {
        let m = Matrix2::from_ints(-1, 2, 0, -3);
        assert_eq!(
            format_matrix(&m),
            "\\begin{pmatrix} -1 & 2 \\\\ 0 & -3 \\end{pmatrix}"
        );
        assert_eq!(
            format_linear_system(&m),
            "\\dot{x} = -x + 2y,\\quad \\dot{y} = -3y"
        );
    }

    #[test]
    fn eigenvalue_pairs() {
        assert_eq!(
            format_eigenvalues(&Eigenvalues::Complex { re: 0.0, im: 1.0 }),
            "\\lambda = \\pm i"
        );
        assert_eq!(
            format_eigenvalues(&Eigenvalues::Complex { re: -1.0, im: 2.0 }),
            "\\lambda = -1 \\pm 2i"
        );
        assert_eq!(
            format_eigenvalues(&Eigenvalues::Real { first: 2.0, second: 2.0 }),
            "\\lambda_{1,2} = 2"
        );
        assert_eq!(
            format_eigenvalues(&Eigenvalues::Real { first: 1.0, second: -3.0 }),
            "\\lambda_1 = 1,\\ \\lambda_2 = -3"
        );
    }
}
