//! Small real polynomials: evaluation, differentiation, multi-start Newton
//! root finding and 1-D equilibrium stability.
//!
//! The root finder is a heuristic tuned for the low-degree, well-separated
//! integer-root families the generators build. It can miss roots that fall
//! between start points or merge distinct roots closer than 0.01.

use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub coefficient: f64,
    pub power: u32,
}

impl Term {
    pub fn new(coefficient: f64, power: u32) -> Self {
        Term { coefficient, power }
    }
}

/// Terms need not be sorted or unique by power; coefficients for the same
/// power are summed wherever that matters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polynomial {
    pub terms: Vec<Term>,
}

impl Polynomial {
    pub fn new(terms: Vec<Term>) -> Self {
        Polynomial { terms }
    }

    /// `leading * (x - r_1)(x - r_2)...`
    pub fn from_roots(leading: f64, roots: &[f64]) -> Self {
        // coeffs[k] is the coefficient of x^k
        let mut coeffs = vec![leading];
        for &r in roots {
            let mut next = vec![0.0; coeffs.len() + 1];
            for (k, &c) in coeffs.iter().enumerate() {
                next[k + 1] += c;
                next[k] -= r * c;
            }
            coeffs = next;
        }
        let terms = coeffs
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| **c != 0.0)
            .map(|(k, &c)| Term::new(c, k as u32))
            .collect();
        Polynomial { terms }
    }

    /// Like powers summed, zero coefficients dropped, highest power first.
    pub fn normalized(&self) -> Polynomial {
        let mut merged: Vec<Term> = Vec::new();
        for term in &self.terms {
            match merged.iter_mut().find(|t| t.power == term.power) {
                Some(existing) => existing.coefficient += term.coefficient,
                None => merged.push(*term),
            }
        }
        merged.retain(|t| t.coefficient != 0.0);
        merged.sort_by(|a, b| b.power.cmp(&a.power));
        Polynomial { terms: merged }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.iter().all(|t| t.coefficient == 0.0)
    }

    pub fn degree(&self) -> u32 {
        self.terms
            .iter()
            .filter(|t| t.coefficient != 0.0)
            .map(|t| t.power)
            .max()
            .unwrap_or(0)
    }

    pub fn scaled(&self, factor: f64) -> Polynomial {
        Polynomial {
            terms: self.terms.iter().map(|t| Term::new(t.coefficient * factor, t.power)).collect(),
        }
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::quiz_engine::format::format_polynomial(self, "x"))
    }
}

pub fn evaluate(p: &Polynomial, x: f64) -> f64 {
    p.terms.iter().map(|t| t.coefficient * x.powi(t.power as i32)).sum()
}

/// Power rule, term by term. The zero polynomial comes back as a single
/// `(0, 0)` term so formatting never sees an empty list.
pub fn derivative(p: &Polynomial) -> Polynomial {
    let terms: Vec<Term> = p
        .terms
        .iter()
        .filter(|t| t.power > 0)
        .map(|t| Term::new(t.coefficient * t.power as f64, t.power - 1))
        .collect();
    if terms.is_empty() {
        Polynomial::new(vec![Term::new(0.0, 0)])
    } else {
        Polynomial::new(terms)
    }
}

/// Search window and convergence tolerance for [`find_roots_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootSearch {
    pub min: f64,
    pub max: f64,
    pub tolerance: f64,
}

impl Default for RootSearch {
    fn default() -> Self {
        Self {
            min: -10.0,
            max: 10.0,
            tolerance: 1e-8,
        }
    }
}

const START_STEP: f64 = 0.5;
const MAX_NEWTON_STEPS: usize = 50;
const FLAT_DERIVATIVE: f64 = 1e-12;
const RESIDUAL_TOLERANCE: f64 = 1e-6;
const DUPLICATE_RADIUS: f64 = 0.01;

/// Real roots in `[-10, 10]`, ascending, rounded to 3 decimals.
pub fn find_roots(p: &Polynomial) -> Vec<f64> {
    find_roots_with(p, RootSearch::default())
}

pub fn find_roots_with(p: &Polynomial, search: RootSearch) -> Vec<f64> {
    let dp = derivative(p);
    let mut roots: Vec<f64> = Vec::new();

    let starts = ((search.max - search.min) / START_STEP).floor() as usize;
    for i in 0..=starts {
        let mut x = search.min + i as f64 * START_STEP;
        for _ in 0..MAX_NEWTON_STEPS {
            let slope = evaluate(&dp, x);
            if slope.abs() < FLAT_DERIVATIVE {
                break;
            }
            let next = x - evaluate(p, x) / slope;
            if (next - x).abs() < search.tolerance {
                let is_root = evaluate(p, next).abs() < RESIDUAL_TOLERANCE;
                let is_new = roots.iter().all(|r| (r - next).abs() >= DUPLICATE_RADIUS);
                if is_root && is_new {
                    roots.push(round3(next));
                }
                break;
            }
            x = next;
        }
    }

    roots.sort_by(|a, b| a.total_cmp(b));
    roots
}

fn round3(x: f64) -> f64 {
    // + 0.0 folds -0.0 into 0.0
    (x * 1000.0).round() / 1000.0 + 0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability1D {
    Stable,
    Unstable,
    /// f'(x*) vanishes. No higher-order test is attempted, so this also
    /// covers equilibria that are in fact stable or unstable at higher order.
    Semistable,
}

impl fmt::Display for Stability1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability1D::Stable     => write!(f, "stable"),
            Stability1D::Unstable   => write!(f, "unstable"),
            Stability1D::Semistable => write!(f, "semistable"),
        }
    }
}

const FLAT_SLOPE: f64 = 1e-8;

/// Classify the equilibrium `x0` of `ẋ = p(x)` by the sign of `p'(x0)`.
pub fn analyze_stability_1d(p: &Polynomial, x0: f64) -> Stability1D {
    let slope = evaluate(&derivative(p), x0);
    if slope.abs() < FLAT_SLOPE {
        Stability1D::Semistable
    } else if slope < 0.0 {
        Stability1D::Stable
    } else {
        Stability1D::Unstable
    }
}

pub fn count_stable_equilibria(p: &Polynomial) -> usize {
    find_roots(p)
        .into_iter()
        .filter(|&r| analyze_stability_1d(p, r) == Stability1D::Stable)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(terms: &[(f64, u32)]) -> Polynomial {
        Polynomial::new(terms.iter().map(|&(c, p)| Term::new(c, p)).collect())
    }

    fn assert_roots_near(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "roots {actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 0.01, "root {a} not within 0.01 of {e}");
        }
    }

    #[test]
    fn evaluate_sums_terms() {
        let p = poly(&[(2.0, 2), (-3.0, 1), (1.0, 0)]);
        assert_eq!(evaluate(&p, 2.0), 3.0);
    }

    #[test]
    fn derivative_of_constant_is_single_zero_term() {
        let d = derivative(&poly(&[(5.0, 0)]));
        assert_eq!(d.terms, vec![Term::new(0.0, 0)]);
    }

    #[test]
    fn derivative_applies_power_rule() {
        let d = derivative(&poly(&[(1.0, 3), (4.0, 1), (7.0, 0)]));
        assert_eq!(d.normalized().terms, vec![Term::new(3.0, 2), Term::new(4.0, 0)]);
    }

    #[test]
    fn identity_has_single_root_at_zero() {
        assert_eq!(find_roots(&poly(&[(1.0, 1)])), vec![0.0]);
    }

    #[test]
    fn cubic_roots_are_found_in_order() {
        // x(x - 2)(x + 3)
        let p = poly(&[(1.0, 3), (1.0, 2), (-6.0, 1)]);
        assert_roots_near(&find_roots(&p), &[-3.0, 0.0, 2.0]);
    }

    #[test]
    fn double_root_is_reported_once() {
        let p = Polynomial::from_roots(1.0, &[1.0, 1.0, -2.0]);
        assert_roots_near(&find_roots(&p), &[-2.0, 1.0]);
    }

    #[test]
    fn no_real_roots() {
        let p = poly(&[(1.0, 2), (1.0, 0)]);
        assert!(find_roots(&p).is_empty());
    }

    #[test]
    fn from_roots_expands_product() {
        let p = Polynomial::from_roots(-1.0, &[0.0, 2.0]);
        // -(x)(x - 2) = -x^2 + 2x
        assert_eq!(p.normalized().terms, vec![Term::new(-1.0, 2), Term::new(2.0, 1)]);
        assert_eq!(p.degree(), 2);
    }

    #[test]
    fn stability_by_derivative_sign() {
        assert_eq!(analyze_stability_1d(&poly(&[(-1.0, 1)]), 0.0), Stability1D::Stable);
        assert_eq!(analyze_stability_1d(&poly(&[(1.0, 1)]), 0.0), Stability1D::Unstable);
        assert_eq!(analyze_stability_1d(&poly(&[(1.0, 2)]), 0.0), Stability1D::Semistable);
    }

    #[test]
    fn logistic_has_one_stable_equilibrium() {
        // x(1 - x) = -x^2 + x
        let p = poly(&[(-1.0, 2), (1.0, 1)]);
        assert_eq!(count_stable_equilibria(&p), 1);
    }

    #[test]
    fn custom_search_window() {
        let p = Polynomial::from_roots(1.0, &[-15.0, 1.0]);
        let search = RootSearch { min: -20.0, max: 5.0, ..RootSearch::default() };
        assert_roots_near(&find_roots_with(&p, search), &[-15.0, 1.0]);
    }
}
