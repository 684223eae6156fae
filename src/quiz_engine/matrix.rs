//! 2×2 real matrices and the qualitative eigenvalue classes of their
//! equilibria.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::quiz_engine::{
    error::MathError,
    models::PortraitType,
    rng::{random_int, Mulberry32},
};

/// `[[a, b], [c, d]]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

const SINGULAR_DET: f64 = 1e-10;
const ZERO_REAL_PART: f64 = 1e-10;

impl Matrix2 {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Matrix2 { a, b, c, d }
    }

    pub fn from_ints(a: i32, b: i32, c: i32, d: i32) -> Self {
        Matrix2::new(a as f64, b as f64, c as f64, d as f64)
    }

    pub fn trace(&self) -> f64 {
        self.a + self.d
    }

    pub fn det(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn discriminant(&self) -> f64 {
        let t = self.trace();
        t * t - 4.0 * self.det()
    }

    pub fn multiply(&self, other: &Matrix2) -> Matrix2 {
        Matrix2 {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
        }
    }

    pub fn inverse(&self) -> Result<Matrix2, MathError> {
        let det = self.det();
        if det.abs() < SINGULAR_DET {
            return Err(MathError::SingularMatrix { det });
        }
        Ok(Matrix2 {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
        })
    }

    pub fn transpose(&self) -> Matrix2 {
        Matrix2::new(self.a, self.c, self.b, self.d)
    }

    pub fn is_symmetric(&self) -> bool {
        self.b == self.c
    }
}

impl fmt::Display for Matrix2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::quiz_engine::format::format_matrix(self))
    }
}

// ---------------------------------------------------------------------------
// Eigenvalue classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EigenvalueType {
    RealDistinctNegative,
    RealDistinctPositive,
    RealDistinctMixed,
    RealRepeatedNegative,
    RealRepeatedPositive,
    ComplexNegativeReal,
    ComplexPositiveReal,
    PureImaginary,
}

impl EigenvalueType {
    pub const ALL: [EigenvalueType; 8] = [
        EigenvalueType::RealDistinctNegative,
        EigenvalueType::RealDistinctPositive,
        EigenvalueType::RealDistinctMixed,
        EigenvalueType::RealRepeatedNegative,
        EigenvalueType::RealRepeatedPositive,
        EigenvalueType::ComplexNegativeReal,
        EigenvalueType::ComplexPositiveReal,
        EigenvalueType::PureImaginary,
    ];

    /// Every class whose eigenvalues have nonzero real part.
    pub const HYPERBOLIC: [EigenvalueType; 7] = [
        EigenvalueType::RealDistinctNegative,
        EigenvalueType::RealDistinctPositive,
        EigenvalueType::RealDistinctMixed,
        EigenvalueType::RealRepeatedNegative,
        EigenvalueType::RealRepeatedPositive,
        EigenvalueType::ComplexNegativeReal,
        EigenvalueType::ComplexPositiveReal,
    ];

    pub fn is_complex(self) -> bool {
        matches!(
            self,
            EigenvalueType::ComplexNegativeReal
                | EigenvalueType::ComplexPositiveReal
                | EigenvalueType::PureImaginary
        )
    }
}

impl fmt::Display for EigenvalueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EigenvalueType::RealDistinctNegative => "real, distinct, both negative",
            EigenvalueType::RealDistinctPositive => "real, distinct, both positive",
            EigenvalueType::RealDistinctMixed    => "real, opposite signs",
            EigenvalueType::RealRepeatedNegative => "real, repeated, negative",
            EigenvalueType::RealRepeatedPositive => "real, repeated, positive",
            EigenvalueType::ComplexNegativeReal  => "complex, negative real part",
            EigenvalueType::ComplexPositiveReal  => "complex, positive real part",
            EigenvalueType::PureImaginary        => "purely imaginary",
        };
        write!(f, "{}", s)
    }
}

/// The numeric eigenvalue pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Eigenvalues {
    /// `first >= second`
    Real { first: f64, second: f64 },
    /// `re ± im·i`, `im > 0`
    Complex { re: f64, im: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EigenClassification {
    pub kind: EigenvalueType,
    pub eigenvalues: Eigenvalues,
}

/// Branch on the discriminant `tr² − 4·det`, then on signs.
///
/// Eigenvalues exactly at zero are not given their own class: a distinct
/// pair containing a zero lands in `RealDistinctMixed`, a repeated zero in
/// `RealRepeatedPositive`.
pub fn classify_eigenvalues(m: &Matrix2) -> EigenClassification {
    let t = m.trace();
    let disc = m.discriminant();

    if disc > 0.0 {
        let root = disc.sqrt();
        let first = (t + root) / 2.0;
        let second = (t - root) / 2.0;
        let kind = if first < 0.0 && second < 0.0 {
            EigenvalueType::RealDistinctNegative
        } else if first > 0.0 && second > 0.0 {
            EigenvalueType::RealDistinctPositive
        } else {
            EigenvalueType::RealDistinctMixed
        };
        EigenClassification { kind, eigenvalues: Eigenvalues::Real { first, second } }
    } else if disc < 0.0 {
        let re = t / 2.0;
        let im = (-disc).sqrt() / 2.0;
        let kind = if re.abs() < ZERO_REAL_PART {
            EigenvalueType::PureImaginary
        } else if re < 0.0 {
            EigenvalueType::ComplexNegativeReal
        } else {
            EigenvalueType::ComplexPositiveReal
        };
        EigenClassification { kind, eigenvalues: Eigenvalues::Complex { re, im } }
    } else {
        let lambda = t / 2.0;
        let kind = if lambda < 0.0 {
            EigenvalueType::RealRepeatedNegative
        } else {
            EigenvalueType::RealRepeatedPositive
        };
        EigenClassification {
            kind,
            eigenvalues: Eigenvalues::Real { first: lambda, second: lambda },
        }
    }
}

pub fn get_equilibrium_name(kind: EigenvalueType) -> &'static str {
    match kind {
        EigenvalueType::RealDistinctNegative => "Stable node",
        EigenvalueType::RealDistinctPositive => "Unstable node",
        EigenvalueType::RealDistinctMixed    => "Saddle point",
        EigenvalueType::RealRepeatedNegative => "Stable degenerate node",
        EigenvalueType::RealRepeatedPositive => "Unstable degenerate node",
        EigenvalueType::ComplexNegativeReal  => "Stable spiral",
        EigenvalueType::ComplexPositiveReal  => "Unstable spiral",
        EigenvalueType::PureImaginary        => "Center",
    }
}

/// Asymptotic stability. A center is Lyapunov stable but not attracting,
/// so it reports `false`.
pub fn is_stable(kind: EigenvalueType) -> bool {
    matches!(
        kind,
        EigenvalueType::RealDistinctNegative
            | EigenvalueType::RealRepeatedNegative
            | EigenvalueType::ComplexNegativeReal
    )
}

impl From<EigenvalueType> for PortraitType {
    fn from(kind: EigenvalueType) -> Self {
        match kind {
            EigenvalueType::RealDistinctNegative => PortraitType::StableNode,
            EigenvalueType::RealDistinctPositive => PortraitType::UnstableNode,
            EigenvalueType::RealDistinctMixed    => PortraitType::Saddle,
            EigenvalueType::RealRepeatedNegative => PortraitType::StableDegenerateNode,
            EigenvalueType::RealRepeatedPositive => PortraitType::UnstableDegenerateNode,
            EigenvalueType::ComplexNegativeReal  => PortraitType::StableSpiral,
            EigenvalueType::ComplexPositiveReal  => PortraitType::UnstableSpiral,
            EigenvalueType::PureImaginary        => PortraitType::Center,
        }
    }
}

// ---------------------------------------------------------------------------
// Inverse construction
// ---------------------------------------------------------------------------

/// Build a small-integer matrix whose eigenvalues fall in `target`.
///
/// Draw order per class (seeded questions depend on it):
/// - distinct real: eigenvalue draws, form coin, off-diagonal draw if triangular
/// - repeated real: eigenvalue draw, Jordan coin
/// - complex: real part draw (skipped for pure imaginary), imaginary part draw
pub fn generate_matrix_with_eigenvalues(target: EigenvalueType, rng: &mut Mulberry32) -> Matrix2 {
    match target {
        EigenvalueType::RealDistinctNegative => {
            let l1 = random_int(rng, -4, -1, false);
            let l2 = l1 - random_int(rng, 1, 3, false);
            realize_distinct(l1, l2, rng)
        }
        EigenvalueType::RealDistinctPositive => {
            let l1 = random_int(rng, 1, 4, false);
            let l2 = l1 + random_int(rng, 1, 3, false);
            realize_distinct(l1, l2, rng)
        }
        EigenvalueType::RealDistinctMixed => {
            let positive = random_int(rng, 1, 3, false);
            let negative = random_int(rng, -3, -1, false);
            realize_distinct(positive, negative, rng)
        }
        EigenvalueType::RealRepeatedNegative => {
            let lambda = random_int(rng, -3, -1, false);
            realize_repeated(lambda, rng)
        }
        EigenvalueType::RealRepeatedPositive => {
            let lambda = random_int(rng, 1, 3, false);
            realize_repeated(lambda, rng)
        }
        EigenvalueType::ComplexNegativeReal => {
            let alpha = random_int(rng, -3, -1, false);
            let beta = random_int(rng, 1, 3, false);
            rotation_scaling(alpha, beta)
        }
        EigenvalueType::ComplexPositiveReal => {
            let alpha = random_int(rng, 1, 3, false);
            let beta = random_int(rng, 1, 3, false);
            rotation_scaling(alpha, beta)
        }
        EigenvalueType::PureImaginary => {
            let beta = random_int(rng, 1, 3, false);
            rotation_scaling(0, beta)
        }
    }
}

fn realize_distinct(l1: i32, l2: i32, rng: &mut Mulberry32) -> Matrix2 {
    if rng.chance(0.5) {
        Matrix2::from_ints(l1, 0, 0, l2)
    } else {
        let off = random_int(rng, -2, 2, true);
        Matrix2::from_ints(l1, off, 0, l2)
    }
}

fn realize_repeated(lambda: i32, rng: &mut Mulberry32) -> Matrix2 {
    if rng.chance(0.5) {
        Matrix2::from_ints(lambda, 1, 0, lambda)
    } else {
        Matrix2::from_ints(lambda, 0, 0, lambda)
    }
}

fn rotation_scaling(alpha: i32, beta: i32) -> Matrix2 {
    Matrix2::from_ints(alpha, -beta, beta, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_det_multiply() {
        let m = Matrix2::from_ints(1, 2, 3, 4);
        assert_eq!(m.trace(), 5.0);
        assert_eq!(m.det(), -2.0);
        let sq = m.multiply(&m);
        assert_eq!(sq, Matrix2::from_ints(7, 10, 15, 22));
    }

    #[test]
    fn inverse_round_trips_to_identity() {
        let m = Matrix2::from_ints(2, 1, 1, 1);
        let inv = m.inverse().expect("invertible");
        assert_eq!(m.multiply(&inv), Matrix2::from_ints(1, 0, 0, 1));
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let m = Matrix2::from_ints(1, 2, 2, 4);
        assert!(matches!(m.inverse(), Err(MathError::SingularMatrix { .. })));
    }

    #[test]
    fn classifies_canonical_examples() {
        let cases = [
            (Matrix2::from_ints(-1, 0, 0, -2), EigenvalueType::RealDistinctNegative),
            (Matrix2::from_ints(1, 0, 0, 3), EigenvalueType::RealDistinctPositive),
            (Matrix2::from_ints(1, 0, 0, -1), EigenvalueType::RealDistinctMixed),
            (Matrix2::from_ints(-2, 1, 0, -2), EigenvalueType::RealRepeatedNegative),
            (Matrix2::from_ints(2, 0, 0, 2), EigenvalueType::RealRepeatedPositive),
            (Matrix2::from_ints(-1, -2, 2, -1), EigenvalueType::ComplexNegativeReal),
            (Matrix2::from_ints(1, -1, 1, 1), EigenvalueType::ComplexPositiveReal),
            (Matrix2::from_ints(0, -3, 3, 0), EigenvalueType::PureImaginary),
        ];
        for (m, expected) in cases {
            assert_eq!(classify_eigenvalues(&m).kind, expected, "{m:?}");
        }
    }

    #[test]
    fn complex_eigenvalues_are_reported() {
        let c = classify_eigenvalues(&Matrix2::from_ints(-1, -2, 2, -1));
        assert_eq!(c.eigenvalues, Eigenvalues::Complex { re: -1.0, im: 2.0 });
    }

    #[test]
    fn generated_matrices_classify_back_to_their_target() {
        for target in EigenvalueType::ALL {
            for seed in 0..150 {
                let mut rng = Mulberry32::new(seed);
                let m = generate_matrix_with_eigenvalues(target, &mut rng);
                assert_eq!(classify_eigenvalues(&m).kind, target, "seed={seed} m={m:?}");
            }
        }
    }

    #[test]
    fn discriminant_sign_matches_requested_branch() {
        for seed in 0..200 {
            for target in EigenvalueType::ALL {
                let mut rng = Mulberry32::new(seed * 31 + 7);
                let m = generate_matrix_with_eigenvalues(target, &mut rng);
                let disc = m.discriminant();
                match target {
                    EigenvalueType::RealRepeatedNegative | EigenvalueType::RealRepeatedPositive => {
                        assert_eq!(disc, 0.0)
                    }
                    t if t.is_complex() => assert!(disc < 0.0),
                    _ => assert!(disc > 0.0),
                }
                if target == EigenvalueType::RealDistinctMixed {
                    assert!(m.det() < 0.0);
                }
            }
        }
    }

    #[test]
    fn both_realizations_occur() {
        let mut diagonal = 0;
        let mut triangular = 0;
        for seed in 0..100 {
            let mut rng = Mulberry32::new(seed);
            let m = generate_matrix_with_eigenvalues(EigenvalueType::RealDistinctNegative, &mut rng);
            if m.b == 0.0 { diagonal += 1 } else { triangular += 1 }
        }
        assert!(diagonal > 0 && triangular > 0);
    }

    #[test]
    fn stability_lookup() {
        assert!(is_stable(EigenvalueType::ComplexNegativeReal));
        assert!(!is_stable(EigenvalueType::PureImaginary));
        assert!(!is_stable(EigenvalueType::RealDistinctMixed));
        assert_eq!(get_equilibrium_name(EigenvalueType::RealDistinctMixed), "Saddle point");
    }
}
