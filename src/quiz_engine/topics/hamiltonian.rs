//! One-degree-of-freedom Hamiltonian systems `H = p²/2 + V(q)`.
//!
//! Equations of motion are `q̇ = p, ṗ = -V'(q)`. At an equilibrium
//! `(q*, 0)` the Jacobian is `[[0, 1], [-V''(q*), 0]]`: a minimum of `V`
//! is a center and a maximum is a saddle.

use crate::quiz_engine::{
    error::GenerationError,
    format::{format_linear_system, format_number, format_polynomial, join_terms},
    generator::QuestionGenerator,
    helpers::{count_distractors, math, multiple_choice, question, seeded, true_false, Statement},
    matrix::{classify_eigenvalues, get_equilibrium_name, EigenvalueType, Matrix2},
    models::{Difficulty, GeneratorConfig, Question, QuestionBody, QuestionType, Topic},
    polynomial::{derivative, evaluate, find_roots, Polynomial},
    rng::{random_choice, random_distinct_ints, random_int, Mulberry32},
};

const PREFIX: &str = "HM";

pub struct Hamiltonian;

#[derive(Debug, Clone, Copy)]
enum Variant {
    CountCenters,
    CountSaddles,
    ClassifyEquilibrium,
    LinearHamiltonian,
}

const BANK: &[Statement] = &[
    Statement::any(
        "The Hamiltonian is conserved along trajectories of a Hamiltonian system.",
        true,
        "$\\dot{H} = H_q \\dot{q} + H_p \\dot{p} = H_q H_p - H_p H_q = 0$.",
    ),
    Statement::any(
        "A Hamiltonian system can have an asymptotically stable equilibrium.",
        false,
        "Hamiltonian flows preserve area, so nothing can attract a neighbourhood of points.",
    ),
    Statement::any(
        "A strict local minimum of the potential $V(q)$ gives a nonlinear center of $\\dot{q} = p,\\ \\dot{p} = -V'(q)$.",
        true,
        "Nearby level sets of $H = p^2/2 + V(q)$ are closed curves around the minimum.",
    ),
    Statement::any(
        "The linear system $\\dot{\\mathbf{x}} = A\\mathbf{x}$ is Hamiltonian only if $\\operatorname{tr} A = 0$.",
        true,
        "A planar Hamiltonian field has zero divergence, and the divergence of a linear field is its trace.",
    ),
];

impl QuestionGenerator for Hamiltonian {
    fn name(&self) -> &'static str {
        "hamiltonian"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::HamiltonianSystems]
    }

    fn question_types(&self) -> &'static [QuestionType] {
        &[QuestionType::TrueFalse, QuestionType::MultipleChoice]
    }

    fn difficulties(&self) -> &'static [Difficulty] {
        &[Difficulty::Light, Difficulty::Moderate, Difficulty::Heavy]
    }

    fn generate(&self, config: &GeneratorConfig) -> Result<Question, GenerationError> {
        let (mut rng, seed) = seeded(config);
        match config.question_type {
            QuestionType::TrueFalse => true_false(PREFIX, config, seed, &mut rng, BANK),
            QuestionType::MultipleChoice => {
                let variants: &[Variant] = match config.difficulty {
                    Difficulty::Light => &[Variant::CountCenters, Variant::ClassifyEquilibrium],
                    _ => &[
                        Variant::CountCenters,
                        Variant::CountSaddles,
                        Variant::ClassifyEquilibrium,
                        Variant::LinearHamiltonian,
                    ],
                };
                let variant = *random_choice(&mut rng, variants);
                let (prompt, explanation, body) = match variant {
                    Variant::LinearHamiltonian => linear_hamiltonian(&mut rng),
                    other => {
                        let force = build_force(&mut rng, config.difficulty);
                        let equilibria = classify_equilibria(&force);
                        if equilibria.is_empty() {
                            return Err(GenerationError::EmptyCandidates { what: "Hamiltonian equilibria" });
                        }
                        match other {
                            Variant::CountCenters => count_kind(&mut rng, &force, &equilibria, EigenvalueType::PureImaginary),
                            Variant::CountSaddles => count_kind(&mut rng, &force, &equilibria, EigenvalueType::RealDistinctMixed),
                            _ => classify_one(&mut rng, &force, &equilibria),
                        }
                    }
                };
                Ok(question(PREFIX, config, seed, prompt, explanation, body))
            }
            other => Err(GenerationError::UnsupportedType {
                generator: self.name(),
                question_type: other,
            }),
        }
    }
}

/// `V'(q) = ±∏(q - rᵢ)` with distinct integer roots.
fn build_force(rng: &mut Mulberry32, difficulty: Difficulty) -> Polynomial {
    let count = match difficulty {
        Difficulty::Light => 2,
        Difficulty::Moderate => random_int(rng, 2, 3, false) as usize,
        _ => random_int(rng, 3, 4, false) as usize,
    };
    let leading = *random_choice(rng, &[1.0, -1.0]);
    let roots: Vec<f64> = random_distinct_ints(rng, -3, 3, count)
        .into_iter()
        .map(f64::from)
        .collect();
    Polynomial::from_roots(leading, &roots)
}

/// Equilibria `(q*, 0)` with the type of their linearization.
fn classify_equilibria(force: &Polynomial) -> Vec<(f64, EigenvalueType)> {
    let curvature = derivative(force);
    find_roots(force)
        .into_iter()
        .map(|q| {
            let jacobian = Matrix2::new(0.0, 1.0, -evaluate(&curvature, q), 0.0);
            (q, classify_eigenvalues(&jacobian).kind)
        })
        .collect()
}

fn render_system(force: &Polynomial) -> String {
    math(format!(
        "\\dot{{q}} = p,\\quad \\dot{{p}} = {}",
        format_polynomial(&force.scaled(-1.0), "q")
    ))
}

fn report(equilibria: &[(f64, EigenvalueType)]) -> String {
    equilibria
        .iter()
        .map(|&(q, kind)| format!("$q = {}$: {}", format_number(q), get_equilibrium_name(kind).to_lowercase()))
        .collect::<Vec<_>>()
        .join("; ")
}

fn count_kind(
    rng: &mut Mulberry32,
    force: &Polynomial,
    equilibria: &[(f64, EigenvalueType)],
    kind: EigenvalueType,
) -> (String, String, QuestionBody) {
    let count = equilibria.iter().filter(|(_, k)| *k == kind).count() as i32;
    let hi = (equilibria.len() as i32).max(3);
    let distractors = count_distractors(rng, count, 0, hi, 3);
    let body = multiple_choice(rng, count.to_string(), distractors, 3);
    let noun = if kind == EigenvalueType::PureImaginary { "centers" } else { "saddle points" };
    (
        format!("How many {noun} does {} have?", render_system(force)),
        format!(
            "Equilibria sit at the zeros of $V'$, with $p = 0$. A minimum of $V$ ($V'' > 0$) is a center and a maximum is a saddle. {}.",
            report(equilibria)
        ),
        body,
    )
}

const EQUILIBRIUM_OPTIONS: [EigenvalueType; 4] = [
    EigenvalueType::PureImaginary,
    EigenvalueType::RealDistinctMixed,
    EigenvalueType::ComplexNegativeReal,
    EigenvalueType::RealDistinctPositive,
];

fn classify_one(
    rng: &mut Mulberry32,
    force: &Polynomial,
    equilibria: &[(f64, EigenvalueType)],
) -> (String, String, QuestionBody) {
    let (q, kind) = *random_choice(rng, equilibria);
    let options = EQUILIBRIUM_OPTIONS
        .iter()
        .map(|&k| get_equilibrium_name(k).to_string())
        .collect();
    let body = multiple_choice(rng, get_equilibrium_name(kind).to_string(), options, 3);
    let curvature = evaluate(&derivative(force), q);
    (
        format!(
            "Classify the equilibrium $(q, p) = ({}, 0)$ of {}.",
            format_number(q),
            render_system(force)
        ),
        format!(
            "$V''({}) = {}$, so the Jacobian has eigenvalues ${}$ and the point is a {}.",
            format_number(q),
            format_number(curvature),
            if curvature > 0.0 {
                format!("\\pm {}i", format_number(curvature.sqrt()))
            } else {
                format!("\\pm {}", format_number((-curvature).sqrt()))
            },
            get_equilibrium_name(kind).to_lowercase()
        ),
        body,
    )
}

fn linear_hamiltonian(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let a = random_int(rng, -3, 3, false);
    let b = random_int(rng, -3, 3, true);
    let c = random_int(rng, -3, 3, true);
    let hamiltonian = Matrix2::from_ints(a, b, c, -a);

    // Distinct nonzero traces keep the distractors apart from each other.
    let traces: Vec<i32> = random_distinct_ints(rng, -3, 3, 7).into_iter().filter(|&t| t != 0).take(3).collect();
    let distractors = traces
        .into_iter()
        .map(|trace| {
            let a = random_int(rng, -3, 3, false);
            let b = random_int(rng, -3, 3, true);
            let c = random_int(rng, -3, 3, false);
            math(format_linear_system(&Matrix2::from_ints(a, b, c, trace - a)))
        })
        .collect();
    let body = multiple_choice(rng, math(format_linear_system(&hamiltonian)), distractors, 3);
    (
        "Which of the following linear systems is Hamiltonian?".to_string(),
        format!(
            "A linear system is Hamiltonian exactly when its trace vanishes. {} has trace 0, with $H = {}$.",
            math(format_linear_system(&hamiltonian)),
            hamiltonian_text(a, b, c)
        ),
        body,
    )
}

/// `H` with `ẋ = ∂H/∂y, ẏ = -∂H/∂x` for `[[a, b], [c, -a]]`:
/// `H = a·xy + (b/2)y² - (c/2)x²`.
fn hamiltonian_text(a: i32, b: i32, c: i32) -> String {
    join_terms(&[
        (-(c as f64) / 2.0, "x^2".into()),
        (a as f64, "xy".into()),
        (b as f64 / 2.0, "y^2".into()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_well_has_two_centers_and_one_saddle() {
        // V' = q³ - q, i.e. V = q⁴/4 - q²/2.
        let force = Polynomial::from_roots(1.0, &[-1.0, 0.0, 1.0]);
        let equilibria = classify_equilibria(&force);
        let kinds: Vec<EigenvalueType> = equilibria.iter().map(|(_, k)| *k).collect();
        assert_eq!(kinds, vec![EigenvalueType::PureImaginary, EigenvalueType::RealDistinctMixed, EigenvalueType::PureImaginary]);
    }

    #[test]
    fn inverted_force_swaps_centers_and_saddles() {
        let force = Polynomial::from_roots(-1.0, &[-1.0, 2.0]);
        let kinds: Vec<EigenvalueType> = classify_equilibria(&force).iter().map(|(_, k)| *k).collect();
        assert_eq!(kinds, vec![EigenvalueType::PureImaginary, EigenvalueType::RealDistinctMixed]);
    }

    #[test]
    fn hamiltonian_text_matches_partials() {
        // [[1, 2], [-3, -1]]: H = 1.5x² + xy + y².
        assert_eq!(hamiltonian_text(1, 2, -3), "1.5x^2 + xy + y^2");
    }

    fn options(body: QuestionBody) -> Vec<String> {
        match body {
            QuestionBody::MultipleChoice { options, .. } => options,
            other => panic!("expected multiple choice, got {other:?}"),
        }
    }

    #[test]
    fn single_well_count_keeps_four_options() {
        // V' = q: one center and nothing else.
        let force = Polynomial::from_roots(1.0, &[0.0]);
        let equilibria = classify_equilibria(&force);
        assert_eq!(equilibria.len(), 1);
        for seed in 0..50 {
            let mut rng = Mulberry32::new(seed);
            let (_, _, body) = count_kind(&mut rng, &force, &equilibria, EigenvalueType::PureImaginary);
            assert_eq!(options(body).len(), 4, "seed={seed}");
        }
    }

    #[test]
    fn linear_hamiltonian_distractors_are_distinct() {
        for seed in 0..200 {
            let mut rng = Mulberry32::new(seed);
            let (_, _, body) = linear_hamiltonian(&mut rng);
            assert_eq!(options(body).len(), 4, "seed={seed}");
        }
    }
}
