//! ẋ = f(x) with f a low-degree polynomial built from integer roots.
//!
//! Ground truth always comes from the numeric utilities (`find_roots`,
//! `analyze_stability_1d`), never from the construction roots directly.

use crate::quiz_engine::{
    error::GenerationError,
    format::{format_number, format_ode, format_polynomial},
    generator::QuestionGenerator,
    helpers::{count_distractors, math, multiple_choice, question, seeded, true_false, Statement},
    models::{Difficulty, GeneratorConfig, Question, QuestionBody, QuestionType, Topic},
    polynomial::{analyze_stability_1d, derivative, evaluate, find_roots, Polynomial, Stability1D},
    rng::{random_choice, random_distinct_ints, Mulberry32},
};

const PREFIX: &str = "1D";

pub struct OneDimensionalStability;

#[derive(Debug, Clone, Copy)]
enum Variant {
    CountStable,
    ClassifyPoint,
    LocateEquilibria,
}

const BANK: &[Statement] = &[
    Statement::any(
        "For $\\dot{x} = f(x)$, an equilibrium $x^*$ with $f'(x^*) < 0$ is stable.",
        true,
        "Near $x^*$, $f(x) \\approx f'(x^*)(x - x^*)$, so a negative slope pushes nearby points back toward $x^*$.",
    ),
    Statement::any(
        "Solutions of a one-dimensional autonomous ODE can oscillate about an equilibrium.",
        false,
        "Trajectories on the line are monotone: they cannot pass through an equilibrium, so they cannot oscillate.",
    ),
    Statement::any(
        "Between two adjacent stable equilibria of $\\dot{x} = f(x)$ with smooth $f$ there must be an unstable (or semistable) equilibrium.",
        true,
        "The sign of $f$ must change from negative to positive between two attractors, which forces another zero.",
    ),
    Statement::any(
        "If $f'(x^*) = 0$ the equilibrium $x^*$ must be semistable.",
        false,
        "A vanishing derivative makes linearization inconclusive; $\\dot{x} = -x^3$ has $f'(0) = 0$ yet $0$ is stable.",
    ),
    Statement::any(
        "A one-dimensional flow $\\dot{x} = f(x)$ can have a periodic solution.",
        false,
        "A periodic orbit would need to return to its starting point, which a monotone trajectory on the line cannot do.",
    ),
];

impl QuestionGenerator for OneDimensionalStability {
    fn name(&self) -> &'static str {
        "one_dimensional_stability"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::OneDimensionalFlows]
    }

    fn question_types(&self) -> &'static [QuestionType] {
        &[QuestionType::TrueFalse, QuestionType::MultipleChoice]
    }

    fn difficulties(&self) -> &'static [Difficulty] {
        &[Difficulty::Conceptual, Difficulty::Light, Difficulty::Moderate]
    }

    fn generate(&self, config: &GeneratorConfig) -> Result<Question, GenerationError> {
        let (mut rng, seed) = seeded(config);
        match config.question_type {
            QuestionType::TrueFalse => true_false(PREFIX, config, seed, &mut rng, BANK),
            QuestionType::MultipleChoice => {
                let variant = *random_choice(
                    &mut rng,
                    &[Variant::CountStable, Variant::ClassifyPoint, Variant::LocateEquilibria],
                );
                let f = build_flow(&mut rng, config.difficulty);
                let (prompt, explanation, body) = match variant {
                    Variant::CountStable      => count_stable(&mut rng, &f),
                    Variant::ClassifyPoint    => classify_point(&mut rng, &f)?,
                    Variant::LocateEquilibria => locate_equilibria(&mut rng, &f),
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

/// `±(x - r_1)(x - r_2)...` with roots in `[-3, 3]`. Moderate questions get
/// three or four factors, sometimes with a repeated root.
fn build_flow(rng: &mut Mulberry32, difficulty: Difficulty) -> Polynomial {
    let leading = if rng.chance(0.5) { 1.0 } else { -1.0 };
    let roots: Vec<f64> = match difficulty {
        Difficulty::Conceptual | Difficulty::Light => {
            random_distinct_ints(rng, -3, 3, 2).into_iter().map(f64::from).collect()
        }
        _ => {
            if rng.chance(0.3) {
                let picked = random_distinct_ints(rng, -3, 3, 2);
                vec![picked[0] as f64, picked[0] as f64, picked[1] as f64]
            } else {
                let count = if rng.chance(0.5) { 3 } else { 4 };
                random_distinct_ints(rng, -3, 3, count).into_iter().map(f64::from).collect()
            }
        }
    };
    Polynomial::from_roots(leading, &roots)
}

fn stability_report(f: &Polynomial, roots: &[f64]) -> String {
    let df = derivative(f);
    let lines: Vec<String> = roots
        .iter()
        .map(|&r| {
            format!(
                "$x^* = {}$: $f'(x^*) = {}$, {}",
                format_number(r),
                format_number(evaluate(&df, r)),
                analyze_stability_1d(f, r)
            )
        })
        .collect();
    format!(
        "The equilibria are the zeros of $f$, and $f'(x) = {}$. {}.",
        format_polynomial(&df, "x"),
        lines.join("; ")
    )
}

fn root_set(roots: &[f64]) -> String {
    let items: Vec<String> = roots.iter().map(|&r| format_number(r)).collect();
    math(format!("x^* \\in \\{{{}\\}}", items.join(", ")))
}

fn count_stable(rng: &mut Mulberry32, f: &Polynomial) -> (String, String, QuestionBody) {
    let roots = find_roots(f);
    let stable = roots
        .iter()
        .filter(|&&r| analyze_stability_1d(f, r) == Stability1D::Stable)
        .count() as i32;
    let hi = (roots.len() as i32).max(3);
    let distractors = count_distractors(rng, stable, 0, hi, 3);
    let body = multiple_choice(rng, stable.to_string(), distractors, 3);
    (
        format!("How many stable equilibria does {} have?", math(format_ode(f, "x"))),
        stability_report(f, &roots),
        body,
    )
}

fn classify_point(rng: &mut Mulberry32, f: &Polynomial) -> Result<(String, String, QuestionBody), GenerationError> {
    let roots = find_roots(f);
    if roots.is_empty() {
        return Err(GenerationError::EmptyCandidates { what: "equilibria" });
    }
    let x0 = *random_choice(rng, &roots);
    let verdict = analyze_stability_1d(f, x0);
    let slope = evaluate(&derivative(f), x0);
    let label = |s: Stability1D| match s {
        Stability1D::Stable     => "Stable".to_string(),
        Stability1D::Unstable   => "Unstable".to_string(),
        Stability1D::Semistable => "Semistable".to_string(),
    };
    let distractors = vec![
        label(Stability1D::Stable),
        label(Stability1D::Unstable),
        label(Stability1D::Semistable),
        "It is not an equilibrium".to_string(),
    ];
    let body = multiple_choice(rng, label(verdict), distractors, 3);
    let reason = match verdict {
        Stability1D::Stable     => "negative, so nearby solutions return to it",
        Stability1D::Unstable   => "positive, so nearby solutions move away from it",
        Stability1D::Semistable => "zero; $f$ keeps the same sign on both sides, so the flow approaches from one side and leaves on the other",
    };
    Ok((
        format!(
            "For {}, classify the equilibrium {}.",
            math(format_ode(f, "x")),
            math(format!("x^* = {}", format_number(x0)))
        ),
        format!(
            "$f'({}) = {}$ is {}.",
            format_number(x0),
            format_number(slope),
            reason
        ),
        body,
    ))
}

fn locate_equilibria(rng: &mut Mulberry32, f: &Polynomial) -> (String, String, QuestionBody) {
    let roots = find_roots(f);
    let shifted_up: Vec<f64> = roots.iter().map(|r| r + 1.0).collect();
    let shifted_down: Vec<f64> = roots.iter().map(|r| r - 1.0).collect();
    let mut negated: Vec<f64> = roots.iter().map(|r| -r + 0.0).collect();
    negated.sort_by(|a, b| a.total_cmp(b));
    let shifted_far: Vec<f64> = roots.iter().map(|r| r + 2.0).collect();
    let distractors = vec![
        root_set(&negated),
        root_set(&shifted_up),
        root_set(&shifted_down),
        root_set(&shifted_far),
    ];
    let body = multiple_choice(rng, root_set(&roots), distractors, 3);
    (
        format!("Which set lists every equilibrium of {}?", math(format_ode(f, "x"))),
        format!(
            "Setting ${} = 0$ gives exactly {}.",
            format_polynomial(f, "x"),
            root_set(&roots)
        ),
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flows_have_all_constructed_roots() {
        for seed in 0..300 {
            for difficulty in [Difficulty::Light, Difficulty::Moderate] {
                let mut rng = Mulberry32::new(seed);
                let f = build_flow(&mut rng, difficulty);
                let degree = f.degree() as usize;
                let found = find_roots(&f);
                assert!(!found.is_empty());
                assert!(found.len() <= degree);
                for r in found {
                    assert_eq!(r, r.round(), "non-integer root {r} for {f:?}");
                }
            }
        }
    }

    #[test]
    fn count_stable_matches_alternating_pattern() {
        // -(x + 1)(x - 2): stable at 2, unstable at -1
        let f = Polynomial::from_roots(-1.0, &[-1.0, 2.0]);
        let mut rng = Mulberry32::new(1);
        let (_, _, body) = count_stable(&mut rng, &f);
        match body {
            QuestionBody::MultipleChoice { options, correct_index } => {
                assert_eq!(options[correct_index], "1");
            }
            _ => unreachable!(),
        }
    }
    #[test]
    fn symmetric_roots_keep_four_options() {
        // -(x + 1)(x - 1): negating the roots gives the same set
        let f = Polynomial::from_roots(-1.0, &[-1.0, 1.0]);
        for seed in 0..50 {
            let mut rng = Mulberry32::new(seed);
            match locate_equilibria(&mut rng, &f).2 {
                QuestionBody::MultipleChoice { options, correct_index } => {
                    assert_eq!(options.len(), 4, "{options:?}");
                    assert_eq!(options[correct_index], "$x^* \\in \\{-1, 1\\}$");
                }
                _ => unreachable!(),
            }
        }
    }
}
