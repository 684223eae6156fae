//! Lyapunov functions for damped rotations and the gradient-system test.
//!
//! The Lyapunov family is `ẋ = -a·x + b·y,  ẏ = -b·x - c·y`. With
//! `V = x² + y²` the rotation terms cancel and `V̇ = -2a·x² - 2c·y²`.

use crate::quiz_engine::{
    error::GenerationError,
    format::{format_linear_system, join_terms},
    generator::QuestionGenerator,
    helpers::{math, multiple_choice, question, seeded, true_false, Statement},
    matrix::Matrix2,
    models::{Difficulty, GeneratorConfig, Question, QuestionBody, QuestionType, Topic},
    rng::{random_choice, random_distinct_ints, random_int, Mulberry32},
};

const PREFIX: &str = "LY";

pub struct Lyapunov;

#[derive(Debug, Clone, Copy)]
enum Variant {
    Derivative,
    Conclusion,
    QuadraticCandidate,
    GradientTest,
    NoClosedOrbits,
    Potential,
}

const BANK: &[Statement] = &[
    Statement::on(
        Topic::LyapunovFunctions,
        "If $V$ is positive definite and $\\dot{V}$ is negative definite near an equilibrium, the equilibrium is asymptotically stable.",
        true,
        "This is Lyapunov's direct method.",
    ),
    Statement::on(
        Topic::LyapunovFunctions,
        "Failing to find a Lyapunov function proves that an equilibrium is unstable.",
        false,
        "The method only gives sufficient conditions; another candidate may still work.",
    ),
    Statement::on(
        Topic::LyapunovFunctions,
        "A negative semidefinite $\\dot{V}$ with positive definite $V$ is enough for Lyapunov stability.",
        true,
        "Trajectories cannot climb the level sets of $V$, so they stay close; asymptotic stability needs more, such as LaSalle's principle.",
    ),
    Statement::on(
        Topic::GradientSystems,
        "A gradient system $\\dot{\\mathbf{x}} = -\\nabla V$ cannot have closed orbits.",
        true,
        "$V$ strictly decreases along every non-equilibrium trajectory, so no trajectory returns to its start.",
    ),
    Statement::on(
        Topic::GradientSystems,
        "Every linear system $\\dot{\\mathbf{x}} = A\\mathbf{x}$ is a gradient system.",
        false,
        "Only those with symmetric $A$; a rotation such as a center is not.",
    ),
    Statement::on(
        Topic::GradientSystems,
        "The Jacobian of a gradient system is symmetric at every point.",
        true,
        "It is minus the Hessian of $V$.",
    ),
];

impl QuestionGenerator for Lyapunov {
    fn name(&self) -> &'static str {
        "lyapunov"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::LyapunovFunctions, Topic::GradientSystems]
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
                let variants: &[Variant] = match (config.topic, config.difficulty) {
                    (Topic::GradientSystems, Difficulty::Light) => &[Variant::GradientTest, Variant::NoClosedOrbits],
                    (Topic::GradientSystems, _) => &[Variant::GradientTest, Variant::Potential],
                    (_, Difficulty::Light) => &[Variant::Derivative, Variant::Conclusion],
                    _ => &[Variant::Derivative, Variant::Conclusion, Variant::QuadraticCandidate],
                };
                let variant = *random_choice(&mut rng, variants);
                let heavy = config.difficulty == Difficulty::Heavy;
                let (prompt, explanation, body) = match variant {
                    Variant::Derivative         => derivative(&mut rng),
                    Variant::Conclusion         => conclusion(&mut rng, heavy),
                    Variant::QuadraticCandidate => quadratic_candidate(&mut rng),
                    Variant::GradientTest       => gradient_test(&mut rng),
                    Variant::NoClosedOrbits     => no_closed_orbits(&mut rng),
                    Variant::Potential          => potential(&mut rng),
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

/// `ẋ = -a·x + b·y,  ẏ = -b·x - c·y`.
fn damped_rotation(a: i32, b: i32, c: i32) -> Matrix2 {
    Matrix2::from_ints(-a, b, -b, -c)
}

fn v_dot(a: i32, c: i32) -> String {
    join_terms(&[(-2.0 * a as f64, "x^2".into()), (-2.0 * c as f64, "y^2".into())])
}

fn derivative(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let a = random_int(rng, 1, 3, false);
    let b = random_int(rng, -3, 3, true);
    let c = random_int(rng, 1, 3, false);
    let system = damped_rotation(a, b, c);

    let render = |rhs: String| math(format!("\\dot{{V}} = {rhs}"));
    let distractors = vec![
        render(join_terms(&[(2.0 * a as f64, "x^2".into()), (2.0 * c as f64, "y^2".into())])),
        render(join_terms(&[(-(a as f64), "x^2".into()), (-(c as f64), "y^2".into())])),
        render(join_terms(&[
            (-2.0 * a as f64, "x^2".into()),
            (4.0 * b as f64, "xy".into()),
            (-2.0 * c as f64, "y^2".into()),
        ])),
    ];
    let body = multiple_choice(rng, render(v_dot(a, c)), distractors, 3);
    (
        format!(
            "For {} and $V = x^2 + y^2$, what is $\\dot{{V}}$ along trajectories?",
            math(format_linear_system(&system))
        ),
        format!(
            "$\\dot{{V}} = 2x\\dot{{x}} + 2y\\dot{{y}}$; the $xy$ terms cancel, leaving ${}$.",
            v_dot(a, c)
        ),
        body,
    )
}

const ASYMPTOTIC: &str = "The origin is asymptotically stable";
const LYAPUNOV_ONLY: &str = "The origin is Lyapunov stable; $V$ alone does not give asymptotic stability";
const INCONCLUSIVE: &str = "$V$ is inconclusive because $\\dot{V}$ is indefinite";
const UNSTABLE: &str = "The origin is unstable";

fn conclusion(rng: &mut Mulberry32, heavy: bool) -> (String, String, QuestionBody) {
    let a = if heavy { random_int(rng, -2, 3, false) } else { random_int(rng, 1, 3, false) };
    let b = random_int(rng, -3, 3, true);
    let c = random_int(rng, 1, 3, false);
    let system = damped_rotation(a, b, c);

    let (correct, why) = match a.signum() {
        1 => (ASYMPTOTIC, "both coefficients are negative, so $\\dot{V}$ is negative definite"),
        0 => (LYAPUNOV_ONLY, "it vanishes on the whole $x$-axis, so it is only negative semidefinite"),
        _ => (INCONCLUSIVE, "the coefficients have opposite signs, so it takes both signs"),
    };
    let options = [ASYMPTOTIC, LYAPUNOV_ONLY, INCONCLUSIVE, UNSTABLE]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let body = multiple_choice(rng, correct.to_string(), options, 3);
    (
        format!(
            "Using $V = x^2 + y^2$ for {}, what can you conclude?",
            math(format_linear_system(&system))
        ),
        format!("$\\dot{{V}} = {}$: {why}.", v_dot(a, c)),
        body,
    )
}

fn quadratic_candidate(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let a = random_int(rng, 1, 3, false);
    let c = random_int(rng, 1, 3, false);
    let couplings = random_distinct_ints(rng, 1, 4, 2);
    let (b, d) = (couplings[0], couplings[1]);
    let system = Matrix2::from_ints(-a, b, -d, -c);

    let render = |p: i32, q: i32| {
        math(format!("V = {}", join_terms(&[(p as f64, "x^2".into()), (q as f64, "y^2".into())])))
    };
    let distractors = vec![
        render(b, d),
        render(1, 1),
        render(d, -b),
    ];
    let body = multiple_choice(rng, render(d, b), distractors, 3);
    (
        format!(
            "Which quadratic form makes the cross terms of $\\dot{{V}}$ cancel for {}?",
            math(format_linear_system(&system))
        ),
        format!(
            "With $V = px^2 + qy^2$ the $xy$ coefficient of $\\dot{{V}}$ is $2({b}p - {d}q)$, which vanishes for $p = {d}, q = {b}$, leaving $\\dot{{V}} = {}$.",
            join_terms(&[(-2.0 * (a * d) as f64, "x^2".into()), (-2.0 * (b * c) as f64, "y^2".into())])
        ),
        body,
    )
}

const IS_GRADIENT: &str = "Yes: $\\partial f/\\partial y = \\partial g/\\partial x$";
const NOT_GRADIENT: &str = "No: $\\partial f/\\partial y \\neq \\partial g/\\partial x$";
const GRADIENT_IF_STABLE: &str = "Only if the origin is stable";
const GRADIENT_IF_TRACE_NEGATIVE: &str = "Only if the trace is negative";

fn gradient_test(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let a = random_int(rng, -3, 3, false);
    let b = random_int(rng, -3, 3, true);
    let d = random_int(rng, -3, 3, false);
    let c = if rng.chance(0.5) {
        b
    } else {
        let shift = random_int(rng, -2, 2, true);
        b + shift
    };
    let system = Matrix2::from_ints(a, b, c, d);
    let symmetric = system.is_symmetric();

    let options = [IS_GRADIENT, NOT_GRADIENT, GRADIENT_IF_STABLE, GRADIENT_IF_TRACE_NEGATIVE]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let correct = if symmetric { IS_GRADIENT } else { NOT_GRADIENT };
    let body = multiple_choice(rng, correct.to_string(), options, 3);
    (
        format!(
            "Is {} a gradient system $\\dot{{\\mathbf{{x}}}} = -\\nabla V$?",
            math(format_linear_system(&system))
        ),
        format!(
            "A planar field $(f, g)$ is a gradient exactly when its Jacobian is symmetric. Here $\\partial f/\\partial y = {b}$ and $\\partial g/\\partial x = {c}$."
        ),
        body,
    )
}

fn no_closed_orbits(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let body = multiple_choice(
        rng,
        "A closed orbit".into(),
        vec!["A saddle point".into(), "A stable node".into(), "An unstable node".into()],
        3,
    );
    (
        "Which of the following can never occur in a gradient system?".to_string(),
        "$V$ strictly decreases along non-constant trajectories, so none can return to its starting point.".to_string(),
        body,
    )
}

/// `V = -(a/2)x² - b·xy - (d/2)y²` for `ẋ = -∇V`, optionally with the
/// sign flipped or the halves dropped. `a` and `d` are even.
fn potential_text(a: i32, b: i32, d: i32, sign: i32, halved: bool) -> String {
    let scale = if halved { 2 } else { 1 };
    format!(
        "V = {}",
        join_terms(&[
            ((-sign * a / scale) as f64, "x^2".into()),
            ((-sign * b) as f64, "xy".into()),
            ((-sign * d / scale) as f64, "y^2".into()),
        ])
    )
}

fn potential(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let a = 2 * random_int(rng, -2, 2, true);
    let b = random_int(rng, -3, 3, true);
    let d = 2 * random_int(rng, -2, 2, true);
    let system = Matrix2::from_ints(a, b, b, d);

    let render = |sign: i32, halved: bool| math(potential_text(a, b, d, sign, halved));
    let distractors = vec![render(-1, true), render(1, false), render(-1, false)];
    let body = multiple_choice(rng, render(1, true), distractors, 3);
    (
        format!(
            "{} is a gradient system $\\dot{{\\mathbf{{x}}}} = -\\nabla V$. Which $V$ generates it?",
            math(format_linear_system(&system))
        ),
        format!(
            "Integrate $-\\dot{{x}}$ in $x$ and $-\\dot{{y}}$ in $y$: {}, up to a constant.",
            render(1, true)
        ),
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v_dot_matches_hand_computation() {
        assert_eq!(v_dot(1, 3), "-2x^2 - 6y^2");
        assert_eq!(v_dot(0, 2), "-4y^2");
        assert_eq!(v_dot(-1, 1), "2x^2 - 2y^2");
    }

    #[test]
    fn light_conclusions_are_always_asymptotic() {
        for seed in 0..100 {
            let mut rng = Mulberry32::new(seed);
            match conclusion(&mut rng, false).2 {
                QuestionBody::MultipleChoice { options, correct_index } => {
                    assert_eq!(options[correct_index], ASYMPTOTIC);
                }
                other => panic!("unexpected body {other:?}"),
            }
        }
    }

    #[test]
    fn potential_has_halved_diagonal() {
        // ẋ = 2x + y, ẏ = x - 4y  =>  V = -x² - xy + 2y².
        assert_eq!(potential_text(2, 1, -4, 1, true), "V = -x^2 - xy + 2y^2");
        assert_eq!(potential_text(2, 1, -4, 1, false), "V = -2x^2 - xy + 4y^2");
    }
}
