//! Center manifold reduction for
//! `ẋ = a·x·y,  ẏ = -λ·y + b·x²`.
//!
//! The Jacobian at the origin is `diag(0, -λ)`. Substituting
//! `y = h(x) = c·x² + O(x³)` into the invariance condition gives
//! `c = b/λ`, and the flow on the manifold is `ẋ = (ab/λ)·x³ + O(x⁴)`.

use crate::quiz_engine::{
    error::GenerationError,
    format::{format_fraction, join_terms},
    generator::QuestionGenerator,
    helpers::{math, multiple_choice, question, seeded, true_false, Statement},
    models::{Difficulty, GeneratorConfig, Question, QuestionBody, QuestionType, Topic},
    rng::{random_choice, random_int, Mulberry32},
};

const PREFIX: &str = "CM";

pub struct CenterManifold;

#[derive(Debug, Clone, Copy)]
enum Variant {
    Coefficient,
    ReducedEquation,
    OriginStability,
}

const BANK: &[Statement] = &[
    Statement::any(
        "A center manifold is tangent to the center eigenspace at the equilibrium.",
        true,
        "It is the graph of a function $h$ with $h(0) = 0$ and $Dh(0) = 0$ over the center directions.",
    ),
    Statement::any(
        "Center manifolds are always unique.",
        false,
        "They exist but may be non-unique; all of them share the same Taylor expansion.",
    ),
    Statement::any(
        "If every eigenvalue off the center subspace has negative real part, stability of the equilibrium is decided by the flow on the center manifold.",
        true,
        "The reduction principle: the full system behaves like the reduced flow plus an exponentially attracting direction.",
    ),
    Statement::any(
        "A center manifold is only needed when the linearization has a zero or purely imaginary eigenvalue.",
        true,
        "Without such eigenvalues the equilibrium is hyperbolic and Hartman-Grobman applies.",
    ),
];

impl QuestionGenerator for CenterManifold {
    fn name(&self) -> &'static str {
        "center_manifold"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::CenterManifolds]
    }

    fn question_types(&self) -> &'static [QuestionType] {
        &[QuestionType::TrueFalse, QuestionType::MultipleChoice]
    }

    fn difficulties(&self) -> &'static [Difficulty] {
        &[Difficulty::Moderate, Difficulty::Heavy]
    }

    fn generate(&self, config: &GeneratorConfig) -> Result<Question, GenerationError> {
        let (mut rng, seed) = seeded(config);
        match config.question_type {
            QuestionType::TrueFalse => true_false(PREFIX, config, seed, &mut rng, BANK),
            QuestionType::MultipleChoice => {
                let variants: &[Variant] = match config.difficulty {
                    Difficulty::Heavy => &[Variant::Coefficient, Variant::ReducedEquation, Variant::OriginStability],
                    _ => &[Variant::Coefficient, Variant::OriginStability],
                };
                let variant = *random_choice(&mut rng, variants);
                let system = ReducibleSystem::draw(&mut rng);
                let (prompt, explanation, body) = match variant {
                    Variant::Coefficient     => coefficient(&mut rng, &system),
                    Variant::ReducedEquation => reduced_equation(&mut rng, &system),
                    Variant::OriginStability => origin_stability(&mut rng, &system),
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

#[derive(Debug, Clone, Copy)]
struct ReducibleSystem {
    a: i32,
    b: i32,
    lambda: i32,
}

impl ReducibleSystem {
    fn draw(rng: &mut Mulberry32) -> Self {
        ReducibleSystem {
            a: random_int(rng, -3, 3, true),
            b: random_int(rng, -3, 3, true),
            lambda: random_int(rng, 1, 4, false),
        }
    }

    fn render(&self) -> String {
        math(format!(
            "\\dot{{x}} = {},\\quad \\dot{{y}} = {}",
            join_terms(&[(self.a as f64, "xy".into())]),
            join_terms(&[(-self.lambda as f64, "y".into()), (self.b as f64, "x^2".into())])
        ))
    }

    fn reduced_sign(&self) -> i32 {
        (self.a * self.b).signum()
    }
}

/// `n/d` as the coefficient of `var`: `x^3`, `-x^3`, `\frac{3}{2}x^3`.
fn scaled(n: i64, d: i64, var: &str) -> String {
    match format_fraction(n, d).as_str() {
        "0" => "0".to_string(),
        "1" => var.to_string(),
        "-1" => format!("-{var}"),
        c => format!("{c}{var}"),
    }
}

fn coefficient(rng: &mut Mulberry32, sys: &ReducibleSystem) -> (String, String, QuestionBody) {
    let (b, l) = (sys.b as i64, sys.lambda as i64);
    let render = |n: i64, d: i64| math(format!("c = {}", format_fraction(n, d)));
    let distractors = vec![
        render(-b, l),
        render(l, b),
        render(b * l, 1),
        render((sys.a * sys.b) as i64, l),
        render(b, 2 * l),
        render(2 * b, l),
    ];
    let body = multiple_choice(rng, render(b, l), distractors, 3);
    (
        format!(
            "For {} the center manifold of the origin is $y = c x^2 + O(x^3)$. What is $c$?",
            sys.render()
        ),
        format!(
            "On the manifold $\\dot{{y}} = 2cx\\,\\dot{{x}} = O(x^4)$, so $0 = {}$ at order $x^2$, giving $c = {}$.",
            join_terms(&[(-(l as f64), "c".into()), (b as f64, String::new())]),
            format_fraction(b, l)
        ),
        body,
    )
}

fn reduced_equation(rng: &mut Mulberry32, sys: &ReducibleSystem) -> (String, String, QuestionBody) {
    let (a, b, l) = (sys.a as i64, sys.b as i64, sys.lambda as i64);
    let render = |rhs: String| math(format!("\\dot{{x}} = {rhs}"));
    let correct = render(scaled(a * b, l, "x^3"));
    let distractors = vec![
        render(scaled(-a * b, l, "x^3")),
        render(scaled(a * b, l, "x^2")),
        render(scaled(a, l, "x^3")),
        render(scaled(a * b * l, 1, "x^3")),
    ];
    let body = multiple_choice(rng, correct, distractors, 3);
    (
        format!(
            "For {}, what is the leading-order flow on the center manifold of the origin?",
            sys.render()
        ),
        format!(
            "The manifold is $y = {}$; substituting into $\\dot{{x}} = {a}xy$ gives $\\dot{{x}} = {}$.",
            scaled(b, l, "x^2"),
            scaled(a * b, l, "x^3")
        ),
        body,
    )
}

const ASYMPTOTICALLY_STABLE: &str = "Asymptotically stable";
const UNSTABLE: &str = "Unstable";
const LINEARLY_STABLE: &str = "Stable, because both eigenvalues are non-positive";
const UNDECIDABLE: &str = "Cannot be determined without higher-order terms";

fn origin_stability(rng: &mut Mulberry32, sys: &ReducibleSystem) -> (String, String, QuestionBody) {
    let stable = sys.reduced_sign() < 0;
    let correct = if stable { ASYMPTOTICALLY_STABLE } else { UNSTABLE };
    let distractors = [ASYMPTOTICALLY_STABLE, UNSTABLE, LINEARLY_STABLE, UNDECIDABLE]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let body = multiple_choice(rng, correct.to_string(), distractors, 3);
    let product = sys.a * sys.b;
    (
        format!("Is the origin of {} stable?", sys.render()),
        format!(
            "The reduced flow is $\\dot{{x}} = {}$. Since $ab = {product}$ is {}, the origin is {}.",
            scaled(product as i64, sys.lambda as i64, "x^3"),
            if stable { "negative" } else { "positive" },
            if stable { "asymptotically stable" } else { "unstable" }
        ),
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_folds_unit_coefficients() {
        assert_eq!(scaled(1, 1, "x^3"), "x^3");
        assert_eq!(scaled(-2, 2, "x^3"), "-x^3");
        assert_eq!(scaled(3, 2, "x^2"), "\\frac{3}{2}x^2");
        assert_eq!(scaled(-3, 4, "x^3"), "-\\frac{3}{4}x^3");
    }

    #[test]
    fn stability_follows_sign_of_ab() {
        let stable = ReducibleSystem { a: 2, b: -1, lambda: 3 };
        let unstable = ReducibleSystem { a: -2, b: -1, lambda: 3 };
        assert_eq!(stable.reduced_sign(), -1);
        assert_eq!(unstable.reduced_sign(), 1);
    }

    #[test]
    fn coefficient_answer_is_b_over_lambda() {
        let sys = ReducibleSystem { a: 1, b: 3, lambda: 2 };
        let mut rng = Mulberry32::new(4);
        match coefficient(&mut rng, &sys).2 {
            QuestionBody::MultipleChoice { options, correct_index } => {
                assert_eq!(options[correct_index], "$c = \\frac{3}{2}$");
            }
            other => panic!("unexpected body {other:?}"),
        }
    }
}
