//! Stable and unstable manifolds of hyperbolic equilibria.

use crate::quiz_engine::{
    error::GenerationError,
    format::{format_fraction, format_matrix, gcd, join_terms},
    generator::QuestionGenerator,
    helpers::{math, multiple_choice, question, seeded, true_false, Statement},
    matrix::Matrix2,
    models::{Difficulty, GeneratorConfig, Question, QuestionBody, QuestionType, Topic},
    rng::{random_choice, random_int, Mulberry32},
};

const PREFIX: &str = "IM";

pub struct InvariantManifolds;

#[derive(Debug, Clone, Copy)]
enum Variant {
    ManifoldDimensions,
    UnstableDirection,
    QuadraticManifold,
}

const BANK: &[Statement] = &[
    Statement::any(
        "The stable manifold of a hyperbolic equilibrium is tangent to the stable eigenspace at that equilibrium.",
        true,
        "This is the content of the stable manifold theorem.",
    ),
    Statement::any(
        "A trajectory on the unstable manifold approaches the equilibrium as $t \\to +\\infty$.",
        false,
        "Points on the unstable manifold approach the equilibrium in backward time, $t \\to -\\infty$.",
    ),
    Statement::any(
        "For a saddle in the plane, the stable and unstable manifolds are both one-dimensional curves.",
        true,
        "Each is tangent to the eigenvector of the corresponding real eigenvalue.",
    ),
    Statement::any(
        "Stable and unstable manifolds are invariant sets of the flow.",
        true,
        "A trajectory that starts on either manifold stays on it for all time.",
    ),
];

impl QuestionGenerator for InvariantManifolds {
    fn name(&self) -> &'static str {
        "invariant_manifolds"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::InvariantManifolds]
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
                    Difficulty::Light    => &[Variant::ManifoldDimensions],
                    Difficulty::Moderate => &[Variant::ManifoldDimensions, Variant::UnstableDirection],
                    _ => &[Variant::UnstableDirection, Variant::QuadraticManifold],
                };
                let variant = *random_choice(&mut rng, variants);
                let (prompt, explanation, body) = match variant {
                    Variant::ManifoldDimensions => manifold_dimensions(&mut rng),
                    Variant::UnstableDirection  => unstable_direction(&mut rng),
                    Variant::QuadraticManifold  => quadratic_manifold(&mut rng),
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

fn dimensions_text(stable: usize, unstable: usize) -> String {
    math(format!("\\dim W^s = {stable},\\ \\dim W^u = {unstable}"))
}

fn manifold_dimensions(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let rates: Vec<i32> = (0..3).map(|_| random_int(rng, -4, 4, true)).collect();
    let stable = rates.iter().filter(|&&r| r < 0).count();
    let unstable = 3 - stable;

    let distractors = (0..=3).map(|s| dimensions_text(s, 3 - s)).collect();
    let body = multiple_choice(rng, dimensions_text(stable, unstable), distractors, 3);

    let equations: Vec<String> = ["x", "y", "z"]
        .iter()
        .zip(&rates)
        .map(|(v, &r)| format!("\\dot{{{v}}} = {}", join_terms(&[(r as f64, v.to_string())])))
        .collect();
    (
        format!(
            "What are the dimensions of the stable and unstable manifolds of the origin for {}?",
            math(equations.join(",\\quad "))
        ),
        format!(
            "The system is diagonal with eigenvalues {}, {} and {}: {stable} negative and {unstable} positive.",
            rates[0], rates[1], rates[2]
        ),
        body,
    )
}

/// Integer direction reduced by its gcd, first nonzero entry positive.
fn normalize(x: i64, y: i64) -> (i64, i64) {
    let g = gcd(x, y).max(1);
    let (x, y) = (x / g, y / g);
    if x < 0 || (x == 0 && y < 0) {
        (-x, -y)
    } else {
        (x, y)
    }
}

fn vector_text((x, y): (i64, i64)) -> String {
    math(format!("({x}, {y})"))
}

fn unstable_direction(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let positive = random_int(rng, 1, 4, false);
    let negative = random_int(rng, -4, -1, false);
    let (l1, l2) = if rng.chance(0.5) { (positive, negative) } else { (negative, positive) };
    let b = random_int(rng, -3, 3, true);
    let m = Matrix2::from_ints(l1, b, 0, l2);

    let (l1, l2, b) = (l1 as i64, l2 as i64, b as i64);
    let first = normalize(1, 0);
    let second = normalize(b, l2 - l1);
    let (unstable, stable) = if l1 > 0 { (first, second) } else { (second, first) };

    let distractors = vec![
        vector_text(stable),
        vector_text(normalize(b, l1 - l2)),
        vector_text(normalize(l2 - l1, b)),
        vector_text((0, 1)),
    ];
    let body = multiple_choice(rng, vector_text(unstable), distractors, 3);
    (
        format!(
            "The linear system $\\dot{{\\mathbf{{x}}}} = A\\mathbf{{x}}$ with {} has a saddle at the origin. Which vector spans the unstable manifold?",
            math(format!("A = {}", format_matrix(&m)))
        ),
        format!(
            "The eigenvalues are {l1} with eigenvector $(1, 0)$ and {l2} with eigenvector $({b}, {})$. The unstable manifold is the line through {}.",
            l2 - l1,
            vector_text(unstable)
        ),
        body,
    )
}

fn quadratic_manifold(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let lambda = random_int(rng, 1, 3, false) as i64;
    let mu = random_int(rng, 1, 3, false) as i64;
    let c = random_int(rng, -4, 4, true) as i64;

    let render = |n: i64, d: i64| math(format!("k = {}", format_fraction(n, d)));
    let mut distractors = vec![render(-c, 2 * lambda + mu), render(c, lambda + mu), render(c, mu)];
    if 2 * lambda != mu {
        distractors.insert(0, render(c, 2 * lambda - mu));
    }
    let body = multiple_choice(rng, render(c, 2 * lambda + mu), distractors, 3);

    let system = format!(
        "\\dot{{x}} = {},\\quad \\dot{{y}} = {}",
        join_terms(&[(lambda as f64, "x".into())]),
        join_terms(&[(-(mu as f64), "y".into()), (c as f64, "x^2".into())])
    );
    (
        format!(
            "The unstable manifold of the origin for {} is the graph $y = kx^2$. What is $k$?",
            math(system)
        ),
        format!(
            "Invariance requires $\\dot{{y}} = 2kx\\dot{{x}}$, so ${}k = {}$ and $k = {}$.",
            2 * lambda,
            join_terms(&[(-(mu as f64), "k".into()), (c as f64, String::new())]),
            format_fraction(c, 2 * lambda + mu)
        ),
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_fixes_sign_and_scale() {
        assert_eq!(normalize(-2, 4), (1, -2));
        assert_eq!(normalize(0, -3), (0, 1));
        assert_eq!(normalize(3, 6), (1, 2));
    }

    #[test]
    fn unstable_direction_is_an_eigenvector_for_the_positive_eigenvalue() {
        // A = [[-2, 1], [0, 3]]: eigenvector for 3 is (1, 5).
        let (b, l1, l2) = (1_i64, -2_i64, 3_i64);
        let (x, y) = normalize(b, l2 - l1);
        assert_eq!((x, y), (1, 5));
        assert_eq!(l1 * x + b * y, l2 * x);
    }

    #[test]
    fn dimensions_answer_counts_signs() {
        for seed in 0..100 {
            let mut rng = Mulberry32::new(seed);
            let (_, explanation, body) = manifold_dimensions(&mut rng);
            assert!(explanation.contains("negative"));
            match body {
                QuestionBody::MultipleChoice { options, correct_index } => {
                    assert!(options[correct_index].contains("\\dim W^s"));
                }
                other => panic!("unexpected body {other:?}"),
            }
        }
    }
}
