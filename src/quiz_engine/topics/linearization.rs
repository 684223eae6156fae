//! Nonlinear planar systems whose Jacobian at the origin is a generated
//! matrix, plus quadratic terms that vanish under linearization.

use crate::quiz_engine::{
    error::GenerationError,
    format::{format_matrix, join_terms},
    generator::QuestionGenerator,
    helpers::{math, multiple_choice, question, seeded, true_false, Statement},
    matrix::{classify_eigenvalues, generate_matrix_with_eigenvalues, get_equilibrium_name, EigenvalueType, Matrix2},
    models::{Difficulty, GeneratorConfig, Question, QuestionBody, QuestionType, Topic},
    rng::{random_choice, random_int, shuffle, Mulberry32},
};

const PREFIX: &str = "LN";

const INCONCLUSIVE: &str = "Linearization is inconclusive";

pub struct Linearization;

#[derive(Debug, Clone, Copy)]
enum Variant {
    Jacobian,
    ClassifyOrigin,
}

const BANK: &[Statement] = &[
    Statement::any(
        "Near a hyperbolic equilibrium, a nonlinear system is topologically equivalent to its linearization.",
        true,
        "This is the Hartman-Grobman theorem.",
    ),
    Statement::any(
        "If the linearization at an equilibrium has a center, the nonlinear system also has a center there.",
        false,
        "Purely imaginary eigenvalues are not hyperbolic; nonlinear terms can turn the center into a stable or unstable spiral.",
    ),
    Statement::any(
        "An equilibrium is hyperbolic when no eigenvalue of its Jacobian has zero real part.",
        true,
        "That is the definition; it is the hypothesis Hartman-Grobman needs.",
    ),
    Statement::any(
        "Quadratic terms such as $x^2$ or $xy$ contribute to the Jacobian at the origin.",
        false,
        "Their partial derivatives vanish at $(0, 0)$, so only the linear terms survive.",
    ),
];

/// The quadratic monomials the generator may bolt onto each equation.
const NONLINEAR: [&str; 3] = ["x^2", "xy", "y^2"];

struct NonlinearSystem {
    jacobian: Matrix2,
    x_quadratic: (i32, &'static str),
    y_quadratic: (i32, &'static str),
}

impl NonlinearSystem {
    fn render(&self) -> String {
        let j = &self.jacobian;
        let x_rhs = join_terms(&[
            (j.a, "x".into()),
            (j.b, "y".into()),
            (self.x_quadratic.0 as f64, self.x_quadratic.1.into()),
        ]);
        let y_rhs = join_terms(&[
            (j.c, "x".into()),
            (j.d, "y".into()),
            (self.y_quadratic.0 as f64, self.y_quadratic.1.into()),
        ]);
        math(format!("\\dot{{x}} = {x_rhs},\\quad \\dot{{y}} = {y_rhs}"))
    }
}

impl QuestionGenerator for Linearization {
    fn name(&self) -> &'static str {
        "linearization"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::Linearization]
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
                let variant = *random_choice(&mut rng, &[Variant::Jacobian, Variant::ClassifyOrigin]);
                let system = build_system(&mut rng, config.difficulty);
                let (prompt, explanation, body) = match variant {
                    Variant::Jacobian       => jacobian(&mut rng, &system),
                    Variant::ClassifyOrigin => classify_origin(&mut rng, &system),
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

/// Heavy questions may produce a non-hyperbolic (center) linearization.
fn build_system(rng: &mut Mulberry32, difficulty: Difficulty) -> NonlinearSystem {
    let kind = if difficulty == Difficulty::Heavy && rng.chance(0.3) {
        EigenvalueType::PureImaginary
    } else {
        *random_choice(rng, &EigenvalueType::HYPERBOLIC)
    };
    let jacobian = generate_matrix_with_eigenvalues(kind, rng);
    let x_quadratic = (random_int(rng, -2, 2, true), *random_choice(rng, &NONLINEAR));
    let y_quadratic = (random_int(rng, -2, 2, true), *random_choice(rng, &NONLINEAR));
    NonlinearSystem { jacobian, x_quadratic, y_quadratic }
}

fn jacobian(rng: &mut Mulberry32, system: &NonlinearSystem) -> (String, String, QuestionBody) {
    let j = system.jacobian;
    let render = |m: &Matrix2| math(format!("J(0,0) = {}", format_matrix(m)));
    // The quadratic shift and the two unit shifts differ from `j` and from
    // each other for every Jacobian, so at least three distractors survive.
    let distractors = vec![
        render(&Matrix2::new(j.a + system.x_quadratic.0 as f64, j.b, j.c, j.d + system.y_quadratic.0 as f64)),
        render(&Matrix2::new(j.a, -j.b, -j.c, j.d)),
        render(&Matrix2::new(-j.a, j.b, j.c, -j.d)),
        render(&j.transpose()),
        render(&Matrix2::new(j.a + 1.0, j.b, j.c, j.d)),
        render(&Matrix2::new(j.a, j.b, j.c, j.d + 1.0)),
    ];
    let body = multiple_choice(rng, render(&j), distractors, 3);
    (
        format!("What is the Jacobian at the origin of {}?", system.render()),
        "Every partial derivative of the quadratic terms vanishes at the origin, so the Jacobian is the matrix of linear coefficients.".to_string(),
        body,
    )
}

fn classify_origin(rng: &mut Mulberry32, system: &NonlinearSystem) -> (String, String, QuestionBody) {
    let c = classify_eigenvalues(&system.jacobian);
    let (correct, explanation) = if c.kind == EigenvalueType::PureImaginary {
        (
            INCONCLUSIVE.to_string(),
            "The Jacobian has purely imaginary eigenvalues, so the origin is not hyperbolic and the quadratic terms decide between a center and a spiral.".to_string(),
        )
    } else {
        (
            get_equilibrium_name(c.kind).to_string(),
            format!(
                "The Jacobian {} has eigenvalues that are {}. The origin is hyperbolic, so by Hartman-Grobman it is a {}.",
                math(format_matrix(&system.jacobian)),
                c.kind,
                get_equilibrium_name(c.kind).to_lowercase()
            ),
        )
    };
    let others: Vec<EigenvalueType> = EigenvalueType::HYPERBOLIC.iter().copied().filter(|k| *k != c.kind).collect();
    let mut distractors: Vec<String> = vec![INCONCLUSIVE.to_string()];
    distractors.extend(shuffle(rng, &others).into_iter().map(|k| get_equilibrium_name(k).to_string()));
    let body = multiple_choice(rng, correct, distractors, 3);
    (
        format!("What does linearization tell you about the origin of {}?", system.render()),
        explanation,
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moderate_systems_are_hyperbolic() {
        for seed in 0..200 {
            let mut rng = Mulberry32::new(seed);
            let s = build_system(&mut rng, Difficulty::Moderate);
            assert_ne!(classify_eigenvalues(&s.jacobian).kind, EigenvalueType::PureImaginary);
        }
    }

    #[test]
    fn render_includes_quadratic_terms() {
        let s = NonlinearSystem {
            jacobian: Matrix2::from_ints(-1, 0, 0, -2),
            x_quadratic: (1, "y^2"),
            y_quadratic: (-2, "xy"),
        };
        assert_eq!(s.render(), "$\\dot{x} = -x + y^2,\\quad \\dot{y} = -2y - 2xy$");
    }

    #[test]
    fn diagonal_jacobian_keeps_four_options() {
        let s = NonlinearSystem {
            jacobian: Matrix2::from_ints(-1, 0, 0, -1),
            x_quadratic: (2, "xy"),
            y_quadratic: (2, "x^2"),
        };
        for seed in 0..50 {
            let mut rng = Mulberry32::new(seed);
            match jacobian(&mut rng, &s).2 {
                QuestionBody::MultipleChoice { options, .. } => {
                    assert_eq!(options.len(), 4, "{options:?}");
                    let mut unique = options.clone();
                    unique.sort();
                    unique.dedup();
                    assert_eq!(unique.len(), 4);
                }
                other => panic!("expected multiple choice, got {other:?}"),
            }
        }
    }
}
