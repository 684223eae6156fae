//! Planar linear systems ẋ = Ax built by inverse construction from a
//! requested eigenvalue class.

use crate::quiz_engine::{
    error::GenerationError,
    format::{format_eigenvalues, format_linear_system, format_matrix, format_number},
    generator::QuestionGenerator,
    helpers::{math, matching, multiple_choice, question, seeded, true_false, Statement},
    matrix::{
        classify_eigenvalues, generate_matrix_with_eigenvalues, get_equilibrium_name, is_stable,
        EigenvalueType, Eigenvalues, Matrix2,
    },
    models::{Difficulty, GeneratorConfig, Question, QuestionBody, QuestionType, Topic},
    rng::{random_choice, random_int, shuffle, Mulberry32},
};

const PREFIX: &str = "LS";

pub struct LinearSystems;

#[derive(Debug, Clone, Copy)]
enum Variant {
    Classify,
    TraceDeterminant,
    Eigenvalues,
    Stability,
}

const BANK: &[Statement] = &[
    Statement::any(
        "If $\\det A < 0$ the origin of $\\dot{\\mathbf{x}} = A\\mathbf{x}$ is a saddle.",
        true,
        "The determinant is the product of the eigenvalues; a negative product means they are real with opposite signs.",
    ),
    Statement::any(
        "If $\\operatorname{tr} A < 0$ and $\\det A > 0$, the origin is asymptotically stable.",
        true,
        "Both eigenvalues then have negative real part: their sum is negative and their product positive.",
    ),
    Statement::any(
        "A planar linear system with complex eigenvalues always has a center at the origin.",
        false,
        "Only purely imaginary eigenvalues give a center; a nonzero real part gives a spiral.",
    ),
    Statement::any(
        "When $\\operatorname{tr}(A)^2 = 4\\det A$, the eigenvalues of $A$ are repeated.",
        true,
        "The discriminant $\\tau^2 - 4\\Delta$ vanishes exactly when the two roots of the characteristic polynomial coincide.",
    ),
    Statement::any(
        "Every straight-line solution of $\\dot{\\mathbf{x}} = A\\mathbf{x}$ lies along a real eigenvector of $A$.",
        true,
        "A solution that stays on a line through the origin satisfies $A\\mathbf{v} = \\lambda\\mathbf{v}$ for its direction $\\mathbf{v}$.",
    ),
];

impl QuestionGenerator for LinearSystems {
    fn name(&self) -> &'static str {
        "linear_systems"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::LinearSystems]
    }

    fn question_types(&self) -> &'static [QuestionType] {
        &[QuestionType::TrueFalse, QuestionType::MultipleChoice, QuestionType::Matching]
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
                    Difficulty::Light => &[Variant::Classify, Variant::TraceDeterminant, Variant::Stability],
                    _ => &[Variant::Classify, Variant::TraceDeterminant, Variant::Eigenvalues, Variant::Stability],
                };
                let variant = *random_choice(&mut rng, variants);
                let kind = *random_choice(&mut rng, &EigenvalueType::ALL);
                let m = build_matrix(&mut rng, kind, config.difficulty)?;
                let (prompt, explanation, body) = match variant {
                    Variant::Classify         => classify(&mut rng, &m),
                    Variant::TraceDeterminant => trace_determinant(&mut rng, &m),
                    Variant::Eigenvalues      => eigenvalues(&mut rng, &m),
                    Variant::Stability        => stability(&mut rng, &m),
                };
                Ok(question(PREFIX, config, seed, prompt, explanation, body))
            }
            QuestionType::Matching => {
                let (prompt, explanation, body) = match_matrices(&mut rng, config.difficulty)?;
                Ok(question(PREFIX, config, seed, prompt, explanation, body))
            }
            other => Err(GenerationError::UnsupportedType {
                generator: self.name(),
                question_type: other,
            }),
        }
    }
}

/// Heavy questions hide the triangular structure behind a shear change of
/// basis `P A P^{-1}`, which keeps integer entries because `det P = 1`.
fn build_matrix(rng: &mut Mulberry32, kind: EigenvalueType, difficulty: Difficulty) -> Result<Matrix2, GenerationError> {
    let m = generate_matrix_with_eigenvalues(kind, rng);
    if difficulty != Difficulty::Heavy {
        return Ok(m);
    }
    let k = random_int(rng, -2, 2, true);
    let p = Matrix2::from_ints(1, k, 0, 1);
    Ok(p.multiply(&m).multiply(&p.inverse()?))
}

fn system(m: &Matrix2) -> String {
    math(format_linear_system(m))
}

fn classification_note(m: &Matrix2) -> String {
    let c = classify_eigenvalues(m);
    format!(
        "$\\tau = {}$, $\\Delta = {}$, $\\tau^2 - 4\\Delta = {}$, so ${}$: {}, which makes the origin a {}.",
        format_number(m.trace()),
        format_number(m.det()),
        format_number(m.discriminant()),
        format_eigenvalues(&c.eigenvalues),
        c.kind,
        get_equilibrium_name(c.kind).to_lowercase()
    )
}

fn other_names(rng: &mut Mulberry32, kind: EigenvalueType) -> Vec<String> {
    let others: Vec<EigenvalueType> = EigenvalueType::ALL.iter().copied().filter(|k| *k != kind).collect();
    shuffle(rng, &others)
        .into_iter()
        .map(|k| get_equilibrium_name(k).to_string())
        .collect()
}

fn classify(rng: &mut Mulberry32, m: &Matrix2) -> (String, String, QuestionBody) {
    let kind = classify_eigenvalues(m).kind;
    let distractors = other_names(rng, kind);
    let body = multiple_choice(rng, get_equilibrium_name(kind).to_string(), distractors, 3);
    (
        format!("Classify the equilibrium at the origin of {}.", system(m)),
        classification_note(m),
        body,
    )
}

fn trace_determinant(rng: &mut Mulberry32, m: &Matrix2) -> (String, String, QuestionBody) {
    let pair = |t: f64, d: f64| math(format!("\\tau = {},\\ \\Delta = {}", format_number(t), format_number(d)));
    let t = m.trace();
    let d = m.det();
    // Unit shifts of either invariant always survive deduplication; the
    // sign slips collide with the answer for centers and saddles.
    let distractors = vec![
        pair(t, m.a * m.d + m.b * m.c),
        pair(-t, d),
        pair(t, -d),
        pair(t + 1.0, d),
        pair(t, d - 1.0),
    ];
    let body = multiple_choice(rng, pair(t, d), distractors, 3);
    (
        format!("What are the trace and determinant of {}?", math(format!("A = {}", format_matrix(m)))),
        format!(
            "$\\tau = a + d = {}$ and $\\Delta = ad - bc = {}$.",
            format_number(t),
            format_number(d)
        ),
        body,
    )
}

fn eigenvalues(rng: &mut Mulberry32, m: &Matrix2) -> (String, String, QuestionBody) {
    let c = classify_eigenvalues(m);
    let render = |e: Eigenvalues| math(format_eigenvalues(&e));
    let distractors = match c.eigenvalues {
        Eigenvalues::Real { first, second } => vec![
            render(Eigenvalues::Real { first: -second, second: -first }),
            render(Eigenvalues::Complex { re: m.trace() / 2.0, im: ((first - second) / 2.0).max(1.0) }),
            render(Eigenvalues::Real { first: first + 1.0, second: second + 1.0 }),
            render(Eigenvalues::Real { first: first - 1.0, second: second - 1.0 }),
        ],
        Eigenvalues::Complex { re, im } => vec![
            render(Eigenvalues::Complex { re: -re + 0.0, im }),
            render(Eigenvalues::Real { first: re + im, second: re - im }),
            render(Eigenvalues::Complex { re: im, im: re.abs().max(1.0) }),
            render(Eigenvalues::Complex { re, im: im + 1.0 }),
        ],
    };
    let body = multiple_choice(rng, render(c.eigenvalues), distractors, 3);
    (
        format!("Find the eigenvalues of {}.", math(format!("A = {}", format_matrix(m)))),
        format!(
            "The characteristic polynomial is $\\lambda^2 - {}\\lambda + {} = 0$. {}",
            format_number(m.trace()),
            format_number(m.det()),
            classification_note(m)
        ),
        body,
    )
}

fn stability(rng: &mut Mulberry32, m: &Matrix2) -> (String, String, QuestionBody) {
    let kind = classify_eigenvalues(m).kind;
    let correct = if is_stable(kind) {
        "Asymptotically stable"
    } else if kind == EigenvalueType::PureImaginary {
        "Stable, but not asymptotically stable"
    } else {
        "Unstable"
    };
    let options = vec![
        "Asymptotically stable".to_string(),
        "Stable, but not asymptotically stable".to_string(),
        "Unstable".to_string(),
    ];
    let body = multiple_choice(rng, correct.to_string(), options, 2);
    (
        format!("What is the stability of the origin for {}?", system(m)),
        classification_note(m),
        body,
    )
}

fn match_matrices(rng: &mut Mulberry32, difficulty: Difficulty) -> Result<(String, String, QuestionBody), GenerationError> {
    let kinds: Vec<EigenvalueType> = shuffle(rng, &EigenvalueType::ALL).into_iter().take(4).collect();
    let mut pairs = Vec::with_capacity(kinds.len());
    let mut notes = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let m = build_matrix(rng, kind, difficulty)?;
        let name = get_equilibrium_name(kind);
        notes.push(format!(
            "{}: $\\tau = {}$, $\\Delta = {}$ gives a {}",
            math(format_matrix(&m)),
            format_number(m.trace()),
            format_number(m.det()),
            name.to_lowercase()
        ));
        pairs.push((math(format!("A = {}", format_matrix(&m))), name.to_string()));
    }
    Ok((
        "Match each matrix $A$ to the type of equilibrium at the origin of $\\dot{\\mathbf{x}} = A\\mathbf{x}$.".to_string(),
        format!("{}.", notes.join("; ")),
        matching(rng, pairs),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heavy_conjugation_preserves_class() {
        for seed in 0..200 {
            for kind in EigenvalueType::ALL {
                let mut rng = Mulberry32::new(seed);
                let m = build_matrix(&mut rng, kind, Difficulty::Heavy).expect("shear is invertible");
                assert_eq!(classify_eigenvalues(&m).kind, kind, "seed={seed} m={m:?}");
                for entry in [m.a, m.b, m.c, m.d] {
                    assert_eq!(entry, entry.round());
                }
            }
        }
    }
    fn option_count(body: &QuestionBody) -> usize {
        match body {
            QuestionBody::MultipleChoice { options, .. } => {
                let mut unique = options.clone();
                unique.sort();
                unique.dedup();
                assert_eq!(unique.len(), options.len(), "repeated option in {options:?}");
                options.len()
            }
            other => panic!("expected multiple choice, got {other:?}"),
        }
    }

    #[test]
    fn center_trace_determinant_keeps_four_options() {
        let m = Matrix2::from_ints(0, -3, 3, 0);
        for seed in 0..50 {
            let mut rng = Mulberry32::new(seed);
            assert_eq!(option_count(&trace_determinant(&mut rng, &m).2), 4);
        }
    }

    #[test]
    fn symmetric_saddle_eigenvalues_keep_four_options() {
        let m = Matrix2::from_ints(2, 0, 0, -2);
        for seed in 0..50 {
            let mut rng = Mulberry32::new(seed);
            assert_eq!(option_count(&eigenvalues(&mut rng, &m).2), 4);
            assert_eq!(option_count(&trace_determinant(&mut rng, &m).2), 4);
        }
    }
}
