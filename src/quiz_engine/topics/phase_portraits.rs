//! Picture-based questions on linear phase portraits.
//!
//! Every question carries a [`Diagram`] naming the portrait to draw. The
//! portrait always comes from classifying the generated matrix, so the
//! picture and the answer key cannot disagree.

use crate::quiz_engine::{
    error::GenerationError,
    format::{format_linear_system, format_number},
    generator::QuestionGenerator,
    helpers::{math, matching, multiple_choice, question, seeded},
    matrix::{classify_eigenvalues, generate_matrix_with_eigenvalues, get_equilibrium_name, EigenvalueType, Matrix2},
    models::{Diagram, Difficulty, GeneratorConfig, PortraitType, Question, QuestionType, Topic},
    rng::{shuffle, Mulberry32},
};

const PREFIX: &str = "PP";

pub struct PhasePortraitMatching;

/// Portraits a student should tell apart at a glance.
const GENERIC: [EigenvalueType; 6] = [
    EigenvalueType::RealDistinctNegative,
    EigenvalueType::RealDistinctPositive,
    EigenvalueType::RealDistinctMixed,
    EigenvalueType::ComplexNegativeReal,
    EigenvalueType::ComplexPositiveReal,
    EigenvalueType::PureImaginary,
];

impl QuestionGenerator for PhasePortraitMatching {
    fn name(&self) -> &'static str {
        "phase_portrait_matching"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::PhasePortraits]
    }

    fn question_types(&self) -> &'static [QuestionType] {
        &[QuestionType::MultipleChoice, QuestionType::Matching]
    }

    fn difficulties(&self) -> &'static [Difficulty] {
        &[Difficulty::Light, Difficulty::Moderate]
    }

    fn produces_diagrams(&self) -> bool {
        true
    }

    fn generate(&self, config: &GeneratorConfig) -> Result<Question, GenerationError> {
        let (mut rng, seed) = seeded(config);
        let palette: &[EigenvalueType] = match config.difficulty {
            Difficulty::Light => &GENERIC,
            _ => &EigenvalueType::ALL,
        };
        let kinds: Vec<EigenvalueType> = shuffle(&mut rng, palette).into_iter().take(4).collect();
        let systems: Vec<(Matrix2, EigenvalueType)> = kinds
            .iter()
            .map(|&kind| {
                let m = portrait_matrix(kind, &mut rng);
                (m, classify_eigenvalues(&m).kind)
            })
            .collect();
        let (first, first_kind) = systems[0];
        let diagram = Diagram::phase_portrait(PortraitType::from(first_kind));

        match config.question_type {
            QuestionType::MultipleChoice => {
                let distractors = systems[1..].iter().map(|(m, _)| math(format_linear_system(m))).collect();
                let body = multiple_choice(&mut rng, math(format_linear_system(&first)), distractors, 3);
                let explanation = format!(
                    "The portrait is a {}. For {}, $\\tau = {}$ and $\\Delta = {}$ give exactly that; the other systems are {}.",
                    get_equilibrium_name(first_kind).to_lowercase(),
                    math(format_linear_system(&first)),
                    format_number(first.trace()),
                    format_number(first.det()),
                    systems[1..]
                        .iter()
                        .map(|(_, k)| get_equilibrium_name(*k).to_lowercase())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                Ok(question(
                    PREFIX,
                    config,
                    seed,
                    "Which linear system produces the phase portrait shown?".to_string(),
                    explanation,
                    body,
                )
                .with_diagram(diagram))
            }
            QuestionType::Matching => {
                let pairs = systems
                    .iter()
                    .map(|(m, k)| (math(format_linear_system(m)), get_equilibrium_name(*k).to_string()))
                    .collect();
                Ok(question(
                    PREFIX,
                    config,
                    seed,
                    "Match each system to its phase portrait type. The diagram shows the portrait of the first system.".to_string(),
                    systems
                        .iter()
                        .map(|(m, k)| {
                            format!(
                                "$\\tau = {}, \\Delta = {}$: {}",
                                format_number(m.trace()),
                                format_number(m.det()),
                                get_equilibrium_name(*k).to_lowercase()
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("; "),
                    matching(&mut rng, pairs),
                )
                .with_diagram(diagram))
            }
            other => Err(GenerationError::UnsupportedType {
                generator: self.name(),
                question_type: other,
            }),
        }
    }
}

/// A repeated eigenvalue drawn as `λI` is a star node, not the degenerate
/// node the portrait shows, so it is replaced by the Jordan block.
fn portrait_matrix(kind: EigenvalueType, rng: &mut Mulberry32) -> Matrix2 {
    let m = generate_matrix_with_eigenvalues(kind, rng);
    let repeated = matches!(kind, EigenvalueType::RealRepeatedNegative | EigenvalueType::RealRepeatedPositive);
    if repeated && m.b == 0.0 && m.c == 0.0 {
        Matrix2::new(m.a, 1.0, 0.0, m.d)
    } else {
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz_engine::models::{DiagramKind, QuestionBody};

    #[test]
    fn diagram_matches_correct_system() {
        for seed in 0..100 {
            let config = GeneratorConfig::new(Topic::PhasePortraits, Difficulty::Moderate, QuestionType::MultipleChoice)
                .with_seed(seed);
            let q = PhasePortraitMatching.generate(&config).unwrap();
            let diagram = q.diagram.clone().expect("portrait questions carry a diagram");
            assert_eq!(diagram.kind, DiagramKind::PhasePortrait);
            match q.body {
                QuestionBody::MultipleChoice { options, correct_index } => {
                    assert_eq!(options.len(), 4, "seed={seed}");
                    assert!(q.explanation.contains(&options[correct_index]));
                }
                other => panic!("unexpected body {other:?}"),
            }
        }
    }

    #[test]
    fn degenerate_node_portraits_use_jordan_blocks() {
        for seed in 0..200 {
            for kind in [EigenvalueType::RealRepeatedNegative, EigenvalueType::RealRepeatedPositive] {
                let mut rng = Mulberry32::new(seed);
                let m = portrait_matrix(kind, &mut rng);
                assert_eq!(classify_eigenvalues(&m).kind, kind);
                assert!(m.b != 0.0 || m.c != 0.0, "seed={seed} gave a star node {m:?}");
            }
        }
    }
}
