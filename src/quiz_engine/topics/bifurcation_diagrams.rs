//! Read a bifurcation diagram: name the bifurcation or pick its normal form.

use crate::quiz_engine::{
    error::GenerationError,
    format::format_normal_form,
    generator::QuestionGenerator,
    helpers::{math, multiple_choice, question, seeded},
    models::{BifurcationType, Diagram, Difficulty, GeneratorConfig, Question, QuestionType, Topic},
    rng::random_choice,
    topics::bifurcations::signature,
};

const PREFIX: &str = "BD";

pub struct BifurcationDiagram;

#[derive(Debug, Clone, Copy)]
enum Variant {
    Name,
    NormalForm,
}

const HOPF: [BifurcationType; 2] = [BifurcationType::SupercriticalHopf, BifurcationType::SubcriticalHopf];

impl QuestionGenerator for BifurcationDiagram {
    fn name(&self) -> &'static str {
        "bifurcation_diagram"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::Bifurcations, Topic::HopfBifurcation]
    }

    fn question_types(&self) -> &'static [QuestionType] {
        &[QuestionType::MultipleChoice]
    }

    fn difficulties(&self) -> &'static [Difficulty] {
        &[Difficulty::Conceptual, Difficulty::Light]
    }

    fn produces_diagrams(&self) -> bool {
        true
    }

    fn generate(&self, config: &GeneratorConfig) -> Result<Question, GenerationError> {
        if config.question_type != QuestionType::MultipleChoice {
            return Err(GenerationError::UnsupportedType {
                generator: self.name(),
                question_type: config.question_type,
            });
        }
        let (mut rng, seed) = seeded(config);
        let family: &[BifurcationType] = match config.topic {
            Topic::HopfBifurcation => &HOPF,
            _ => &BifurcationType::ONE_DIMENSIONAL,
        };
        let variants: &[Variant] = match config.difficulty {
            Difficulty::Conceptual => &[Variant::Name],
            _ => &[Variant::Name, Variant::NormalForm],
        };
        let variant = *random_choice(&mut rng, variants);
        let kind = *random_choice(&mut rng, family);

        let (prompt, body) = match variant {
            Variant::Name => (
                "Which bifurcation does the diagram show?".to_string(),
                multiple_choice(&mut rng, kind.to_string(), distractors(kind, |k| k.to_string()), 3),
            ),
            Variant::NormalForm => (
                "Which normal form produces the bifurcation diagram shown?".to_string(),
                multiple_choice(
                    &mut rng,
                    math(format_normal_form(kind)),
                    distractors(kind, |k| math(format_normal_form(k))),
                    3,
                ),
            ),
        };
        let explanation = format!(
            "The diagram is a {} bifurcation: {}. Its normal form is {}.",
            kind.to_string().to_lowercase(),
            signature(kind),
            math(format_normal_form(kind))
        );
        Ok(question(PREFIX, config, seed, prompt, explanation, body).with_diagram(Diagram::bifurcation(kind)))
    }
}

/// The other members of `kind`'s family first, then the closest relatives
/// from the other family so two-member families still get three wrong options.
fn distractors(kind: BifurcationType, render: impl Fn(BifurcationType) -> String) -> Vec<String> {
    let (own, other): (&[BifurcationType], &[BifurcationType]) = if HOPF.contains(&kind) {
        (&HOPF, &[BifurcationType::SupercriticalPitchfork, BifurcationType::SubcriticalPitchfork])
    } else {
        (&BifurcationType::ONE_DIMENSIONAL, &HOPF)
    };
    own.iter()
        .chain(other)
        .filter(|&&k| k != kind)
        .map(|&k| render(k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz_engine::models::{DiagramKind, QuestionBody};

    #[test]
    fn hopf_topic_draws_hopf_diagrams() {
        for seed in 0..50 {
            let config = GeneratorConfig::new(Topic::HopfBifurcation, Difficulty::Light, QuestionType::MultipleChoice)
                .with_seed(seed);
            let q = BifurcationDiagram.generate(&config).unwrap();
            let diagram = q.diagram.expect("diagram attached");
            assert_eq!(diagram.kind, DiagramKind::Bifurcation);
            assert!(HOPF.contains(&diagram.bifurcation_type.unwrap()));
            match q.body {
                QuestionBody::MultipleChoice { options, .. } => assert_eq!(options.len(), 4),
                other => panic!("unexpected body {other:?}"),
            }
        }
    }

    #[test]
    fn distractors_exclude_the_answer() {
        let names = distractors(BifurcationType::SaddleNode, |k| k.to_string());
        assert_eq!(names.len(), 5);
        assert!(!names.contains(&"Saddle-node".to_string()));
    }
}
