//! The four one-dimensional normal forms and their equilibria at a fixed
//! parameter value.

use crate::quiz_engine::{
    error::GenerationError,
    format::{format_normal_form, format_number, format_ode},
    generator::QuestionGenerator,
    helpers::{count_distractors, math, matching, multiple_choice, question, seeded, true_false, Statement},
    models::{BifurcationType, Difficulty, GeneratorConfig, Question, QuestionBody, QuestionType, Topic},
    polynomial::{analyze_stability_1d, find_roots, Polynomial, Stability1D, Term},
    rng::{random_choice, random_int, shuffle, Mulberry32},
};

const PREFIX: &str = "BF";

pub struct Bifurcations;

#[derive(Debug, Clone, Copy)]
enum Variant {
    IdentifyType,
    CountEquilibria,
    StabilityAt,
}

const BANK: &[Statement] = &[
    Statement::any(
        "In a saddle-node bifurcation two equilibria collide and annihilate.",
        true,
        "For $\\dot{x} = r + x^2$ the equilibria $\\pm\\sqrt{-r}$ merge at $r = 0$ and disappear for $r > 0$.",
    ),
    Statement::any(
        "In a transcritical bifurcation the two equilibria exchange stability.",
        true,
        "For $\\dot{x} = rx - x^2$ the equilibria $0$ and $r$ pass through each other at $r = 0$ and swap stability.",
    ),
    Statement::any(
        "A supercritical pitchfork creates a pair of unstable equilibria.",
        false,
        "In $\\dot{x} = rx - x^3$ the new equilibria $\\pm\\sqrt{r}$ are stable; the subcritical case creates unstable ones.",
    ),
    Statement::any(
        "Pitchfork bifurcations typically arise in systems with a reflection symmetry $x \\mapsto -x$.",
        true,
        "The normal form $rx \\mp x^3$ is odd in $x$, so equilibria appear in symmetric pairs.",
    ),
    Statement::any(
        "At a bifurcation point of $\\dot{x} = f(x, r)$ the equilibrium satisfies $\\partial f / \\partial x = 0$.",
        true,
        "A nonzero derivative would let the implicit function theorem continue the equilibrium smoothly in $r$.",
    ),
];

impl QuestionGenerator for Bifurcations {
    fn name(&self) -> &'static str {
        "bifurcations"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::Bifurcations]
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
                    Difficulty::Light => &[Variant::IdentifyType, Variant::CountEquilibria],
                    _ => &[Variant::IdentifyType, Variant::CountEquilibria, Variant::StabilityAt],
                };
                let variant = *random_choice(&mut rng, variants);
                let kind = *random_choice(&mut rng, &BifurcationType::ONE_DIMENSIONAL);
                let (prompt, explanation, body) = match variant {
                    Variant::IdentifyType    => identify_type(&mut rng, kind),
                    Variant::CountEquilibria => count_equilibria(&mut rng, kind),
                    Variant::StabilityAt     => stability_at(&mut rng, kind)?,
                };
                Ok(question(PREFIX, config, seed, prompt, explanation, body))
            }
            QuestionType::Matching => {
                let pairs = BifurcationType::ONE_DIMENSIONAL
                    .iter()
                    .map(|&k| (math(format_normal_form(k)), k.to_string()))
                    .collect();
                Ok(question(
                    PREFIX,
                    config,
                    seed,
                    "Match each normal form to the bifurcation it undergoes at $r = 0$.".to_string(),
                    BifurcationType::ONE_DIMENSIONAL
                        .iter()
                        .map(|&k| format!("{}: {}", math(format_normal_form(k)), signature(k)))
                        .collect::<Vec<_>>()
                        .join("; "),
                    matching(&mut rng, pairs),
                ))
            }
            other => Err(GenerationError::UnsupportedType {
                generator: self.name(),
                question_type: other,
            }),
        }
    }
}

/// Right-hand side of the normal form at parameter value `r`.
pub fn normal_form(kind: BifurcationType, r: f64) -> Polynomial {
    let terms = match kind {
        BifurcationType::SaddleNode             => vec![Term::new(1.0, 2), Term::new(r, 0)],
        BifurcationType::Transcritical          => vec![Term::new(-1.0, 2), Term::new(r, 1)],
        BifurcationType::SupercriticalPitchfork => vec![Term::new(-1.0, 3), Term::new(r, 1)],
        BifurcationType::SubcriticalPitchfork   => vec![Term::new(1.0, 3), Term::new(r, 1)],
        // Radial Hopf normal forms share the pitchfork's shape in r.
        BifurcationType::SupercriticalHopf      => vec![Term::new(-1.0, 3), Term::new(r, 1)],
        BifurcationType::SubcriticalHopf        => vec![Term::new(1.0, 3), Term::new(r, 1)],
    };
    Polynomial::new(terms)
}

/// One-line description of what happens at the bifurcation.
pub fn signature(kind: BifurcationType) -> &'static str {
    match kind {
        BifurcationType::SaddleNode             => "two equilibria collide and vanish",
        BifurcationType::Transcritical          => "two equilibria cross and exchange stability",
        BifurcationType::SupercriticalPitchfork => "a stable equilibrium splits into two stable equilibria around an unstable one",
        BifurcationType::SubcriticalPitchfork   => "two unstable equilibria merge into a stable one, which loses stability",
        BifurcationType::SupercriticalHopf      => "a stable limit cycle grows out of a focus that loses stability",
        BifurcationType::SubcriticalHopf        => "an unstable limit cycle shrinks onto a stable focus, which then loses stability",
    }
}

/// A nonzero `r` that gives integer equilibria: `±k²` for the square-root
/// families, `±k` for the transcritical one. With `need_equilibria` the
/// saddle-node parameter is kept negative.
fn draw_parameter(rng: &mut Mulberry32, kind: BifurcationType, need_equilibria: bool) -> i32 {
    let k = random_int(rng, 1, 3, false);
    let positive = rng.chance(0.5);
    match kind {
        BifurcationType::Transcritical => if positive { k } else { -k },
        BifurcationType::SaddleNode if need_equilibria => -k * k,
        _ => if positive { k * k } else { -k * k },
    }
}

fn at_parameter(kind: BifurcationType, r: i32) -> String {
    math(format!(
        "{} \\text{{ with }} r = {}",
        format_ode(&normal_form(kind, r as f64), "x"),
        r
    ))
}

fn identify_type(rng: &mut Mulberry32, kind: BifurcationType) -> (String, String, QuestionBody) {
    let others: Vec<String> = shuffle(rng, &BifurcationType::ONE_DIMENSIONAL)
        .into_iter()
        .filter(|k| *k != kind)
        .map(|k| k.to_string())
        .collect();
    let body = multiple_choice(rng, kind.to_string(), others, 3);
    (
        format!(
            "Which bifurcation does {} undergo at $r = 0$?",
            math(format_normal_form(kind))
        ),
        format!("This is the {} normal form: {}.", kind.to_string().to_lowercase(), signature(kind)),
        body,
    )
}

fn count_equilibria(rng: &mut Mulberry32, kind: BifurcationType) -> (String, String, QuestionBody) {
    let r = draw_parameter(rng, kind, false);
    let roots = find_roots(&normal_form(kind, r as f64));
    let count = roots.len() as i32;
    let distractors = count_distractors(rng, count, 0, 3, 3);
    let body = multiple_choice(rng, count.to_string(), distractors, 3);
    let listed = if roots.is_empty() {
        "there are no real solutions".to_string()
    } else {
        let xs: Vec<String> = roots.iter().map(|&x| format_number(x)).collect();
        format!("the solutions are $x^* = {}$", xs.join(", "))
    };
    (
        format!("How many equilibria does {} have?", at_parameter(kind, r)),
        format!("Setting the right-hand side to zero, {listed}."),
        body,
    )
}

fn stability_at(rng: &mut Mulberry32, kind: BifurcationType) -> Result<(String, String, QuestionBody), GenerationError> {
    let r = draw_parameter(rng, kind, true);
    let f = normal_form(kind, r as f64);
    let roots = find_roots(&f);
    if roots.is_empty() {
        return Err(GenerationError::EmptyCandidates { what: "bifurcation equilibria" });
    }
    let x0 = *random_choice(rng, &roots);
    let verdict = analyze_stability_1d(&f, x0);
    let label = |s: Stability1D| match s {
        Stability1D::Stable     => "Stable",
        Stability1D::Unstable   => "Unstable",
        Stability1D::Semistable => "Semistable",
    };
    let options = vec![
        label(Stability1D::Stable).to_string(),
        label(Stability1D::Unstable).to_string(),
        label(Stability1D::Semistable).to_string(),
    ];
    let body = multiple_choice(rng, label(verdict).to_string(), options, 2);
    Ok((
        format!(
            "For {}, what is the stability of the equilibrium $x^* = {}$?",
            at_parameter(kind, r),
            format_number(x0)
        ),
        format!(
            "The derivative of the right-hand side at $x^* = {}$ decides: the equilibrium is {}.",
            format_number(x0),
            verdict
        ),
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equilibria_counts_follow_the_normal_forms() {
        let count = |k, r: f64| find_roots(&normal_form(k, r)).len();
        assert_eq!(count(BifurcationType::SaddleNode, -4.0), 2);
        assert_eq!(count(BifurcationType::SaddleNode, 4.0), 0);
        assert_eq!(count(BifurcationType::Transcritical, 2.0), 2);
        assert_eq!(count(BifurcationType::SupercriticalPitchfork, 9.0), 3);
        assert_eq!(count(BifurcationType::SupercriticalPitchfork, -9.0), 1);
        assert_eq!(count(BifurcationType::SubcriticalPitchfork, -1.0), 3);
    }

    #[test]
    fn supercritical_branches_are_stable() {
        let f = normal_form(BifurcationType::SupercriticalPitchfork, 4.0);
        assert_eq!(analyze_stability_1d(&f, 2.0), Stability1D::Stable);
        assert_eq!(analyze_stability_1d(&f, -2.0), Stability1D::Stable);
        assert_eq!(analyze_stability_1d(&f, 0.0), Stability1D::Unstable);
    }

    #[test]
    fn saddle_node_parameter_keeps_equilibria_when_asked() {
        for seed in 0..100 {
            let mut rng = Mulberry32::new(seed);
            assert!(draw_parameter(&mut rng, BifurcationType::SaddleNode, true) < 0);
        }
    }
}
