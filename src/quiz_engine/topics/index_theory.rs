//! Poincaré index of closed curves in the plane.
//!
//! Every simple closed curve avoiding equilibria has an integer index equal
//! to the sum of the indices of the equilibria it encloses: `-1` for a
//! saddle, `+1` for a node, spiral or center. A closed orbit must enclose
//! equilibria whose indices sum to `+1`.

use crate::quiz_engine::{
    error::GenerationError,
    generator::QuestionGenerator,
    helpers::{count_distractors, matching, multiple_choice, question, seeded, true_false, Statement},
    models::{Difficulty, GeneratorConfig, Question, QuestionBody, QuestionType, Topic},
    rng::{random_choice, random_int, shuffle, Mulberry32},
};

const PREFIX: &str = "IX";

pub struct IndexTheory;

#[derive(Debug, Clone, Copy)]
enum Variant {
    EnclosedIndex,
    PeriodicOrbitPossible,
    EmptyCurve,
}

const BANK: &[Statement] = &[
    Statement::any(
        "The index of a saddle point is $-1$.",
        true,
        "Going once around a saddle, the vector field turns once in the opposite direction.",
    ),
    Statement::any(
        "A stable spiral and an unstable spiral have opposite indices.",
        false,
        "Both have index $+1$; the index does not see stability.",
    ),
    Statement::any(
        "Any closed orbit in the plane must enclose at least one equilibrium.",
        true,
        "Its index is $+1$, and a curve enclosing no equilibria has index $0$.",
    ),
    Statement::any(
        "A closed orbit can enclose exactly one saddle and nothing else.",
        false,
        "The enclosed indices would sum to $-1$, but a closed orbit has index $+1$.",
    ),
];

/// Non-saddle equilibria, all of index `+1`.
const POSITIVE_KINDS: [&str; 5] = ["stable node", "unstable node", "stable spiral", "unstable spiral", "center"];
const SADDLE: &str = "saddle";

impl QuestionGenerator for IndexTheory {
    fn name(&self) -> &'static str {
        "index_theory"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::IndexTheory]
    }

    fn question_types(&self) -> &'static [QuestionType] {
        &[QuestionType::TrueFalse, QuestionType::MultipleChoice, QuestionType::Matching]
    }

    fn difficulties(&self) -> &'static [Difficulty] {
        &[Difficulty::Conceptual, Difficulty::Light, Difficulty::Moderate]
    }

    fn generate(&self, config: &GeneratorConfig) -> Result<Question, GenerationError> {
        let (mut rng, seed) = seeded(config);
        match config.question_type {
            QuestionType::TrueFalse => true_false(PREFIX, config, seed, &mut rng, BANK),
            QuestionType::MultipleChoice => {
                let variants: &[Variant] = match config.difficulty {
                    Difficulty::Conceptual => &[Variant::EmptyCurve, Variant::EnclosedIndex],
                    Difficulty::Light      => &[Variant::EnclosedIndex],
                    _ => &[Variant::EnclosedIndex, Variant::PeriodicOrbitPossible],
                };
                let variant = *random_choice(&mut rng, variants);
                let (prompt, explanation, body) = match variant {
                    Variant::EnclosedIndex         => enclosed_index(&mut rng),
                    Variant::PeriodicOrbitPossible => periodic_orbit_possible(&mut rng),
                    Variant::EmptyCurve            => empty_curve(&mut rng),
                };
                Ok(question(PREFIX, config, seed, prompt, explanation, body))
            }
            QuestionType::Matching => {
                let sums = shuffle(&mut rng, &[-1, 0, 1, 2]);
                let pairs = sums
                    .iter()
                    .map(|&sum| {
                        let saddles = random_int(&mut rng, if sum <= 0 { 1 } else { 0 }, 2, false);
                        let enclosed = Configuration::draw(&mut rng, saddles, (sum + saddles) as usize);
                        (enclosed.describe(), format!("Index {}", enclosed.index()))
                    })
                    .collect();
                Ok(question(
                    PREFIX,
                    config,
                    seed,
                    "Match each set of enclosed equilibria to the index of a closed curve around them.".to_string(),
                    "Saddles contribute $-1$ each and every other equilibrium contributes $+1$.".to_string(),
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

/// Equilibria enclosed by a curve, by kind name.
#[derive(Debug, Clone)]
struct Configuration {
    kinds: Vec<&'static str>,
}

impl Configuration {
    fn draw(rng: &mut Mulberry32, saddles: i32, others: usize) -> Self {
        let mut kinds = vec![SADDLE; saddles.max(0) as usize];
        kinds.extend((0..others).map(|_| *random_choice(rng, &POSITIVE_KINDS)));
        Configuration { kinds }
    }

    fn random(rng: &mut Mulberry32) -> Self {
        let saddles = random_int(rng, 0, 3, false);
        let others = random_int(rng, if saddles == 0 { 1 } else { 0 }, 3, false);
        Self::draw(rng, saddles, others as usize)
    }

    fn index(&self) -> i32 {
        self.kinds.iter().map(|&k| if k == SADDLE { -1 } else { 1 }).sum()
    }

    /// `2 saddles, 1 center and 1 stable node`, grouped in first-seen order.
    fn describe(&self) -> String {
        let mut groups: Vec<(&str, usize)> = Vec::new();
        for &kind in &self.kinds {
            match groups.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, n)) => *n += 1,
                None => groups.push((kind, 1)),
            }
        }
        let parts: Vec<String> = groups
            .iter()
            .map(|&(kind, n)| format!("{n} {kind}{}", if n == 1 { "" } else { "s" }))
            .collect();
        match parts.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
            Some((last, _)) => last.clone(),
            None => "no equilibria".to_string(),
        }
    }
}

fn enclosed_index(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let config = Configuration::random(rng);
    let index = config.index();
    let distractors = count_distractors(rng, index, -3, 3, 4);
    let body = multiple_choice(rng, index.to_string(), distractors, 3);
    (
        format!(
            "A simple closed curve encloses exactly {} of a planar vector field. What is its index?",
            config.describe()
        ),
        format!("The index is the sum of the enclosed indices: {index}."),
        body,
    )
}

const YES_SUMS_TO_ONE: &str = "Yes: the enclosed indices sum to $+1$";
const NO_SADDLE_INSIDE: &str = "No: a closed orbit can never enclose a saddle";
const YES_ALWAYS: &str = "Yes: index theory places no restriction on closed orbits";

fn periodic_orbit_possible(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let config = if rng.chance(0.5) {
        let saddles = random_int(rng, 0, 2, false);
        Configuration::draw(rng, saddles, saddles as usize + 1)
    } else {
        Configuration::random(rng)
    };
    let index = config.index();
    let wrong_sum = format!("No: the enclosed indices sum to {index}, not $+1$");
    let correct = if index == 1 { YES_SUMS_TO_ONE.to_string() } else { wrong_sum.clone() };
    let distractors = vec![
        YES_SUMS_TO_ONE.to_string(),
        wrong_sum,
        NO_SADDLE_INSIDE.to_string(),
        YES_ALWAYS.to_string(),
    ];
    let body = multiple_choice(rng, correct, distractors, 3);
    (
        format!(
            "Is it consistent with index theory for a closed orbit to enclose exactly {}?",
            config.describe()
        ),
        format!(
            "A closed orbit has index $+1$. These equilibria contribute {index}, so a closed orbit around them is {}.",
            if index == 1 { "not ruled out" } else { "impossible" }
        ),
        body,
    )
}

fn empty_curve(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let body = multiple_choice(rng, "0".into(), vec!["1".into(), "-1".into(), "2".into()], 3);
    (
        "What is the index of a simple closed curve that encloses no equilibria?".to_string(),
        "The vector field is nonzero on the enclosed disc, so the curve can be shrunk to a point without changing the index, which is 0.".to_string(),
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_sums_saddles_and_others() {
        let config = Configuration { kinds: vec![SADDLE, SADDLE, "center"] };
        assert_eq!(config.index(), -1);
        assert_eq!(config.describe(), "2 saddles and 1 center");
    }

    #[test]
    fn describe_lists_groups_in_order() {
        let config = Configuration { kinds: vec!["stable node", SADDLE, "center", SADDLE] };
        assert_eq!(config.describe(), "1 stable node, 2 saddles and 1 center");
    }

    #[test]
    fn random_configuration_is_never_empty() {
        for seed in 0..200 {
            let mut rng = Mulberry32::new(seed);
            assert!(!Configuration::random(&mut rng).kinds.is_empty());
        }
    }

    #[test]
    fn matching_indices_are_distinct() {
        let generator = IndexTheory;
        for seed in 0..50 {
            let config = GeneratorConfig::new(Topic::IndexTheory, Difficulty::Light, QuestionType::Matching)
                .with_seed(seed);
            let q = generator.generate(&config).unwrap();
            match q.body {
                QuestionBody::Matching { right_items, .. } => {
                    let mut sorted = right_items.clone();
                    sorted.sort();
                    sorted.dedup();
                    assert_eq!(sorted.len(), 4, "seed={seed}");
                }
                other => panic!("unexpected body {other:?}"),
            }
        }
    }
}
