//! Shared builder functions used by every topic generator.
//!
//! Generators assemble the same pieces: seed an RNG, pick a statement from
//! a bank, shuffle options while tracking the correct index, shuffle a
//! matching column while tracking the mapping, and mint an id. These
//! helpers centralise that so topic files focus on the mathematics.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::RngCore;

use crate::quiz_engine::{
    error::GenerationError,
    models::{GeneratorConfig, Question, QuestionBody, Topic},
    rng::{fresh_seed, random_choice, random_distinct_ints, shuffle, Mulberry32},
};

static NEXT_QUESTION: AtomicU64 = AtomicU64::new(1);

/// Fresh id, unique for the life of the process.
pub fn next_question_id(prefix: &str) -> String {
    let serial = NEXT_QUESTION.fetch_add(1, Ordering::Relaxed);
    format!("{}-{:08X}-{}", prefix, rand::thread_rng().next_u32(), serial)
}

/// Seed an RNG from the config, minting a seed when none was supplied.
pub fn seeded(config: &GeneratorConfig) -> (Mulberry32, i32) {
    let seed = config.seed.unwrap_or_else(fresh_seed);
    (Mulberry32::new(seed), seed)
}

/// Assemble the final [`Question`]. Last call in every generator.
pub fn question(
    prefix: &str,
    config: &GeneratorConfig,
    seed: i32,
    prompt: String,
    explanation: String,
    body: QuestionBody,
) -> Question {
    Question {
        id: next_question_id(prefix),
        topic: config.topic,
        difficulty: config.difficulty,
        prompt,
        explanation,
        seed: Some(seed),
        diagram: None,
        body,
    }
}

// ---------------------------------------------------------------------------
// True / false banks
// ---------------------------------------------------------------------------

/// One hard-coded true/false statement. `topic: None` fits every topic the
/// owning generator serves.
#[derive(Debug, Clone, Copy)]
pub struct Statement {
    pub topic: Option<Topic>,
    pub text: &'static str,
    pub answer: bool,
    pub explanation: &'static str,
}

impl Statement {
    pub const fn any(text: &'static str, answer: bool, explanation: &'static str) -> Self {
        Statement { topic: None, text, answer, explanation }
    }

    pub const fn on(topic: Topic, text: &'static str, answer: bool, explanation: &'static str) -> Self {
        Statement { topic: Some(topic), text, answer, explanation }
    }
}

/// Pick a statement for `config.topic` and wrap it as a true/false question.
pub fn true_false(
    prefix: &str,
    config: &GeneratorConfig,
    seed: i32,
    rng: &mut Mulberry32,
    bank: &[Statement],
) -> Result<Question, GenerationError> {
    let eligible: Vec<&Statement> = bank
        .iter()
        .filter(|s| s.topic.map_or(true, |t| t == config.topic))
        .collect();
    if eligible.is_empty() {
        return Err(GenerationError::EmptyCandidates { what: "true/false statements" });
    }
    let statement = *random_choice(rng, &eligible);
    Ok(question(
        prefix,
        config,
        seed,
        format!("True or false: {}", statement.text),
        statement.explanation.to_string(),
        QuestionBody::TrueFalse { answer: statement.answer },
    ))
}

// ---------------------------------------------------------------------------
// Multiple choice
// ---------------------------------------------------------------------------

/// Shuffle the correct option in among up to `max_distractors` distractors.
///
/// Distractors equal to the correct option or to each other are dropped
/// first. The correct option is always present in the result.
pub fn multiple_choice(
    rng: &mut Mulberry32,
    correct: String,
    distractors: Vec<String>,
    max_distractors: usize,
) -> QuestionBody {
    let mut options: Vec<String> = Vec::with_capacity(max_distractors + 1);
    for d in distractors {
        if options.len() == max_distractors {
            break;
        }
        if d != correct && !options.contains(&d) {
            options.push(d);
        }
    }
    options.push(correct.clone());

    let mut options = shuffle(rng, &options);
    let correct_index = match options.iter().position(|o| *o == correct) {
        Some(idx) => idx,
        None => {
            options.insert(0, correct);
            0
        }
    };
    QuestionBody::MultipleChoice { options, correct_index }
}

/// Up to `count` integers near `correct` (within `spread`), never equal to it.
pub fn numeric_distractors(rng: &mut Mulberry32, correct: i32, spread: i32, count: usize) -> Vec<i32> {
    random_distinct_ints(rng, correct - spread, correct + spread, count + 1)
        .into_iter()
        .filter(|&v| v != correct)
        .take(count)
        .collect()
}

/// Integer options in `[lo, hi]` other than `correct`, for counting questions.
pub fn count_distractors(rng: &mut Mulberry32, correct: i32, lo: i32, hi: i32, count: usize) -> Vec<String> {
    random_distinct_ints(rng, lo, hi, count + 1)
        .into_iter()
        .filter(|&v| v != correct)
        .take(count)
        .map(|v| v.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Keep the left column in order and shuffle the right column, recording
/// where each left item's partner landed.
pub fn matching(rng: &mut Mulberry32, pairs: Vec<(String, String)>) -> QuestionBody {
    let indices: Vec<usize> = (0..pairs.len()).collect();
    let order = shuffle(rng, &indices);

    let mut correct_mapping = vec![0; pairs.len()];
    for (slot, &original) in order.iter().enumerate() {
        correct_mapping[original] = slot;
    }
    let right_items = order.iter().map(|&i| pairs[i].1.clone()).collect();
    let left_items = pairs.into_iter().map(|(l, _)| l).collect();

    QuestionBody::Matching { left_items, right_items, correct_mapping }
}

/// `$...$` inline math.
pub fn math(s: impl AsRef<str>) -> String {
    format!("${}$", s.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_choice_contains_correct_once() {
        for seed in 0..200 {
            let mut rng = Mulberry32::new(seed);
            let body = multiple_choice(
                &mut rng,
                "4".into(),
                vec!["4".into(), "3".into(), "3".into(), "5".into(), "6".into()],
                3,
            );
            match body {
                QuestionBody::MultipleChoice { options, correct_index } => {
                    assert_eq!(options[correct_index], "4");
                    assert_eq!(options.iter().filter(|o| *o == "4").count(), 1);
                    assert_eq!(options.len(), 4);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn matching_mapping_points_at_partners() {
        let pairs: Vec<(String, String)> = (0..5).map(|i| (format!("L{i}"), format!("R{i}"))).collect();
        for seed in 0..100 {
            let mut rng = Mulberry32::new(seed);
            match matching(&mut rng, pairs.clone()) {
                QuestionBody::Matching { left_items, right_items, correct_mapping } => {
                    for (i, left) in left_items.iter().enumerate() {
                        let right = &right_items[correct_mapping[i]];
                        assert_eq!(&left[1..], &right[1..]);
                    }
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn numeric_distractors_exclude_correct() {
        let mut rng = Mulberry32::new(3);
        for _ in 0..100 {
            let ds = numeric_distractors(&mut rng, 7, 3, 3);
            assert_eq!(ds.len(), 3);
            assert!(!ds.contains(&7));
        }
    }

    #[test]
    fn ids_are_unique() {
        let a = next_question_id("T");
        let b = next_question_id("T");
        assert_ne!(a, b);
        assert!(a.starts_with("T-"));
    }
}
