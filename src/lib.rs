//! # dynamics_quiz_gen
//!
//! A fully offline, deterministic quiz generator for a course on nonlinear
//! dynamical systems.
//!
//! Questions are built from small symbolic computations (polynomial roots
//! and their stability, 2×2 eigenvalue classification, normal forms) so the
//! answer key is always computed, never hand-written. Thirteen topics are
//! covered, from one-dimensional flows to Hamiltonian systems, in
//! true/false, multiple-choice and matching formats.
//!
//! ## How it works
//!
//! 1. Create a [`DispatchSession`] per learner.
//! 2. Describe what you want with [`GenerateOptions`]: topics, difficulties,
//!    question types, diagram-only, and an optional seed. Unset filters mean
//!    "anything".
//! 3. Call [`DispatchSession::generate_question`]. The session picks a
//!    capable generator (avoiding the ones it used recently), seeds it, and
//!    remembers what it served so it does not repeat itself. Occasionally it
//!    serves a pre-authored conceptual statement instead.
//!
//! ## Key features
//!
//! - **Deterministic**: the same options with the same `seed` give the same
//!   question from a fresh session, up to its freshly minted id.
//! - **Self-checking**: multiple-choice keys point at the correct option
//!   after shuffling; matching keys are permutations.
//! - **Diagram descriptors**: phase-portrait and bifurcation questions carry
//!   a [`Diagram`] naming what a front end should draw.
//!
//! ## Quick start
//!
//! ```rust
//! use dynamics_quiz_gen::{
//!     DispatchSession, Difficulty, GenerateOptions, QuestionBody, QuestionType, Topic,
//! };
//!
//! let mut session = DispatchSession::new();
//!
//! // Anything at all:
//! let q = session.generate_question(&GenerateOptions::new()).expect("unfiltered requests always succeed");
//! println!("{}: {}", q.topic, q.prompt);
//!
//! // Reproducible, filtered:
//! let options = GenerateOptions::new()
//!     .with_topics([Topic::LinearSystems])
//!     .with_difficulties([Difficulty::Moderate])
//!     .with_types([QuestionType::MultipleChoice])
//!     .with_seed(42);
//! let q = session.generate_question(&options).expect("linear systems support moderate MC");
//! if let QuestionBody::MultipleChoice { options, correct_index } = &q.body {
//!     for (i, text) in options.iter().enumerate() {
//!         let mark = if i == *correct_index { "+" } else { " " };
//!         println!("[{mark}] {text}");
//!     }
//! }
//! ```

pub mod quiz_engine;

// Convenience re-exports so callers can use `dynamics_quiz_gen::DispatchSession`
// directly without reaching into `quiz_engine::`.
pub use quiz_engine::{
    available_topics, difficulties_for, types_for, BifurcationType, Diagram, DiagramKind,
    Difficulty, DispatchSession, DispatchSettings, GenerateOptions, GenerationError,
    GeneratorConfig, MathError, PortraitType, Question, QuestionBody, QuestionType,
    QuestionGenerator, Topic,
};

#[cfg(test)]
mod tests;
