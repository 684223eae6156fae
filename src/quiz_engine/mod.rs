//! Core quiz engine: seeded generation, symbolic math, and dispatch.
//!
//! ## Module overview
//!
//! | Module       | Purpose |
//! |--------------|---------|
//! | `models`     | Shared types: topics, difficulties, questions, diagrams, request filters |
//! | `error`      | `MathError` and `GenerationError` |
//! | `rng`        | Mulberry32 stream and the sampling helpers built on it |
//! | `polynomial` | Multi-start Newton root finding and 1-D stability |
//! | `matrix`     | 2×2 eigenvalue classification and inverse construction |
//! | `format`     | LaTeX-flavoured rendering of numbers, polynomials, matrices |
//! | `helpers`    | Shared builder functions that remove boilerplate across topics |
//! | `generator`  | `QuestionGenerator` trait and the static registry |
//! | `pool`       | Pre-authored conceptual true/false statements |
//! | `dispatch`   | `DispatchSession`: filter resolution, recency weighting, fallback |
//! | `topics`     | 12 generators, one per template |

pub mod dispatch;
pub mod error;
pub mod format;
pub mod generator;
pub mod helpers;
pub mod matrix;
pub mod models;
pub mod polynomial;
pub mod pool;
pub mod rng;
pub mod topics;

// Re-export the public API surface so callers can use
// `quiz_engine::DispatchSession` without reaching into sub-modules.
pub use dispatch::{available_topics, difficulties_for, types_for, DispatchSession, DispatchSettings};
pub use error::{GenerationError, MathError};
pub use generator::{can_generate, find_generator, registry, QuestionGenerator};
pub use models::{
    BifurcationType, Diagram, DiagramKind, Difficulty, GenerateOptions, GeneratorConfig,
    PortraitType, Question, QuestionBody, QuestionType, Topic,
};
