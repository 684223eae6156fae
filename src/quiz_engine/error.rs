use thiserror::Error;

/// Failures signalled by the math utilities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("matrix is singular (|det| = {det:e})")]
    SingularMatrix { det: f64 },
}

/// Soft failures raised while building a question. The dispatch layer
/// logs these and retries with another generator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("no candidates left for {what}")]
    EmptyCandidates { what: &'static str },

    #[error("generator '{generator}' does not support {question_type}")]
    UnsupportedType {
        generator: &'static str,
        question_type: crate::quiz_engine::models::QuestionType,
    },

    #[error(transparent)]
    Math(#[from] MathError),
}
