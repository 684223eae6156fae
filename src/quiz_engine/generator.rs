use crate::quiz_engine::{
    error::GenerationError,
    models::{Difficulty, GeneratorConfig, Question, QuestionType, Topic},
    topics,
};

/// A stateless question template. All randomness flows through the RNG
/// seeded from `config.seed`.
///
/// `generate` does not re-check capability; gate calls through
/// [`can_generate`] or the dispatch layer.
pub trait QuestionGenerator: Sync {
    /// Stable identifier, used for recency tracking.
    fn name(&self) -> &'static str;
    fn topics(&self) -> &'static [Topic];
    fn question_types(&self) -> &'static [QuestionType];
    fn difficulties(&self) -> &'static [Difficulty];
    /// Whether every question this generator emits carries a diagram.
    fn produces_diagrams(&self) -> bool {
        false
    }
    fn generate(&self, config: &GeneratorConfig) -> Result<Question, GenerationError>;
}

/// Pure intersection test against the three declared sets.
pub fn can_generate(generator: &dyn QuestionGenerator, config: &GeneratorConfig) -> bool {
    generator.topics().contains(&config.topic)
        && generator.question_types().contains(&config.question_type)
        && generator.difficulties().contains(&config.difficulty)
}

static REGISTRY: [&dyn QuestionGenerator; 12] = [
    &topics::one_dimensional::OneDimensionalStability,
    &topics::linear_systems::LinearSystems,
    &topics::linearization::Linearization,
    &topics::bifurcations::Bifurcations,
    &topics::hopf::HopfBifurcation,
    &topics::center_manifold::CenterManifold,
    &topics::invariant_manifolds::InvariantManifolds,
    &topics::index_theory::IndexTheory,
    &topics::lyapunov::Lyapunov,
    &topics::hamiltonian::Hamiltonian,
    &topics::phase_portraits::PhasePortraitMatching,
    &topics::bifurcation_diagrams::BifurcationDiagram,
];

/// Every registered generator, in a fixed order.
pub fn registry() -> &'static [&'static dyn QuestionGenerator] {
    &REGISTRY
}

/// Look a generator up by [`QuestionGenerator::name`].
pub fn find_generator(name: &str) -> Option<&'static dyn QuestionGenerator> {
    REGISTRY.iter().copied().find(|g| g.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = registry().iter().map(|g| g.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), registry().len());
    }

    #[test]
    fn can_generate_intersects_all_three_sets() {
        let g = find_generator("one_dimensional_stability").expect("registered");
        let ok = GeneratorConfig::new(Topic::OneDimensionalFlows, Difficulty::Light, QuestionType::MultipleChoice);
        assert!(can_generate(g, &ok));
        let wrong_topic = GeneratorConfig { topic: Topic::IndexTheory, ..ok };
        assert!(!can_generate(g, &wrong_topic));
        let wrong_type = GeneratorConfig { question_type: QuestionType::Classification, ..ok };
        assert!(!can_generate(g, &wrong_type));
        let wrong_level = GeneratorConfig { difficulty: Difficulty::Heavy, ..ok };
        assert!(!can_generate(g, &wrong_level));
    }

    #[test]
    fn no_generator_declares_classification() {
        for g in registry() {
            assert!(!g.question_types().contains(&QuestionType::Classification), "{}", g.name());
        }
    }
}
