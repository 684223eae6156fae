//! Cross-generator tests for the `dynamics_quiz_gen` crate.
//!
//! Included from `lib.rs` under `#[cfg(test)]`.
//!
//! # Coverage
//!
//! | Group | What is tested |
//! |-------|----------------|
//! | Answer keys | Every generator × every declared (topic, difficulty, type) × 100 seeds yields a valid key with at least three distinct options |
//! | Echo | Generated questions report the requested topic, difficulty and type |
//! | Diagrams | Diagram generators always attach a descriptor of the right kind |
//! | Determinism | Same seed → same question (up to id) for generators and for fresh sessions |
//! | Repetition | No id repeats within a session; recency list tracks the last generators |
//! | Pool | Pool-only filters never exhaust; repeats appear once the topic's entries are used |
//! | Exhaustion | Classification-only and impossible diagram filters return `None` |
//! | Introspection | Topic, difficulty and type enumeration |
//! | Serialization | JSON shape of bodies and diagrams |

use std::collections::HashSet;

use serde_json::Value;

use crate::quiz_engine::{
    available_topics, difficulties_for, registry, types_for, DiagramKind, Difficulty,
    DispatchSession, GenerateOptions, GeneratorConfig, Question, QuestionBody, QuestionGenerator,
    QuestionType, Topic,
};

// ── helpers ──────────────────────────────────────────────────────────────────

/// Every (generator, config) pair the generator declares it can build.
fn declared_configs() -> Vec<(&'static dyn QuestionGenerator, GeneratorConfig)> {
    let mut out = Vec::new();
    for &generator in registry() {
        for &topic in generator.topics() {
            for &difficulty in generator.difficulties() {
                for &question_type in generator.question_types() {
                    out.push((generator, GeneratorConfig::new(topic, difficulty, question_type)));
                }
            }
        }
    }
    out
}

/// JSON form of a question with the freshly minted id removed.
fn without_id(q: &Question) -> Value {
    let mut value = serde_json::to_value(q).expect("questions serialize");
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    value
}

const SEEDS: [i32; 5] = [1, 42, 999, -7, 0x5EED];

// ── answer keys ──────────────────────────────────────────────────────────────

#[test]
fn every_declared_triple_yields_a_valid_answer_key() {
    for (generator, config) in declared_configs() {
        for seed in 0..100 {
            let config = config.with_seed(seed);
            let q = generator
                .generate(&config)
                .unwrap_or_else(|e| panic!("{} failed on {config:?}: {e}", generator.name()));
            assert!(q.has_valid_answer_key(), "{} {config:?}: {q:?}", generator.name());
            assert!(!q.prompt.is_empty(), "{} {config:?}: empty prompt", generator.name());
            assert!(!q.explanation.is_empty(), "{} {config:?}: empty explanation", generator.name());

            match &q.body {
                QuestionBody::TrueFalse { .. } => {}
                QuestionBody::MultipleChoice { options, .. } => {
                    // Three-way verdicts (stable / neutral / unstable) are the only
                    // questions that stop short of four options.
                    assert!(options.len() >= 3, "{} {config:?}: {options:?}", generator.name());
                    let distinct: HashSet<&String> = options.iter().collect();
                    assert_eq!(distinct.len(), options.len(), "{} {config:?}: duplicate options", generator.name());
                }
                QuestionBody::Matching { left_items, right_items, .. } => {
                    assert_eq!(left_items.len(), right_items.len(), "{} {config:?}", generator.name());
                    let distinct: HashSet<&String> = right_items.iter().collect();
                    assert_eq!(distinct.len(), right_items.len(), "{} {config:?}: duplicate answers", generator.name());
                }
            }
        }
    }
}

#[test]
fn questions_echo_the_requested_triple() {
    for (generator, config) in declared_configs() {
        for seed in SEEDS {
            let q = generator.generate(&config.with_seed(seed)).expect("declared triple");
            assert_eq!(q.topic, config.topic, "{}", generator.name());
            assert_eq!(q.difficulty, config.difficulty, "{}", generator.name());
            assert_eq!(q.question_type(), config.question_type, "{}", generator.name());
            assert_eq!(q.seed, Some(seed));
        }
    }
}

#[test]
fn undeclared_types_are_rejected() {
    for generator in registry() {
        let topic = generator.topics()[0];
        let difficulty = generator.difficulties()[0];
        let config = GeneratorConfig::new(topic, difficulty, QuestionType::Classification).with_seed(3);
        assert!(generator.generate(&config).is_err(), "{}", generator.name());
    }
}

// ── diagrams ─────────────────────────────────────────────────────────────────

#[test]
fn diagram_generators_always_attach_a_descriptor() {
    for (generator, config) in declared_configs() {
        for seed in SEEDS {
            let q = generator.generate(&config.with_seed(seed)).expect("declared triple");
            if !generator.produces_diagrams() {
                assert!(q.diagram.is_none(), "{}", generator.name());
                continue;
            }
            let diagram = q.diagram.unwrap_or_else(|| panic!("{} lost its diagram", generator.name()));
            match diagram.kind {
                DiagramKind::PhasePortrait => {
                    assert!(diagram.portrait_type.is_some());
                    assert!(diagram.bifurcation_type.is_none());
                }
                DiagramKind::Bifurcation => {
                    assert!(diagram.bifurcation_type.is_some());
                    assert!(diagram.portrait_type.is_none());
                }
            }
        }
    }
}

#[test]
fn diagrams_only_requests_always_carry_diagrams() {
    let mut session = DispatchSession::new();
    let options = GenerateOptions::new().diagrams_only(true);
    for _ in 0..50 {
        let q = session.generate_question(&options).expect("diagram generators exist");
        assert!(q.diagram.is_some(), "{q:?}");
    }
}

// ── determinism ──────────────────────────────────────────────────────────────

#[test]
fn same_seed_produces_identical_question() {
    for (generator, config) in declared_configs() {
        let a = generator.generate(&config.with_seed(12345)).expect("declared triple");
        let b = generator.generate(&config.with_seed(12345)).expect("declared triple");
        assert_ne!(a.id, b.id, "ids are minted fresh");
        assert_eq!(without_id(&a), without_id(&b), "{} {config:?}", generator.name());
    }
}

#[test]
fn fresh_sessions_with_same_seed_agree() {
    let filters = [
        GenerateOptions::new(),
        GenerateOptions::new().with_topics([Topic::LinearSystems, Topic::Bifurcations]),
        GenerateOptions::new().with_types([QuestionType::TrueFalse]).with_difficulties([Difficulty::Conceptual]),
        GenerateOptions::new().diagrams_only(true),
    ];
    for options in filters {
        for seed in SEEDS {
            let options = options.clone().with_seed(seed);
            let a = DispatchSession::new().generate_question(&options).expect("producible");
            let b = DispatchSession::new().generate_question(&options).expect("producible");
            assert_eq!(without_id(&a), without_id(&b), "{options:?}");
        }
    }
}

#[test]
fn different_seeds_vary_the_output() {
    let config = GeneratorConfig::new(Topic::LinearSystems, Difficulty::Moderate, QuestionType::MultipleChoice);
    let generator = crate::quiz_engine::find_generator("linear_systems").expect("registered");
    let prompts: HashSet<String> = (0..20)
        .map(|seed| generator.generate(&config.with_seed(seed)).expect("declared").prompt)
        .collect();
    assert!(prompts.len() > 1);
}

// ── repetition ───────────────────────────────────────────────────────────────

#[test]
fn session_never_repeats_an_id() {
    let mut session = DispatchSession::new();
    let mut seen = HashSet::new();
    for _ in 0..50 {
        let q = session.generate_question(&GenerateOptions::new()).expect("unfiltered");
        assert!(seen.insert(q.id.clone()), "repeated id {}", q.id);
    }
}

#[test]
fn recency_list_records_the_serving_generator() {
    let mut session = DispatchSession::new();
    let options = GenerateOptions::new()
        .with_topics([Topic::HamiltonianSystems])
        .with_types([QuestionType::MultipleChoice])
        .with_seed(8);
    session.generate_question(&options).expect("hamiltonian supports MC");
    assert_eq!(session.recent_generators().next(), Some("hamiltonian"));
}

// ── pool ─────────────────────────────────────────────────────────────────────

#[test]
fn pool_only_topic_recovers_from_exhaustion() {
    let mut session = DispatchSession::new();
    let options = GenerateOptions::new()
        .with_topics([Topic::LimitCycles])
        .with_types([QuestionType::TrueFalse])
        .with_difficulties([Difficulty::Conceptual]);
    let mut prompts = Vec::new();
    for _ in 0..20 {
        let q = session.generate_question(&options).expect("pool never runs dry");
        assert!(q.id.starts_with("POOL-"));
        assert_eq!(q.topic, Topic::LimitCycles);
        prompts.push(q.prompt);
    }
    let distinct: HashSet<&String> = prompts.iter().collect();
    assert!(distinct.len() < prompts.len(), "pool entries should repeat once used up");
}

#[test]
fn conceptual_true_false_never_returns_none() {
    let mut session = DispatchSession::new();
    let options = GenerateOptions::new()
        .with_types([QuestionType::TrueFalse])
        .with_difficulties([Difficulty::Conceptual]);
    for _ in 0..120 {
        let q = session.generate_question(&options).expect("never None");
        assert_eq!(q.question_type(), QuestionType::TrueFalse);
        assert_eq!(q.difficulty, Difficulty::Conceptual);
    }
}

#[test]
fn reset_forgets_pool_usage() {
    let mut session = DispatchSession::new();
    let options = GenerateOptions::new()
        .with_topics([Topic::LimitCycles])
        .with_types([QuestionType::TrueFalse])
        .with_difficulties([Difficulty::Conceptual]);
    session.generate_question(&options).expect("pool entry");
    assert_eq!(session.used_pool_count(), 1);
    session.reset();
    assert_eq!(session.used_pool_count(), 0);
    assert_eq!(session.recent_generators().count(), 0);
}

// ── exhaustion ───────────────────────────────────────────────────────────────

#[test]
fn classification_only_returns_none() {
    let mut session = DispatchSession::new();
    let options = GenerateOptions::new().with_types([QuestionType::Classification]);
    for seed in SEEDS {
        assert!(session.generate_question(&options.clone().with_seed(seed)).is_none());
    }
}

#[test]
fn diagrams_only_without_diagram_topic_returns_none() {
    let mut session = DispatchSession::new();
    let options = GenerateOptions::new()
        .diagrams_only(true)
        .with_topics([Topic::LyapunovFunctions]);
    assert!(session.generate_question(&options).is_none());
}

// ── introspection ────────────────────────────────────────────────────────────

#[test]
fn every_topic_is_available() {
    assert_eq!(available_topics(), Topic::ALL.to_vec());
}

#[test]
fn types_never_include_classification() {
    assert!(!types_for(None).contains(&QuestionType::Classification));
    for topic in Topic::ALL {
        assert!(!types_for(Some(topic)).contains(&QuestionType::Classification));
        assert!(types_for(Some(topic)).contains(&QuestionType::TrueFalse), "{topic}");
    }
}

#[test]
fn per_topic_enumeration_follows_declarations() {
    assert_eq!(
        difficulties_for(Some(Topic::CenterManifolds)),
        vec![Difficulty::Conceptual, Difficulty::Moderate, Difficulty::Heavy]
    );
    assert_eq!(
        types_for(Some(Topic::PhasePortraits)),
        vec![QuestionType::TrueFalse, QuestionType::MultipleChoice, QuestionType::Matching]
    );
    assert_eq!(difficulties_for(None), Difficulty::ALL.to_vec());
}

// ── serialization ────────────────────────────────────────────────────────────

#[test]
fn json_shape_uses_type_tag_and_camel_case_keys() {
    let generator = crate::quiz_engine::find_generator("phase_portrait_matching").expect("registered");
    let config = GeneratorConfig::new(Topic::PhasePortraits, Difficulty::Light, QuestionType::MultipleChoice);
    let value = serde_json::to_value(generator.generate(&config.with_seed(1)).expect("declared")).expect("serialize");

    assert_eq!(value["type"], "multiple_choice");
    assert!(value["correctIndex"].is_u64());
    assert!(value["options"].is_array());
    assert_eq!(value["topic"], "phase_portraits");
    assert_eq!(value["diagram"]["type"], "phase_portrait");
    assert!(value["diagram"]["portraitType"].is_string());
    assert!(value["diagram"].get("bifurcationType").is_none());
}

#[test]
fn json_round_trips_a_matching_question() {
    let generator = crate::quiz_engine::find_generator("bifurcations").expect("registered");
    let config = GeneratorConfig::new(Topic::Bifurcations, Difficulty::Moderate, QuestionType::Matching);
    let q = generator.generate(&config.with_seed(77)).expect("declared");
    let json = serde_json::to_string(&q).expect("serialize");
    assert!(json.contains("\"correctMapping\""));
    let back: Question = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, q);
}
