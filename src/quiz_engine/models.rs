use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalogue enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    OneDimensionalFlows,
    LinearSystems,
    PhasePortraits,
    Linearization,
    Bifurcations,
    HopfBifurcation,
    LimitCycles,
    CenterManifolds,
    InvariantManifolds,
    IndexTheory,
    LyapunovFunctions,
    GradientSystems,
    HamiltonianSystems,
}

impl Topic {
    pub const ALL: [Topic; 13] = [
        Topic::OneDimensionalFlows,
        Topic::LinearSystems,
        Topic::PhasePortraits,
        Topic::Linearization,
        Topic::Bifurcations,
        Topic::HopfBifurcation,
        Topic::LimitCycles,
        Topic::CenterManifolds,
        Topic::InvariantManifolds,
        Topic::IndexTheory,
        Topic::LyapunovFunctions,
        Topic::GradientSystems,
        Topic::HamiltonianSystems,
    ];
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Topic::OneDimensionalFlows => "One-Dimensional Flows",
            Topic::LinearSystems       => "Linear Systems",
            Topic::PhasePortraits      => "Phase Portraits",
            Topic::Linearization       => "Linearization",
            Topic::Bifurcations        => "Bifurcations",
            Topic::HopfBifurcation     => "Hopf Bifurcation",
            Topic::LimitCycles         => "Limit Cycles",
            Topic::CenterManifolds     => "Center Manifolds",
            Topic::InvariantManifolds  => "Invariant Manifolds",
            Topic::IndexTheory         => "Index Theory",
            Topic::LyapunovFunctions   => "Lyapunov Functions",
            Topic::GradientSystems     => "Gradient Systems",
            Topic::HamiltonianSystems  => "Hamiltonian Systems",
        };
        write!(f, "{}", s)
    }
}

/// Ordered from least to most computation required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Conceptual,
    Light,
    Moderate,
    Heavy,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Conceptual,
        Difficulty::Light,
        Difficulty::Moderate,
        Difficulty::Heavy,
    ];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Conceptual => write!(f, "Conceptual"),
            Difficulty::Light      => write!(f, "Light"),
            Difficulty::Moderate   => write!(f, "Moderate"),
            Difficulty::Heavy      => write!(f, "Heavy"),
        }
    }
}

/// `Classification` is part of the public vocabulary but no generator or
/// pool entry produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    TrueFalse,
    MultipleChoice,
    Matching,
    Classification,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::TrueFalse,
        QuestionType::MultipleChoice,
        QuestionType::Matching,
        QuestionType::Classification,
    ];
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::TrueFalse      => write!(f, "True / False"),
            QuestionType::MultipleChoice => write!(f, "Multiple Choice"),
            QuestionType::Matching       => write!(f, "Matching"),
            QuestionType::Classification => write!(f, "Classification"),
        }
    }
}

// ---------------------------------------------------------------------------
// Diagram descriptors (opaque to the engine, consumed by a renderer)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    PhasePortrait,
    Bifurcation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortraitType {
    StableNode,
    UnstableNode,
    Saddle,
    StableDegenerateNode,
    UnstableDegenerateNode,
    StableSpiral,
    UnstableSpiral,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BifurcationType {
    SaddleNode,
    Transcritical,
    SupercriticalPitchfork,
    SubcriticalPitchfork,
    SupercriticalHopf,
    SubcriticalHopf,
}

impl BifurcationType {
    /// The four one-dimensional normal forms.
    pub const ONE_DIMENSIONAL: [BifurcationType; 4] = [
        BifurcationType::SaddleNode,
        BifurcationType::Transcritical,
        BifurcationType::SupercriticalPitchfork,
        BifurcationType::SubcriticalPitchfork,
    ];
}

impl fmt::Display for BifurcationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BifurcationType::SaddleNode             => "Saddle-node",
            BifurcationType::Transcritical          => "Transcritical",
            BifurcationType::SupercriticalPitchfork => "Supercritical pitchfork",
            BifurcationType::SubcriticalPitchfork   => "Subcritical pitchfork",
            BifurcationType::SupercriticalHopf      => "Supercritical Hopf",
            BifurcationType::SubcriticalHopf        => "Subcritical Hopf",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    #[serde(rename = "type")]
    pub kind: DiagramKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait_type: Option<PortraitType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bifurcation_type: Option<BifurcationType>,
}

impl Diagram {
    pub fn phase_portrait(portrait: PortraitType) -> Self {
        Diagram {
            kind: DiagramKind::PhasePortrait,
            portrait_type: Some(portrait),
            bifurcation_type: None,
        }
    }

    pub fn bifurcation(kind: BifurcationType) -> Self {
        Diagram {
            kind: DiagramKind::Bifurcation,
            portrait_type: None,
            bifurcation_type: Some(kind),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// What a single generator is asked to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
    pub seed: Option<i32>,
}

impl GeneratorConfig {
    pub fn new(topic: Topic, difficulty: Difficulty, question_type: QuestionType) -> Self {
        GeneratorConfig { topic, difficulty, question_type, seed: None }
    }

    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Filters for a dispatch request. `None` (or an empty list) means
/// "anything the engine can produce" for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    #[serde(default)]
    pub topics: Option<Vec<Topic>>,
    #[serde(default)]
    pub difficulties: Option<Vec<Difficulty>>,
    #[serde(default)]
    pub types: Option<Vec<QuestionType>>,
    #[serde(default)]
    pub diagrams_only: bool,
    #[serde(default)]
    pub seed: Option<i32>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topics(mut self, topics: impl Into<Vec<Topic>>) -> Self {
        self.topics = Some(topics.into());
        self
    }

    pub fn with_difficulties(mut self, difficulties: impl Into<Vec<Difficulty>>) -> Self {
        self.difficulties = Some(difficulties.into());
        self
    }

    pub fn with_types(mut self, types: impl Into<Vec<QuestionType>>) -> Self {
        self.types = Some(types.into());
        self
    }

    pub fn diagrams_only(mut self, diagrams_only: bool) -> Self {
        self.diagrams_only = diagrams_only;
        self
    }

    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// The kind-specific answer encoding of a [`Question`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionBody {
    TrueFalse {
        answer: bool,
    },
    MultipleChoice {
        options: Vec<String>,
        #[serde(rename = "correctIndex")]
        correct_index: usize,
    },
    /// `correct_mapping[i]` is the index into `right_items` that
    /// `left_items[i]` pairs with.
    Matching {
        #[serde(rename = "leftItems")]
        left_items: Vec<String>,
        #[serde(rename = "rightItems")]
        right_items: Vec<String>,
        #[serde(rename = "correctMapping")]
        correct_mapping: Vec<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub prompt: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram: Option<Diagram>,
    #[serde(flatten)]
    pub body: QuestionBody,
}

impl Question {
    pub fn with_diagram(mut self, diagram: Diagram) -> Self {
        self.diagram = Some(diagram);
        self
    }

    pub fn question_type(&self) -> QuestionType {
        match self.body {
            QuestionBody::TrueFalse { .. }      => QuestionType::TrueFalse,
            QuestionBody::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionBody::Matching { .. }       => QuestionType::Matching,
        }
    }

    /// True when the answer key points inside this question's own option
    /// lists and a matching key is a permutation-subset of right indices.
    pub fn has_valid_answer_key(&self) -> bool {
        match &self.body {
            QuestionBody::TrueFalse { .. } => true,
            QuestionBody::MultipleChoice { options, correct_index } => {
                *correct_index < options.len()
            }
            QuestionBody::Matching { left_items, right_items, correct_mapping } => {
                if correct_mapping.len() != left_items.len() {
                    return false;
                }
                let mut seen = vec![false; right_items.len()];
                for &idx in correct_mapping {
                    if idx >= right_items.len() || seen[idx] {
                        return false;
                    }
                    seen[idx] = true;
                }
                true
            }
        }
    }
}
