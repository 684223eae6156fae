//! Request routing: filters in, one fresh question out.
//!
//! A [`DispatchSession`] owns the per-learner state (question ids already
//! served, pool entries already served, generators used recently). Give
//! each learner their own session; sessions share nothing.
//!
//! One request runs as:
//! 1. resolve unset filters against what the registry and pool can produce;
//! 2. flip the pool coin and, when true/false conceptual questions are
//!    allowed, serve an unused pool entry;
//! 3. otherwise try up to `max_attempts` random (topic, difficulty, type)
//!    triples, picking among capable generators with a recency penalty;
//! 4. fall back to the pool, resetting the session once if it is mostly
//!    exhausted.

use std::collections::{HashSet, VecDeque};

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::quiz_engine::{
    generator::{can_generate, registry, QuestionGenerator},
    models::{Difficulty, GenerateOptions, GeneratorConfig, Question, QuestionType, Topic},
    pool::pool,
    rng::{fresh_seed, random_choice, Mulberry32},
};

/// Tunables for a [`DispatchSession`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchSettings {
    /// Chance of serving straight from the pool when it is eligible.
    pub pool_probability: f64,
    /// Generator attempts before falling back to the pool.
    pub max_attempts: usize,
    /// How many recently used generators are penalised.
    pub recency_window: usize,
    /// Fraction of the pool that must be used before a reset.
    pub pool_reset_threshold: f64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        DispatchSettings {
            pool_probability: 0.3,
            max_attempts: 10,
            recency_window: 3,
            pool_reset_threshold: 0.8,
        }
    }
}

/// Selection weight of a generator at `position` in the recency list
/// (0 = most recent). Ramps from 0.2 to 0.8 across the window.
fn recency_weight(position: usize, window: usize) -> f64 {
    if window <= 1 {
        return 0.2;
    }
    0.2 + 0.6 * position as f64 / (window - 1) as f64
}

/// Filters with every dimension filled in.
#[derive(Debug, Clone)]
struct Resolved {
    topics: Vec<Topic>,
    difficulties: Vec<Difficulty>,
    types: Vec<QuestionType>,
    diagrams_only: bool,
}

impl Resolved {
    fn pool_eligible(&self) -> bool {
        !self.diagrams_only && self.types.contains(&QuestionType::TrueFalse)
    }
}

fn eligible_generators(diagrams_only: bool) -> impl Iterator<Item = &'static dyn QuestionGenerator> {
    registry()
        .iter()
        .copied()
        .filter(move |g| !diagrams_only || g.produces_diagrams())
}

/// `requested` when it is non-empty, otherwise everything in `all` that
/// `producible` accepts.
fn resolve_dimension<T: Copy + PartialEq>(
    requested: &Option<Vec<T>>,
    all: &[T],
    producible: impl Fn(T) -> bool,
) -> Vec<T> {
    match requested {
        Some(values) if !values.is_empty() => values.clone(),
        _ => all.iter().copied().filter(|&v| producible(v)).collect(),
    }
}

fn resolve(options: &GenerateOptions) -> Resolved {
    let diagrams_only = options.diagrams_only;
    let with_pool = !diagrams_only;
    Resolved {
        topics: resolve_dimension(&options.topics, &Topic::ALL, |t| {
            eligible_generators(diagrams_only).any(|g| g.topics().contains(&t))
                || (with_pool && pool().iter().any(|e| e.topic == t))
        }),
        difficulties: resolve_dimension(&options.difficulties, &Difficulty::ALL, |d| {
            eligible_generators(diagrams_only).any(|g| g.difficulties().contains(&d))
                || (with_pool && d == Difficulty::Conceptual)
        }),
        types: resolve_dimension(&options.types, &QuestionType::ALL, |q| {
            eligible_generators(diagrams_only).any(|g| g.question_types().contains(&q))
                || (with_pool && q == QuestionType::TrueFalse)
        }),
        diagrams_only,
    }
}

/// Per-learner dispatch state.
#[derive(Debug, Clone)]
pub struct DispatchSession {
    settings: DispatchSettings,
    used_ids: HashSet<String>,
    used_pool: HashSet<usize>,
    /// Most recent first, at most `recency_window` long.
    recent: VecDeque<&'static str>,
}

impl Default for DispatchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchSession {
    pub fn new() -> Self {
        Self::with_settings(DispatchSettings::default())
    }

    pub fn with_settings(settings: DispatchSettings) -> Self {
        DispatchSession {
            settings,
            used_ids: HashSet::new(),
            used_pool: HashSet::new(),
            recent: VecDeque::with_capacity(settings.recency_window),
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Forget every served id, pool entry and recent generator.
    pub fn reset(&mut self) {
        self.used_ids.clear();
        self.used_pool.clear();
        self.recent.clear();
    }

    /// Generator names in recency order, most recent first.
    pub fn recent_generators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.recent.iter().copied()
    }

    pub fn used_pool_count(&self) -> usize {
        self.used_pool.len()
    }

    /// Produce one question matching `options`, or `None` when neither a
    /// generator nor the pool can satisfy the filters.
    ///
    /// With `options.seed` set, two fresh sessions return the same question
    /// up to its id.
    pub fn generate_question(&mut self, options: &GenerateOptions) -> Option<Question> {
        self.generate_inner(options, true)
    }

    fn generate_inner(&mut self, options: &GenerateOptions, allow_reset: bool) -> Option<Question> {
        let mut rng = Mulberry32::new(options.seed.unwrap_or_else(fresh_seed));
        let filters = resolve(options);

        // Drawn unconditionally so the rest of the stream does not depend
        // on pool eligibility.
        let pool_first = rng.chance(self.settings.pool_probability);
        if pool_first && filters.pool_eligible() && filters.difficulties.contains(&Difficulty::Conceptual) {
            if let Some(q) = self.take_unused_pool(&mut rng, &filters.topics) {
                return Some(q);
            }
        }

        let generators: Vec<&'static dyn QuestionGenerator> = eligible_generators(filters.diagrams_only).collect();
        if let Some(q) = self.try_generators(&mut rng, &filters, &generators) {
            return Some(q);
        }

        if filters.pool_eligible() {
            return self.pool_fallback(&mut rng, options, &filters, allow_reset);
        }
        tracing::debug!(?filters, "no generator or pool entry can satisfy the filters");
        None
    }

    fn try_generators(
        &mut self,
        rng: &mut Mulberry32,
        filters: &Resolved,
        generators: &[&'static dyn QuestionGenerator],
    ) -> Option<Question> {
        if filters.topics.is_empty() || filters.difficulties.is_empty() || filters.types.is_empty() {
            return None;
        }
        for attempt in 0..self.settings.max_attempts {
            let topic = *random_choice(rng, &filters.topics);
            let difficulty = *random_choice(rng, &filters.difficulties);
            let question_type = *random_choice(rng, &filters.types);
            let config = GeneratorConfig::new(topic, difficulty, question_type).with_seed(rng.next_u32() as i32);

            let candidates: Vec<&'static dyn QuestionGenerator> = generators
                .iter()
                .copied()
                .filter(|g| can_generate(*g, &config))
                .collect();
            if candidates.is_empty() {
                tracing::debug!(attempt, ?topic, ?difficulty, ?question_type, "no capable generator");
                continue;
            }

            let generator = self.pick_weighted(rng, &candidates);
            match generator.generate(&config) {
                Ok(q) if self.used_ids.contains(&q.id) => {
                    tracing::debug!(attempt, generator = generator.name(), id = %q.id, "duplicate question id");
                }
                Ok(q) => {
                    self.used_ids.insert(q.id.clone());
                    self.remember(generator.name());
                    return Some(q);
                }
                Err(e) => {
                    tracing::warn!(attempt, generator = generator.name(), ?config, error = %e, "generator failed");
                }
            }
        }
        None
    }

    /// Roulette-wheel pick: full weight for generators outside the recency
    /// window, [`recency_weight`] for those inside it. One draw.
    fn pick_weighted(
        &self,
        rng: &mut Mulberry32,
        candidates: &[&'static dyn QuestionGenerator],
    ) -> &'static dyn QuestionGenerator {
        let weights: Vec<f64> = candidates
            .iter()
            .map(|g| match self.recent.iter().position(|&name| name == g.name()) {
                Some(position) => recency_weight(position, self.settings.recency_window),
                None => 1.0,
            })
            .collect();
        let total: f64 = weights.iter().sum();
        let mut target = rng.draw() * total;
        for (generator, weight) in candidates.iter().zip(&weights) {
            if target < *weight {
                return *generator;
            }
            target -= weight;
        }
        candidates[candidates.len() - 1]
    }

    fn remember(&mut self, name: &'static str) {
        self.recent.retain(|&n| n != name);
        self.recent.push_front(name);
        self.recent.truncate(self.settings.recency_window);
    }

    /// Uniform pick among unused pool entries on `topics`; marks it used.
    fn take_unused_pool(&mut self, rng: &mut Mulberry32, topics: &[Topic]) -> Option<Question> {
        let unused: Vec<usize> = pool()
            .iter()
            .enumerate()
            .filter(|(i, e)| topics.contains(&e.topic) && !self.used_pool.contains(i))
            .map(|(i, _)| i)
            .collect();
        if unused.is_empty() {
            return None;
        }
        let index = *random_choice(rng, &unused);
        self.used_pool.insert(index);
        let q = pool()[index].to_question();
        self.used_ids.insert(q.id.clone());
        tracing::debug!(index, topic = ?q.topic, "served pool entry");
        Some(q)
    }

    fn pool_fallback(
        &mut self,
        rng: &mut Mulberry32,
        options: &GenerateOptions,
        filters: &Resolved,
        allow_reset: bool,
    ) -> Option<Question> {
        if let Some(q) = self.take_unused_pool(rng, &filters.topics) {
            return Some(q);
        }

        let used_fraction = self.used_pool.len() as f64 / pool().len() as f64;
        if allow_reset && used_fraction >= self.settings.pool_reset_threshold {
            tracing::info!(used = self.used_pool.len(), total = pool().len(), "pool exhausted, resetting session");
            self.reset();
            return self.generate_inner(options, false);
        }

        let matching: Vec<usize> = pool()
            .iter()
            .enumerate()
            .filter(|(_, e)| filters.topics.contains(&e.topic))
            .map(|(i, _)| i)
            .collect();
        if matching.is_empty() {
            tracing::debug!(topics = ?filters.topics, "pool has no entry for the requested topics");
            return None;
        }
        let index = *random_choice(rng, &matching);
        tracing::debug!(index, "serving previously used pool entry");
        Some(pool()[index].to_question())
    }
}

// ---------------------------------------------------------------------------
// Introspection
// ---------------------------------------------------------------------------

/// Every topic some generator or pool entry can produce, in catalogue order.
pub fn available_topics() -> Vec<Topic> {
    Topic::ALL
        .iter()
        .copied()
        .filter(|t| {
            registry().iter().any(|g| g.topics().contains(t)) || pool().iter().any(|e| e.topic == *t)
        })
        .collect()
}

fn serves(generator: &dyn QuestionGenerator, topic: Option<Topic>) -> bool {
    topic.map_or(true, |t| generator.topics().contains(&t))
}

fn pool_covers(topic: Option<Topic>) -> bool {
    topic.map_or(!pool().is_empty(), |t| pool().iter().any(|e| e.topic == t))
}

/// Difficulties producible for `topic`, or across all topics for `None`.
pub fn difficulties_for(topic: Option<Topic>) -> Vec<Difficulty> {
    Difficulty::ALL
        .iter()
        .copied()
        .filter(|d| {
            registry().iter().any(|g| serves(*g, topic) && g.difficulties().contains(d))
                || (*d == Difficulty::Conceptual && pool_covers(topic))
        })
        .collect()
}

/// Question types producible for `topic`, or across all topics for `None`.
pub fn types_for(topic: Option<Topic>) -> Vec<QuestionType> {
    QuestionType::ALL
        .iter()
        .copied()
        .filter(|q| {
            registry().iter().any(|g| serves(*g, topic) && g.question_types().contains(q))
                || (*q == QuestionType::TrueFalse && pool_covers(topic))
        })
        .collect()
}
