//! The twelve question generators, one file per template.
//!
//! Every generator is a unit struct implementing
//! [`QuestionGenerator`](crate::quiz_engine::generator::QuestionGenerator)
//! and follows the same shape:
//!
//! ```ignore
//! fn generate(&self, config: &GeneratorConfig) -> Result<Question, GenerationError> {
//!     let (mut rng, seed) = seeded(config);
//!     match config.question_type {
//!         QuestionType::TrueFalse => true_false(PREFIX, config, seed, &mut rng, BANK),
//!         QuestionType::MultipleChoice => { /* pick a Variant, build, shuffle */ }
//!         ...
//!     }
//! }
//! ```
//!
//! Variants are closed enums matched in one place; each arm calls a named
//! function that receives the RNG explicitly.

/// 1D- ẋ = f(x) with polynomial f
pub mod one_dimensional;
/// LS- planar linear systems
pub mod linear_systems;
/// LN- Hartman-Grobman at the origin
pub mod linearization;
/// BF- saddle-node, transcritical, pitchfork normal forms
pub mod bifurcations;
/// HP- Hopf bifurcation and the limit cycles it creates
pub mod hopf;
/// CM- quadratic center manifold approximations
pub mod center_manifold;
/// IM- stable and unstable manifolds of saddles
pub mod invariant_manifolds;
/// IX- Poincaré index of closed curves
pub mod index_theory;
/// LY- Lyapunov functions and gradient systems
pub mod lyapunov;
/// HM- one-degree-of-freedom Hamiltonian systems
pub mod hamiltonian;
/// PP- phase portrait diagrams
pub mod phase_portraits;
/// BD- bifurcation diagrams
pub mod bifurcation_diagrams;
