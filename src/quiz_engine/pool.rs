//! Pre-authored conceptual true/false statements.
//!
//! The dispatcher serves these directly (with probability
//! `pool_probability`) and falls back to them when every generator attempt
//! fails. Entries are addressed by index so a session can track which ones
//! it has already handed out.

use serde::Serialize;

use crate::quiz_engine::{
    helpers::next_question_id,
    models::{Difficulty, Question, QuestionBody, Topic},
};

pub const POOL_PREFIX: &str = "POOL";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PoolEntry {
    pub topic: Topic,
    pub statement: &'static str,
    pub answer: bool,
    pub explanation: &'static str,
}

impl PoolEntry {
    const fn new(topic: Topic, statement: &'static str, answer: bool, explanation: &'static str) -> Self {
        PoolEntry { topic, statement, answer, explanation }
    }

    /// Wrap as a conceptual true/false question with a fresh id and no seed.
    pub fn to_question(&self) -> Question {
        Question {
            id: next_question_id(POOL_PREFIX),
            topic: self.topic,
            difficulty: Difficulty::Conceptual,
            prompt: format!("True or false: {}", self.statement),
            explanation: self.explanation.to_string(),
            seed: None,
            diagram: None,
            body: QuestionBody::TrueFalse { answer: self.answer },
        }
    }
}

pub fn pool() -> &'static [PoolEntry] {
    &POOL
}

static POOL: [PoolEntry; 45] = [
    // ── one-dimensional flows ────────────────────────────────────────────
    PoolEntry::new(
        Topic::OneDimensionalFlows,
        "Every trajectory of $\\dot{x} = f(x)$ with smooth $f$ either approaches an equilibrium or diverges to $\\pm\\infty$.",
        true,
        "Trajectories on the line are monotone, so they converge to a fixed point or escape.",
    ),
    PoolEntry::new(
        Topic::OneDimensionalFlows,
        "Two distinct trajectories of $\\dot{x} = f(x)$ can cross.",
        false,
        "Uniqueness of solutions for smooth $f$ forbids two trajectories from meeting.",
    ),
    PoolEntry::new(
        Topic::OneDimensionalFlows,
        "The potential $V$ with $f = -V'$ decreases along every non-constant trajectory.",
        true,
        "$\\dot{V} = V'(x)\\dot{x} = -f(x)^2 \\le 0$.",
    ),
    // ── linear systems ───────────────────────────────────────────────────
    PoolEntry::new(
        Topic::LinearSystems,
        "If $\\det A < 0$, the origin of $\\dot{\\mathbf{x}} = A\\mathbf{x}$ is a saddle.",
        true,
        "The eigenvalue product is negative, so the eigenvalues are real with opposite signs.",
    ),
    PoolEntry::new(
        Topic::LinearSystems,
        "A linear system with $\\operatorname{tr} A = 0$ and $\\det A > 0$ has a stable spiral at the origin.",
        false,
        "The eigenvalues are purely imaginary, which gives a center.",
    ),
    PoolEntry::new(
        Topic::LinearSystems,
        "The eigenvalues of a real $2 \\times 2$ matrix are determined by its trace and determinant.",
        true,
        "They are the roots of $\\lambda^2 - \\tau\\lambda + \\Delta = 0$.",
    ),
    // ── phase portraits ──────────────────────────────────────────────────
    PoolEntry::new(
        Topic::PhasePortraits,
        "Trajectories in a planar phase portrait of an autonomous system never intersect.",
        true,
        "Through each point passes exactly one trajectory.",
    ),
    PoolEntry::new(
        Topic::PhasePortraits,
        "Near a stable node, trajectories spiral into the equilibrium.",
        false,
        "Spiralling needs complex eigenvalues; node trajectories approach along eigendirections.",
    ),
    PoolEntry::new(
        Topic::PhasePortraits,
        "Nullclines are curves on which one component of the vector field vanishes.",
        true,
        "On the $x$-nullcline $\\dot{x} = 0$, so the flow there is vertical.",
    ),
    // ── linearization ────────────────────────────────────────────────────
    PoolEntry::new(
        Topic::Linearization,
        "By the Hartman-Grobman theorem, a hyperbolic equilibrium is topologically equivalent to its linearization.",
        true,
        "Hyperbolicity means no eigenvalue has zero real part.",
    ),
    PoolEntry::new(
        Topic::Linearization,
        "A linear center always persists as a nonlinear center.",
        false,
        "Nonlinear terms can turn it into a stable or unstable spiral.",
    ),
    PoolEntry::new(
        Topic::Linearization,
        "The Jacobian at an equilibrium determines its stability whenever all eigenvalues have nonzero real part.",
        true,
        "That is the hyperbolic case covered by linearized stability.",
    ),
    // ── bifurcations ─────────────────────────────────────────────────────
    PoolEntry::new(
        Topic::Bifurcations,
        "A bifurcation is a qualitative change in the phase portrait as a parameter varies.",
        true,
        "Examples are equilibria appearing, disappearing or changing stability.",
    ),
    PoolEntry::new(
        Topic::Bifurcations,
        "A saddle-node bifurcation requires a symmetry of the system.",
        false,
        "It is the generic codimension-one bifurcation; the pitchfork is the one tied to symmetry.",
    ),
    PoolEntry::new(
        Topic::Bifurcations,
        "A subcritical pitchfork can lead to a jump to a distant attractor.",
        true,
        "Once the origin loses stability there is no nearby stable equilibrium to move to.",
    ),
    // ── Hopf bifurcation ─────────────────────────────────────────────────
    PoolEntry::new(
        Topic::HopfBifurcation,
        "At a Hopf bifurcation the Jacobian has a zero eigenvalue.",
        false,
        "The critical eigenvalues are $\\pm i\\omega$ with $\\omega \\neq 0$.",
    ),
    PoolEntry::new(
        Topic::HopfBifurcation,
        "In a Hopf bifurcation the equilibrium changes stability while a periodic orbit is created or destroyed.",
        true,
        "The cycle emerges from the equilibrium as the complex pair crosses the imaginary axis.",
    ),
    PoolEntry::new(
        Topic::HopfBifurcation,
        "Whether a Hopf bifurcation is super- or subcritical is determined by the linearization alone.",
        false,
        "It depends on the sign of the first Lyapunov coefficient, a nonlinear quantity.",
    ),
    // ── limit cycles ─────────────────────────────────────────────────────
    PoolEntry::new(
        Topic::LimitCycles,
        "A limit cycle must enclose at least one equilibrium.",
        true,
        "Its index is $+1$, which must equal the sum of the enclosed indices.",
    ),
    PoolEntry::new(
        Topic::LimitCycles,
        "A linear system can have a limit cycle.",
        false,
        "Closed orbits of linear systems come in continuous families, so none is isolated.",
    ),
    PoolEntry::new(
        Topic::LimitCycles,
        "The Poincaré-Bendixson theorem can guarantee a closed orbit inside a trapping region that contains no equilibria.",
        true,
        "A bounded trajectory in a region free of equilibria must approach a closed orbit.",
    ),
    PoolEntry::new(
        Topic::LimitCycles,
        "Dulac's criterion can rule out closed orbits in a simply connected region.",
        true,
        "If $\\nabla \\cdot (g\\mathbf{f})$ has one strict sign there, no closed orbit lies in the region.",
    ),
    PoolEntry::new(
        Topic::LimitCycles,
        "Chaotic attractors can occur in autonomous planar systems.",
        false,
        "Poincaré-Bendixson rules out chaos in two dimensions.",
    ),
    // ── center manifolds ─────────────────────────────────────────────────
    PoolEntry::new(
        Topic::CenterManifolds,
        "The center manifold theorem applies at non-hyperbolic equilibria.",
        true,
        "It isolates the slow dynamics associated with eigenvalues on the imaginary axis.",
    ),
    PoolEntry::new(
        Topic::CenterManifolds,
        "The flow on the center manifold is always linear.",
        false,
        "Its leading behaviour comes from nonlinear terms, such as $\\dot{x} = cx^3$.",
    ),
    PoolEntry::new(
        Topic::CenterManifolds,
        "The dimension of the center manifold equals the number of eigenvalues with zero real part, counted with multiplicity.",
        true,
        "It is tangent to the center eigenspace, which has that dimension.",
    ),
    // ── invariant manifolds ──────────────────────────────────────────────
    PoolEntry::new(
        Topic::InvariantManifolds,
        "Stable manifolds of two distinct equilibria can intersect.",
        false,
        "A point on both would have to converge to two different limits.",
    ),
    PoolEntry::new(
        Topic::InvariantManifolds,
        "A homoclinic orbit lies in both the stable and unstable manifold of the same equilibrium.",
        true,
        "It leaves the equilibrium and returns to it.",
    ),
    PoolEntry::new(
        Topic::InvariantManifolds,
        "The unstable manifold of a saddle in the plane is tangent to the eigenvector of its positive eigenvalue.",
        true,
        "The unstable manifold theorem gives tangency to the unstable eigenspace.",
    ),
    // ── index theory ─────────────────────────────────────────────────────
    PoolEntry::new(
        Topic::IndexTheory,
        "The index of a closed curve changes when the curve is deformed without crossing an equilibrium.",
        false,
        "The index is an integer that varies continuously under such deformations, so it stays constant.",
    ),
    PoolEntry::new(
        Topic::IndexTheory,
        "A center has index $+1$.",
        true,
        "The vector field turns once counterclockwise around it.",
    ),
    PoolEntry::new(
        Topic::IndexTheory,
        "Reversing time changes the index of an equilibrium.",
        false,
        "Reversing every vector does not change how many times the field turns around a curve.",
    ),
    // ── Lyapunov functions ───────────────────────────────────────────────
    PoolEntry::new(
        Topic::LyapunovFunctions,
        "A Lyapunov function must be positive definite around the equilibrium.",
        true,
        "It plays the role of an energy with a strict minimum at the equilibrium.",
    ),
    PoolEntry::new(
        Topic::LyapunovFunctions,
        "Lyapunov's method requires solving the differential equation.",
        false,
        "$\\dot{V}$ is computed from the vector field directly, which is the point of the method.",
    ),
    PoolEntry::new(
        Topic::LyapunovFunctions,
        "LaSalle's invariance principle can prove asymptotic stability when $\\dot{V}$ is only negative semidefinite.",
        true,
        "Trajectories approach the largest invariant set inside $\\{\\dot{V} = 0\\}$.",
    ),
    // ── gradient systems ─────────────────────────────────────────────────
    PoolEntry::new(
        Topic::GradientSystems,
        "Equilibria of a gradient system are critical points of the potential.",
        true,
        "$-\\nabla V = 0$ exactly at critical points of $V$.",
    ),
    PoolEntry::new(
        Topic::GradientSystems,
        "A gradient system can have a spiral equilibrium.",
        false,
        "The Jacobian is a symmetric Hessian, so its eigenvalues are real.",
    ),
    PoolEntry::new(
        Topic::GradientSystems,
        "In a gradient system trajectories cross level sets of the potential at right angles.",
        true,
        "The flow is along $-\\nabla V$, which is normal to the level sets.",
    ),
    // ── Hamiltonian systems ──────────────────────────────────────────────
    PoolEntry::new(
        Topic::HamiltonianSystems,
        "Trajectories of a planar Hamiltonian system lie on level curves of $H$.",
        true,
        "$H$ is conserved, so it is constant along each trajectory.",
    ),
    PoolEntry::new(
        Topic::HamiltonianSystems,
        "A Hamiltonian system can have a stable spiral.",
        false,
        "Phase-space area is preserved, which rules out spirals.",
    ),
    PoolEntry::new(
        Topic::HamiltonianSystems,
        "The equilibria of $\\dot{q} = p,\\ \\dot{p} = -V'(q)$ are centers or saddles when nondegenerate.",
        true,
        "The Jacobian has trace zero, so its eigenvalues are $\\pm\\sqrt{-V''}$.",
    ),
    PoolEntry::new(
        Topic::HamiltonianSystems,
        "The pendulum $\\ddot{\\theta} = -\\sin\\theta$ is a Hamiltonian system.",
        true,
        "It has $H = p^2/2 - \\cos\\theta$.",
    ),
    // ── cross-topic ──────────────────────────────────────────────────────
    PoolEntry::new(
        Topic::PhasePortraits,
        "A separatrix divides the phase plane into regions of qualitatively different behaviour.",
        true,
        "Stable manifolds of saddles are the typical separatrices.",
    ),
    PoolEntry::new(
        Topic::LinearSystems,
        "The solution of $\\dot{\\mathbf{x}} = A\\mathbf{x}$ is $e^{At}\\mathbf{x}_0$.",
        true,
        "The matrix exponential solves the linear system with initial condition $\\mathbf{x}_0$.",
    ),
    PoolEntry::new(
        Topic::Bifurcations,
        "In a transcritical bifurcation equilibria are created from nothing.",
        false,
        "Both equilibria exist on either side; they only pass through each other and swap stability.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_topic_has_at_least_three_entries() {
        for topic in Topic::ALL {
            let count = pool().iter().filter(|e| e.topic == topic).count();
            assert!(count >= 3, "{topic}: {count}");
        }
    }

    #[test]
    fn statements_are_unique() {
        let mut statements: Vec<&str> = pool().iter().map(|e| e.statement).collect();
        statements.sort();
        statements.dedup();
        assert_eq!(statements.len(), pool().len());
    }

    #[test]
    fn pool_questions_are_conceptual_true_false() {
        let q = pool()[0].to_question();
        assert!(q.id.starts_with("POOL-"));
        assert_eq!(q.difficulty, Difficulty::Conceptual);
        assert!(q.prompt.starts_with("True or false: "));
        assert!(q.seed.is_none());
    }
}
