//! Hopf bifurcation of the parametrised Jacobian
//! `J(μ) = [[μ - s, -ω], [ω, μ - s - k]]` and the polar normal form
//! `ṙ = μr + a r³`.
//!
//! The trace vanishes at `μ_c = s + k/2`, a half-integer for odd `k` and an
//! integer for even `k`. The determinant there is `ω² - k²/4`, which
//! `ω > k/2` keeps positive.

use crate::quiz_engine::{
    error::GenerationError,
    format::{format_fraction, format_number, join_terms},
    generator::QuestionGenerator,
    helpers::{math, multiple_choice, question, seeded, true_false, Statement},
    matrix::{classify_eigenvalues, EigenvalueType, Matrix2},
    models::{Difficulty, GeneratorConfig, Question, QuestionBody, QuestionType, Topic},
    rng::{random_choice, random_int, Mulberry32},
};

const PREFIX: &str = "HP";

pub struct HopfBifurcation;

#[derive(Debug, Clone, Copy)]
enum Variant {
    CriticalParameter,
    Criticality,
    Period,
    Amplitude,
}

const BANK: &[Statement] = &[
    Statement::on(
        Topic::HopfBifurcation,
        "At a Hopf bifurcation a pair of complex-conjugate eigenvalues crosses the imaginary axis.",
        true,
        "The real part of the pair changes sign while the imaginary part stays nonzero.",
    ),
    Statement::on(
        Topic::HopfBifurcation,
        "A Hopf bifurcation can occur in a one-dimensional system.",
        false,
        "It needs a complex-conjugate pair of eigenvalues, so the phase space must be at least two-dimensional.",
    ),
    Statement::on(
        Topic::HopfBifurcation,
        "In a supercritical Hopf bifurcation the limit cycle that is born is stable.",
        true,
        "With $\\dot{r} = \\mu r - r^3$ the cycle $r = \\sqrt{\\mu}$ attracts nearby orbits.",
    ),
    Statement::on(
        Topic::HopfBifurcation,
        "The amplitude of the cycle born in a supercritical Hopf bifurcation grows linearly in $\\mu - \\mu_c$.",
        false,
        "It grows like $\\sqrt{\\mu - \\mu_c}$.",
    ),
    Statement::on(
        Topic::LimitCycles,
        "A limit cycle is an isolated closed orbit.",
        true,
        "Isolation distinguishes it from the continuous families of closed orbits around a center.",
    ),
    Statement::on(
        Topic::LimitCycles,
        "Near a Hopf point the period of the new limit cycle is close to $2\\pi/\\omega$, where $\\pm i\\omega$ are the critical eigenvalues.",
        true,
        "The cycle inherits the rotation rate of the linearization at the bifurcation.",
    ),
    Statement::on(
        Topic::LimitCycles,
        "A subcritical Hopf bifurcation produces a stable limit cycle for $\\mu > \\mu_c$.",
        false,
        "The subcritical cycle is unstable and exists on the side where the equilibrium is still stable.",
    ),
];

impl QuestionGenerator for HopfBifurcation {
    fn name(&self) -> &'static str {
        "hopf_bifurcation"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::HopfBifurcation, Topic::LimitCycles]
    }

    fn question_types(&self) -> &'static [QuestionType] {
        &[QuestionType::TrueFalse, QuestionType::MultipleChoice]
    }

    fn difficulties(&self) -> &'static [Difficulty] {
        &[Difficulty::Light, Difficulty::Moderate, Difficulty::Heavy]
    }

    fn generate(&self, config: &GeneratorConfig) -> Result<Question, GenerationError> {
        let (mut rng, seed) = seeded(config);
        match config.question_type {
            QuestionType::TrueFalse => true_false(PREFIX, config, seed, &mut rng, BANK),
            QuestionType::MultipleChoice => {
                let variants: &[Variant] = match config.difficulty {
                    Difficulty::Light    => &[Variant::CriticalParameter, Variant::Criticality],
                    Difficulty::Moderate => &[Variant::CriticalParameter, Variant::Criticality, Variant::Period],
                    _ => &[Variant::CriticalParameter, Variant::Criticality, Variant::Period, Variant::Amplitude],
                };
                let variant = *random_choice(&mut rng, variants);
                let (prompt, explanation, body) = match variant {
                    Variant::CriticalParameter => critical_parameter(&mut rng)?,
                    Variant::Criticality       => criticality(&mut rng),
                    Variant::Period            => period(&mut rng),
                    Variant::Amplitude         => amplitude(&mut rng),
                };
                Ok(question(PREFIX, config, seed, prompt, explanation, body))
            }
            other => Err(GenerationError::UnsupportedType {
                generator: self.name(),
                question_type: other,
            }),
        }
    }
}

/// `μ - s`, rendered sign-aware.
fn shifted_mu(s: i32) -> String {
    join_terms(&[(1.0, "\\mu".into()), (-(s as f64), String::new())])
}

fn critical_parameter(rng: &mut Mulberry32) -> Result<(String, String, QuestionBody), GenerationError> {
    let s = random_int(rng, -2, 2, false);
    let k = random_int(rng, 1, 3, false);
    let omega = random_int(rng, k / 2 + 1, 4, false);

    let mu_c = (2 * s + k) as f64 / 2.0;
    let at_crossing = Matrix2::new(mu_c - s as f64, -omega as f64, omega as f64, mu_c - (s + k) as f64);
    let crossing = classify_eigenvalues(&at_crossing);
    if crossing.kind != EigenvalueType::PureImaginary {
        return Err(GenerationError::EmptyCandidates { what: "Hopf crossing" });
    }

    let render = |n: i64| math(format!("\\mu_c = {}", format_fraction(n, 2)));
    let correct_num = (2 * s + k) as i64;
    let distractors = vec![
        render((2 * s - k) as i64),
        render(2 * (s + k) as i64),
        render(-correct_num),
        render(2 * s as i64),
    ];
    let body = multiple_choice(rng, render(correct_num), distractors, 3);

    let j = format!(
        "J(\\mu) = \\begin{{pmatrix}} {} & {} \\\\ {} & {} \\end{{pmatrix}}",
        shifted_mu(s),
        -omega,
        omega,
        shifted_mu(s + k)
    );
    Ok((
        format!(
            "The Jacobian of a planar system at its equilibrium is {}. At which $\\mu$ does a Hopf bifurcation occur?",
            math(j)
        ),
        format!(
            "$\\operatorname{{tr}} J = {}$ vanishes at $\\mu_c = {}$, where $\\det J = \\omega^2 - k^2/4 = {} > 0$, so the eigenvalues are $\\pm {} i$.",
            join_terms(&[(2.0, "\\mu".into()), (-(correct_num as f64), String::new())]),
            format_fraction(correct_num, 2),
            format_number(at_crossing.det()),
            format_number(at_crossing.det().sqrt())
        ),
        body,
    ))
}

const SUPER_STABLE: &str = "Supercritical: a stable limit cycle exists for $\\mu > 0$";
const SUB_UNSTABLE: &str = "Subcritical: an unstable limit cycle exists for $\\mu < 0$";
const SUPER_UNSTABLE: &str = "Supercritical: an unstable limit cycle exists for $\\mu < 0$";
const SUB_STABLE: &str = "Subcritical: a stable limit cycle exists for $\\mu > 0$";

fn criticality(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let a = random_int(rng, -3, 3, true);
    let omega = random_int(rng, 1, 3, false);
    let (correct, why) = if a < 0 {
        (SUPER_STABLE, format!("The cubic coefficient {a} is negative, so $r^* = \\sqrt{{\\mu / {}}}$ is an attracting cycle for $\\mu > 0$.", -a))
    } else {
        (SUB_UNSTABLE, format!("The cubic coefficient {a} is positive, so $r^* = \\sqrt{{-\\mu / {a}}}$ is a repelling cycle for $\\mu < 0$."))
    };
    let options = vec![
        SUPER_STABLE.to_string(),
        SUB_UNSTABLE.to_string(),
        SUPER_UNSTABLE.to_string(),
        SUB_STABLE.to_string(),
    ];
    let body = multiple_choice(rng, correct.to_string(), options, 3);
    let normal_form = join_terms(&[(1.0, "\\mu r".into()), (a as f64, "r^3".into())]);
    (
        format!(
            "In polar coordinates a system near a Hopf point reads {}. Which statement is correct?",
            math(format!("\\dot{{r}} = {normal_form},\\ \\dot{{\\theta}} = {omega}"))
        ),
        why,
        body,
    )
}

fn period_text(numerator_pi: i32, denominator: i32) -> String {
    let pi = if numerator_pi == 1 { "\\pi".to_string() } else { format!("{numerator_pi}\\pi") };
    if denominator == 1 {
        math(format!("T = {pi}"))
    } else {
        math(format!("T = \\frac{{{pi}}}{{{denominator}}}"))
    }
}

fn period(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let s = random_int(rng, -2, 2, false);
    let omega = random_int(rng, 1, 4, false);
    let correct = period_text(2, omega);
    let distractors = vec![
        period_text(2 * omega, 1),
        period_text(1, omega),
        period_text(2, omega + 1),
        period_text(4, omega),
    ];
    let body = multiple_choice(rng, correct, distractors, 3);
    let j = format!(
        "J(\\mu) = \\begin{{pmatrix}} {} & {} \\\\ {} & {} \\end{{pmatrix}}",
        shifted_mu(s),
        -omega,
        omega,
        shifted_mu(s)
    );
    (
        format!(
            "The Jacobian {} undergoes a Hopf bifurcation at $\\mu = {s}$. What is the approximate period of the limit cycle born there?",
            math(j)
        ),
        format!("At $\\mu = {s}$ the eigenvalues are $\\pm {omega}i$, so the cycle has period $2\\pi / {omega}$."),
        body,
    )
}

fn amplitude(rng: &mut Mulberry32) -> (String, String, QuestionBody) {
    let a = random_int(rng, 1, 3, false);
    let m = random_int(rng, 1, 3, false);
    let mu = a * m * m;
    let distractors: Vec<String> = [m * m, a * m, m + 1, mu, m + 2, m + 3]
        .iter()
        .map(|v| v.to_string())
        .collect();
    let body = multiple_choice(rng, m.to_string(), distractors, 3);
    let normal_form = join_terms(&[(1.0, "\\mu r".into()), (-(a as f64), "r^3".into())]);
    (
        format!(
            "For {} with $\\mu = {mu}$, what is the radius of the stable limit cycle?",
            math(format!("\\dot{{r}} = {normal_form}"))
        ),
        format!("Setting $\\dot{{r}} = 0$ with $r > 0$ gives $r^2 = \\mu / {a} = {}$.", m * m),
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_vanishes_at_shifted_crossing() {
        for seed in 0..200 {
            let mut rng = Mulberry32::new(seed);
            assert!(critical_parameter(&mut rng).is_ok(), "seed={seed}");
        }
    }

    #[test]
    fn critical_mu_is_shift_plus_half_k() {
        for seed in 0..200 {
            let mut replay = Mulberry32::new(seed);
            let s = random_int(&mut replay, -2, 2, false);
            let k = random_int(&mut replay, 1, 3, false);

            let mut rng = Mulberry32::new(seed);
            let (_, _, body) = critical_parameter(&mut rng).expect("crossing is purely imaginary");
            match body {
                QuestionBody::MultipleChoice { options, correct_index } => {
                    let answer = &options[correct_index];
                    let expected = format_fraction((2 * s + k) as i64, 2);
                    assert_eq!(answer, &math(format!("\\mu_c = {expected}")), "seed={seed}");
                    assert_eq!(answer.contains("\\frac"), k % 2 == 1, "seed={seed} s={s} k={k}");
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn amplitude_always_offers_four_radii() {
        for seed in 0..200 {
            let mut rng = Mulberry32::new(seed);
            match amplitude(&mut rng).2 {
                QuestionBody::MultipleChoice { options, .. } => assert_eq!(options.len(), 4, "seed={seed}"),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn shifted_mu_renders_signs() {
        assert_eq!(shifted_mu(0), "\\mu");
        assert_eq!(shifted_mu(2), "\\mu - 2");
        assert_eq!(shifted_mu(-1), "\\mu + 1");
    }
}
