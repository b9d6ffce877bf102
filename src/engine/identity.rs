//! The five constant-acceleration identities and their inversions.
//!
//! # Governing Equations
//!
//! ```text
//! 1. V  = v + a·t
//! 2. Δd = v·t + 0.5·a·t²
//! 3. V² = v² + 2·a·Δd
//! 4. Δd = V·t - 0.5·a·t²
//! 5. Δd = 0.5·(v+V)·t
//! ```
//!
//! Each symbol has an ordered list of [`Inversion`]s (see [`candidates`]).
//! The propagation loop walks that list and takes the first inversion whose
//! operands are known and which does not fail locally.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::{KinematicValues, Symbol};
use super::step::NumberFormat;
use crate::config::SignPolicy;
use crate::error::{KinError, KinResult};

use Symbol::{Acceleration as A, Displacement as D, FinalVelocity as VF, InitialVelocity as VI, Time as T};

/// One of the five canonical kinematic identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    /// `V = v + a·t`
    VelocityTime,
    /// `Δd = v·t + 0.5·a·t²`
    DisplacementFromInitial,
    /// `V² = v² + 2·a·Δd`
    VelocityDisplacement,
    /// `Δd = V·t - 0.5·a·t²`
    DisplacementFromFinal,
    /// `Δd = 0.5·(v+V)·t`
    AverageVelocity,
}

impl Identity {
    /// All identities in canonical order.
    pub const ALL: [Self; 5] = [
        Self::VelocityTime,
        Self::DisplacementFromInitial,
        Self::VelocityDisplacement,
        Self::DisplacementFromFinal,
        Self::AverageVelocity,
    ];

    /// Canonical number (1-5).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::VelocityTime => 1,
            Self::DisplacementFromInitial => 2,
            Self::VelocityDisplacement => 3,
            Self::DisplacementFromFinal => 4,
            Self::AverageVelocity => 5,
        }
    }

    /// Symbolic form.
    #[must_use]
    pub const fn equation(self) -> &'static str {
        match self {
            Self::VelocityTime => "V = v + a·t",
            Self::DisplacementFromInitial => "Δd = v·t + 0.5·a·t²",
            Self::VelocityDisplacement => "V² = v² + 2·a·Δd",
            Self::DisplacementFromFinal => "Δd = V·t - 0.5·a·t²",
            Self::AverageVelocity => "Δd = 0.5·(v+V)·t",
        }
    }

    /// The four symbols the identity relates.
    #[must_use]
    pub const fn symbols(self) -> [Symbol; 4] {
        match self {
            Self::VelocityTime => [VF, VI, A, T],
            Self::DisplacementFromInitial => [D, VI, A, T],
            Self::VelocityDisplacement => [VF, VI, A, D],
            Self::DisplacementFromFinal => [D, VF, A, T],
            Self::AverageVelocity => [D, VI, VF, T],
        }
    }

    /// The symbol the identity does not involve.
    #[must_use]
    pub const fn missing_symbol(self) -> Symbol {
        match self {
            Self::VelocityTime => D,
            Self::DisplacementFromInitial => VF,
            Self::VelocityDisplacement => T,
            Self::DisplacementFromFinal => VI,
            Self::AverageVelocity => A,
        }
    }

    /// Relative residual `|lhs - rhs| / max(1, largest term)` on solved values.
    #[must_use]
    pub fn residual(self, x: &KinematicValues) -> f64 {
        let (vf, vi, d, a, t) = (
            x.final_velocity,
            x.initial_velocity,
            x.displacement,
            x.acceleration,
            x.time,
        );
        let terms: [f64; 3] = match self {
            Self::VelocityTime => [vf, vi, a * t],
            Self::DisplacementFromInitial => [d, vi * t, 0.5 * a * t * t],
            Self::VelocityDisplacement => [vf * vf, vi * vi, 2.0 * a * d],
            Self::DisplacementFromFinal => [d, vf * t, -0.5 * a * t * t],
            Self::AverageVelocity => [d, 0.5 * (vi + vf) * t, 0.0],
        };
        let [lhs, first, second] = terms;
        let scale = terms.iter().fold(1.0_f64, |m, term| m.max(term.abs()));
        (lhs - first - second).abs() / scale
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.number(), self.equation())
    }
}

/// Settings an inversion needs besides its operands.
#[derive(Debug, Clone, Copy)]
pub struct InversionContext {
    /// Denominators at or below this magnitude count as zero.
    pub epsilon: f64,
    /// Root sign rule for identity 3.
    pub sign_policy: SignPolicy,
    /// Number format for substituted text.
    pub format: NumberFormat,
}

impl Default for InversionContext {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            sign_policy: SignPolicy::default(),
            format: NumberFormat::default(),
        }
    }
}

/// Outcome of one successful inversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    /// Derived value.
    pub value: f64,
    /// Identity rearranged for the target.
    pub rearranged: String,
    /// Rearranged identity with numbers substituted.
    pub substituted: String,
}

type InvertFn = fn(&InversionContext, [f64; 3]) -> KinResult<Derivation>;

/// Solves one identity for one symbol from three operands.
#[derive(Clone, Copy)]
pub struct Inversion {
    /// Symbol produced.
    pub target: Symbol,
    /// Identity used.
    pub identity: Identity,
    /// Symbols consumed, in the order passed to the solver function.
    pub operands: [Symbol; 3],
    invert: InvertFn,
}

impl fmt::Debug for Inversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inversion")
            .field("target", &self.target)
            .field("identity", &self.identity)
            .field("operands", &self.operands)
            .finish_non_exhaustive()
    }
}

impl Inversion {
    /// Run the inversion on operand values given in `self.operands` order.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::DivisionByZero`] or [`KinError::NoRealSolution`]
    /// when the inversion is locally inapplicable.
    pub fn apply(&self, ctx: &InversionContext, operands: [f64; 3]) -> KinResult<Derivation> {
        (self.invert)(ctx, operands)
    }
}

const fn inv(target: Symbol, identity: Identity, operands: [Symbol; 3], invert: InvertFn) -> Inversion {
    Inversion {
        target,
        identity,
        operands,
        invert,
    }
}

static INITIAL_VELOCITY: [Inversion; 4] = [
    inv(VI, Identity::VelocityTime, [VF, A, T], v_from_velocity_time),
    inv(VI, Identity::AverageVelocity, [D, VF, T], v_from_average),
    inv(VI, Identity::DisplacementFromInitial, [D, A, T], v_from_displacement),
    inv(VI, Identity::VelocityDisplacement, [VF, A, D], v_from_energy),
];

static FINAL_VELOCITY: [Inversion; 4] = [
    inv(VF, Identity::VelocityTime, [VI, A, T], vf_from_velocity_time),
    inv(VF, Identity::AverageVelocity, [D, VI, T], vf_from_average),
    inv(VF, Identity::DisplacementFromFinal, [D, A, T], vf_from_displacement),
    inv(VF, Identity::VelocityDisplacement, [VI, A, D], vf_from_energy),
];

static DISPLACEMENT: [Inversion; 4] = [
    inv(D, Identity::VelocityDisplacement, [VF, VI, A], d_from_energy),
    inv(D, Identity::AverageVelocity, [VI, VF, T], d_from_average),
    inv(D, Identity::DisplacementFromInitial, [VI, A, T], d_from_initial),
    inv(D, Identity::DisplacementFromFinal, [VF, A, T], d_from_final),
];

static ACCELERATION: [Inversion; 4] = [
    inv(A, Identity::VelocityTime, [VF, VI, T], a_from_velocity_time),
    inv(A, Identity::VelocityDisplacement, [VF, VI, D], a_from_energy),
    inv(A, Identity::DisplacementFromInitial, [D, VI, T], a_from_initial),
    inv(A, Identity::DisplacementFromFinal, [D, VF, T], a_from_final),
];

static TIME: [Inversion; 4] = [
    inv(T, Identity::VelocityTime, [VF, VI, A], t_from_velocity_time),
    inv(T, Identity::AverageVelocity, [D, VI, VF], t_from_average),
    inv(T, Identity::DisplacementFromInitial, [D, VI, A], t_from_initial),
    inv(T, Identity::DisplacementFromFinal, [D, VF, A], t_from_final),
];

/// Candidate inversions for a symbol, in preference order.
#[must_use]
pub fn candidates(target: Symbol) -> &'static [Inversion] {
    match target {
        Symbol::InitialVelocity => &INITIAL_VELOCITY,
        Symbol::FinalVelocity => &FINAL_VELOCITY,
        Symbol::Displacement => &DISPLACEMENT,
        Symbol::Acceleration => &ACCELERATION,
        Symbol::Time => &TIME,
    }
}

fn nonzero(
    ctx: &InversionContext,
    value: f64,
    symbol: Symbol,
    identity: Identity,
    divisor: &'static str,
) -> KinResult<f64> {
    if value.abs() <= ctx.epsilon {
        Err(KinError::DivisionByZero {
            symbol,
            equation: identity.equation(),
            divisor,
        })
    } else {
        Ok(value)
    }
}

fn derived(value: f64, rearranged: &str, substituted: String) -> KinResult<Derivation> {
    Ok(Derivation {
        value,
        rearranged: rearranged.to_string(),
        substituted,
    })
}

/// Square-root inversion of identity 3 for one velocity given the other.
///
/// `sign` is `+1` when solving V from v and `-1` when solving v from V.
fn velocity_from_energy(
    ctx: &InversionContext,
    target: Symbol,
    companion: f64,
    a: f64,
    d: f64,
) -> KinResult<Derivation> {
    let root = energy_root(target, companion, a, d)?;
    let value = match ctx.sign_policy {
        SignPolicy::MatchCompanion if companion < 0.0 => -root,
        _ => root,
    };
    derived(
        value,
        energy_rearranged(target),
        energy_substituted(ctx.format, target, companion, a, d, value),
    )
}

/// Non-negative root of identity 3 solved for `target` (V from v, or v
/// from V).
///
/// # Errors
///
/// Returns [`KinError::NoRealSolution`] when the radicand is negative.
pub fn energy_root(target: Symbol, companion: f64, a: f64, d: f64) -> KinResult<f64> {
    let sign = if target == VF { 1.0 } else { -1.0 };
    let radicand = companion * companion + sign * 2.0 * a * d;
    if radicand < 0.0 {
        return Err(KinError::NoRealSolution {
            symbol: target,
            equation: Identity::VelocityDisplacement.equation(),
            quantity: "radicand",
            value: radicand,
        });
    }
    Ok(radicand.sqrt())
}

pub(crate) const fn energy_rearranged(target: Symbol) -> &'static str {
    if matches!(target, VF) {
        "V = ±√(v² + 2·a·Δd)"
    } else {
        "v = ±√(V² - 2·a·Δd)"
    }
}

pub(crate) fn energy_substituted(
    f: NumberFormat,
    target: Symbol,
    companion: f64,
    a: f64,
    d: f64,
    value: f64,
) -> String {
    let op = if target == VF { '+' } else { '-' };
    format!(
        "{} = ±√({}² {op} 2·{}·{}) = {}",
        target.glyph(),
        f.value(companion),
        f.value(a),
        f.value(d),
        f.signed(value)
    )
}

/// Root choice for a time quadratic `qa·t² + qb·t + qc = 0`.
///
/// Prefers the smaller non-negative root, then the only non-negative root,
/// and falls back to the larger (least negative) root.
#[must_use]
pub fn pick_time_root(r1: f64, r2: f64) -> f64 {
    match (r1 >= 0.0, r2 >= 0.0) {
        (true, true) => r1.min(r2),
        (true, false) => r1,
        (false, true) => r2,
        (false, false) => r1.max(r2),
    }
}

fn time_quadratic(
    ctx: &InversionContext,
    identity: Identity,
    velocity: Symbol,
    speed: f64,
    d: f64,
    a: f64,
) -> KinResult<Derivation> {
    let f = ctx.format;
    if (0.5 * a).abs() <= ctx.epsilon {
        // Degenerates to Δd = v·t (or Δd = V·t).
        let speed = nonzero(ctx, speed, T, identity, velocity.code())?;
        return derived(
            d / speed,
            &format!("t = Δd/{}", velocity.glyph()),
            format!("t = {}/{}", f.value(d), f.value(speed)),
        );
    }
    let qa = 0.5 * a;
    let (qb, qc) = if velocity == VI { (speed, -d) } else { (-speed, d) };
    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        return Err(KinError::NoRealSolution {
            symbol: T,
            equation: identity.equation(),
            quantity: "discriminant",
            value: discriminant,
        });
    }
    let sq = discriminant.sqrt();
    let r1 = (-qb + sq) / (2.0 * qa);
    let r2 = (-qb - sq) / (2.0 * qa);
    let t = pick_time_root(r1, r2);
    let rearranged = if identity == Identity::DisplacementFromInitial {
        "0.5·a·t² + v·t - Δd = 0 → t = (-B ± √(B² - 4·A·C))/(2·A)"
    } else {
        "0.5·a·t² - V·t + Δd = 0 → t = (-B ± √(B² - 4·A·C))/(2·A)"
    };
    derived(
        t,
        rearranged,
        format!(
            "A = {}, B = {}, C = {}, B² - 4·A·C = {}; t = {} or {}",
            f.value(qa),
            f.value(qb),
            f.value(qc),
            f.value(discriminant),
            f.value(r1),
            f.value(r2)
        ),
    )
}

// ===== initial velocity v =====

fn v_from_velocity_time(ctx: &InversionContext, [vf, a, t]: [f64; 3]) -> KinResult<Derivation> {
    let f = ctx.format;
    derived(
        vf - a * t,
        "v = V - a·t",
        format!("v = {} - {}·{}", f.value(vf), f.value(a), f.value(t)),
    )
}

fn v_from_average(ctx: &InversionContext, [d, vf, t]: [f64; 3]) -> KinResult<Derivation> {
    let t = nonzero(ctx, t, VI, Identity::AverageVelocity, "t")?;
    let f = ctx.format;
    derived(
        2.0 * d / t - vf,
        "v = (2·Δd/t) - V",
        format!("v = (2·{}/{}) - {}", f.value(d), f.value(t), f.value(vf)),
    )
}

fn v_from_displacement(ctx: &InversionContext, [d, a, t]: [f64; 3]) -> KinResult<Derivation> {
    let t = nonzero(ctx, t, VI, Identity::DisplacementFromInitial, "t")?;
    let f = ctx.format;
    derived(
        (d - 0.5 * a * t * t) / t,
        "v = (Δd - 0.5·a·t²)/t",
        format!(
            "v = ({} - 0.5·{}·{}²)/{}",
            f.value(d),
            f.value(a),
            f.value(t),
            f.value(t)
        ),
    )
}

fn v_from_energy(ctx: &InversionContext, [vf, a, d]: [f64; 3]) -> KinResult<Derivation> {
    velocity_from_energy(ctx, VI, vf, a, d)
}

// ===== final velocity V =====

fn vf_from_velocity_time(ctx: &InversionContext, [vi, a, t]: [f64; 3]) -> KinResult<Derivation> {
    let f = ctx.format;
    derived(
        vi + a * t,
        "V = v + a·t",
        format!("V = {} + {}·{}", f.value(vi), f.value(a), f.value(t)),
    )
}

fn vf_from_average(ctx: &InversionContext, [d, vi, t]: [f64; 3]) -> KinResult<Derivation> {
    let t = nonzero(ctx, t, VF, Identity::AverageVelocity, "t")?;
    let f = ctx.format;
    derived(
        2.0 * d / t - vi,
        "V = (2·Δd/t) - v",
        format!("V = (2·{}/{}) - {}", f.value(d), f.value(t), f.value(vi)),
    )
}

fn vf_from_displacement(ctx: &InversionContext, [d, a, t]: [f64; 3]) -> KinResult<Derivation> {
    let t = nonzero(ctx, t, VF, Identity::DisplacementFromFinal, "t")?;
    let f = ctx.format;
    derived(
        (d + 0.5 * a * t * t) / t,
        "V = (Δd + 0.5·a·t²)/t",
        format!(
            "V = ({} + 0.5·{}·{}²)/{}",
            f.value(d),
            f.value(a),
            f.value(t),
            f.value(t)
        ),
    )
}

fn vf_from_energy(ctx: &InversionContext, [vi, a, d]: [f64; 3]) -> KinResult<Derivation> {
    velocity_from_energy(ctx, VF, vi, a, d)
}

// ===== displacement d =====

fn d_from_energy(ctx: &InversionContext, [vf, vi, a]: [f64; 3]) -> KinResult<Derivation> {
    let a = nonzero(ctx, a, D, Identity::VelocityDisplacement, "a")?;
    let f = ctx.format;
    derived(
        (vf * vf - vi * vi) / (2.0 * a),
        "Δd = (V² - v²)/(2·a)",
        format!(
            "Δd = ({}² - {}²)/(2·{})",
            f.value(vf),
            f.value(vi),
            f.value(a)
        ),
    )
}

fn d_from_average(ctx: &InversionContext, [vi, vf, t]: [f64; 3]) -> KinResult<Derivation> {
    let f = ctx.format;
    derived(
        0.5 * (vi + vf) * t,
        "Δd = 0.5·(v+V)·t",
        format!(
            "Δd = 0.5·({} + {})·{}",
            f.value(vi),
            f.value(vf),
            f.value(t)
        ),
    )
}

fn d_from_initial(ctx: &InversionContext, [vi, a, t]: [f64; 3]) -> KinResult<Derivation> {
    let f = ctx.format;
    derived(
        vi * t + 0.5 * a * t * t,
        "Δd = v·t + 0.5·a·t²",
        format!(
            "Δd = {}·{} + 0.5·{}·{}²",
            f.value(vi),
            f.value(t),
            f.value(a),
            f.value(t)
        ),
    )
}

fn d_from_final(ctx: &InversionContext, [vf, a, t]: [f64; 3]) -> KinResult<Derivation> {
    let f = ctx.format;
    derived(
        vf * t - 0.5 * a * t * t,
        "Δd = V·t - 0.5·a·t²",
        format!(
            "Δd = {}·{} - 0.5·{}·{}²",
            f.value(vf),
            f.value(t),
            f.value(a),
            f.value(t)
        ),
    )
}

// ===== acceleration a =====

fn a_from_velocity_time(ctx: &InversionContext, [vf, vi, t]: [f64; 3]) -> KinResult<Derivation> {
    let t = nonzero(ctx, t, A, Identity::VelocityTime, "t")?;
    let f = ctx.format;
    derived(
        (vf - vi) / t,
        "a = (V - v)/t",
        format!("a = ({} - {})/{}", f.value(vf), f.value(vi), f.value(t)),
    )
}

fn a_from_energy(ctx: &InversionContext, [vf, vi, d]: [f64; 3]) -> KinResult<Derivation> {
    let d = nonzero(ctx, d, A, Identity::VelocityDisplacement, "Δd")?;
    let f = ctx.format;
    derived(
        (vf * vf - vi * vi) / (2.0 * d),
        "a = (V² - v²)/(2·Δd)",
        format!(
            "a = ({}² - {}²)/(2·{})",
            f.value(vf),
            f.value(vi),
            f.value(d)
        ),
    )
}

fn a_from_initial(ctx: &InversionContext, [d, vi, t]: [f64; 3]) -> KinResult<Derivation> {
    let t = nonzero(ctx, t, A, Identity::DisplacementFromInitial, "t")?;
    let f = ctx.format;
    derived(
        2.0 * (d - vi * t) / (t * t),
        "a = 2(Δd - v·t)/t²",
        format!(
            "a = 2({} - {}·{})/{}²",
            f.value(d),
            f.value(vi),
            f.value(t),
            f.value(t)
        ),
    )
}

fn a_from_final(ctx: &InversionContext, [d, vf, t]: [f64; 3]) -> KinResult<Derivation> {
    let t = nonzero(ctx, t, A, Identity::DisplacementFromFinal, "t")?;
    let f = ctx.format;
    derived(
        2.0 * (vf * t - d) / (t * t),
        "a = 2(V·t - Δd)/t²",
        format!(
            "a = 2({}·{} - {})/{}²",
            f.value(vf),
            f.value(t),
            f.value(d),
            f.value(t)
        ),
    )
}

// ===== time t =====

fn t_from_velocity_time(ctx: &InversionContext, [vf, vi, a]: [f64; 3]) -> KinResult<Derivation> {
    let a = nonzero(ctx, a, T, Identity::VelocityTime, "a")?;
    let f = ctx.format;
    derived(
        (vf - vi) / a,
        "t = (V - v)/a",
        format!("t = ({} - {})/{}", f.value(vf), f.value(vi), f.value(a)),
    )
}

fn t_from_average(ctx: &InversionContext, [d, vi, vf]: [f64; 3]) -> KinResult<Derivation> {
    let sum = nonzero(ctx, vi + vf, T, Identity::AverageVelocity, "v+V")?;
    let f = ctx.format;
    derived(
        2.0 * d / sum,
        "t = 2·Δd/(v+V)",
        format!(
            "t = 2·{}/({} + {})",
            f.value(d),
            f.value(vi),
            f.value(vf)
        ),
    )
}

fn t_from_initial(ctx: &InversionContext, [d, vi, a]: [f64; 3]) -> KinResult<Derivation> {
    // 0.5·a·t² + v·t - Δd = 0
    time_quadratic(ctx, Identity::DisplacementFromInitial, VI, vi, d, a)
}

fn t_from_final(ctx: &InversionContext, [d, vf, a]: [f64; 3]) -> KinResult<Derivation> {
    // 0.5·a·t² - V·t + Δd = 0
    time_quadratic(ctx, Identity::DisplacementFromFinal, VF, vf, d, a)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn ctx() -> InversionContext {
        InversionContext::default()
    }

    fn solved() -> KinematicValues {
        // v = 0, a = 9.8, t = 2
        KinematicValues {
            final_velocity: 19.6,
            initial_velocity: 0.0,
            displacement: 19.6,
            acceleration: 9.8,
            time: 2.0,
        }
    }

    #[test]
    fn test_every_candidate_targets_its_symbol() {
        for symbol in Symbol::ALL {
            let list = candidates(symbol);
            assert_eq!(list.len(), 4);
            for inversion in list {
                assert_eq!(inversion.target, symbol);
                assert!(!inversion.operands.contains(&symbol));
                let involved = inversion.identity.symbols();
                assert!(involved.contains(&symbol));
                for operand in inversion.operands {
                    assert!(involved.contains(&operand));
                }
            }
        }
    }

    #[test]
    fn test_final_velocity_preference_order() {
        let order: Vec<u8> = candidates(Symbol::FinalVelocity)
            .iter()
            .map(|i| i.identity.number())
            .collect();
        assert_eq!(order, vec![1, 5, 4, 3]);
    }

    #[test]
    fn test_every_inversion_reproduces_solved_values() {
        let values = solved();
        for symbol in Symbol::ALL {
            for inversion in candidates(symbol) {
                let operands = inversion.operands.map(|s| values.get(s));
                let derivation = inversion.apply(&ctx(), operands).expect("applicable");
                assert!(
                    (derivation.value - values.get(symbol)).abs() < 1e-9,
                    "{inversion:?} gave {}",
                    derivation.value
                );
            }
        }
    }

    #[test]
    fn test_residuals_vanish_on_consistent_values() {
        for identity in Identity::ALL {
            assert!(identity.residual(&solved()) < 1e-12, "{identity}");
        }
    }

    #[test]
    fn test_residual_detects_contradiction() {
        let mut values = solved();
        values.final_velocity = 25.0;
        assert!(Identity::VelocityTime.residual(&values) > 1e-3);
        assert!(Identity::DisplacementFromInitial.residual(&values) < 1e-12);
    }

    #[test]
    fn test_missing_symbol_not_involved() {
        for identity in Identity::ALL {
            assert!(!identity.symbols().contains(&identity.missing_symbol()));
        }
    }

    #[test]
    fn test_division_by_zero_is_local() {
        let err = a_from_velocity_time(&ctx(), [10.0, 0.0, 0.0]).expect_err("t = 0");
        assert!(err.is_local());
        assert!(matches!(err, KinError::DivisionByZero { divisor: "t", .. }));

        let err = t_from_average(&ctx(), [5.0, 3.0, -3.0]).expect_err("v+V = 0");
        assert!(matches!(err, KinError::DivisionByZero { divisor: "v+V", .. }));
    }

    #[test]
    fn test_energy_inversion_negative_radicand() {
        let err = vf_from_energy(&ctx(), [5.0, 2.0, -50.0]).expect_err("radicand < 0");
        match err {
            KinError::NoRealSolution { value, .. } => assert!((value + 175.0).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_energy_inversion_sign_matches_companion() {
        let positive = vf_from_energy(&ctx(), [3.0, 2.0, 4.0]).expect("real");
        assert!((positive.value - 5.0).abs() < 1e-12);

        let negative = vf_from_energy(&ctx(), [-3.0, 2.0, 4.0]).expect("real");
        assert!((negative.value + 5.0).abs() < 1e-12);
        assert!(negative.substituted.ends_with("-5"));

        let ctx = InversionContext {
            sign_policy: SignPolicy::NonNegative,
            ..InversionContext::default()
        };
        let forced = vf_from_energy(&ctx, [-3.0, 2.0, 4.0]).expect("real");
        assert!((forced.value - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_initial_velocity_from_energy() {
        // V² - 2ad = 25 - 16 = 9
        let d = v_from_energy(&ctx(), [5.0, 2.0, 4.0]).expect("real");
        assert!((d.value - 3.0).abs() < 1e-12);
        assert_eq!(d.rearranged, "v = ±√(V² - 2·a·Δd)");
    }

    #[test]
    fn test_pick_time_root() {
        assert!((pick_time_root(2.0, 5.0) - 2.0).abs() < f64::EPSILON);
        assert!((pick_time_root(-1.0, 3.0) - 3.0).abs() < f64::EPSILON);
        assert!((pick_time_root(4.0, -2.0) - 4.0).abs() < f64::EPSILON);
        assert!((pick_time_root(-4.0, -2.0) + 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_time_quadratic_from_initial_velocity() {
        // Δd = 0·t + 0.5·9.8·t² = 19.6 → t = 2
        let d = t_from_initial(&ctx(), [19.6, 0.0, 9.8]).expect("real");
        assert!((d.value - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_quadratic_from_final_velocity() {
        // Δd = 19.6·t - 4.9·t² = 19.6 → t = 2 (double root)
        let d = t_from_final(&ctx(), [19.6, 19.6, 9.8]).expect("real");
        assert!((d.value - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_time_quadratic_negative_discriminant() {
        // 0.5·(-2)·t² + 1·t - 10 = 0 → 1 - 40 < 0
        let err = t_from_initial(&ctx(), [10.0, 1.0, -2.0]).expect_err("no real t");
        assert!(matches!(
            err,
            KinError::NoRealSolution {
                quantity: "discriminant",
                ..
            }
        ));
    }

    #[test]
    fn test_time_quadratic_linear_when_no_acceleration() {
        let d = t_from_initial(&ctx(), [12.0, 3.0, 0.0]).expect("linear");
        assert!((d.value - 4.0).abs() < 1e-12);

        let err = t_from_initial(&ctx(), [12.0, 0.0, 0.0]).expect_err("v = 0");
        assert!(matches!(err, KinError::DivisionByZero { .. }));
    }

    #[test]
    fn test_substituted_text() {
        let d = vf_from_velocity_time(&ctx(), [0.0, 9.8, 2.0]).expect("ok");
        assert_eq!(d.substituted, "V = 0 + 9.8·2");
        assert_eq!(d.rearranged, "V = v + a·t");
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(Identity::VelocityTime.to_string(), "(1) V = v + a·t");
        assert_eq!(Identity::AverageVelocity.number(), 5);
    }
}
