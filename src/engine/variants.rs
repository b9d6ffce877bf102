//! Variant resolver for the two-root velocity case.
//!
//! With `a`, `d` and exactly one velocity known (and `t` unknown), identity
//! 3 fixes the missing velocity only up to sign. Both completions are
//! returned; picking one is left to the caller.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::identity::{
    candidates, energy_rearranged, energy_root, energy_substituted, Identity, InversionContext,
};
use super::jidoka::JidokaGuard;
use super::propagate::record;
use super::state::{KinematicState, Symbol};
use super::step::DerivationStep;
use crate::error::KinResult;

/// One alternative completion of an ambiguous input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Inputs plus the chosen root and, if derivable, `t`.
    pub values: KinematicState,
    /// The velocity whose sign was chosen.
    pub velocity: Symbol,
    /// Time implied by this root, if derivable.
    pub time: Option<f64>,
    /// Velocity step followed by the time step (when derivable).
    pub steps: Vec<DerivationStep>,
}

/// Whether `state` is the two-root case: `t` unknown, exactly one of
/// `v`/`V` unknown, `a` and `d` known.
#[must_use]
pub fn applies(state: &KinematicState) -> bool {
    !state.is_known(Symbol::Time)
        && state.is_known(Symbol::Acceleration)
        && state.is_known(Symbol::Displacement)
        && (state.is_known(Symbol::InitialVelocity) != state.is_known(Symbol::FinalVelocity))
}

/// Produce the `+root` and `-root` variants for the missing velocity.
///
/// Returns an empty list if [`applies`] does not hold.
///
/// # Errors
///
/// Returns [`KinError::NoRealSolution`](crate::error::KinError::NoRealSolution)
/// on a negative radicand, or
/// [`KinError::NonFiniteValue`](crate::error::KinError::NonFiniteValue)
/// from the guard.
pub fn resolve_variants(
    state: &KinematicState,
    ctx: &InversionContext,
    guard: &JidokaGuard,
) -> KinResult<Vec<Variant>> {
    if !applies(state) {
        return Ok(Vec::new());
    }
    let Some([a, d]) = state.operands([Symbol::Acceleration, Symbol::Displacement]) else {
        return Ok(Vec::new());
    };
    let (target, companion) = match state.get(Symbol::InitialVelocity) {
        Some(vi) => (Symbol::FinalVelocity, vi),
        None => match state.get(Symbol::FinalVelocity) {
            Some(vf) => (Symbol::InitialVelocity, vf),
            None => return Ok(Vec::new()),
        },
    };

    let root = energy_root(target, companion, a, d)?;
    guard.check_derived(target, root)?;
    info!(%target, root, "two-root case, returning both variants");

    [root, -root]
        .into_iter()
        .map(|value| build_variant(state, target, [companion, a, d], value, ctx, guard))
        .collect()
}

fn build_variant(
    base: &KinematicState,
    target: Symbol,
    [companion, a, d]: [f64; 3],
    value: f64,
    ctx: &InversionContext,
    guard: &JidokaGuard,
) -> KinResult<Variant> {
    let mut values = base.with(target, value);
    let mut steps = vec![DerivationStep {
        symbol: target,
        equation: Identity::VelocityDisplacement.equation().to_string(),
        rearranged: energy_rearranged(target).to_string(),
        substituted: energy_substituted(ctx.format, target, companion, a, d, value),
        value,
        result: ctx.format.assignment(target, value),
    }];

    // Identity 1 needs a ≠ 0, identity 5 needs v+V ≠ 0.
    let time_candidates = candidates(Symbol::Time).iter().filter(|inversion| {
        matches!(
            inversion.identity,
            Identity::VelocityTime | Identity::AverageVelocity
        )
    });
    let mut time = None;
    for inversion in time_candidates {
        let Some(operands) = values.operands(inversion.operands) else {
            continue;
        };
        match inversion.apply(ctx, operands) {
            Ok(derivation) => {
                guard.check_derived(Symbol::Time, derivation.value)?;
                time = Some(derivation.value);
                values.fill(Symbol::Time, derivation.value);
                steps.push(record(Symbol::Time, inversion.identity, derivation, ctx.format));
                break;
            }
            Err(e) => debug!(identity = inversion.identity.number(), error = %e, "time not derivable"),
        }
    }

    Ok(Variant {
        values,
        velocity: target,
        time,
        steps,
    })
}

/// Index of the variant picked automatically.
///
/// Prefers the largest time above `positive_epsilon`; otherwise the smallest
/// `|t|` among variants with a time; otherwise the first.
#[must_use]
pub fn auto_pick(variants: &[Variant], positive_epsilon: f64) -> usize {
    let timed = || {
        variants
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.time.map(|t| (i, t)))
    };
    timed()
        .filter(|(_, t)| *t > positive_epsilon)
        // First of the maxima.
        .min_by(|x, y| y.1.total_cmp(&x.1))
        .or_else(|| timed().min_by(|x, y| x.1.abs().total_cmp(&y.1.abs())))
        .map_or(0, |(i, _)| i)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::KinError;

    fn resolve(state: &KinematicState) -> KinResult<Vec<Variant>> {
        resolve_variants(state, &InversionContext::default(), &JidokaGuard::default())
    }

    fn variant(time: Option<f64>) -> Variant {
        Variant {
            values: KinematicState::new(),
            velocity: Symbol::FinalVelocity,
            time,
            steps: Vec::new(),
        }
    }

    #[test]
    fn test_applies_only_to_two_root_case() {
        let base = KinematicState::new()
            .with(Symbol::Acceleration, 2.0)
            .with(Symbol::Displacement, 12.0);
        assert!(applies(&base.with(Symbol::InitialVelocity, 5.0)));
        assert!(applies(&base.with(Symbol::FinalVelocity, 5.0)));
        assert!(!applies(
            &base
                .with(Symbol::InitialVelocity, 5.0)
                .with(Symbol::FinalVelocity, 5.0)
        ));
        assert!(!applies(
            &base
                .with(Symbol::InitialVelocity, 5.0)
                .with(Symbol::Time, 1.0)
        ));
        assert!(!applies(&base));
    }

    #[test]
    fn test_two_variants_with_times() {
        let state = KinematicState::new()
            .with(Symbol::InitialVelocity, 5.0)
            .with(Symbol::Acceleration, 2.0)
            .with(Symbol::Displacement, 12.0);
        let variants = resolve(&state).expect("real root");
        assert_eq!(variants.len(), 2);

        let root = 73f64.sqrt();
        let plus = &variants[0];
        let minus = &variants[1];
        assert_eq!(plus.velocity, Symbol::FinalVelocity);
        assert!((plus.values.get(Symbol::FinalVelocity).unwrap_or_default() - root).abs() < 1e-12);
        assert!((minus.values.get(Symbol::FinalVelocity).unwrap_or_default() + root).abs() < 1e-12);

        let t_plus = plus.time.expect("a ≠ 0");
        let t_minus = minus.time.expect("a ≠ 0");
        assert!((t_plus - (root - 5.0) / 2.0).abs() < 1e-12);
        assert!((t_minus - (-root - 5.0) / 2.0).abs() < 1e-12);

        assert_eq!(plus.steps.len(), 2);
        assert_eq!(plus.steps[0].rearranged, "V = ±√(v² + 2·a·Δd)");
        assert_eq!(plus.steps[0].substituted, "V = ±√(5² + 2·2·12) = +8.544");
        assert_eq!(minus.steps[0].substituted, "V = ±√(5² + 2·2·12) = -8.544");
        assert_eq!(plus.steps[1].equation, "V = v + a·t");
    }

    #[test]
    fn test_solving_initial_velocity_from_final() {
        let state = KinematicState::new()
            .with(Symbol::FinalVelocity, 5.0)
            .with(Symbol::Acceleration, 2.0)
            .with(Symbol::Displacement, 4.0);
        let variants = resolve(&state).expect("real root");
        assert_eq!(variants[0].velocity, Symbol::InitialVelocity);
        assert!((variants[0].values.get(Symbol::InitialVelocity).unwrap_or_default() - 3.0).abs() < 1e-12);
        assert_eq!(variants[0].steps[0].rearranged, "v = ±√(V² - 2·a·Δd)");
    }

    #[test]
    fn test_negative_radicand() {
        let state = KinematicState::new()
            .with(Symbol::InitialVelocity, 5.0)
            .with(Symbol::Acceleration, 2.0)
            .with(Symbol::Displacement, -50.0);
        let err = resolve(&state).expect_err("radicand -175");
        assert!(matches!(err, KinError::NoRealSolution { .. }));
    }

    #[test]
    fn test_zero_acceleration_falls_back_to_average() {
        // a = 0, d = 0: V = ±v; only the +v variant has v+V ≠ 0.
        let state = KinematicState::new()
            .with(Symbol::InitialVelocity, 3.0)
            .with(Symbol::Acceleration, 0.0)
            .with(Symbol::Displacement, 0.0);
        let variants = resolve(&state).expect("real root");
        assert_eq!(variants[0].time, Some(0.0));
        assert_eq!(variants[0].steps[1].equation, "Δd = 0.5·(v+V)·t");
        assert_eq!(variants[1].time, None);
        assert_eq!(variants[1].steps.len(), 1);
    }

    #[test]
    fn test_auto_pick_largest_positive_time() {
        let variants = vec![variant(Some(1.0)), variant(Some(3.0))];
        assert_eq!(auto_pick(&variants, 1e-9), 1);
        let ties = vec![variant(Some(2.0)), variant(Some(2.0))];
        assert_eq!(auto_pick(&ties, 1e-9), 0);
    }

    #[test]
    fn test_auto_pick_smallest_magnitude_when_none_positive() {
        let variants = vec![variant(Some(-4.0)), variant(Some(-1.0))];
        assert_eq!(auto_pick(&variants, 1e-9), 1);
        let variants = vec![variant(None), variant(Some(0.0))];
        assert_eq!(auto_pick(&variants, 1e-9), 1);
    }

    #[test]
    fn test_auto_pick_defaults_to_first() {
        assert_eq!(auto_pick(&[variant(None), variant(None)], 1e-9), 0);
        assert_eq!(auto_pick(&[], 1e-9), 0);
    }
}
