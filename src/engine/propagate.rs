//! Fixed-point propagation over the candidate table.

use tracing::{debug, warn};

use super::identity::{candidates, Derivation, Identity, InversionContext};
use super::jidoka::JidokaGuard;
use super::state::{KinematicState, Symbol};
use super::step::{DerivationStep, NumberFormat};
use crate::error::{KinError, SolveFailure};

/// Upper bound on passes: one per derivable symbol plus a final idle pass.
pub const MAX_PASSES: usize = Symbol::ALL.len() + 1;

/// Completed propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    /// Fully solved state.
    pub state: KinematicState,
    /// Derivation log in causal order.
    pub steps: Vec<DerivationStep>,
}

/// Build the log entry for one successful inversion.
pub(crate) fn record(
    symbol: Symbol,
    identity: Identity,
    derivation: Derivation,
    format: NumberFormat,
) -> DerivationStep {
    DerivationStep {
        symbol,
        equation: identity.equation().to_string(),
        rearranged: derivation.rearranged,
        substituted: derivation.substituted,
        value: derivation.value,
        result: format.assignment(symbol, derivation.value),
    }
}

/// Derive every unknown symbol reachable through the five identities.
///
/// Each pass scans unknown symbols in [`Symbol::PRIORITY`] order and tries
/// their candidates in preference order. The first success is recorded and
/// the scan restarts, so a fresh value is usable immediately.
///
/// # Errors
///
/// Returns a [`SolveFailure`] carrying the steps derived so far when the
/// loop stalls with unknowns left, or when a derived value is non-finite.
pub fn propagate(
    mut state: KinematicState,
    ctx: &InversionContext,
    guard: &JidokaGuard,
) -> Result<Propagation, SolveFailure> {
    let mut steps = Vec::new();
    let mut rejected: Vec<KinError> = Vec::new();

    for pass in 0..MAX_PASSES {
        if state.is_solved() {
            break;
        }
        rejected.clear();
        if !derive_next(&mut state, ctx, guard, &mut steps, &mut rejected)? {
            debug!(pass, "no progress");
            break;
        }
    }

    if state.is_solved() {
        return Ok(Propagation { state, steps });
    }

    let missing = state.unknowns();
    warn!(?missing, derived = steps.len(), "propagation stalled");
    let error = rejected
        .into_iter()
        .find(|e| matches!(e, KinError::NoRealSolution { .. }))
        .unwrap_or_else(|| {
            KinError::inconsistent(
                &missing,
                "the known values do not pin them down; inputs may be inconsistent",
            )
        });
    Err(SolveFailure::with_steps(error, steps))
}

/// One scan: derive the first reachable unknown. Returns `Ok(false)` when
/// nothing could be derived.
fn derive_next(
    state: &mut KinematicState,
    ctx: &InversionContext,
    guard: &JidokaGuard,
    steps: &mut Vec<DerivationStep>,
    rejected: &mut Vec<KinError>,
) -> Result<bool, SolveFailure> {
    for symbol in Symbol::PRIORITY {
        if state.is_known(symbol) {
            continue;
        }
        for inversion in candidates(symbol) {
            let Some(operands) = state.operands(inversion.operands) else {
                continue;
            };
            match inversion.apply(ctx, operands) {
                Ok(derivation) => {
                    if let Err(e) = guard.check_derived(symbol, derivation.value) {
                        return Err(SolveFailure::with_steps(e, std::mem::take(steps)));
                    }
                    debug!(
                        %symbol,
                        identity = inversion.identity.number(),
                        value = derivation.value,
                        "derived"
                    );
                    state.fill(symbol, derivation.value);
                    steps.push(record(symbol, inversion.identity, derivation, ctx.format));
                    return Ok(true);
                }
                Err(e) => {
                    debug!(
                        %symbol,
                        identity = inversion.identity.number(),
                        error = %e,
                        "inversion rejected"
                    );
                    rejected.push(e);
                }
            }
        }
    }
    Ok(false)
}
