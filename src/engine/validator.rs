//! Known-set validation.

use super::state::KinematicState;
use crate::config::KnownsPolicy;
use crate::error::{KinError, KinResult};

/// Number of knowns that pins down a constant-acceleration motion.
pub const REQUIRED_KNOWNS: usize = 3;

/// Check that enough (and, under [`KnownsPolicy::Exactly`], not too many)
/// values are known.
///
/// # Errors
///
/// Returns [`KinError::InsufficientKnowns`] for fewer than three knowns and
/// [`KinError::TooManyKnowns`] for more than three under the exact policy.
pub fn validate(state: &KinematicState, policy: KnownsPolicy) -> KinResult<()> {
    let known = state.known_count();
    if known < REQUIRED_KNOWNS {
        return Err(KinError::InsufficientKnowns {
            known,
            required: REQUIRED_KNOWNS,
        });
    }
    if policy == KnownsPolicy::Exactly && known > REQUIRED_KNOWNS {
        return Err(KinError::TooManyKnowns {
            known,
            allowed: REQUIRED_KNOWNS,
        });
    }
    Ok(())
}
