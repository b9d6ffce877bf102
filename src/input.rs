//! Reading user-entered values.
//!
//! Empty, unparsable or non-finite text means "unknown", never an error.
//! Only a malformed `name=value` token or an unknown symbol name is rejected.

use crate::engine::state::{KinematicState, Symbol};
use crate::error::{KinError, KinResult};

/// Parse one entry field. Blank, garbage, NaN and infinities are absent.
#[must_use]
pub fn parse_field(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Parse a `name=value` token such as `V=10` or `d=` (unknown).
///
/// # Errors
///
/// Returns [`KinError::Config`] if the token has no `=` or names an unknown
/// symbol.
pub fn parse_assignment(token: &str) -> KinResult<(Symbol, Option<f64>)> {
    let (name, value) = token
        .split_once('=')
        .ok_or_else(|| KinError::config(format!("expected name=value, got '{token}'")))?;
    let symbol = Symbol::from_code(name.trim()).ok_or_else(|| {
        KinError::config(format!(
            "unknown quantity '{}': use one of V, v, d, a, t",
            name.trim()
        ))
    })?;
    Ok((symbol, parse_field(value)))
}

/// Build an input state from `name=value` tokens. Later tokens win.
///
/// # Errors
///
/// See [`parse_assignment`].
pub fn state_from_assignments<I, S>(tokens: I) -> KinResult<KinematicState>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens.into_iter().try_fold(KinematicState::new(), |state, token| {
        let (symbol, value) = parse_assignment(token.as_ref())?;
        Ok(state.with_opt(symbol, value))
    })
}
