//! Jidoka (自働化) - stop-on-error checks for the solver.
//!
//! The guard stops a solve as soon as something is wrong instead of letting
//! bad numbers reach the derivation log.
//!
//! # Checks
//!
//! 1. **Non-finite inputs**: NaN or Inf in a known value
//! 2. **Non-finite derived values**: an inversion produced NaN or Inf
//! 3. **Identity residuals**: on a completed state, every identity must hold
//!    within the configured relative tolerance
//!
//! # Severity Levels
//!
//! Residuals use graduated severity:
//! - **Acceptable**: within tolerance, continue normally
//! - **Warning**: approaching tolerance, log and continue
//! - **Critical**: tolerance exceeded, stop the line
//! - **Fatal**: residual is itself non-finite

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::identity::Identity;
use super::state::{KinematicState, KinematicValues, Symbol};
use crate::config::KinConfig;
use crate::error::{KinError, KinResult};

/// Severity levels for Jidoka violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationSeverity {
    /// Acceptable variance within tolerance (continue).
    Acceptable,
    /// Warning: approaching tolerance boundary (log, continue).
    Warning,
    /// Critical: tolerance exceeded (stop the line).
    Critical,
    /// Fatal: unrecoverable state (halt immediately).
    Fatal,
}

/// Classifier for graduated Jidoka responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeverityClassifier {
    /// Warning threshold as fraction of tolerance (e.g., 0.8 = warn at 80%).
    pub warning_fraction: f64,
}

impl Default for SeverityClassifier {
    fn default() -> Self {
        Self {
            warning_fraction: 0.8,
        }
    }
}

impl SeverityClassifier {
    /// Classify an identity residual.
    #[must_use]
    pub fn classify_residual(&self, residual: f64, tolerance: f64) -> ViolationSeverity {
        if !residual.is_finite() {
            ViolationSeverity::Fatal
        } else if residual > tolerance {
            ViolationSeverity::Critical
        } else if residual > tolerance * self.warning_fraction {
            ViolationSeverity::Warning
        } else {
            ViolationSeverity::Acceptable
        }
    }
}

/// Residual close to, but within, tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidualWarning {
    /// Identity whose residual is high.
    pub identity: Identity,
    /// Relative residual.
    pub residual: f64,
    /// Configured tolerance.
    pub tolerance: f64,
}

/// Jidoka guard for the equation engine.
///
/// # Example
///
/// ```rust
/// use kinesolve::engine::jidoka::JidokaGuard;
/// use kinesolve::engine::state::{KinematicState, Symbol};
///
/// let guard = JidokaGuard::new(1e-6);
/// let state = KinematicState::new().with(Symbol::Acceleration, 9.8);
/// assert!(guard.check_inputs(&state).is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JidokaGuard {
    tolerance: f64,
    classifier: SeverityClassifier,
}

impl Default for JidokaGuard {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl JidokaGuard {
    /// Create a guard with the given relative residual tolerance.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            classifier: SeverityClassifier::default(),
        }
    }

    /// Create from solver configuration.
    #[must_use]
    pub fn from_config(config: &KinConfig) -> Self {
        Self::new(config.solver.consistency_tolerance)
    }

    /// Residual tolerance in use.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Reject non-finite known inputs.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::NonFiniteValue`] naming the first offending input.
    pub fn check_inputs(&self, state: &KinematicState) -> KinResult<()> {
        for (symbol, value) in state.iter() {
            if let Some(value) = value {
                check_finite(value, || format!("input.{symbol}"))?;
            }
        }
        Ok(())
    }

    /// Reject a non-finite derived value.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::NonFiniteValue`] if `value` is NaN or Inf.
    pub fn check_derived(&self, symbol: Symbol, value: f64) -> KinResult<()> {
        check_finite(value, || format!("derived.{symbol}"))
    }

    /// Verify every identity on a completed state.
    ///
    /// Returns warnings for residuals approaching the tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::Inconsistent`] when a residual exceeds the
    /// tolerance, or [`KinError::NonFiniteValue`] when it is not finite.
    pub fn check_consistency(&self, values: &KinematicValues) -> KinResult<Vec<ResidualWarning>> {
        let mut warnings = Vec::new();
        for identity in Identity::ALL {
            let residual = identity.residual(values);
            match self.classifier.classify_residual(residual, self.tolerance) {
                ViolationSeverity::Acceptable => {}
                ViolationSeverity::Warning => {
                    warn!(%identity, residual, tolerance = self.tolerance, "residual near tolerance");
                    warnings.push(ResidualWarning {
                        identity,
                        residual,
                        tolerance: self.tolerance,
                    });
                }
                ViolationSeverity::Critical => {
                    return Err(KinError::inconsistent(
                        &[],
                        format!(
                            "known values are contradictory; identity {identity} is off by {residual:.3e} (tolerance {:.1e})",
                            self.tolerance
                        ),
                    ));
                }
                ViolationSeverity::Fatal => {
                    return Err(KinError::NonFiniteValue {
                        location: format!("residual of identity {}", identity.number()),
                    });
                }
            }
        }
        Ok(warnings)
    }
}

fn check_finite(value: f64, location: impl FnOnce() -> String) -> KinResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(KinError::NonFiniteValue {
            location: location(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn consistent() -> KinematicValues {
        KinematicValues {
            final_velocity: 10.0,
            initial_velocity: 0.0,
            displacement: 20.0,
            acceleration: 2.5,
            time: 4.0,
        }
    }

    #[test]
    fn test_severity_classification() {
        let c = SeverityClassifier::default();
        assert_eq!(c.classify_residual(0.0, 1e-6), ViolationSeverity::Acceptable);
        assert_eq!(c.classify_residual(9e-7, 1e-6), ViolationSeverity::Warning);
        assert_eq!(c.classify_residual(2e-6, 1e-6), ViolationSeverity::Critical);
        assert_eq!(c.classify_residual(f64::NAN, 1e-6), ViolationSeverity::Fatal);
        assert!(ViolationSeverity::Fatal > ViolationSeverity::Critical);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let guard = JidokaGuard::default();
        let state = KinematicState::new()
            .with(Symbol::InitialVelocity, 0.0)
            .with(Symbol::Acceleration, f64::NAN);
        let err = guard.check_inputs(&state).expect_err("NaN input");
        assert!(err.is_jidoka_violation());
        assert!(err.to_string().contains("input.a"));
    }

    #[test]
    fn test_non_finite_derived_rejected() {
        let guard = JidokaGuard::default();
        assert!(guard.check_derived(Symbol::Time, 4.0).is_ok());
        let err = guard
            .check_derived(Symbol::Time, f64::INFINITY)
            .expect_err("inf");
        assert!(err.to_string().contains("derived.t"));
    }

    #[test]
    fn test_consistent_state_passes() {
        let guard = JidokaGuard::default();
        let warnings = guard.check_consistency(&consistent()).expect("consistent");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_contradictory_state_fails() {
        let guard = JidokaGuard::default();
        let mut values = consistent();
        values.time = 5.0;
        let err = guard.check_consistency(&values).expect_err("contradictory");
        assert!(matches!(err, KinError::Inconsistent { .. }));
        assert!(err.to_string().contains("contradictory"));
    }

    #[test]
    fn test_near_tolerance_warns() {
        let guard = JidokaGuard::new(1e-6);
        let mut values = consistent();
        // Identity 3 residual: (V² - 100) / V² ≈ 9e-7
        values.final_velocity += 4.5e-6;
        let warnings = guard.check_consistency(&values).expect("within tolerance");
        assert!(warnings
            .iter()
            .any(|w| w.identity == Identity::VelocityDisplacement));
    }

    #[test]
    fn test_from_config() {
        let config = KinConfig::builder().build();
        let guard = JidokaGuard::from_config(&config);
        assert!((guard.tolerance() - 1e-6).abs() < f64::EPSILON);
    }
}
