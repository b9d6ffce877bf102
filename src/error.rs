//! Error types for kinesolve.
//!
//! Every fallible operation returns `Result<T, KinError>` instead of
//! panicking. Solver failures are wrapped in [`SolveFailure`] so the caller
//! can still display whatever derivation log had accumulated.

use thiserror::Error;

use crate::engine::state::Symbol;
use crate::engine::step::DerivationStep;

/// Result type alias for kinesolve operations.
pub type KinResult<T> = Result<T, KinError>;

/// Unified error type for all kinesolve operations.
#[derive(Debug, Error)]
pub enum KinError {
    // ===== Input Errors =====
    /// Fewer known scalars than the solver requires.
    #[error("Need at least {required} known values (V, v, d, a, t), got {known}")]
    InsufficientKnowns {
        /// Number of known scalars supplied.
        known: usize,
        /// Minimum required.
        required: usize,
    },

    /// More known scalars than the `exactly` policy allows.
    #[error("Please provide exactly {allowed} inputs, got {known}")]
    TooManyKnowns {
        /// Number of known scalars supplied.
        known: usize,
        /// Number allowed.
        allowed: usize,
    },

    // ===== Solver Errors =====
    /// Propagation stalled or the known values contradict each other.
    #[error("Could not determine all missing values{}: {reason}", missing_list(.missing))]
    Inconsistent {
        /// Comma-separated symbols left unknown (empty when contradictory).
        missing: String,
        /// Why the solver gave up.
        reason: String,
    },

    /// An inversion would divide by a quantity indistinguishable from zero.
    #[error("Cannot compute {symbol} from {equation}: {divisor} is zero")]
    DivisionByZero {
        /// Symbol being solved for.
        symbol: Symbol,
        /// Identity in symbolic form.
        equation: &'static str,
        /// The vanishing denominator.
        divisor: &'static str,
    },

    /// A square root of a negative number was required.
    #[error("No real solution for {symbol} from {equation} ({quantity} = {value:.6} < 0)")]
    NoRealSolution {
        /// Symbol being solved for.
        symbol: Symbol,
        /// Identity in symbolic form.
        equation: &'static str,
        /// Name of the negative quantity (radicand or discriminant).
        quantity: &'static str,
        /// Its value.
        value: f64,
    },

    // ===== Jidoka Violations =====
    /// NaN or infinity in an input or derived value.
    #[error("Jidoka: non-finite value detected at {location}")]
    NonFiniteValue {
        /// Where the value was found.
        location: String,
    },

    /// A variant index outside the returned set was requested.
    #[error("Variant {index} requested but only {available} available")]
    VariantOutOfRange {
        /// Requested index (zero-based).
        index: usize,
        /// Number of variants.
        available: usize,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KinError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an inconsistency error for the given unknown symbols.
    #[must_use]
    pub fn inconsistent(missing: &[Symbol], reason: impl Into<String>) -> Self {
        let missing = missing
            .iter()
            .map(|s| s.code())
            .collect::<Vec<_>>()
            .join(", ");
        Self::Inconsistent {
            missing,
            reason: reason.into(),
        }
    }

    /// Check if this error is local to one identity inversion.
    ///
    /// Local failures never abort a solve: the propagation loop moves on to
    /// the next candidate identity.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::DivisionByZero { .. } | Self::NoRealSolution { .. }
        )
    }

    /// Check if this error is a Jidoka violation (requires immediate stop).
    #[must_use]
    pub const fn is_jidoka_violation(&self) -> bool {
        matches!(self, Self::NonFiniteValue { .. })
    }
}

fn missing_list(missing: &str) -> String {
    if missing.is_empty() {
        String::new()
    } else {
        format!(" ({missing})")
    }
}

/// A failed solve, carrying the derivation log accumulated before failure.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SolveFailure {
    /// Why the solve failed.
    #[source]
    pub error: KinError,
    /// Steps derived before the failure (possibly empty).
    pub partial_steps: Vec<DerivationStep>,
}

impl SolveFailure {
    /// Wrap an error that occurred before any step was derived.
    #[must_use]
    pub const fn new(error: KinError) -> Self {
        Self {
            error,
            partial_steps: Vec::new(),
        }
    }

    /// Wrap an error together with the partial derivation log.
    #[must_use]
    pub const fn with_steps(error: KinError, partial_steps: Vec<DerivationStep>) -> Self {
        Self {
            error,
            partial_steps,
        }
    }
}

impl From<KinError> for SolveFailure {
    fn from(error: KinError) -> Self {
        Self::new(error)
    }
}
