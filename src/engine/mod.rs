//! Equation engine.
//!
//! Solves one-dimensional constant-acceleration motion from any three of
//! `V`, `v`, `d`, `a`, `t`:
//! - Known-set validation
//! - Fixed-point propagation over the five identities
//! - Two-root variant resolution
//! - Jidoka guards for stop-on-error
//!
//! A solve is a pure function of its input: no I/O, no shared state.

pub mod identity;
pub mod jidoka;
pub mod propagate;
pub mod state;
pub mod step;
pub mod validator;
pub mod variants;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use identity::{Identity, InversionContext};
pub use jidoka::{JidokaGuard, ResidualWarning};
pub use state::{KinematicState, KinematicValues, Symbol};
pub use step::{DerivationStep, NumberFormat};
pub use variants::Variant;

use crate::config::{KinConfig, KnownsPolicy};
use crate::error::{KinError, KinResult, SolveFailure};

/// Result of a successful solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Solution {
    /// Every symbol determined.
    Solved {
        /// All five values.
        values: KinematicValues,
        /// Derivation log in causal order.
        steps: Vec<DerivationStep>,
        /// Identities whose residual came close to the tolerance.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<ResidualWarning>,
    },
    /// Two valid completions; the caller picks one.
    Variants {
        /// The known inputs.
        base: KinematicState,
        /// Index chosen by [`VariantChoice::Auto`].
        auto_index: usize,
        /// `+root` first, then `-root`.
        variants: Vec<Variant>,
    },
}

/// How to pick among variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariantChoice {
    /// Largest positive time, else smallest `|t|`, else the first.
    #[default]
    Auto,
    /// Zero-based index.
    Index(usize),
}

impl std::str::FromStr for VariantChoice {
    type Err = KinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse::<usize>()
            .map(Self::Index)
            .map_err(|_| KinError::config(format!("invalid variant '{s}': expected 'auto' or an index")))
    }
}

/// A single final state, ready for display or playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSolution {
    /// Final values (`t` may be absent for a variant without a time).
    pub values: KinematicState,
    /// Derivation log.
    pub steps: Vec<DerivationStep>,
    /// Index of the chosen variant, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<usize>,
}

impl Solution {
    /// Whether this is the two-root case.
    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Variants { .. })
    }

    /// Collapse to a single final state.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::VariantOutOfRange`] for an index past the end.
    pub fn resolve(&self, choice: VariantChoice) -> KinResult<ResolvedSolution> {
        match self {
            Self::Solved { values, steps, .. } => Ok(ResolvedSolution {
                values: (*values).into(),
                steps: steps.clone(),
                variant: None,
            }),
            Self::Variants {
                auto_index,
                variants,
                ..
            } => {
                let index = match choice {
                    VariantChoice::Auto => *auto_index,
                    VariantChoice::Index(i) => i,
                };
                let chosen = variants.get(index).ok_or(KinError::VariantOutOfRange {
                    index,
                    available: variants.len(),
                })?;
                Ok(ResolvedSolution {
                    values: chosen.values,
                    steps: chosen.steps.clone(),
                    variant: Some(index),
                })
            }
        }
    }
}

/// Equation engine configured from [`KinConfig`].
///
/// # Example
///
/// ```rust
/// use kinesolve::engine::{Solution, Solver, KinematicState, Symbol};
///
/// let input = KinematicState::new()
///     .with(Symbol::InitialVelocity, 0.0)
///     .with(Symbol::Acceleration, 9.8)
///     .with(Symbol::Time, 2.0);
/// let solution = Solver::default().solve(input).expect("solvable");
/// if let Solution::Solved { values, .. } = solution {
///     assert!((values.displacement - 19.6).abs() < 1e-9);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    ctx: InversionContext,
    guard: JidokaGuard,
    knowns_policy: KnownsPolicy,
    enumerate_variants: bool,
    positive_time_epsilon: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(&KinConfig::default())
    }
}

impl Solver {
    /// Create an engine from configuration.
    #[must_use]
    pub fn new(config: &KinConfig) -> Self {
        Self {
            ctx: InversionContext {
                epsilon: config.solver.division_epsilon,
                sign_policy: config.solver.sign_policy,
                format: NumberFormat::new(config.display.decimals),
            },
            guard: JidokaGuard::from_config(config),
            knowns_policy: config.solver.knowns_policy,
            enumerate_variants: config.solver.enumerate_variants,
            positive_time_epsilon: config.solver.positive_time_epsilon,
        }
    }

    /// Number format used for derivation text.
    #[must_use]
    pub const fn format(&self) -> NumberFormat {
        self.ctx.format
    }

    /// Solve for every unknown symbol.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveFailure`] (with any partial derivation log) on
    /// insufficient or non-finite input, a stalled propagation, an imaginary
    /// root, or contradictory knowns.
    pub fn solve(&self, input: KinematicState) -> Result<Solution, SolveFailure> {
        self.guard.check_inputs(&input)?;
        validator::validate(&input, self.knowns_policy)?;

        if self.enumerate_variants && variants::applies(&input) {
            let variants = variants::resolve_variants(&input, &self.ctx, &self.guard)?;
            let auto_index = variants::auto_pick(&variants, self.positive_time_epsilon);
            return Ok(Solution::Variants {
                base: input,
                auto_index,
                variants,
            });
        }

        let propagation = propagate::propagate(input, &self.ctx, &self.guard)?;
        let Some(values) = propagation.state.to_values() else {
            let missing = propagation.state.unknowns();
            return Err(SolveFailure::with_steps(
                KinError::inconsistent(&missing, "propagation ended early"),
                propagation.steps,
            ));
        };
        let warnings = match self.guard.check_consistency(&values) {
            Ok(warnings) => warnings,
            Err(e) => return Err(SolveFailure::with_steps(e, propagation.steps)),
        };
        debug!(steps = propagation.steps.len(), warnings = warnings.len(), "solved");
        Ok(Solution::Solved {
            values,
            steps: propagation.steps,
            warnings,
        })
    }
}

/// Solve with default configuration.
///
/// # Errors
///
/// See [`Solver::solve`].
pub fn solve(input: KinematicState) -> Result<Solution, SolveFailure> {
    Solver::default().solve(input)
}
