//! # kinesolve
//!
//! Constant-acceleration kinematics solver.
//!
//! Given any three of final velocity `V`, initial velocity `v`, distance `d`,
//! acceleration `a` and time `t`, derives the other two and records a
//! human-readable derivation for every value:
//! - Declarative identity table, iterated to a fixed point
//! - Both roots surfaced when a velocity is only known up to sign
//! - Jidoka guards: non-finite values and contradictions stop the solve
//!
//! ## Example
//!
//! ```rust
//! use kinesolve::prelude::*;
//!
//! let input = KinematicState::new()
//!     .with(Symbol::FinalVelocity, 10.0)
//!     .with(Symbol::InitialVelocity, 0.0)
//!     .with(Symbol::Displacement, 20.0);
//!
//! let resolved = solve(input)
//!     .expect("solvable")
//!     .resolve(VariantChoice::Auto)
//!     .expect("no variants");
//! assert_eq!(resolved.values.get(Symbol::Time), Some(4.0));
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_possible_wrap,
    clippy::suboptimal_flops,  // Formulas are written as they read on paper
    clippy::imprecise_flops,
    clippy::many_single_char_names,
    clippy::missing_const_for_fn,
)]

pub mod cli;
pub mod config;
pub mod domains;
pub mod engine;
pub mod error;
pub mod input;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{KinConfig, KinConfigBuilder, KnownsPolicy, SignPolicy};
    pub use crate::domains::physics::{MotionFrame, MotionPlayback, ViewportRange};
    pub use crate::engine::{
        solve, DerivationStep, KinematicState, KinematicValues, ResolvedSolution, Solution,
        Solver, Symbol, Variant, VariantChoice,
    };
    pub use crate::error::{KinError, KinResult, SolveFailure};
    pub use crate::input::parse_field;
}

/// Re-export for public API
pub use error::{KinError, KinResult};
