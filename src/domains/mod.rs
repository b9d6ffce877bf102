//! Consumers of a solved state.
//!
//! - Physics: fixed-step motion playback and viewport estimation

pub mod physics;

pub use physics::{
    sample_motion, Integrator, MotionFrame, MotionPlayback, SemiImplicitEuler, VerletIntegrator,
    ViewportRange,
};
