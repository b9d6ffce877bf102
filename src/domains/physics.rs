//! Motion playback for a solved state.
//!
//! Replays one-dimensional constant-acceleration motion from `x = 0` with a
//! fixed timestep, and estimates the position range a viewer needs to show
//! the whole travel. This is presentation support only: the equation engine
//! never depends on it.

use serde::{Deserialize, Serialize};

use crate::config::{IntegratorKind, PlaybackConfig};
use crate::engine::state::{KinematicState, Symbol};
use crate::error::{KinError, KinResult};

/// Position and velocity of the moving point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointState {
    /// Position (m).
    pub position: f64,
    /// Velocity (m/s).
    pub velocity: f64,
}

/// Numerical integrator trait.
pub trait Integrator {
    /// Advance `state` by `dt` under constant acceleration `a`.
    fn step(&self, state: &mut PointState, a: f64, dt: f64);

    /// Get the error order of this integrator.
    fn error_order(&self) -> u32;
}

/// Semi-implicit (symplectic) Euler integrator.
///
/// Algorithm:
/// ```text
/// v_{n+1} = v_n + h * a
/// x_{n+1} = x_n + h * v_{n+1}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn step(&self, state: &mut PointState, a: f64, dt: f64) {
        state.velocity += a * dt;
        state.position += state.velocity * dt;
    }

    fn error_order(&self) -> u32 {
        1
    }
}

/// Störmer-Verlet integrator.
///
/// Exact for constant acceleration up to rounding.
///
/// Algorithm:
/// ```text
/// q_{n+1/2} = q_n + (h/2) * v_n
/// v_{n+1}   = v_n + h * a
/// q_{n+1}   = q_{n+1/2} + (h/2) * v_{n+1}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VerletIntegrator;

impl Integrator for VerletIntegrator {
    fn step(&self, state: &mut PointState, a: f64, dt: f64) {
        let half_dt = dt / 2.0;
        state.position += half_dt * state.velocity;
        state.velocity += a * dt;
        state.position += half_dt * state.velocity;
    }

    fn error_order(&self) -> u32 {
        2
    }
}

/// One sampled playback frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionFrame {
    /// Elapsed time (s).
    pub elapsed: f64,
    /// Position (m).
    pub position: f64,
    /// Velocity (m/s).
    pub velocity: f64,
}

/// Fixed-step replay of a solved state.
///
/// Starts at `x = 0` with `v` (0 if absent) and constant `a` (0 if absent).
/// Ends when the elapsed time reaches `t` if `t` is known and positive,
/// otherwise after the configured maximum duration. The last step is
/// shortened so the final frame lands exactly on the end time.
///
/// # Example
///
/// ```rust
/// use kinesolve::config::PlaybackConfig;
/// use kinesolve::domains::physics::MotionPlayback;
/// use kinesolve::engine::state::{KinematicState, Symbol};
///
/// let state = KinematicState::new()
///     .with(Symbol::InitialVelocity, 0.0)
///     .with(Symbol::Acceleration, 9.8)
///     .with(Symbol::Time, 2.0);
/// let frames = MotionPlayback::new(&state, &PlaybackConfig::default())
///     .expect("valid playback")
///     .run()
///     .expect("finite motion");
/// assert!((frames.last().map_or(0.0, |f| f.elapsed) - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct MotionPlayback<I: Integrator = SemiImplicitEuler> {
    integrator: I,
    point: PointState,
    acceleration: f64,
    elapsed: f64,
    end: f64,
    dt: f64,
}

impl MotionPlayback<SemiImplicitEuler> {
    /// Prepare a playback with the semi-implicit Euler integrator.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::Config`] for a non-positive timestep or duration
    /// or when reaching the end time would take more than `max_steps`
    /// steps, and [`KinError::NonFiniteValue`] for non-finite start values.
    pub fn new(values: &KinematicState, config: &PlaybackConfig) -> KinResult<Self> {
        Self::with_integrator(values, config, SemiImplicitEuler)
    }
}

impl<I: Integrator> MotionPlayback<I> {
    /// Prepare a playback with a specific integrator.
    ///
    /// # Errors
    ///
    /// See [`MotionPlayback::new`].
    pub fn with_integrator(values: &KinematicState, config: &PlaybackConfig, integrator: I) -> KinResult<Self> {
        if config.dt.is_nan() || config.dt <= 0.0 {
            return Err(KinError::config("playback timestep must be positive"));
        }
        if config.max_duration.is_nan() || config.max_duration <= 0.0 {
            return Err(KinError::config("playback max_duration must be positive"));
        }
        let velocity = values.get(Symbol::InitialVelocity).unwrap_or(0.0);
        let acceleration = values.get(Symbol::Acceleration).unwrap_or(0.0);
        for (name, value) in [("v", velocity), ("a", acceleration)] {
            if !value.is_finite() {
                return Err(KinError::NonFiniteValue {
                    location: format!("playback.{name}"),
                });
            }
        }
        let end = match values.get(Symbol::Time) {
            Some(t) if t.is_finite() && t > 0.0 => t,
            _ => config.max_duration,
        };
        let steps = (end / config.dt).ceil();
        #[allow(clippy::cast_precision_loss)]
        let budget = config.max_steps as f64;
        if steps > budget {
            return Err(KinError::config(format!(
                "playback of {end} s needs {steps} steps at dt = {} s, more than max_steps {}",
                config.dt, config.max_steps
            )));
        }
        Ok(Self {
            integrator,
            point: PointState {
                position: 0.0,
                velocity,
            },
            acceleration,
            elapsed: 0.0,
            end,
            dt: config.dt,
        })
    }

    /// Time at which playback stops.
    #[must_use]
    pub const fn end_time(&self) -> f64 {
        self.end
    }

    /// Current frame.
    #[must_use]
    pub const fn frame(&self) -> MotionFrame {
        MotionFrame {
            elapsed: self.elapsed,
            position: self.point.position,
            velocity: self.point.velocity,
        }
    }

    /// Whether the end time has been reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.end
    }

    /// Advance one timestep. Returns `None` once finished.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::NonFiniteValue`] if the motion overflows.
    pub fn step(&mut self) -> KinResult<Option<MotionFrame>> {
        if self.is_finished() {
            return Ok(None);
        }
        let dt = self.dt.min(self.end - self.elapsed);
        self.integrator.step(&mut self.point, self.acceleration, dt);
        self.elapsed = if dt < self.dt { self.end } else { self.elapsed + dt };
        if !self.point.position.is_finite() || !self.point.velocity.is_finite() {
            return Err(KinError::NonFiniteValue {
                location: format!("playback at t={:.3}", self.elapsed),
            });
        }
        Ok(Some(self.frame()))
    }

    /// Run to the end, returning every frame including the start.
    ///
    /// # Errors
    ///
    /// See [`Self::step`].
    pub fn run(mut self) -> KinResult<Vec<MotionFrame>> {
        let mut frames = vec![self.frame()];
        while let Some(frame) = self.step()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Run to the end, keeping at most `samples` frames evenly spaced in
    /// time. The first and last frames are always kept when `samples >= 2`;
    /// `samples == 1` keeps only the last.
    ///
    /// # Errors
    ///
    /// See [`Self::step`].
    pub fn sample(mut self, samples: usize) -> KinResult<Vec<MotionFrame>> {
        if samples == 0 {
            return Ok(Vec::new());
        }
        let (start, end) = (self.elapsed, self.end);
        #[allow(clippy::cast_precision_loss)]
        let target = |k: usize| {
            if k + 1 >= samples {
                end
            } else {
                start + (end - start) * k as f64 / (samples - 1) as f64
            }
        };

        let mut frames = Vec::with_capacity(samples.min(1024));
        let mut next = 0;
        let mut current = self.frame();
        loop {
            if current.elapsed >= target(next) {
                frames.push(current);
                while next < samples && current.elapsed >= target(next) {
                    next += 1;
                }
                if next == samples {
                    break;
                }
            }
            match self.step()? {
                Some(frame) => current = frame,
                None => break,
            }
        }
        Ok(frames)
    }
}

/// Replay `values` with the configured integrator, keeping `samples` frames.
///
/// # Errors
///
/// See [`MotionPlayback::new`] and [`MotionPlayback::step`].
pub fn sample_motion(
    values: &KinematicState,
    config: &PlaybackConfig,
    samples: usize,
) -> KinResult<Vec<MotionFrame>> {
    match config.integrator {
        IntegratorKind::Euler => MotionPlayback::new(values, config)?.sample(samples),
        IntegratorKind::Verlet => {
            MotionPlayback::with_integrator(values, config, VerletIntegrator)?.sample(samples)
        }
    }
}

/// Position interval a viewer should display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRange {
    /// Leftmost position (m), never above 0.
    pub min: f64,
    /// Rightmost position (m), never below 0.
    pub max: f64,
}

impl ViewportRange {
    /// Fraction of the sampled span added on each side.
    pub const PAD_FRACTION: f64 = 0.03;

    /// Estimate from positions at 0, `t`, the turnaround time `-v/a`, a
    /// heuristic horizon and twice that horizon, plus `d` when known.
    #[must_use]
    pub fn estimate(values: &KinematicState) -> Self {
        let v0 = values.get(Symbol::InitialVelocity).unwrap_or(0.0);
        let a = values.get(Symbol::Acceleration).unwrap_or(0.0);
        let position_at = |t: f64| v0 * t + 0.5 * a * t * t;

        let mut times = vec![0.0];
        if let Some(t) = values.get(Symbol::Time).filter(|t| *t > 0.0) {
            times.push(t);
        }
        if a.abs() > 1e-12 {
            let turnaround = -v0 / a;
            if turnaround > 0.0 {
                times.push(turnaround);
            }
        }
        let horizon = 0.5_f64.max(v0.abs() / a.abs().max(1e-3));
        times.push(horizon);
        times.push(horizon * 2.0);

        let mut positions: Vec<f64> = times.into_iter().map(position_at).collect();
        if let Some(d) = values.get(Symbol::Displacement) {
            positions.push(d);
        }
        let positions = positions.into_iter().filter(|x| x.is_finite());
        let (lo, hi) = positions.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (0.0, 0.0) };

        let extra = (hi - lo).max(1e-6) * Self::PAD_FRACTION;
        let min = (lo - extra).min(0.0);
        let mut max = (hi + extra).max(0.0);
        if max - min <= 0.0 {
            max = min + 1.0_f64.max(v0.abs() * 2.0);
        }
        Self { min, max }
    }

    /// Width of the range (m).
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Map a position to `[0, 1]` across the range, clamped.
    #[must_use]
    pub fn normalize(&self, position: f64) -> f64 {
        ((position - self.min) / self.span()).clamp(0.0, 1.0)
    }
}
