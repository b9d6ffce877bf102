//! Worked scenarios for the equation engine.
//!
//! Each test states the hypothesis it tries to falsify.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use kinesolve::prelude::*;

fn input(pairs: &[(Symbol, f64)]) -> KinematicState {
    pairs
        .iter()
        .fold(KinematicState::new(), |s, (sym, v)| s.with(*sym, *v))
}

fn solved(solution: Solution) -> (KinematicValues, Vec<DerivationStep>) {
    match solution {
        Solution::Solved { values, steps, .. } => (values, steps),
        Solution::Variants { .. } => panic!("expected a unique solution"),
    }
}

// H0: Free fall from rest for 2 s does not cover 19.6 m
// Falsification: {v:0, a:9.8, t:2} must give d = V = 19.6
#[test]
fn h0_1_free_fall_from_rest() {
    let (values, steps) = solved(
        solve(input(&[
            (Symbol::InitialVelocity, 0.0),
            (Symbol::Acceleration, 9.8),
            (Symbol::Time, 2.0),
        ]))
        .expect("solvable"),
    );
    assert!((values.displacement - 19.6).abs() < 1e-9);
    assert!((values.final_velocity - 19.6).abs() < 1e-9);
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].result, "V = 19.6 m/s");
    assert_eq!(steps[1].result, "Δd = 19.6 m");
}

// H0: Velocities and distance do not determine acceleration and time
// Falsification: {V:10, v:0, d:20} must give a = 2.5, t = 4 without variants
#[test]
fn h0_2_velocities_and_distance() {
    let solution = solve(input(&[
        (Symbol::FinalVelocity, 10.0),
        (Symbol::InitialVelocity, 0.0),
        (Symbol::Displacement, 20.0),
    ]))
    .expect("solvable");
    assert!(!solution.is_ambiguous());
    let (values, steps) = solved(solution);
    assert!((values.acceleration - 2.5).abs() < 1e-12);
    assert!((values.time - 4.0).abs() < 1e-12);
    assert_eq!(steps[1].to_string().lines().last(), Some("    t = 4 s"));
}

// H0: Two knowns are accepted
// Falsification: {a:2, d:16} must fail with InsufficientKnowns
#[test]
fn h0_3_two_knowns_rejected() {
    let failure = solve(input(&[
        (Symbol::Acceleration, 2.0),
        (Symbol::Displacement, 16.0),
    ]))
    .expect_err("underdetermined");
    assert!(matches!(
        failure.error,
        KinError::InsufficientKnowns {
            known: 2,
            required: 3
        }
    ));
    assert!(failure.partial_steps.is_empty());
}

// H0: Negative values slip past the known-count check
// Falsification: {a:-9.8, d:-20} still has only two knowns
#[test]
fn h0_4_two_negative_knowns_rejected() {
    let failure = solve(input(&[
        (Symbol::Acceleration, -9.8),
        (Symbol::Displacement, -20.0),
    ]))
    .expect_err("underdetermined");
    assert!(matches!(failure.error, KinError::InsufficientKnowns { .. }));
}

// H0: An impossible reversal still yields a real final velocity
// Falsification: {v:5, a:2, d:-50} has radicand -175
#[test]
fn h0_5_impossible_reversal() {
    let failure = solve(input(&[
        (Symbol::InitialVelocity, 5.0),
        (Symbol::Acceleration, 2.0),
        (Symbol::Displacement, -50.0),
    ]))
    .expect_err("no real root");
    match failure.error {
        KinError::NoRealSolution { symbol, value, .. } => {
            assert_eq!(symbol, Symbol::FinalVelocity);
            assert!((value + 175.0).abs() < 1e-9);
        }
        other => panic!("expected NoRealSolution, got {other:?}"),
    }
}

// H0: The two-root case silently picks one root
// Falsification: {v:5, a:2, d:12} must return V = ±√73, each with its own t
#[test]
fn h0_6_two_roots_returned() {
    let solution = solve(input(&[
        (Symbol::InitialVelocity, 5.0),
        (Symbol::Acceleration, 2.0),
        (Symbol::Displacement, 12.0),
    ]))
    .expect("two roots");
    let Solution::Variants {
        base,
        auto_index,
        variants,
    } = &solution
    else {
        panic!("expected variants");
    };
    assert_eq!(base.known_count(), 3);
    assert_eq!(variants.len(), 2);

    let root = 73f64.sqrt();
    let speeds: Vec<f64> = variants
        .iter()
        .map(|v| v.values.get(Symbol::FinalVelocity).expect("velocity set"))
        .collect();
    assert!((speeds[0] - root).abs() < 1e-12);
    assert!((speeds[1] + root).abs() < 1e-12);

    let times: Vec<f64> = variants.iter().map(|v| v.time.expect("a ≠ 0")).collect();
    assert!((times[0] - (root - 5.0) / 2.0).abs() < 1e-12);
    assert!((times[1] - (-root - 5.0) / 2.0).abs() < 1e-12);
    assert_ne!(times[0], times[1]);

    // Auto picks the variant moving forward in time.
    assert_eq!(*auto_index, 0);
    let resolved = solution.resolve(VariantChoice::Auto).expect("auto");
    assert!(resolved.values.is_solved());
    assert_eq!(resolved.steps.len(), 2);
    assert!(resolved.steps[0].substituted.contains("= +8.544"));
}

// H0: Contradictory extra knowns are accepted
// Falsification: {V:10, v:0, d:20, t:5} disagrees with t = 4
#[test]
fn h0_7_contradictory_knowns_rejected() {
    let failure = solve(input(&[
        (Symbol::FinalVelocity, 10.0),
        (Symbol::InitialVelocity, 0.0),
        (Symbol::Displacement, 20.0),
        (Symbol::Time, 5.0),
    ]))
    .expect_err("contradictory");
    assert!(matches!(failure.error, KinError::Inconsistent { .. }));
    assert!(failure.error.to_string().contains("contradictory"));
}

// H0: Zero time and zero velocities produce a division by zero panic
// Falsification: {V:0, v:0, a:0} stalls cleanly with Inconsistent
#[test]
fn h0_8_stall_is_reported() {
    let failure = solve(input(&[
        (Symbol::FinalVelocity, 0.0),
        (Symbol::InitialVelocity, 0.0),
        (Symbol::Acceleration, 0.0),
    ]))
    .expect_err("t and d free");
    assert!(matches!(failure.error, KinError::Inconsistent { .. }));
}

// H0: Form text that is not a number becomes zero
// Falsification: blank and garbage fields stay unknown
#[test]
fn h0_9_form_fields_absent() {
    let state = KinematicState::new()
        .with_opt(Symbol::FinalVelocity, parse_field(""))
        .with_opt(Symbol::InitialVelocity, parse_field("0"))
        .with_opt(Symbol::Displacement, parse_field("twenty"))
        .with_opt(Symbol::Acceleration, parse_field("9.8"))
        .with_opt(Symbol::Time, parse_field(" 2 "));
    assert_eq!(state.known_count(), 3);
    assert!(solve(state).is_ok());
}

// H0: Playback of a solved state ends somewhere other than t
// Falsification: the last frame of free fall is at t = 2 s
#[test]
fn h0_10_playback_ends_at_solved_time() {
    let resolved = solve(input(&[
        (Symbol::InitialVelocity, 0.0),
        (Symbol::Acceleration, 9.8),
        (Symbol::Time, 2.0),
    ]))
    .expect("solvable")
    .resolve(VariantChoice::Auto)
    .expect("unique");
    let config = KinConfig::default();
    let frames = MotionPlayback::new(&resolved.values, &config.playback)
        .expect("valid")
        .run()
        .expect("finite");
    let last = frames.last().expect("frames");
    assert!((last.elapsed - 2.0).abs() < 1e-9);
    assert!((last.velocity - 19.6).abs() < 1e-9);

    let range = ViewportRange::estimate(&resolved.values);
    assert!(range.max > 19.6);
}

// H0: A zero acceleration blocks the time derivation
// Falsification: {v:3, V:3, d:12} must still give a = 0 and t = 4 through
// the average-velocity identity
#[test]
fn h0_11_uniform_motion_time_from_average_velocity() {
    let (values, steps) = solved(
        solve(input(&[
            (Symbol::InitialVelocity, 3.0),
            (Symbol::FinalVelocity, 3.0),
            (Symbol::Displacement, 12.0),
        ]))
        .expect("solvable"),
    );
    assert!(values.acceleration.abs() < f64::EPSILON);
    assert!((values.time - 4.0).abs() < 1e-12);
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].equation, "Δd = 0.5·(v+V)·t");
}
