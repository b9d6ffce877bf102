//! CLI command handlers.
//!
//! Each handler prints its report and returns the process exit code.

use std::process::ExitCode;

use tracing::debug;

use super::args::{Args, Command, SolveOptions};
use super::output::{
    print_formulas, print_help, print_version, render_failure, render_frames, render_solution,
};
use crate::config::{IntegratorKind, KinConfig, PlaybackConfig};
use crate::domains::physics::{sample_motion, ViewportRange};
use crate::engine::{NumberFormat, ResolvedSolution, Solution, Solver};
use crate::error::{KinError, KinResult, SolveFailure};
use crate::input::state_from_assignments;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    for warning in &args.warnings {
        eprintln!("Warning: {warning}");
    }
    match args.command {
        Command::Solve(options) => solve(&options),
        Command::Simulate {
            options,
            dt,
            integrator,
            samples,
        } => simulate(&options, &PlaybackOverrides { dt, integrator }, samples),
        Command::Formulas => {
            print_formulas();
            ExitCode::SUCCESS
        }
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Outcome of the solve shared by `solve` and `simulate`.
#[derive(Debug)]
pub struct SolveReport {
    /// Configuration in effect.
    pub config: KinConfig,
    /// Engine result.
    pub solution: Solution,
    /// The single state chosen for display.
    pub resolved: ResolvedSolution,
}

/// Load configuration, read the inputs, solve and resolve.
///
/// # Errors
///
/// Returns a [`SolveFailure`] for configuration, input or solver errors.
pub fn execute_solve(options: &SolveOptions) -> Result<SolveReport, SolveFailure> {
    let config = match &options.config_path {
        Some(path) => KinConfig::load(path)?,
        None => KinConfig::default(),
    };
    let input = state_from_assignments(&options.assignments)?;
    debug!(?input, "solving");
    let solution = Solver::new(&config).solve(input)?;
    let resolved = solution.resolve(options.variant)?;
    Ok(SolveReport {
        config,
        solution,
        resolved,
    })
}

/// Solve and print values plus derivation.
#[must_use]
pub fn solve(options: &SolveOptions) -> ExitCode {
    if !options.json {
        print_banner();
    }
    match execute_solve(options) {
        Ok(report) => {
            if options.json {
                emit_json(&report_json(&report))
            } else {
                let format = NumberFormat::new(report.config.display.decimals);
                print!("{}", render_solution(&report.solution, &report.resolved, format));
                ExitCode::SUCCESS
            }
        }
        Err(failure) => report_failure(&failure, options.json),
    }
}

/// Command-line settings that replace the loaded playback configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackOverrides {
    /// Timestep in seconds.
    pub dt: Option<f64>,
    /// Integration scheme.
    pub integrator: Option<IntegratorKind>,
}

impl PlaybackOverrides {
    /// Merge into `base` and re-run the playback checks on the result.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::Config`] if the merged settings are invalid.
    pub fn apply(&self, base: &PlaybackConfig) -> KinResult<PlaybackConfig> {
        let mut merged = base.clone();
        if let Some(dt) = self.dt {
            merged.dt = dt;
        }
        if let Some(integrator) = self.integrator {
            merged.integrator = integrator;
        }
        merged.validate_semantic()?;
        Ok(merged)
    }
}

/// Solve, then replay the chosen state and print sampled frames.
#[must_use]
pub fn simulate(options: &SolveOptions, overrides: &PlaybackOverrides, samples: usize) -> ExitCode {
    if !options.json {
        print_banner();
    }
    let report = match execute_solve(options) {
        Ok(report) => report,
        Err(failure) => return report_failure(&failure, options.json),
    };
    let (playback, frames) = match overrides.apply(&report.config.playback).and_then(|playback| {
        let frames = sample_motion(&report.resolved.values, &playback, samples)?;
        Ok((playback, frames))
    }) {
        Ok(run) => run,
        Err(e) => return report_failure(&SolveFailure::new(e), options.json),
    };
    let range = ViewportRange::estimate(&report.resolved.values);

    if options.json {
        let mut value = report_json(&report);
        value["viewport"] = serde_json::json!(range);
        value["frames"] = serde_json::json!(frames);
        return emit_json(&value);
    }
    let format = NumberFormat::new(report.config.display.decimals);
    print!("{}", render_solution(&report.solution, &report.resolved, format));
    println!(
        "\nPlayback ({} integrator, dt = {} s, {} s):",
        playback.integrator,
        playback.dt,
        format.value(frames.last().map_or(0.0, |f| f.elapsed))
    );
    print!("{}", render_frames(&frames, &range, format));
    ExitCode::SUCCESS
}

fn print_banner() {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║          kinesolve - Constant-Acceleration Solver             ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");
}

/// JSON document for a successful solve.
#[must_use]
pub fn report_json(report: &SolveReport) -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "solution": report.solution,
        "resolved": report.resolved,
    })
}

/// JSON document for a failed solve.
#[must_use]
pub fn failure_json(failure: &SolveFailure) -> serde_json::Value {
    serde_json::json!({
        "ok": false,
        "error": failure.error.to_string(),
        "partial_steps": failure.partial_steps,
    })
}

fn print_json(value: &serde_json::Value) -> KinResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| KinError::config(format!("cannot encode JSON: {e}")))?;
    println!("{text}");
    Ok(())
}

fn emit_json(value: &serde_json::Value) -> ExitCode {
    match print_json(value) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn report_failure(failure: &SolveFailure, json: bool) -> ExitCode {
    if json {
        if let Err(e) = print_json(&failure_json(failure)) {
            eprintln!("Error: {e}");
            eprint!("{}", render_failure(failure));
        }
    } else {
        eprint!("{}", render_failure(failure));
    }
    ExitCode::FAILURE
}
