//! CLI output formatting.
//!
//! Rendering functions return `String`s so they can be tested; the `print_*`
//! wrappers write them to stdout.

use std::fmt::Write as _;

use crate::domains::physics::{MotionFrame, ViewportRange};
use crate::engine::identity::{candidates, Identity};
use crate::engine::{KinematicState, NumberFormat, ResolvedSolution, Solution, Symbol};
use crate::error::SolveFailure;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print version information.
pub fn print_version() {
    println!("{}", render_version());
}

/// Version line, with the git hash when the build captured one.
#[must_use]
pub fn render_version() -> String {
    let version = option_env!("KINESOLVE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            format!("kinesolve {version} ({})", hash.get(..12).unwrap_or(hash))
        }
        _ => format!("kinesolve {version}"),
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"kinesolve - Constant-acceleration kinematics solver

USAGE:
    kinesolve <COMMAND> [OPTIONS]

COMMANDS:
    solve <name=value>...       Solve for the unknown quantities
        --json                  Print the result as JSON
        --variant <auto|N>      Pick a root in the two-root case (default: auto)
        --config <file.yaml>    Load solver configuration
        -v, --verbose           Enable debug logging

    simulate <name=value>...    Solve, then replay the motion
        --dt <S>                Timestep in seconds (default: 0.016)
        --samples <N>           Frames to print (default: 10)
        --integrator <NAME>     euler or verlet (default: euler)
        (accepts the solve options too)

    formulas                    List the identities and derivation order

    help                        Show this help message
    version                     Show version information

QUANTITIES:
    V  final velocity (m/s)     v  initial velocity (m/s)
    d  distance (m)             a  acceleration (m/s²)
    t  time (s)

    Give at least three. Blank or non-numeric values count as unknown.

EXAMPLES:
    kinesolve solve v=0 a=9.8 t=2
    kinesolve solve V=10 v=0 d=20 --json
    kinesolve solve v=5 a=2 d=12 --variant 1
    kinesolve simulate v=0 a=9.8 t=2 --dt 0.01
"
    );
}

/// Print the identity list.
pub fn print_formulas() {
    println!("{}", render_formulas());
}

/// The five identities and, per quantity, the order in which they are tried.
#[must_use]
pub fn render_formulas() -> String {
    let mut out = String::from("Identities:\n");
    for identity in Identity::ALL {
        let _ = writeln!(out, "  {identity}");
    }
    out.push_str("\nDerivation order:\n");
    for symbol in Symbol::PRIORITY {
        let order = candidates(symbol)
            .iter()
            .map(|inversion| inversion.identity.number().to_string())
            .collect::<Vec<_>>()
            .join(" → ");
        let _ = writeln!(out, "  {:<3} {:<17} {order}", symbol.code(), symbol.name());
    }
    out
}

/// `V: 19.6 m/s` lines in V, v, d, a, t order; `—` for unknowns.
#[must_use]
pub fn render_values(values: &KinematicState, format: NumberFormat) -> String {
    values
        .iter()
        .map(|(symbol, value)| match value {
            Some(x) => format!("{}: {} {}", symbol.code(), format.value(x), symbol.unit()),
            None => format!("{}: {}", symbol.code(), format.optional(None)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Derivation steps separated by blank lines.
#[must_use]
pub fn render_steps(steps: &[crate::engine::DerivationStep]) -> String {
    steps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One line per variant, marking the selected one.
#[must_use]
pub fn render_variants(solution: &Solution, selected: Option<usize>, format: NumberFormat) -> String {
    let Solution::Variants { variants, .. } = solution else {
        return String::new();
    };
    let mut out = String::from("Two valid solutions (± root):\n");
    for (i, variant) in variants.iter().enumerate() {
        let velocity = variant
            .values
            .get(variant.velocity)
            .map_or_else(|| format.optional(None), |x| format.signed(x));
        let time = format.optional(variant.time);
        let marker = if selected == Some(i) { "  ← selected" } else { "" };
        let _ = writeln!(
            out,
            "  [{i}] {} = {velocity} {}, t = {time} s{marker}",
            variant.velocity.code(),
            variant.velocity.unit()
        );
    }
    out
}

/// Full text report of a successful solve.
#[must_use]
pub fn render_solution(solution: &Solution, resolved: &ResolvedSolution, format: NumberFormat) -> String {
    let mut out = String::new();
    if solution.is_ambiguous() {
        out.push_str(&render_variants(solution, resolved.variant, format));
        out.push('\n');
    }
    out.push_str("Results:\n");
    out.push_str(&render_values(&resolved.values, format));
    out.push('\n');
    if let Solution::Solved { warnings, .. } = solution {
        for warning in warnings {
            let _ = writeln!(
                out,
                "Note: identity {} holds only to {:.1e} (tolerance {:.1e})",
                warning.identity, warning.residual, warning.tolerance
            );
        }
    }
    if !resolved.steps.is_empty() {
        let _ = write!(out, "\nDerivation:\n{RULE}\n{}\n{RULE}\n", render_steps(&resolved.steps));
    }
    out
}

/// Error message followed by any partial derivation.
#[must_use]
pub fn render_failure(failure: &SolveFailure) -> String {
    let mut out = format!("Error: {}\n", failure.error);
    if !failure.partial_steps.is_empty() {
        let _ = write!(
            out,
            "\nPartial derivation:\n{RULE}\n{}\n{RULE}\n",
            render_steps(&failure.partial_steps)
        );
    }
    out
}

/// Frame table with the viewport range.
#[must_use]
pub fn render_frames(frames: &[MotionFrame], range: &ViewportRange, format: NumberFormat) -> String {
    let mut out = format!(
        "Viewport: {} m … {} m\n\n{:>10}  {:>12}  {:>12}\n",
        format.value(range.min),
        format.value(range.max),
        "t (s)",
        "x (m)",
        "v (m/s)"
    );
    for frame in frames {
        let _ = writeln!(
            out,
            "{:>10}  {:>12}  {:>12}",
            format.value(frame.elapsed),
            format.value(frame.position),
            format.value(frame.velocity)
        );
    }
    out
}
