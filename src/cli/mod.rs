//! CLI module for kinesolve.
//!
//! All CLI logic lives here so it can be tested; `main.rs` only installs
//! logging and calls [`run_cli`].

mod args;
mod commands;
mod output;

pub use args::{Args, Command, SolveOptions, DEFAULT_SAMPLES};
pub use commands::{
    execute_solve, failure_json, report_json, run_cli, PlaybackOverrides, SolveReport,
};
pub use output::{
    print_formulas, print_help, print_version, render_failure, render_formulas, render_frames,
    render_solution, render_values, render_variants, render_version,
};
