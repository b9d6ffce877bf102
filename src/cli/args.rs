//! CLI argument parsing.
//!
//! Hand-rolled so parsing can be tested from any iterator of strings.

use std::path::PathBuf;

use crate::config::IntegratorKind;
use crate::engine::VariantChoice;

/// Number of frames printed by `simulate` unless overridden.
pub const DEFAULT_SAMPLES: usize = 10;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
    /// Problems with ignored arguments, printed before the command runs.
    pub warnings: Vec<String>,
}

/// Options shared by `solve` and `simulate`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolveOptions {
    /// `name=value` tokens, e.g. `V=10`.
    pub assignments: Vec<String>,
    /// Emit JSON instead of text.
    pub json: bool,
    /// Variant selection for the two-root case.
    pub variant: VariantChoice,
    /// Optional YAML configuration file.
    pub config_path: Option<PathBuf>,
    /// Enable debug logging.
    pub verbose: bool,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Solve for the unknown quantities
    Solve(SolveOptions),
    /// Solve, then replay the motion
    Simulate {
        /// Shared solve options.
        options: SolveOptions,
        /// Timestep override in seconds.
        dt: Option<f64>,
        /// Integrator override.
        integrator: Option<IntegratorKind>,
        /// Number of frames to print.
        samples: usize,
    },
    /// List the identities and how each quantity is derived
    Formulas,
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Whether debug logging was requested.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        match &self.command {
            Command::Solve(options) | Command::Simulate { options, .. } => options.verbose,
            _ => false,
        }
    }

    fn parse_from_vec(args: &[String]) -> Self {
        let mut warnings = Vec::new();
        if args.len() < 2 {
            return Self {
                command: Command::Help,
                warnings,
            };
        }

        let command = match args[1].as_str() {
            "solve" => Self::parse_solve_command(&args[2..], &mut warnings),
            "simulate" | "sim" => Self::parse_simulate_command(&args[2..], &mut warnings),
            "formulas" => Command::Formulas,
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command, warnings }
    }

    /// Parse the 'solve' command arguments.
    fn parse_solve_command(args: &[String], warnings: &mut Vec<String>) -> Command {
        let (options, rest) = Self::parse_solve_options(args, warnings);
        for arg in rest {
            warnings.push(format!("ignoring argument '{arg}'"));
        }
        if options.assignments.is_empty() {
            eprintln!("Error: 'solve' needs known values, e.g. kinesolve solve v=0 a=9.8 t=2");
            return Command::Help;
        }
        Command::Solve(options)
    }

    /// Parse the 'simulate' command arguments.
    fn parse_simulate_command(args: &[String], warnings: &mut Vec<String>) -> Command {
        let (options, rest) = Self::parse_solve_options(args, warnings);
        let mut dt = None;
        let mut integrator = None;
        let mut samples = DEFAULT_SAMPLES;

        let mut i = 0;
        while i < rest.len() {
            match rest[i].as_str() {
                "--dt" => {
                    if let Some(value) = rest.get(i + 1) {
                        match value.parse() {
                            Ok(secs) => dt = Some(secs),
                            Err(_) => warnings.push(format!("invalid --dt '{value}'")),
                        }
                        i += 2;
                    } else {
                        warn_missing_value(warnings, "--dt");
                        i += 1;
                    }
                }
                "--samples" => {
                    if let Some(value) = rest.get(i + 1) {
                        match value.parse() {
                            Ok(n) => samples = n,
                            Err(_) => warnings.push(format!("invalid --samples '{value}'")),
                        }
                        i += 2;
                    } else {
                        warn_missing_value(warnings, "--samples");
                        i += 1;
                    }
                }
                "--integrator" => {
                    if let Some(value) = rest.get(i + 1) {
                        match value.parse::<IntegratorKind>() {
                            Ok(kind) => integrator = Some(kind),
                            Err(e) => warnings.push(e.to_string()),
                        }
                        i += 2;
                    } else {
                        warn_missing_value(warnings, "--integrator");
                        i += 1;
                    }
                }
                other => {
                    warnings.push(format!("ignoring argument '{other}'"));
                    i += 1;
                }
            }
        }

        if options.assignments.is_empty() {
            eprintln!("Error: 'simulate' needs known values, e.g. kinesolve simulate v=0 a=9.8 t=2");
            return Command::Help;
        }
        Command::Simulate {
            options,
            dt,
            integrator,
            samples,
        }
    }

    /// Split shared options from the remaining arguments.
    fn parse_solve_options(
        args: &[String],
        warnings: &mut Vec<String>,
    ) -> (SolveOptions, Vec<String>) {
        let mut options = SolveOptions::default();
        let mut rest = Vec::new();

        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            match arg {
                "--json" => options.json = true,
                "-v" | "--verbose" => options.verbose = true,
                "--variant" => {
                    if let Some(value) = args.get(i + 1) {
                        match value.parse() {
                            Ok(choice) => options.variant = choice,
                            Err(e) => warnings.push(e.to_string()),
                        }
                        i += 1;
                    } else {
                        warn_missing_value(warnings, "--variant");
                    }
                }
                "--config" => {
                    if let Some(path) = args.get(i + 1) {
                        options.config_path = Some(PathBuf::from(path));
                        i += 1;
                    } else {
                        warn_missing_value(warnings, "--config");
                    }
                }
                _ if !arg.starts_with('-') && arg.contains('=') => {
                    options.assignments.push(arg.to_string());
                }
                _ => rest.push(arg.to_string()),
            }
            i += 1;
        }

        (options, rest)
    }
}

fn warn_missing_value(warnings: &mut Vec<String>, flag: &str) {
    warnings.push(format!("{flag} needs a value; ignoring it"));
}
