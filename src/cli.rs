// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `rundag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rundag",
    version,
    about = "Run recipes from a justfile, prerequisites first.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the justfile.
    ///
    /// Default: the first `justfile`, `Justfile` or `.justfile` found in the
    /// current directory or one of its parents.
    #[arg(short = 'f', long, value_name = "PATH")]
    pub justfile: Option<PathBuf>,

    /// Directory commands run in. Default: the justfile's directory.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub working_directory: Option<PathBuf>,

    /// List available recipes and exit.
    #[arg(short, long, conflicts_with_all = ["show", "dump"])]
    pub list: bool,

    /// Print a recipe's source and exit.
    #[arg(short, long, value_name = "RECIPE", conflicts_with = "dump")]
    pub show: Option<String>,

    /// Print the justfile in canonical form and exit.
    #[arg(long)]
    pub dump: bool,

    /// Output format for `--dump`.
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = DumpFormat::Just)]
    pub dump_format: DumpFormat,

    /// Print the commands that would run without running them.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Don't echo commands before running them.
    #[arg(short, long)]
    pub quiet: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUNDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Recipe name, its arguments, and `name=value` overrides.
    #[arg(
        value_name = "ARGUMENTS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub arguments: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// `--dump` output format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// Justfile syntax.
    Just,
    /// JSON view of the parsed model.
    Json,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
