//! CLI argument definitions for csvgen.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "csvgen",
    version,
    about = "Generate quoted CSV from a JSON job file",
    long_about = "Generate quoted CSV from a JSON job file.\n\n\
                  A job declares the record fields, field and type rules,\n\
                  layout options, and the records to render."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a job file to CSV.
    Generate(GenerateArgs),

    /// Validate a job file and list its visible columns.
    Check(CheckArgs),
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Path to the JSON job file.
    #[arg(value_name = "JOB")]
    pub job: PathBuf,

    /// Write CSV to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// End rows with CRLF instead of the job's line terminator.
    #[arg(long = "crlf")]
    pub crlf: bool,

    /// Omit the separator after the last cell of each row.
    #[arg(long = "no-trailing-separator")]
    pub no_trailing_separator: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the JSON job file.
    #[arg(value_name = "JOB")]
    pub job: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
