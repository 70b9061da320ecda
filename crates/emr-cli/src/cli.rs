//! CLI argument definitions for the EMR validator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "emr-validate",
    version,
    about = "EMR data quality validator - check EMR extracts against source-system rules",
    long_about = "Validate EMR extracts (CSV/TSV) against source-system presets.\n\n\
                  Built-in presets cover Epic, Cerner, MEDITECH, Allscripts and athenahealth\n\
                  exports; custom presets can be supplied as TOML files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Validate a data file and print a summary.
    Validate(ValidateArgs),

    /// List the supported source systems.
    Systems,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the CSV or TSV extract.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Built-in source system preset (epic, cerner, meditech, allscripts, athenahealth).
    #[arg(long = "system", value_name = "KEY", conflicts_with = "preset")]
    pub system: Option<String>,

    /// Custom source system preset in TOML format.
    #[arg(long = "preset", value_name = "TOML")]
    pub preset: Option<PathBuf>,

    /// Name recorded in the run metadata (default: file name).
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Keep original headers instead of renaming preset aliases.
    #[arg(long = "no-aliases")]
    pub no_aliases: bool,

    /// Write the JSON report to this path.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write the flat results table as CSV to this path.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Exit with a failure status on warnings as well as critical failures.
    #[arg(long = "strict")]
    pub strict: bool,
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
