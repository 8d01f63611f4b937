//! CLI argument definitions for the survey chart generator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use survey_model::{CodebookDomain, TieBreak};

#[derive(Parser)]
#[command(
    name = "survey-charts",
    version,
    about = "Survey charts - percentage distributions of most important problems",
    long_about = "Recode an SPSS survey file, aggregate the problem responses and draw \
                  percentage bar charts.\n\n\
                  Produces one whole-dataset chart per variable plus one chart per \
                  country, in a per-country folder and flat in the results root."
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
    /// Recode, aggregate and chart a survey file.
    Run(RunArgs),

    /// List the active codebook entries with their chart colors.
    Codebook(CodebookArgs),

    /// Show the header and variable dictionary of a .sav file.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the .sav file (default: `input_path` from the config file).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Directory charts are written to (default: `output_root` or ./results).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML file with codebook, palette and variable overrides.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How bars with equal counts are ordered.
    #[arg(long = "tie-break", value_enum)]
    pub tie_break: Option<TieBreakArg>,

    /// Compute every distribution and print the summary without writing charts.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Skip the per-country subdirectory charts.
    #[arg(long = "no-nested")]
    pub no_nested: bool,

    /// Skip the per-country charts in the results root.
    #[arg(long = "no-flat")]
    pub no_flat: bool,
}

#[derive(Parser)]
pub struct CodebookArgs {
    /// TOML file with codebook and palette overrides.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Which codebook to list.
    #[arg(value_enum, default_value = "problem")]
    pub domain: DomainArg,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Path to the .sav file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TieBreakArg {
    /// Equal counts follow ascending codebook code.
    CodeOrder,
    /// Equal counts keep the order labels first appear in the data.
    FirstSeen,
}

impl From<TieBreakArg> for TieBreak {
    fn from(value: TieBreakArg) -> Self {
        match value {
            TieBreakArg::CodeOrder => TieBreak::CodeOrder,
            TieBreakArg::FirstSeen => TieBreak::FirstSeen,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DomainArg {
    Country,
    Problem,
}

impl From<DomainArg> for CodebookDomain {
    fn from(value: DomainArg) -> Self {
        match value {
            DomainArg::Country => CodebookDomain::Country,
            DomainArg::Problem => CodebookDomain::Problem,
        }
    }
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
