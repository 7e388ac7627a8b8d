//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "survey-coding",
    version,
    about = "Fold and impute coded survey responses",
    long_about = "Load a pipeline's code schemes and coding plans, then fold every \
                  subject's repeated answers into one value per field.\n\n\
                  Demographic answers must agree; open-ended answers are merged."
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

    /// Log output format (pretty for humans, json for machine parsing).
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

    /// Allow participant responses and subject ids in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every coding plan in the pipeline.
    Plans(ConfigArgs),

    /// Load and validate every code scheme, printing its fingerprint.
    Verify(ConfigArgs),

    /// Fold a JSON array of subject observations and write the result to stdout.
    Fold(FoldArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Pipeline configuration file.
    #[arg(long = "config", value_name = "PIPELINE_TOML")]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct FoldArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// JSON file holding an array of subject observations.
    #[arg(value_name = "OBSERVATIONS_JSON")]
    pub observations: PathBuf,

    /// Pretty-print the output JSON.
    #[arg(long = "pretty")]
    pub pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
