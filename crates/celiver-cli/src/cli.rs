//! CLI argument definitions for the CEliver predictor.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "celiver",
    version,
    about = "CEliver - Liver cancer prediction from cfDNA biomarker tables",
    long_about = "Derive ratio features from per-sample biomarker series and predict\n\
                  liver cancer status with a pre-trained model bundle.\n\n\
                  Raw tables carry Sex and AFP columns; preprocessed tables carry\n\
                  Sex_F/Sex_M indicators and log-scaled AFP."
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

    /// Allow sample identifiers and values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract features and write predictions for every sample.
    Predict(PredictArgs),

    /// Extract features and write the full feature table.
    Features(RunArgs),

    /// List generated feature names in output order.
    FeatureNames,
}

/// Options shared by every command that reads an input table.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Input CSV table (ID, 6 clinical columns, 20 series columns).
    #[arg(short = 'i', long = "input", value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Prefix for output file names (default: celiver_output).
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Existing directory for output files (default: current directory).
    #[arg(short = 'o', long = "outdir", value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    /// TOML file supplying defaults for these options.
    #[arg(short = 'c', long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Input already holds Sex_F/Sex_M indicators and log-scaled AFP.
    #[arg(long = "preprocessed")]
    pub preprocessed: bool,

    /// Worker threads for feature extraction (0 uses the global pool).
    #[arg(long = "threads", value_name = "N")]
    pub threads: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PredictArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Model bundle (JSON) with scaler, selector and classifier.
    #[arg(short = 'm', long = "model", value_name = "JSON")]
    pub model: Option<PathBuf>,

    /// Expected SHA-256 of the model bundle.
    #[arg(long = "model-sha256", value_name = "HEX")]
    pub model_sha256: Option<String>,

    /// Known 0/1 outcome column; enables validation metrics.
    #[arg(long = "label-column", value_name = "NAME")]
    pub label_column: Option<String>,
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
