//! Run configuration merged from an optional TOML file and CLI flags.
//!
//! Explicit flags win over file values; file values win over defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use celiver_features::InputMode;
use celiver_ingest::{ensure_directory, ensure_file};

use crate::cli::{PredictArgs, RunArgs};

pub const DEFAULT_PREFIX: &str = "celiver_output";

/// Keys accepted in a `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub prefix: Option<String>,
    pub outdir: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub model_sha256: Option<String>,
    /// `false` marks the input as preprocessed.
    pub raw: Option<bool>,
    pub label_column: Option<String>,
    pub threads: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        ensure_file(path)?;
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self =
            toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Settings for commands that read an input table and write to `outdir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub prefix: String,
    pub outdir: PathBuf,
    pub mode: InputMode,
    pub threads: usize,
}

impl RunConfig {
    pub fn from_args(args: &RunArgs) -> Result<Self> {
        let file = FileConfig::load_optional(args.config.as_deref())?;
        Self::resolve(args, &file)
    }

    pub fn resolve(args: &RunArgs, file: &FileConfig) -> Result<Self> {
        let Some(input) = args.input.clone().or_else(|| file.input.clone()) else {
            bail!("no input table given; pass --input or set `input` in the config file");
        };
        ensure_file(&input)?;

        let prefix = args
            .prefix
            .clone()
            .or_else(|| file.prefix.clone())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if prefix.trim().is_empty() {
            bail!("output prefix must not be empty");
        }

        let outdir = args
            .outdir
            .clone()
            .or_else(|| file.outdir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        ensure_directory(&outdir)?;

        let mode = if args.preprocessed || file.raw == Some(false) {
            InputMode::Preprocessed
        } else {
            InputMode::Raw
        };

        Ok(Self {
            input,
            prefix,
            outdir,
            mode,
            threads: args.threads.or(file.threads).unwrap_or(0),
        })
    }

    /// `{outdir}/{prefix}.{suffix}`
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        self.outdir.join(format!("{}.{suffix}", self.prefix))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictConfig {
    pub run: RunConfig,
    pub model: PathBuf,
    pub model_sha256: Option<String>,
    pub label_column: Option<String>,
}

impl PredictConfig {
    pub fn from_args(args: &PredictArgs) -> Result<Self> {
        let file = FileConfig::load_optional(args.run.config.as_deref())?;
        Self::resolve(args, &file)
    }

    pub fn resolve(args: &PredictArgs, file: &FileConfig) -> Result<Self> {
        let run = RunConfig::resolve(&args.run, file)?;
        let Some(model) = args.model.clone().or_else(|| file.model.clone()) else {
            bail!("no model bundle given; pass --model or set `model` in the config file");
        };
        ensure_file(&model)?;
        Ok(Self {
            run,
            model,
            model_sha256: args
                .model_sha256
                .clone()
                .or_else(|| file.model_sha256.clone()),
            label_column: args
                .label_column
                .clone()
                .or_else(|| file.label_column.clone()),
        })
    }
}
