use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{debug, info, info_span, trace};

use celiver_features::{FeatureTableBuilder, extract_features};
use celiver_ingest::{read_csv_frame, write_csv_frame, write_predictions};
use celiver_predict::{ConfusionMatrix, ModelBundle, PredictionPipeline, split_labels};

use crate::cli::{PredictArgs, RunArgs};
use crate::config::{PredictConfig, RunConfig};
use crate::logging::redact_value;
use crate::summary::apply_table_style;
use crate::types::{FeaturesResult, PredictResult, ValidationReport};

pub const PREDICT_SUFFIX: &str = "predict.csv";
pub const FEATURES_SUFFIX: &str = "features.csv";

/// Family label shown next to a generated feature name.
pub fn feature_family(name: &str) -> &'static str {
    if name.starts_with("SW_") {
        "sliding window"
    } else if name.starts_with("PR") {
        "probability (regular)"
    } else if name.starts_with("PI") {
        "probability (irregular)"
    } else {
        "-"
    }
}

pub fn run_feature_names() -> Result<()> {
    let builder = FeatureTableBuilder::new();
    let mut table = Table::new();
    table.set_header(vec!["#", "Feature", "Family"]);
    apply_table_style(&mut table);
    for (index, name) in builder.feature_names().into_iter().enumerate() {
        let family = feature_family(&name);
        table.add_row(vec![(index + 1).to_string(), name, family.to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_features(args: &RunArgs) -> Result<FeaturesResult> {
    let config = RunConfig::from_args(args)?;
    run_features_with(&config)
}

pub fn run_features_with(config: &RunConfig) -> Result<FeaturesResult> {
    let span = info_span!("features", input = %config.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let df = read_csv_frame(&config.input)
        .with_context(|| format!("read input table {}", config.input.display()))?;
    let builder = FeatureTableBuilder::new().with_threads(config.threads);
    let mut table = extract_features(&df, config.mode, &builder).context("extract features")?;

    let output = config.output_path(FEATURES_SUFFIX);
    write_csv_frame(&mut table, &output)
        .with_context(|| format!("write feature table {}", output.display()))?;
    info!(
        rows = table.height(),
        columns = table.width(),
        duration_ms = start.elapsed().as_millis(),
        "feature table written"
    );
    Ok(FeaturesResult {
        input: config.input.clone(),
        output,
        mode: config.mode,
        rows: table.height(),
        columns: table.width(),
        generated: builder.feature_count(),
    })
}

pub fn run_predict(args: &PredictArgs) -> Result<PredictResult> {
    let config = PredictConfig::from_args(args)?;
    run_predict_with(&config)
}

pub fn run_predict_with(config: &PredictConfig) -> Result<PredictResult> {
    let run = &config.run;
    let span = info_span!("predict_run", input = %run.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    // =========================================================================
    // Stage 1: Load the model bundle
    // =========================================================================
    let bundle = ModelBundle::load(&config.model, config.model_sha256.as_deref())
        .with_context(|| format!("load model bundle {}", config.model.display()))?;
    let selected = bundle.selector.k();
    let pipeline = PredictionPipeline::new(bundle).context("validate model bundle")?;
    debug!(
        model = %config.model.display(),
        selected,
        verified = config.model_sha256.is_some(),
        "model bundle ready"
    );

    // =========================================================================
    // Stage 2: Read input and split off known outcomes
    // =========================================================================
    let df = read_csv_frame(&run.input)
        .with_context(|| format!("read input table {}", run.input.display()))?;
    let (df, truth) = match &config.label_column {
        Some(column) => {
            let (features, labels) = split_labels(&df, column)
                .with_context(|| format!("read label column {column}"))?;
            (features, Some((column.clone(), labels)))
        }
        None => (df, None),
    };

    // =========================================================================
    // Stage 3: Feature extraction
    // =========================================================================
    let builder = FeatureTableBuilder::new().with_threads(run.threads);
    let table = extract_features(&df, run.mode, &builder).context("extract features")?;

    // =========================================================================
    // Stage 4: Prediction and output
    // =========================================================================
    let predictions = pipeline.predict(&table).context("predict")?;
    for prediction in &predictions.predictions {
        trace!(
            id = redact_value(&prediction.id),
            probability = prediction.probability,
            label = prediction.label,
            "sample prediction"
        );
    }
    let output = run.output_path(PREDICT_SUFFIX);
    write_predictions(&predictions, &output)
        .with_context(|| format!("write predictions {}", output.display()))?;

    let validation = match truth {
        Some((label_column, labels)) => {
            let matrix = ConfusionMatrix::from_labels(&labels, &predictions.labels())
                .context("compare predictions with labels")?;
            let metrics = matrix.metrics();
            info!(
                accuracy = metrics.accuracy,
                sensitivity = metrics.sensitivity,
                specificity = metrics.specificity,
                "validation scored"
            );
            Some(ValidationReport {
                label_column,
                matrix,
                metrics,
            })
        }
        None => None,
    };

    info!(
        rows = predictions.len(),
        positives = predictions.positive_count(),
        duration_ms = start.elapsed().as_millis(),
        "prediction run complete"
    );
    Ok(PredictResult {
        input: run.input.clone(),
        model: config.model.clone(),
        output,
        mode: run.mode,
        rows: predictions.len(),
        positives: predictions.positive_count(),
        generated: builder.feature_count(),
        selected,
        validation,
    })
}
