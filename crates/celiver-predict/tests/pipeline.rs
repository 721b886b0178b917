//! Integration tests for bundle loading and prediction.

use std::fs;
use std::path::PathBuf;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use celiver_model::CeliverError;
use celiver_predict::{ModelBundle, PredictionPipeline, sha256_hex, sigmoid};

const BUNDLE: &str = r#"{
  "feature_names": ["Age", "AFP", "Score"],
  "scaler": { "data_min": [0.0, 0.0, -1.0], "data_max": [64.0, 10.0, 1.0] },
  "selector": { "indices": [0, 2] },
  "classifier": { "kind": "logistic", "weights": [4.0, 2.0], "intercept": -3.0 },
  "threshold": 0.5
}"#;

fn write_bundle(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("model.json");
    fs::write(&path, contents).expect("write bundle");
    path
}

fn table() -> DataFrame {
    let columns: Vec<Column> = vec![
        Series::new(
            "ID".into(),
            vec!["P1".to_string(), "P2".to_string(), "P3".to_string()],
        )
        .into_column(),
        Series::new("Age".into(), vec![64i64, 0, 32]).into_column(),
        Series::new("AFP".into(), vec![5.0, 5.0, 5.0]).into_column(),
        Series::new("Score".into(), vec![1.0, -1.0, 0.0]).into_column(),
    ];
    DataFrame::new(columns).unwrap()
}

#[test]
fn loads_and_predicts_in_row_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bundle(&dir, BUNDLE);
    let bundle = ModelBundle::load(&path, None).unwrap();
    assert_eq!(
        bundle.selected_feature_names(),
        Some(vec!["Age".to_string(), "Score".to_string()])
    );

    let pipeline = PredictionPipeline::new(bundle).unwrap();
    let predictions = pipeline.predict(&table()).unwrap();
    let ids: Vec<&str> = predictions
        .predictions
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, vec!["P1", "P2", "P3"]);

    // Scaled (Age, Score): P1 (1, 1), P2 (0, 0), P3 (0.5, 0.5).
    assert_eq!(predictions.predictions[0].probability, sigmoid(3.0));
    assert_eq!(predictions.predictions[1].probability, sigmoid(-3.0));
    assert_eq!(predictions.predictions[2].probability, 0.5);
    // Exactly 0.5 is not above the threshold.
    assert_eq!(predictions.labels(), vec![1, 0, 0]);
}

#[test]
fn checksum_is_verified() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bundle(&dir, BUNDLE);
    let digest = sha256_hex(BUNDLE.as_bytes());
    ModelBundle::load(&path, Some(&digest.to_uppercase())).unwrap();

    let err = ModelBundle::load(&path, Some("00ff")).unwrap_err();
    assert!(matches!(err, CeliverError::Artifact { .. }));
}

#[test]
fn missing_and_malformed_bundles() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelBundle::load(&dir.path().join("absent.json"), None).unwrap_err();
    assert!(matches!(err, CeliverError::MissingInput { .. }));

    let path = write_bundle(&dir, "{ \"scaler\": 3 }");
    let err = ModelBundle::load(&path, None).unwrap_err();
    assert!(matches!(err, CeliverError::Artifact { .. }));
}

#[test]
fn inconsistent_bundle_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let bad = BUNDLE.replace("\"weights\": [4.0, 2.0]", "\"weights\": [4.0]");
    let path = write_bundle(&dir, &bad);
    let err = ModelBundle::load(&path, None).unwrap_err();
    assert!(matches!(
        err,
        CeliverError::Shape {
            expected: 2,
            found: 1,
            ..
        }
    ));
}

#[test]
fn table_columns_must_match_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bundle(&dir, BUNDLE);
    let pipeline = PredictionPipeline::new(ModelBundle::load(&path, None).unwrap()).unwrap();

    let renamed = {
        let mut df = table();
        df.rename("AFP", "ALT".into()).unwrap();
        df
    };
    let err = pipeline.predict(&renamed).unwrap_err();
    assert!(matches!(err, CeliverError::MissingColumn { ref column } if column == "AFP"));

    let narrow = table().drop("Score").unwrap();
    let err = pipeline.predict(&narrow).unwrap_err();
    assert!(matches!(err, CeliverError::Shape { .. }));
}

#[test]
fn tree_ensemble_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{
      "scaler": { "data_min": [0.0, 0.0, 0.0], "data_max": [100.0, 10.0, 1.0] },
      "selector": { "indices": [1] },
      "classifier": {
        "kind": "tree_ensemble",
        "n_features": 1,
        "base_score": 0.0,
        "trees": [{
          "split_feature": [0, 0, 0],
          "threshold": [0.4, 0.0, 0.0],
          "left": [1, 0, 0],
          "right": [2, 0, 0],
          "default_left": [true, true, true],
          "is_leaf": [false, true, true],
          "leaf_value": [0.0, -2.0, 2.0]
        }]
      }
    }"#;
    let path = write_bundle(&dir, json);
    let pipeline = PredictionPipeline::new(ModelBundle::load(&path, None).unwrap()).unwrap();
    let predictions = pipeline.predict(&table()).unwrap();
    // AFP scales to 0.5 for every row, which goes right.
    assert!(predictions.predictions.iter().all(|p| p.probability == sigmoid(2.0)));
    assert_eq!(predictions.positive_count(), 3);
}

#[test]
fn null_cells_follow_tree_default_direction() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{
      "feature_names": ["Age", "W5"],
      "scaler": { "data_min": [0.0, 0.0], "data_max": [100.0, 1.0] },
      "selector": { "indices": [1] },
      "classifier": {
        "kind": "tree_ensemble",
        "n_features": 1,
        "base_score": 0.0,
        "trees": [{
          "split_feature": [0, 0, 0],
          "threshold": [0.5, 0.0, 0.0],
          "left": [1, 0, 0],
          "right": [2, 0, 0],
          "default_left": [true, true, true],
          "is_leaf": [false, true, true],
          "leaf_value": [0.0, -2.0, 2.0]
        }]
      }
    }"#;
    let path = write_bundle(&dir, json);
    let pipeline = PredictionPipeline::new(ModelBundle::load(&path, None).unwrap()).unwrap();
    let columns: Vec<Column> = vec![
        Series::new("ID".into(), vec!["P1".to_string(), "P2".to_string()]).into_column(),
        Series::new("Age".into(), vec![50.0, 61.0]).into_column(),
        Series::new("W5".into(), vec![Some(0.9), None]).into_column(),
    ];
    let df = DataFrame::new(columns).unwrap();

    let predictions = pipeline.predict(&df).unwrap();
    assert_eq!(predictions.predictions[0].probability, sigmoid(2.0));
    assert_eq!(predictions.predictions[1].id, "P2");
    assert_eq!(predictions.predictions[1].probability, sigmoid(-2.0));
    assert_eq!(predictions.labels(), vec![1, 0]);
}

#[test]
fn unreadable_cell_is_a_numeric_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bundle(&dir, BUNDLE);
    let pipeline = PredictionPipeline::new(ModelBundle::load(&path, None).unwrap()).unwrap();
    let mut df = table();
    df.with_column(Series::new(
        "Score".into(),
        vec!["1".to_string(), "high".to_string(), "0".to_string()],
    ))
    .unwrap();
    let err = pipeline.predict(&df).unwrap_err();
    assert!(matches!(
        err,
        CeliverError::Numeric { row: 1, ref value, .. } if value == "high"
    ));
}
