//! Integration tests for feature table assembly.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;

use celiver_features::{FeatureTableBuilder, InputMode, extract_features};
use celiver_model::CeliverError;

const SERIES_NAMES: [&str; 20] = [
    "W1", "W2", "W3", "W4", "W5", "W6", "W7", "W8", "W9", "W10", "W11", "W12", "W13", "W14",
    "W15", "W16", "W17", "W18", "W19", "W20",
];

fn series_columns(rows: &[[f64; 20]]) -> Vec<Column> {
    (0..20)
        .map(|idx| {
            let values: Vec<f64> = rows.iter().map(|row| row[idx]).collect();
            Series::new(SERIES_NAMES[idx].into(), values).into_column()
        })
        .collect()
}

fn ids(count: usize) -> Vec<String> {
    (0..count).map(|idx| format!("P{idx:03}")).collect()
}

/// Seven leading columns plus the series, as produced by raw preprocessing.
fn preprocessed_frame(rows: &[[f64; 20]]) -> DataFrame {
    let n = rows.len();
    let mut columns = vec![
        Series::new("ID".into(), ids(n)).into_column(),
        Series::new("Age".into(), vec![58.0; n]).into_column(),
        Series::new("Sex_F".into(), vec![1i64; n]).into_column(),
        Series::new("Sex_M".into(), vec![0i64; n]).into_column(),
        Series::new("AFP".into(), vec![2.3; n]).into_column(),
        Series::new("ALT".into(), vec![41.0; n]).into_column(),
        Series::new("AST".into(), vec![37.0; n]).into_column(),
    ];
    columns.extend(series_columns(rows));
    DataFrame::new(columns).unwrap()
}

fn raw_frame(sex: &[&str], afp: &[f64], rows: &[[f64; 20]]) -> DataFrame {
    let n = rows.len();
    let mut columns = vec![
        Series::new("ID".into(), ids(n)).into_column(),
        Series::new("Age".into(), vec![58.0; n]).into_column(),
        Series::new(
            "Sex".into(),
            sex.iter().map(|value| value.to_string()).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new("AFP".into(), afp.to_vec()).into_column(),
        Series::new("ALT".into(), vec![41.0; n]).into_column(),
        Series::new("AST".into(), vec![37.0; n]).into_column(),
    ];
    columns.extend(series_columns(rows));
    DataFrame::new(columns).unwrap()
}

fn ramp(scale: f64) -> [f64; 20] {
    let mut row = [0.0; 20];
    for (idx, cell) in row.iter_mut().enumerate() {
        *cell = scale * (idx as f64 + 1.0);
    }
    row
}

fn f64_value(df: &DataFrame, column: &str, row: usize) -> f64 {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .get(row)
        .unwrap()
}

fn i64_value(df: &DataFrame, column: &str, row: usize) -> i64 {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .get(row)
        .unwrap()
}

#[test]
fn feature_names_are_fixed() {
    let builder = FeatureTableBuilder::new();
    let names = builder.feature_names();
    assert_eq!(names.len(), 310);
    assert_eq!(builder.feature_count(), 310);
    assert_eq!(names[0], "SW_1_19");
    assert_eq!(names[18], "SW_19_1");
    assert_eq!(names[19], "PR10_1_2");
    assert_eq!(names[309], "PR1_19_20");
    assert_eq!(names.iter().filter(|n| n.starts_with("SW_")).count(), 19);
    assert_eq!(names.iter().filter(|n| n.starts_with('P')).count(), 291);
}

#[test]
fn raw_single_row_end_to_end() {
    let df = raw_frame(&["F"], &[10.0], &[ramp(3.1)]);
    let out = extract_features(&df, InputMode::Raw, &FeatureTableBuilder::new()).unwrap();

    assert_eq!(out.height(), 1);
    assert_eq!(out.width(), 27 + 310);
    assert_eq!(i64_value(&out, "Sex_F", 0), 1);
    assert_eq!(i64_value(&out, "Sex_M", 0), 0);
    assert!((f64_value(&out, "AFP", 0) - 11.0f64.ln()).abs() < 1e-12);
    assert!(out.column("Sex").is_err());

    let names: Vec<String> = out
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(&names[..7], &["ID", "Age", "Sex_F", "Sex_M", "AFP", "ALT", "AST"]);
    assert_eq!(names[7], "W1");
    assert_eq!(names[27], "SW_1_19");

    assert_eq!(f64_value(&out, "SW_1_19", 0), 0.0);
    assert_eq!(f64_value(&out, "SW_10_10", 0), 45.0 / 145.0);
    assert_eq!(f64_value(&out, "PR10_1_2", 0), 45.0 / 145.0);
    assert_eq!(f64_value(&out, "PI9_F1", 0), 36.0 / 117.0);
    assert_eq!(f64_value(&out, "PR1_1_2", 0), 0.0);
}

#[test]
fn preprocessed_input_skips_raw_step() {
    let df = preprocessed_frame(&[ramp(1.0), ramp(2.0)]);
    let out = extract_features(&df, InputMode::Preprocessed, &FeatureTableBuilder::new()).unwrap();
    assert_eq!(out.width(), 337);
    assert_eq!(f64_value(&out, "AFP", 0), 2.3);
}

#[test]
fn building_twice_is_identical() {
    let df = preprocessed_frame(&[ramp(1.0), ramp(-4.0), ramp(0.0)]);
    let builder = FeatureTableBuilder::new();
    let first = builder.build(&df).unwrap();
    let second = builder.build(&df).unwrap();
    assert!(first.equals(&second));
}

#[test]
fn row_order_is_preserved_across_threads() {
    let rows: Vec<[f64; 20]> = (0..257).map(|idx| ramp(idx as f64)).collect();
    let df = preprocessed_frame(&rows);

    let parallel = FeatureTableBuilder::new().with_threads(4).build(&df).unwrap();
    let sequential = FeatureTableBuilder::new().with_threads(1).build(&df).unwrap();
    let global = FeatureTableBuilder::new().build(&df).unwrap();

    assert_eq!(parallel.height(), 257);
    let out_ids: Vec<String> = parallel
        .column("ID")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect();
    assert_eq!(out_ids, ids(257));
    assert_eq!(f64_value(&parallel, "W1", 200), 200.0);
    assert!(parallel.equals(&sequential));
    assert!(parallel.equals(&global));
}

#[test]
fn empty_table_keeps_feature_columns() {
    let df = preprocessed_frame(&[]);
    let out = FeatureTableBuilder::new().build(&df).unwrap();
    assert_eq!(out.height(), 0);
    assert_eq!(out.width(), 337);
}

#[test]
fn wrong_width_is_a_shape_error() {
    let df = preprocessed_frame(&[ramp(1.0)]).drop("AST").unwrap();
    let err = FeatureTableBuilder::new().build(&df).unwrap_err();
    assert!(matches!(
        err,
        CeliverError::Shape {
            expected: 27,
            found: 26,
            ..
        }
    ));

    let mut wide = preprocessed_frame(&[ramp(1.0)]);
    wide.with_column(Series::new("Label".into(), vec![1i64]))
        .unwrap();
    let err = FeatureTableBuilder::new().build(&wide).unwrap_err();
    assert!(matches!(
        err,
        CeliverError::Shape {
            expected: 27,
            found: 28,
            ..
        }
    ));
}

#[test]
fn existing_feature_name_is_rejected() {
    let mut df = preprocessed_frame(&[ramp(1.0)]);
    df.rename("AST", "SW_1_19".into()).unwrap();
    let err = FeatureTableBuilder::new().build(&df).unwrap_err();
    assert!(matches!(err, CeliverError::DuplicateColumn { ref column } if column == "SW_1_19"));
}

#[test]
fn non_numeric_series_cells_do_not_matter() {
    let mut df = preprocessed_frame(&[ramp(1.0), ramp(2.0)]);
    df.with_column(Series::new(
        "W5".into(),
        vec!["n/a".to_string(), "12".to_string()],
    ))
    .unwrap();
    let out = FeatureTableBuilder::new().build(&df).unwrap();
    assert_eq!(f64_value(&out, "PR5_1_2", 0), f64_value(&out, "PR5_1_2", 1));
}

proptest! {
    #[test]
    fn feature_values_ignore_series_content(
        first in prop::array::uniform20(-1.0e6f64..1.0e6),
        second in prop::array::uniform20(-1.0e6f64..1.0e6),
    ) {
        let df = preprocessed_frame(&[first, second]);
        let out = FeatureTableBuilder::new().with_threads(1).build(&df).unwrap();
        for name in FeatureTableBuilder::new().feature_names() {
            prop_assert_eq!(f64_value(&out, &name, 0), f64_value(&out, &name, 1));
        }
    }
}
