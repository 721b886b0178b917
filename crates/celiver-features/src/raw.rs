//! Preprocessing of raw (unencoded) input tables.
//!
//! Raw tables carry `Sex` as a category and `AFP` on its natural scale. The
//! trained model expects two indicator columns in place of `Sex` and a
//! log-scaled `AFP`:
//!
//! - `Sex_F` is inserted at column 3 and `Sex_M` at column 4, in that order,
//!   before `Sex` is dropped. The series offset of the preprocessed table
//!   depends on these positions.
//! - `Sex_M` is always `1 - Sex_F`.
//! - `AFP` becomes `ln(1 + AFP)` in place.

use polars::prelude::{DataFrame, DataType, NamedFrom, Series};
use tracing::{debug, info_span};

use celiver_model::{CeliverError, Result};

/// Converts a raw input table into the model's column layout.
#[derive(Debug, Clone)]
pub struct RawPreprocessor {
    pub sex_column: String,
    pub afp_column: String,
    /// Category value that marks a female sample.
    pub female_code: String,
    pub female_index: usize,
    pub male_index: usize,
}

impl Default for RawPreprocessor {
    fn default() -> Self {
        Self {
            sex_column: "Sex".to_string(),
            afp_column: "AFP".to_string(),
            female_code: "F".to_string(),
            female_index: 3,
            male_index: 4,
        }
    }
}

pub const FEMALE_INDICATOR: &str = "Sex_F";
pub const MALE_INDICATOR: &str = "Sex_M";

impl RawPreprocessor {
    /// Return a preprocessed copy of `df`.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let span = info_span!("raw_preprocess", rows = df.height());
        let _guard = span.enter();

        for indicator in [FEMALE_INDICATOR, MALE_INDICATOR] {
            if df.column(indicator).is_ok() {
                return Err(CeliverError::DuplicateColumn {
                    column: indicator.to_string(),
                });
            }
        }
        let female = self.female_indicator(df)?;
        let afp = self.log_afp(df)?;
        if df.width() < self.female_index {
            return Err(CeliverError::shape(
                "raw input columns",
                self.female_index,
                df.width(),
            ));
        }

        let male: Vec<i64> = female.iter().map(|value| 1 - value).collect();
        let mut out = df.clone();
        out.insert_column(
            self.female_index,
            Series::new(FEMALE_INDICATOR.into(), female),
        )?;
        out.insert_column(self.male_index, Series::new(MALE_INDICATOR.into(), male))?;
        let mut out = out.drop(&self.sex_column)?;
        out.with_column(Series::new(self.afp_column.as_str().into(), afp))?;
        debug!(columns = out.width(), "raw input preprocessed");
        Ok(out)
    }

    fn female_indicator(&self, df: &DataFrame) -> Result<Vec<i64>> {
        let column = df
            .column(&self.sex_column)
            .map_err(|_| CeliverError::missing_column(&self.sex_column))?
            .cast(&DataType::String)?;
        let values = column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|value| i64::from(value == Some(self.female_code.as_str())))
            .collect();
        Ok(values)
    }

    fn log_afp(&self, df: &DataFrame) -> Result<Vec<Option<f64>>> {
        let column = df
            .column(&self.afp_column)
            .map_err(|_| CeliverError::missing_column(&self.afp_column))?
            .cast(&DataType::Float64)?;
        let mut values = Vec::with_capacity(df.height());
        for (row, value) in column.as_materialized_series().f64()?.into_iter().enumerate() {
            match value {
                None => values.push(None),
                // ln(1 + x) is only finite above -1; NaN fails the comparison too.
                Some(afp) if afp > -1.0 => values.push(Some(afp.ln_1p())),
                Some(afp) => return Err(CeliverError::numeric(&self.afp_column, row, afp)),
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, IntoColumn};
    use proptest::prelude::*;

    use super::*;

    fn raw_frame(sex: Vec<&str>, afp: Vec<f64>) -> DataFrame {
        let rows = sex.len();
        let columns: Vec<Column> = vec![
            Series::new("ID".into(), (0..rows as i64).collect::<Vec<_>>()).into_column(),
            Series::new("Age".into(), vec![60i64; rows]).into_column(),
            Series::new(
                "Sex".into(),
                sex.into_iter().map(String::from).collect::<Vec<_>>(),
            )
            .into_column(),
            Series::new("AFP".into(), afp).into_column(),
            Series::new("ALT".into(), vec![30.0; rows]).into_column(),
        ];
        DataFrame::new(columns).unwrap()
    }

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    #[test]
    fn inserts_indicators_and_drops_sex() {
        let df = raw_frame(vec!["F", "M", "f"], vec![10.0, 0.0, 3.0]);
        let out = RawPreprocessor::default().apply(&df).unwrap();

        assert_eq!(names(&out), vec!["ID", "Age", "Sex_F", "Sex_M", "AFP", "ALT"]);
        let female: Vec<Option<i64>> = out
            .column("Sex_F")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        let male: Vec<Option<i64>> = out
            .column("Sex_M")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(female, vec![Some(1), Some(0), Some(0)]);
        assert_eq!(male, vec![Some(0), Some(1), Some(1)]);
        // Input stays as it was.
        assert_eq!(names(&df), vec!["ID", "Age", "Sex", "AFP", "ALT"]);
    }

    #[test]
    fn log_transforms_afp() {
        let df = raw_frame(vec!["F", "M"], vec![10.0, 0.0]);
        let out = RawPreprocessor::default().apply(&df).unwrap();
        let afp: Vec<Option<f64>> = out
            .column("AFP")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(afp, vec![Some(10.0f64.ln_1p()), Some(0.0)]);
        let logged = afp[0].unwrap();
        assert!((logged - 11.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn rejects_afp_at_or_below_minus_one() {
        let df = raw_frame(vec!["F", "M"], vec![1.0, -1.0]);
        let err = RawPreprocessor::default().apply(&df).unwrap_err();
        assert!(matches!(err, CeliverError::Numeric { row: 1, .. }));
    }

    #[test]
    fn missing_sex_column_is_reported() {
        let df = raw_frame(vec!["F"], vec![1.0]).drop("Sex").unwrap();
        let err = RawPreprocessor::default().apply(&df).unwrap_err();
        assert!(matches!(err, CeliverError::MissingColumn { ref column } if column == "Sex"));
    }

    fn i64_values(df: &DataFrame, column: &str) -> Vec<Option<i64>> {
        df.column(column)
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    proptest! {
        #[test]
        fn indicators_and_afp_hold_for_every_row(
            rows in prop::collection::vec(
                (
                    prop::sample::select(vec!["F", "M", "f", "U", ""]),
                    prop::option::of(-0.999f64..1.0e6),
                ),
                1..40,
            )
        ) {
            let sex: Vec<String> = rows.iter().map(|(sex, _)| sex.to_string()).collect();
            let afp: Vec<Option<f64>> = rows.iter().map(|(_, afp)| *afp).collect();
            let df = DataFrame::new(vec![
                Series::new("ID".into(), (0..rows.len() as i64).collect::<Vec<_>>()).into_column(),
                Series::new("Sex".into(), sex.clone()).into_column(),
                Series::new("AFP".into(), afp.clone()).into_column(),
            ])
            .unwrap();
            let preprocessor = RawPreprocessor {
                female_index: 1,
                male_index: 2,
                ..RawPreprocessor::default()
            };
            let out = preprocessor.apply(&df).unwrap();

            let female = i64_values(&out, FEMALE_INDICATOR);
            let male = i64_values(&out, MALE_INDICATOR);
            let logged: Vec<Option<f64>> = out
                .column("AFP")
                .unwrap()
                .as_materialized_series()
                .f64()
                .unwrap()
                .into_iter()
                .collect();
            for row in 0..rows.len() {
                let (f, m) = (female[row].unwrap(), male[row].unwrap());
                prop_assert_eq!(f + m, 1);
                prop_assert_eq!(f == 1, sex[row] == "F");
                prop_assert_eq!(logged[row], afp[row].map(f64::ln_1p));
            }
        }
    }
}
