//! In-memory tabular dataset
//!
//! A [`Dataset`] is an ordered list of named numeric columns stored row-major
//! in an `Array2<f64>`. Missing cells are NaN. Once built it is never mutated;
//! preprocessing steps return new datasets and the splitter hands out owned
//! [`Partition`]s.

use crate::error::{BenchError, Result};
use crate::utils::{DataLoader, DataSaver};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Named numeric columns over a shared row index
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl Dataset {
    /// Build a dataset from column names and a row-major value matrix
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(BenchError::ShapeError {
                expected: format!("{} columns", columns.len()),
                actual: format!("{} columns", values.ncols()),
            });
        }
        if values.nrows() == 0 {
            return Err(BenchError::DataError(
                "dataset must contain at least one row".to_string(),
            ));
        }
        if columns.is_empty() {
            return Err(BenchError::DataError(
                "dataset must contain at least one column".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(BenchError::DataError(format!("duplicate column name '{}'", name)));
            }
        }

        Ok(Self { columns, values })
    }

    /// Assemble features and target into one table, target appended as the last column
    pub fn from_features_and_target(
        feature_names: Vec<String>,
        x: Array2<f64>,
        target_name: impl Into<String>,
        y: Array1<f64>,
    ) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(BenchError::ShapeError {
                expected: format!("y length = {}", x.nrows()),
                actual: format!("y length = {}", y.len()),
            });
        }

        let mut columns = feature_names;
        columns.push(target_name.into());

        let mut values = x;
        values.push_column(y.view())?;

        Self::new(columns, values)
    }

    /// Convert a polars frame; every column must be castable to f64, nulls become NaN
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let n_rows = df.height();
        let mut columns = Vec::with_capacity(df.width());
        let mut col_data: Vec<Vec<f64>> = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let name = column.name().to_string();
            let series = column.as_materialized_series();
            let as_f64 = series
                .strict_cast(&DataType::Float64)
                .map_err(|_| BenchError::DataError(format!("column '{}' is not numeric", name)))?;
            let values: Vec<f64> = as_f64
                .f64()
                .map_err(|e| BenchError::DataError(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            columns.push(name);
            col_data.push(values);
        }

        let values = Array2::from_shape_fn((n_rows, col_data.len()), |(r, c)| col_data[c][r]);
        Self::new(columns, values)
    }

    /// Convert back into a polars frame (column order preserved)
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| Column::new(name.as_str().into(), self.values.column(idx).to_vec()))
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    /// Load from a CSV file with a header row
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let df = DataLoader::new().load_csv(path.as_ref())?;
        Self::from_dataframe(&df)
    }

    /// Persist as CSV (UTF-8, comma-delimited, header row, no index column)
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut df = self.to_dataframe()?;
        DataSaver::save_csv(&mut df, path.as_ref())
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw value matrix
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    /// Position of a named column
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| BenchError::FeatureNotFound(name.to_string()))
    }

    /// View of a named column
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let idx = self.column_index(name)?;
        Ok(self.values.column(idx))
    }

    /// Names of every column except `target`
    pub fn feature_names(&self, target: &str) -> Result<Vec<String>> {
        let target_idx = self.column_index(target)?;
        Ok(self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target_idx)
            .map(|(_, c)| c.clone())
            .collect())
    }

    /// New dataset with the same columns and only the given rows
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        Self::new(self.columns.clone(), self.values.select(Axis(0), rows))
    }

    /// New dataset with one column replaced
    pub(crate) fn with_column_values(&self, idx: usize, values: Array1<f64>) -> Result<Self> {
        let mut out = self.values.clone();
        out.column_mut(idx).assign(&values);
        Self::new(self.columns.clone(), out)
    }

    /// Split the given rows into features and target
    pub(crate) fn partition(&self, target_idx: usize, rows: &[usize]) -> Partition {
        let feature_idx: Vec<usize> = (0..self.n_columns()).filter(|&c| c != target_idx).collect();
        let rows_view = self.values.select(Axis(0), rows);

        Partition {
            feature_names: feature_idx.iter().map(|&c| self.columns[c].clone()).collect(),
            target_name: self.columns[target_idx].clone(),
            row_indices: rows.to_vec(),
            x: rows_view.select(Axis(1), &feature_idx),
            y: rows_view.column(target_idx).to_owned(),
        }
    }

    /// Basic shape and missing-value summary
    pub fn info(&self) -> DatasetInfo {
        let n_rows = self.n_rows();
        let missing = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let count = self.values.column(idx).iter().filter(|v| v.is_nan()).count();
                MissingValues {
                    column: name.clone(),
                    count,
                    fraction: count as f64 / n_rows as f64,
                }
            })
            .collect();

        DatasetInfo {
            n_rows,
            n_columns: self.n_columns(),
            columns: self.columns.clone(),
            missing,
        }
    }
}

/// Missing-value count for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValues {
    pub column: String,
    pub count: usize,
    /// Share of rows in `[0, 1]`
    pub fraction: f64,
}

/// Summary returned by [`Dataset::info`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub n_rows: usize,
    pub n_columns: usize,
    pub columns: Vec<String>,
    pub missing: Vec<MissingValues>,
}

/// One side of a train/test split: features, target and the source row ids
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub feature_names: Vec<String>,
    pub target_name: String,
    /// Row positions in the originating dataset
    pub row_indices: Vec<usize>,
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

impl Partition {
    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.y.len()
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small() -> Dataset {
        Dataset::new(
            vec!["a".into(), "b".into(), "target".into()],
            array![[1.0, 10.0, 100.0], [2.0, 20.0, 200.0], [3.0, f64::NAN, 300.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(
            Dataset::new(vec!["a".into()], array![[1.0, 2.0]]),
            Err(BenchError::ShapeError { .. })
        ));
        assert!(matches!(
            Dataset::new(vec!["a".into()], Array2::zeros((0, 1))),
            Err(BenchError::DataError(_))
        ));
        assert!(matches!(
            Dataset::new(vec!["a".into(), "a".into()], array![[1.0, 2.0]]),
            Err(BenchError::DataError(_))
        ));
    }

    #[test]
    fn test_target_appended_last() {
        let ds = Dataset::from_features_and_target(
            vec!["x1".into(), "x2".into()],
            array![[1.0, 2.0], [3.0, 4.0]],
            "y",
            array![5.0, 6.0],
        )
        .unwrap();
        assert_eq!(ds.columns(), &["x1", "x2", "y"]);
        assert_eq!(ds.column("y").unwrap().to_vec(), vec![5.0, 6.0]);
    }

    #[test]
    fn test_missing_column() {
        let ds = small();
        assert!(matches!(ds.column("nope"), Err(BenchError::FeatureNotFound(_))));
        assert_eq!(ds.feature_names("target").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_partition_extracts_rows() {
        let ds = small();
        let part = ds.partition(2, &[2, 0]);
        assert_eq!(part.feature_names, vec!["a", "b"]);
        assert_eq!(part.target_name, "target");
        assert_eq!(part.row_indices, vec![2, 0]);
        assert_eq!(part.y.to_vec(), vec![300.0, 100.0]);
        assert_eq!(part.x[[1, 1]], 10.0);
        assert_eq!(part.n_features(), 2);
    }

    #[test]
    fn test_info_counts_missing() {
        let info = small().info();
        assert_eq!(info.n_rows, 3);
        assert_eq!(info.n_columns, 3);
        assert_eq!(info.missing[1].count, 1);
        assert!((info.missing[1].fraction - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(info.missing[0].count, 0);
    }

    #[test]
    fn test_dataframe_roundtrip_keeps_nulls_as_nan() {
        let ds = small();
        let df = ds.to_dataframe().unwrap();
        assert_eq!(df.height(), 3);
        let back = Dataset::from_dataframe(&df).unwrap();
        assert_eq!(back.columns(), ds.columns());
        assert!(back.values()[[2, 1]].is_nan());
        assert_eq!(back.values()[[1, 2]], 200.0);
    }
}
