//! Tables of named columns

use crate::error::{Error, Result};
use crate::series::Series;
use crate::value::Value;

/// An ordered collection of named columns sharing one row count
///
/// Every stored column has the default `0..n` index; columns with another index are
/// relabelled on insertion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<(String, Series)>,
    row_count: usize,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from `(name, column)` pairs
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Series)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, series) in columns {
            let name = name.into();
            if table.contains_column(&name) {
                return Err(Error::DuplicateColumn(name));
            }
            table.set_column(name, series)?;
        }
        Ok(table)
    }

    /// Add a column, or replace the column of the same name in place
    pub fn set_column(&mut self, name: impl Into<String>, series: Series) -> Result<()> {
        let name = name.into();
        if !self.columns.is_empty() && series.len() != self.row_count {
            return Err(Error::LengthMismatch {
                name,
                expected: self.row_count,
                actual: series.len(),
            });
        }

        let series = series.reset_index();
        self.row_count = series.len();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = series,
            None => self.columns.push((name, series)),
        }
        Ok(())
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, column)` pairs in order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.columns.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Check if a column exists
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Column by position
    pub fn column_at(&self, index: usize) -> Option<&Series> {
        self.columns.get(index).map(|(_, s)| s)
    }

    /// Cell value; out-of-range positions read as null
    pub fn cell(&self, row: usize, col: usize) -> Value {
        self.column_at(col)
            .map_or(Value::Null, |series| series.get(row))
    }

    /// Copy of the table with every column passed through `f`
    ///
    /// `f` must keep the row count.
    pub(crate) fn map_columns<F>(&self, mut f: F) -> Table
    where
        F: FnMut(&Series) -> Series,
    {
        let columns: Vec<(String, Series)> = self
            .columns
            .iter()
            .map(|(name, series)| (name.clone(), f(series).reset_index()))
            .collect();
        debug_assert!(columns.iter().all(|(_, s)| s.len() == self.row_count));
        Table {
            columns,
            row_count: self.row_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("A", Series::numeric(vec![Some(1.0), Some(2.0)])),
            ("B", Series::strings(vec![Some("x"), None])),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_columns() {
        let table = sample();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(table.cell(0, 1), Value::from("x"));
        assert_eq!(table.cell(1, 1), Value::Null);
        assert_eq!(table.cell(5, 0), Value::Null);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Table::from_columns(vec![
            ("A", Series::numeric(vec![Some(1.0)])),
            ("A", Series::numeric(vec![Some(2.0)])),
        ])
        .unwrap_err();
        assert_eq!(err, Error::DuplicateColumn("A".into()));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut table = sample();
        let err = table
            .set_column("C", Series::numeric(vec![Some(1.0)]))
            .unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                name: "C".into(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_set_column_replaces_in_place() {
        let mut table = sample();
        table
            .set_column("A", Series::strings(vec![Some("p"), Some("q")]))
            .unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(table.cell(1, 0), Value::from("q"));
    }

    #[test]
    fn test_set_column_resets_index() {
        let mut table = Table::new();
        let sliced = Series::numeric(vec![Some(1.0), Some(2.0), Some(3.0)]).slice(1..3);
        table.set_column("A", sliced).unwrap();
        assert_eq!(table.column("A").unwrap().index(), 0..2);
    }
}
