//! Typed columns
//!
//! A [`Series`] pairs typed column data with a row index. The index is always a contiguous
//! range of row labels; slicing a series keeps the labels of the rows it came from.

use crate::error::{Error, Result};
use crate::value::Value;
use chrono::NaiveDateTime;
use std::ops::Range;

/// Kind of data stored in a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    Datetime,
    Categorical,
    String,
    Object,
}

/// Column storage
///
/// `Numeric`, `Datetime`, `Categorical` and `String` are the canonical kinds. `Object` holds
/// free-form values and only appears between evaluation and sanitizing.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Datetime(Vec<Option<NaiveDateTime>>),
    Categorical(Categorical),
    String(Vec<Option<String>>),
    Object(Vec<Value>),
}

impl ColumnData {
    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Datetime(v) => v.len(),
            ColumnData::Categorical(c) => c.len(),
            ColumnData::String(v) => v.len(),
            ColumnData::Object(v) => v.len(),
        }
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kind of this column
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Datetime(_) => ColumnKind::Datetime,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
            ColumnData::String(_) => ColumnKind::String,
            ColumnData::Object(_) => ColumnKind::Object,
        }
    }

    /// Check if this column is one of the canonical kinds with text-only labels
    pub fn is_canonical(&self) -> bool {
        match self {
            ColumnData::Object(_) => false,
            ColumnData::Categorical(c) => c.categories.iter().all(|l| matches!(l, Value::Text(_))),
            _ => true,
        }
    }

    /// Value at a position (0-based, independent of the index labels)
    pub fn get(&self, position: usize) -> Value {
        match self {
            ColumnData::Numeric(v) => v.get(position).copied().flatten().into(),
            ColumnData::Datetime(v) => v.get(position).copied().flatten().into(),
            ColumnData::Categorical(c) => c.get(position).cloned().unwrap_or(Value::Null),
            ColumnData::String(v) => v.get(position).cloned().flatten().into(),
            ColumnData::Object(v) => v.get(position).cloned().unwrap_or(Value::Null),
        }
    }

    fn slice(&self, rows: Range<usize>) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(v[rows].to_vec()),
            ColumnData::Datetime(v) => ColumnData::Datetime(v[rows].to_vec()),
            ColumnData::Categorical(c) => ColumnData::Categorical(Categorical {
                categories: c.categories.clone(),
                codes: c.codes[rows].to_vec(),
            }),
            ColumnData::String(v) => ColumnData::String(v[rows].to_vec()),
            ColumnData::Object(v) => ColumnData::Object(v[rows].to_vec()),
        }
    }
}

/// Dictionary-encoded column: a label list plus one optional code per row
#[derive(Debug, Clone, PartialEq)]
pub struct Categorical {
    categories: Vec<Value>,
    codes: Vec<Option<u32>>,
}

impl Categorical {
    /// Create from labels and codes, checking every code is in range
    pub fn new(categories: Vec<Value>, codes: Vec<Option<u32>>) -> Result<Self> {
        if let Some(code) = codes
            .iter()
            .flatten()
            .copied()
            .find(|&c| c as usize >= categories.len())
        {
            return Err(Error::InvalidCategoryCode {
                code,
                count: categories.len(),
            });
        }
        Ok(Self { categories, codes })
    }

    pub(crate) fn from_parts(categories: Vec<Value>, codes: Vec<Option<u32>>) -> Self {
        Self { categories, codes }
    }

    /// Encode text values; labels are the sorted distinct values
    pub fn from_labels<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let values: Vec<Option<String>> = values.into_iter().map(|v| v.map(Into::into)).collect();
        let mut labels: Vec<String> = values.iter().flatten().cloned().collect();
        labels.sort();
        labels.dedup();

        let codes = values
            .iter()
            .map(|v| {
                v.as_ref()
                    .and_then(|s| labels.binary_search(s).ok())
                    .map(|i| i as u32)
            })
            .collect();

        Self {
            categories: labels.into_iter().map(Value::Text).collect(),
            codes,
        }
    }

    /// Label list
    pub fn categories(&self) -> &[Value] {
        &self.categories
    }

    /// Per-row codes
    pub fn codes(&self) -> &[Option<u32>] {
        &self.codes
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Label of a row, `None` for null rows
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.codes
            .get(position)
            .copied()
            .flatten()
            .and_then(|c| self.categories.get(c as usize))
    }

    /// Drop labels no row refers to, keeping the order of the rest
    pub fn remove_unused_categories(self) -> Self {
        let mut used = vec![false; self.categories.len()];
        for code in self.codes.iter().flatten() {
            used[*code as usize] = true;
        }

        let mut remap = vec![None; self.categories.len()];
        let mut categories = Vec::new();
        for (old, label) in self.categories.into_iter().enumerate() {
            if used[old] {
                remap[old] = Some(categories.len() as u32);
                categories.push(label);
            }
        }

        let codes = self
            .codes
            .into_iter()
            .map(|c| c.and_then(|c| remap[c as usize]))
            .collect();

        Self { categories, codes }
    }
}

/// A typed column with its row index
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    index_start: usize,
    data: ColumnData,
}

impl Series {
    /// Create a series with the default `0..n` index
    pub fn new(data: ColumnData) -> Self {
        Self {
            index_start: 0,
            data,
        }
    }

    /// Create a series whose first row carries the label `index_start`
    pub fn with_index_start(data: ColumnData, index_start: usize) -> Self {
        Self { index_start, data }
    }

    /// Numeric column; NaN is stored as null
    pub fn numeric<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self::new(ColumnData::Numeric(
            values
                .into_iter()
                .map(|v| v.filter(|n| !n.is_nan()))
                .collect(),
        ))
    }

    /// Text column
    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self::new(ColumnData::String(
            values.into_iter().map(|v| v.map(Into::into)).collect(),
        ))
    }

    /// Timestamp column
    pub fn datetimes<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<NaiveDateTime>>,
    {
        Self::new(ColumnData::Datetime(values.into_iter().collect()))
    }

    /// Categorical column
    pub fn categorical(categorical: Categorical) -> Self {
        Self::new(ColumnData::Categorical(categorical))
    }

    /// Build a column from raw values, picking the narrowest kind that holds them all
    ///
    /// All numbers (or nulls) give a numeric column, all timestamps a datetime column, all
    /// text a string column. Anything else stays an object column.
    pub fn from_values(values: Vec<Value>) -> Self {
        let all = |f: fn(&Value) -> bool| values.iter().all(|v| v.is_null() || f(v));

        if values.iter().all(Value::is_null) {
            return Self::new(ColumnData::Object(values));
        }
        if all(|v| matches!(v, Value::Number(_))) {
            return Self::numeric(values.iter().map(Value::as_number));
        }
        if all(|v| matches!(v, Value::Datetime(_))) {
            return Self::datetimes(values.iter().map(|v| match v {
                Value::Datetime(dt) => Some(*dt),
                _ => None,
            }));
        }
        if all(|v| matches!(v, Value::Text(_))) {
            return Self::new(ColumnData::String(
                values
                    .into_iter()
                    .map(|v| match v {
                        Value::Text(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ));
        }
        Self::new(ColumnData::Object(values))
    }

    /// Column of `len` rows holding `value` in the first row and nulls elsewhere
    pub fn broadcast_first(value: Value, len: usize) -> Self {
        let nulls = len.saturating_sub(1);
        let data = match value {
            Value::Number(n) if len > 0 => ColumnData::Numeric(
                std::iter::once(Some(n).filter(|n| !n.is_nan()))
                    .chain(std::iter::repeat(None).take(nulls))
                    .collect(),
            ),
            Value::Datetime(dt) if len > 0 => ColumnData::Datetime(
                std::iter::once(Some(dt))
                    .chain(std::iter::repeat(None).take(nulls))
                    .collect(),
            ),
            other => {
                let first = other.display_string();
                ColumnData::String(
                    std::iter::once(first)
                        .chain(std::iter::repeat(None))
                        .take(len)
                        .collect(),
                )
            }
        };
        Self::new(data)
    }

    /// Row labels
    pub fn index(&self) -> Range<usize> {
        self.index_start..self.index_start + self.data.len()
    }

    /// Check if the index is `0..n`
    pub fn has_default_index(&self) -> bool {
        self.index_start == 0
    }

    /// Relabel rows `0..n`
    pub fn reset_index(self) -> Self {
        Self::new(self.data)
    }

    /// Underlying data
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Take the underlying data
    pub fn into_data(self) -> ColumnData {
        self.data
    }

    /// Kind of this column
    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at a position (0-based, independent of the index labels)
    pub fn get(&self, position: usize) -> Value {
        self.data.get(position)
    }

    /// All values in row order
    pub fn values(&self) -> Vec<Value> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }

    /// Rows at `positions`, clamped to the column; labels follow the source rows
    pub fn slice(&self, positions: Range<usize>) -> Series {
        let end = positions.end.min(self.len());
        let start = positions.start.min(end);
        Series {
            index_start: self.index_start + start,
            data: self.data.slice(start..end),
        }
    }
}
