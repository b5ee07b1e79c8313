//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use chrono::{NaiveDate, NaiveDateTime};
use colformula_core::{parse_number, Series, Table};
use tracing::debug;

/// Timestamp layouts recognized when inferring datetime columns
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a table
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Table> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a table
    ///
    /// Empty fields are null. Short records are padded with nulls.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut names: Vec<String> = if options.has_header {
            csv_reader.headers()?.iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        let mut fields: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        let mut row_count = 0;
        for result in csv_reader.records() {
            let record = result?;
            while fields.len() < record.len() {
                fields.push(vec![None; row_count]);
            }
            for (col, column) in fields.iter_mut().enumerate() {
                let field = record.get(col).filter(|f| !f.is_empty());
                column.push(field.map(str::to_string));
            }
            row_count += 1;
        }

        while names.len() < fields.len() {
            names.push(default_column_name(names.len()));
        }

        debug!(rows = row_count, columns = names.len(), "read csv");
        let columns = names
            .into_iter()
            .zip(fields)
            .map(|(name, values)| (name, Self::column(values, options)));
        Ok(Table::from_columns(columns)?)
    }

    /// Build the narrowest column that holds every field
    fn column(values: Vec<Option<String>>, options: &CsvReadOptions) -> Series {
        let has_content = values.iter().any(Option::is_some);

        if has_content && options.infer_numbers {
            let numbers: Option<Vec<Option<f64>>> = values
                .iter()
                .map(|v| match v {
                    None => Some(None),
                    Some(text) => parse_number(text).map(Some),
                })
                .collect();
            if let Some(numbers) = numbers {
                return Series::numeric(numbers);
            }
        }

        if has_content && options.infer_datetimes {
            let datetimes: Option<Vec<Option<NaiveDateTime>>> = values
                .iter()
                .map(|v| match v {
                    None => Some(None),
                    Some(text) => parse_datetime(text).map(Some),
                })
                .collect();
            if let Some(datetimes) = datetimes {
                return Series::datetimes(datetimes);
            }
        }

        Series::strings(values)
    }
}

/// Parse an ISO-8601 date or timestamp
fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Spreadsheet-style column name (A, B, ..., Z, AA, AB, ...) for a 0-based position
fn default_column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
