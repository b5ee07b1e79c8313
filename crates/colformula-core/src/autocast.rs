//! Numeric promotion of text columns

use crate::series::{ColumnData, Series};
use crate::value::Value;
use tracing::warn;

/// Promote a text or categorical column to numeric when every non-empty value is a number
///
/// Columns that are entirely null or empty strings are returned unchanged, as are columns
/// with any value that does not parse. Empty strings become null in the numeric result.
/// Numeric and datetime columns are returned unchanged.
pub fn autocast(series: Series) -> Series {
    let parsed = match series.data() {
        ColumnData::String(values) => parse_all(values.iter().map(|v| v.as_deref())),
        ColumnData::Categorical(cat) => {
            let labels: Vec<Option<String>> =
                cat.categories().iter().map(Value::display_string).collect();
            parse_all(
                cat.codes()
                    .iter()
                    .map(|c| c.and_then(|c| labels[c as usize].as_deref())),
            )
        }
        ColumnData::Object(_) => {
            warn!("autocast called on an unsanitized object column");
            None
        }
        ColumnData::Numeric(_) | ColumnData::Datetime(_) => None,
    };

    match parsed {
        Some(numbers) => {
            let start = series.index().start;
            Series::with_index_start(ColumnData::Numeric(numbers), start)
        }
        None => series,
    }
}

/// Parse text the way columns are promoted: locale-free, surrounding whitespace ignored
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

fn parse_all<'a, I>(values: I) -> Option<Vec<Option<f64>>>
where
    I: Iterator<Item = Option<&'a str>>,
{
    let mut has_content = false;
    let mut numbers = Vec::new();

    for value in values {
        match value {
            None | Some("") => numbers.push(None),
            Some(text) => {
                has_content = true;
                let n = parse_number(text)?;
                numbers.push(Some(n).filter(|n| !n.is_nan()));
            }
        }
    }

    has_content.then_some(numbers)
}
