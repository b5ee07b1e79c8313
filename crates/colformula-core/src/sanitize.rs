//! Normalization of evaluation output into canonical column kinds

use crate::series::{Categorical, ColumnData, Series};
use crate::value::Value;
use ahash::AHashMap;

/// Normalize a column so it can be stored in a [`Table`](crate::Table)
///
/// - the index is reset to `0..n`;
/// - categoricals lose unused labels, become numeric when every label is a number, and
///   get text labels otherwise;
/// - object columns become text, nulls stay null;
/// - numeric, datetime and string columns are kept as they are.
pub fn sanitize(series: Series) -> Series {
    let data = match series.into_data() {
        ColumnData::Categorical(cat) => sanitize_categorical(cat),
        ColumnData::Object(values) => {
            ColumnData::String(values.iter().map(Value::display_string).collect())
        }
        other => other,
    };
    Series::new(data)
}

fn sanitize_categorical(cat: Categorical) -> ColumnData {
    let cat = cat.remove_unused_categories();
    let labels = cat.categories();

    if !labels.is_empty() && labels.iter().all(|l| matches!(l, Value::Number(_))) {
        return ColumnData::Numeric(
            (0..cat.len())
                .map(|i| cat.get(i).and_then(Value::as_number))
                .collect(),
        );
    }

    if labels.iter().all(|l| matches!(l, Value::Text(_))) {
        return ColumnData::Categorical(cat);
    }

    ColumnData::Categorical(relabel_as_text(&cat))
}

/// Rebuild a categorical over the text form of its labels; labels with equal text merge
fn relabel_as_text(cat: &Categorical) -> Categorical {
    let texts: Vec<String> = cat
        .categories()
        .iter()
        .map(|l| l.display_string().unwrap_or_default())
        .collect();

    let mut labels = texts.clone();
    labels.sort();
    labels.dedup();

    let positions: AHashMap<&str, u32> = labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i as u32))
        .collect();
    let codes: Vec<Option<u32>> = cat
        .codes()
        .iter()
        .map(|c| c.and_then(|c| positions.get(texts[c as usize].as_str()).copied()))
        .collect();

    Categorical::from_parts(labels.into_iter().map(Value::Text).collect(), codes)
}
