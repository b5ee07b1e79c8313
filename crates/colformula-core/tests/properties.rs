//! Property tests for the coercion rules

use colformula_core::{autocast, sanitize, Categorical, ColumnData, Series, Value};
use proptest::prelude::*;

fn text_cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        (-1.0e6f64..1.0e6).prop_map(|n| Some(n.to_string())),
        "[a-z]{1,4}".prop_map(Some),
    ]
}

fn label() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1.0e6f64..1.0e6).prop_map(Value::Number),
        text_cell().prop_map(|t| Value::Text(t.unwrap_or_default())),
    ]
}

fn object_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        label(),
    ]
}

/// Categorical over number and text labels, with some codes null
fn mixed_categorical() -> impl Strategy<Value = Series> {
    prop::collection::vec(label(), 1..5).prop_flat_map(|labels| {
        let count = labels.len() as u32;
        prop::collection::vec(prop::option::of(0..count), 0..20).prop_map(move |codes| {
            Series::categorical(Categorical::new(labels.clone(), codes).unwrap())
        })
    })
}

/// Raw evaluation output of every kind that reaches the coercion rules
fn raw_column() -> impl Strategy<Value = Series> {
    prop_oneof![
        prop::collection::vec(text_cell(), 0..20).prop_map(Series::strings),
        prop::collection::vec(text_cell(), 0..20)
            .prop_map(|cells| Series::categorical(Categorical::from_labels(cells))),
        mixed_categorical(),
        prop::collection::vec(object_cell(), 0..20)
            .prop_map(|values| Series::new(ColumnData::Object(values))),
    ]
}

proptest! {
    /// Sanitizing always yields the default index, whatever slice it started from
    #[test]
    fn sanitize_resets_index(cells in prop::collection::vec(text_cell(), 0..20), skip in 0usize..5) {
        let series = Series::strings(cells.clone()).slice(skip..cells.len());
        let expected_len = series.len();
        let sanitized = sanitize(series);
        prop_assert_eq!(sanitized.index(), 0..expected_len);
    }

    /// Sanitizing and autocasting a second time changes nothing
    #[test]
    fn coercion_is_idempotent(series in raw_column()) {
        let once = autocast(sanitize(series));
        let twice = autocast(sanitize(once.clone()));
        prop_assert_eq!(once, twice);
    }

    /// Sanitizing a text categorical only prunes its labels
    #[test]
    fn sanitize_text_categorical_is_stable(labels in prop::collection::vec(prop::option::of("[a-c]"), 0..20)) {
        let series = Series::categorical(Categorical::from_labels(labels));
        let once = sanitize(series.clone());
        prop_assert_eq!(once.values(), series.values());
        prop_assert_eq!(sanitize(once.clone()), once);
    }

    /// Numbers written as text come back as the same numbers
    #[test]
    fn autocast_recovers_numbers(numbers in prop::collection::vec(prop::option::of(-1.0e9f64..1.0e9), 1..20)) {
        prop_assume!(numbers.iter().any(Option::is_some));
        let text = Series::strings(numbers.iter().map(|n| n.map(|n| format!("{:?}", n))));
        prop_assert_eq!(autocast(text), Series::numeric(numbers));
    }
}
