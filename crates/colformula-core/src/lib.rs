//! # colformula-core
//!
//! Column model and type coercion rules for colformula.
//!
//! This crate provides:
//! - [`Value`] - Raw cell payloads (numbers, text, timestamps, lists, opaque objects)
//! - [`Series`] and [`ColumnData`] - Typed columns with a row index
//! - [`Table`] - Ordered named columns
//! - [`sanitize`] and [`autocast`] - Normalization of evaluation output
//! - [`serial`] - Timestamp to spreadsheet serial conversion
//!
//! ## Example
//!
//! ```rust
//! use colformula_core::{autocast, sanitize, Series, Value};
//!
//! let raw = Series::from_values(vec![Value::from("1"), Value::from("2")]);
//! let column = autocast(sanitize(raw));
//! assert_eq!(column, Series::numeric(vec![Some(1.0), Some(2.0)]));
//! ```

pub mod autocast;
pub mod error;
pub mod sanitize;
pub mod serial;
pub mod series;
pub mod table;
pub mod value;

pub use autocast::{autocast, parse_number};
pub use error::{Error, Result};
pub use sanitize::sanitize;
pub use serial::{datetime_to_serial, prepare_for_spreadsheet, serial_to_datetime};
pub use series::{Categorical, ColumnData, ColumnKind, Series};
pub use table::Table;
pub use value::{format_datetime, format_number, Opaque, Value};
