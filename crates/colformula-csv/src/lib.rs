//! # colformula-csv
//!
//! CSV reader and writer for colformula tables.
//!
//! ## Example
//!
//! ```rust
//! use colformula_csv::{CsvReadOptions, CsvReader};
//!
//! let data = "A,B\n1,x\n2,\n";
//! let table = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["A", "B"]);
//! ```

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
