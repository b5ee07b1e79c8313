//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use colformula_core::Table;

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a table to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        table: &Table,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(table, file, options)
    }

    /// Write a table to a writer
    ///
    /// Nulls are written as empty fields and every other value in its display form.
    pub fn write<W: Write>(table: &Table, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        if options.write_header {
            csv_writer.write_record(table.column_names())?;
        }

        for row in 0..table.row_count() {
            let record: Vec<String> = (0..table.column_count())
                .map(|col| table.cell(row, col).display_string().unwrap_or_default())
                .collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colformula_core::Series;
    use pretty_assertions::assert_eq;

    fn write(table: &Table, options: &CsvWriteOptions) -> String {
        let mut out = Vec::new();
        CsvWriter::write(table, &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_header_and_rows() {
        let table = Table::from_columns([
            ("A", Series::numeric([Some(1.0), None])),
            ("B", Series::strings([Some("x,y"), Some("z")])),
        ])
        .unwrap();
        assert_eq!(
            write(&table, &CsvWriteOptions::default()),
            "A,B\n1.0,\"x,y\"\n,z\n"
        );
    }

    #[test]
    fn test_write_without_header() {
        let table = Table::from_columns([("A", Series::strings([Some("a")]))]).unwrap();
        let options = CsvWriteOptions {
            write_header: false,
            line_terminator: LineTerminator::CRLF,
            ..CsvWriteOptions::default()
        };
        assert_eq!(write(&table, &options), "a\r\n");
    }
}
