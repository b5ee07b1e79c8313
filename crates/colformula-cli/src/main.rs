//! colformula CLI - add a formula column to a CSV table

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colformula::prelude::*;
use colformula::migrate_params;
use colformula_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "colformula")]
#[command(
    author,
    version,
    about = "Add a column computed by a spreadsheet formula or an expression to a CSV table"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula against a CSV table and write the table with the result column
    Render {
        /// Input CSV file (first row holds column names)
        input: PathBuf,

        /// JSON parameters file; flags below override its values
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Spreadsheet formula, e.g. "=SUM(A1:C1)"
        #[arg(long, conflicts_with = "python")]
        excel: Option<String>,

        /// Expression over column names, e.g. "A * 2"
        #[arg(long)]
        python: Option<String>,

        /// Apply the spreadsheet formula to every row
        #[arg(long)]
        all_rows: bool,

        /// Name of the result column (default: result)
        #[arg(long)]
        out_column: Option<String>,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter for input and output (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Print stored parameters rewritten to the current form
    Migrate {
        /// JSON parameters file
        params: PathBuf,
    },
}

/// Formula flags given on the command line
#[derive(Debug, Default)]
struct Overrides {
    excel: Option<String>,
    python: Option<String>,
    all_rows: bool,
    out_column: Option<String>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            params,
            excel,
            python,
            all_rows,
            out_column,
            output,
            delimiter,
        } => {
            let params = build_params(
                params.as_deref(),
                Overrides {
                    excel,
                    python,
                    all_rows,
                    out_column,
                },
            )?;
            render_csv(&input, &params, output.as_deref(), delimiter)
        }
        Commands::Migrate { params } => migrate(&params),
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_params_file(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in '{}'", path.display()))
}

/// Parameters from the optional file, with command-line flags applied on top
fn build_params(file: Option<&Path>, overrides: Overrides) -> Result<Params> {
    let mut params = match file {
        Some(path) => Params::from_json(read_params_file(path)?)
            .with_context(|| format!("Invalid parameters in '{}'", path.display()))?,
        None => Params::default(),
    };

    if let Some(formula) = overrides.excel {
        params.syntax = Syntax::Excel;
        params.formula_excel = formula;
    }
    if let Some(expression) = overrides.python {
        params.syntax = Syntax::Python;
        params.formula_python = expression;
    }
    if overrides.all_rows {
        params.all_rows = true;
    }
    if let Some(name) = overrides.out_column {
        params.out_column = name;
    }
    Ok(params)
}

fn render_csv(input: &Path, params: &Params, output: Option<&Path>, delimiter: char) -> Result<()> {
    let delimiter = u8::try_from(delimiter).context("Delimiter must be a single-byte character")?;

    let table = CsvReader::read_file(
        input,
        &CsvReadOptions {
            delimiter,
            ..Default::default()
        },
    )
    .with_context(|| format!("Failed to read '{}'", input.display()))?;
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded table"
    );

    let table = match render(Some(table), params) {
        RenderOutput::Table(table) => table,
        RenderOutput::Message(message) => bail!("{}", message),
        RenderOutput::NoTable => bail!("No table to render"),
    };

    let options = CsvWriteOptions {
        delimiter,
        ..Default::default()
    };
    match output {
        Some(path) => {
            CsvWriter::write_file(&table, path, &options)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            eprintln!("Wrote {} rows to '{}'", table.row_count(), path.display());
        }
        None => {
            CsvWriter::write(&table, io::stdout().lock(), &options)
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn migrate(path: &Path) -> Result<()> {
    let params = migrate_params(read_params_file(path)?)
        .with_context(|| format!("Failed to migrate '{}'", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.json");
        fs::write(
            &path,
            r#"{"syntax": 1, "formula_python": "A", "out_column": "R"}"#,
        )
        .unwrap();

        let params = build_params(
            Some(&path),
            Overrides {
                excel: Some("=A1*2".into()),
                all_rows: true,
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(params.syntax, Syntax::Excel);
        assert_eq!(params.formula_excel, "=A1*2");
        assert_eq!(params.formula_python, "A");
        assert!(params.all_rows);
        assert_eq!(params.out_column, "R");
    }

    #[test]
    fn test_render_csv_to_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "A,B\n1,2\n3,4\n").unwrap();

        let params = Params::excel("=A1+B1", true).with_out_column("C");
        render_csv(&input, &params, Some(&output), ',').unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "A,B,C\n1.0,2.0,3.0\n3.0,4.0,7.0\n"
        );
    }

    #[test]
    fn test_render_message_is_an_error() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "A\n1\n").unwrap();

        let params = Params::excel("=DATEX(A1)", false);
        let err = render_csv(&input, &params, None, ',').unwrap_err();
        assert_eq!(err.to_string(), "Function DATEX not implemented");
    }

    #[test]
    fn test_missing_params_file() {
        let dir = TempDir::new().unwrap();
        assert!(build_params(Some(&dir.path().join("nope.json")), Overrides::default()).is_err());
    }
}
