use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::ConsistencyError;

/// Shape of a freshly loaded table, reported back to the user before mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStatus {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
}

impl LoadStatus {
    pub fn of(df: &DataFrame) -> Self {
        Self {
            rows: df.height(),
            columns: df.width(),
            column_names: df
                .get_column_names_str()
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// Cell values read as missing, the same set pandas treats as NA by default.
pub const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn read_options() -> CsvReadOptions {
    let missing: Vec<PlSmallStr> = MISSING_TOKENS.iter().map(|t| (*t).into()).collect();
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .map_parse_options(|opts| {
            opts.with_null_values(Some(NullValues::AllColumns(missing.clone())))
        })
}

/// Read CSV bytes into a DataFrame with all columns as String dtype.
/// Missing cells and NA tokens become empty strings, blank lines are skipped.
pub fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame, ConsistencyError> {
    let bytes = skip_blank_lines(bytes);
    let df = read_options()
        .into_reader_with_file_handle(Cursor::new(bytes.clone()))
        .finish()
        .map_err(|e| ConsistencyError::Load(e.to_string()))?;
    reject_duplicate_headers(&bytes)?;

    debug!(rows = df.height(), columns = df.width(), "parsed CSV bytes");
    fill_missing(df)
}

/// Read a CSV file with all columns as String dtype.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<DataFrame, ConsistencyError> {
    let path = path.as_ref();
    let in_file = |e: String| ConsistencyError::Load(format!("{}: {e}", path.display()));

    let bytes = std::fs::read(path).map_err(|e| in_file(e.to_string()))?;
    read_csv_bytes(&bytes).map_err(|e| match e {
        ConsistencyError::Load(cause) => in_file(cause),
        other => other,
    })
}

/// Drop empty lines that are not inside a quoted field.
fn skip_blank_lines(bytes: &[u8]) -> Vec<u8> {
    let mut kept = Vec::with_capacity(bytes.len());
    let mut in_quotes = false;
    for line in bytes.split_inclusive(|b| *b == b'\n') {
        let content = line.strip_suffix(b"\n").unwrap_or(line);
        let content = content.strip_suffix(b"\r").unwrap_or(content);
        if !in_quotes && content.is_empty() {
            continue;
        }
        in_quotes ^= line.iter().filter(|b| **b == b'"').count() % 2 == 1;
        kept.extend_from_slice(line);
    }
    kept
}

/// Polars renames a repeated header to `<name>_duplicated_<n>`; a mapping could
/// then bind to the wrong column, so repeated names are refused.
fn reject_duplicate_headers(bytes: &[u8]) -> Result<(), ConsistencyError> {
    let header = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .with_n_rows(Some(1))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| ConsistencyError::Load(e.to_string()))?;

    let mut seen = HashSet::new();
    for column in header.get_columns() {
        let name = column.str()?.get(0).unwrap_or("").to_string();
        if !seen.insert(name.clone()) {
            return Err(ConsistencyError::Load(format!("duplicate column name '{name}'")));
        }
    }
    Ok(())
}

/// Replace every null in the table with the empty string.
pub fn fill_missing(df: DataFrame) -> Result<DataFrame, ConsistencyError> {
    let columns = df
        .get_columns()
        .iter()
        .map(as_filled_strings)
        .collect::<PolarsResult<Vec<Column>>>()?;
    Ok(DataFrame::new(columns)?)
}

/// Cast a column to String and replace nulls with "".
pub(crate) fn as_filled_strings(column: &Column) -> PolarsResult<Column> {
    let cast = column.cast(&DataType::String)?;
    let filled: StringChunked = cast
        .str()?
        .into_iter()
        .map(|v| Some(v.unwrap_or("")))
        .collect();
    Ok(filled.with_name(column.name().clone()).into_series().into())
}
