use std::io::{Cursor, Write};

use polars::prelude::*;
use tracing::debug;
// `::zip` because the polars prelude exports its own `zip` module.
use ::zip::write::SimpleFileOptions;
use ::zip::{CompressionMethod, ZipWriter};

use crate::classifier::ClassifiedTables;
use crate::error::ConsistencyError;

/// Destination for named output files.
pub trait ArchiveSink {
    fn add(&mut self, name: &str, bytes: &[u8]) -> Result<(), ConsistencyError>;
}

/// Deflate-compressed ZIP built in memory.
pub struct ZipSink {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ZipSink {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated),
        }
    }

    /// Write the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>, ConsistencyError> {
        let ZipSink { writer, .. } = self;
        Ok(writer.finish()?.into_inner())
    }
}

impl Default for ZipSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveSink for ZipSink {
    fn add(&mut self, name: &str, bytes: &[u8]) -> Result<(), ConsistencyError> {
        self.writer.start_file(name, self.options)?;
        self.writer.write_all(bytes)?;
        Ok(())
    }
}

/// Serialize a table as UTF-8 CSV with a header row.
///
/// Blank cells are written as empty fields. A single-column table keeps the
/// quoted `""` so a blank value does not turn into a blank line.
pub fn to_csv_bytes(df: &DataFrame) -> Result<Vec<u8>, ConsistencyError> {
    let mut buf = Vec::new();
    let mut df = if df.width() > 1 {
        blanks_as_nulls(df)?
    } else {
        df.clone()
    };
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df)?;
    Ok(buf)
}

/// Nulls are written as empty fields, while polars quotes an empty string.
fn blanks_as_nulls(df: &DataFrame) -> PolarsResult<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|c| {
            if c.dtype() != &DataType::String {
                return Ok(c.clone());
            }
            let ca: StringChunked = c
                .str()?
                .into_iter()
                .map(|v| v.filter(|s| !s.is_empty()))
                .collect();
            Ok(ca.with_name(c.name().clone()).into_series().into())
        })
        .collect::<PolarsResult<Vec<Column>>>()?;
    DataFrame::new(columns)
}

impl ClassifiedTables {
    /// Write the six archive members to `sink`.
    pub fn write_to(&self, sink: &mut dyn ArchiveSink) -> Result<(), ConsistencyError> {
        for (name, df) in self.member_tables() {
            let bytes = to_csv_bytes(df)?;
            debug!(
                member = name,
                rows = df.height(),
                bytes = bytes.len(),
                "archive member"
            );
            sink.add(name, &bytes)?;
        }
        Ok(())
    }
}

/// Package a classified run as a ZIP archive.
pub fn build_archive(tables: &ClassifiedTables) -> Result<Vec<u8>, ConsistencyError> {
    let mut sink = ZipSink::new();
    tables.write_to(&mut sink)?;
    sink.finish()
}
