//! I/O module
//!
//! Handles transaction file parsing and report output.
//!
//! # Components
//!
//! - `fields` - Amount and timestamp parsing shared by every format
//! - `csv_format` - CSV record conversion and CSV report output
//! - `json_format` - JSON parsing and JSON report output
//! - `xml_format` - XML parsing
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod fields;
pub mod json_format;
pub mod sync_reader;
pub mod xml_format;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_csv_record, write_distribution_csv, write_transactions_csv, CsvRecord,
};
pub use json_format::{parse_json, write_json};
pub use sync_reader::SyncReader;
pub use xml_format::parse_xml;

use crate::types::{ParsedTransaction, ProcessingError};
use log::warn;
use std::path::Path;

/// Input file format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
    Xml,
}

impl FileFormat {
    /// Pick the format for a path from its extension, ignoring case
    pub fn from_path(path: &Path) -> Result<Self, ProcessingError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default();

        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "json" => Ok(FileFormat::Json),
            "xml" => Ok(FileFormat::Xml),
            "" => Err(ProcessingError::unsupported_format("")),
            _ => Err(ProcessingError::unsupported_format(&format!(".{}", extension))),
        }
    }

    /// Parse a whole in-memory document
    ///
    /// CSV rows that cannot be converted are logged and skipped, like bad
    /// JSON entries and XML records.
    pub fn parse(&self, content: &str) -> Result<Vec<ParsedTransaction>, ProcessingError> {
        match self {
            FileFormat::Csv => parse_csv(content),
            FileFormat::Json => parse_json(content),
            FileFormat::Xml => parse_xml(content),
        }
    }
}

/// Parse CSV text held in memory
pub fn parse_csv(content: &str) -> Result<Vec<ParsedTransaction>, ProcessingError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut transactions = Vec::new();
    for (index, row) in reader.deserialize::<CsvRecord>().enumerate() {
        let line = Some(index as u64 + 2);
        match row.map_err(ProcessingError::from).and_then(|r| convert_csv_record(r, line)) {
            Ok(transaction) => transactions.push(transaction),
            Err(e) => warn!("Skipping CSV row: {}", e),
        }
    }

    Ok(transactions)
}

/// Read and parse a whole JSON or XML file
///
/// CSV files are better streamed through [`SyncReader`] or [`AsyncReader`],
/// but are accepted here too.
pub fn load_file(path: &Path) -> Result<Vec<ParsedTransaction>, ProcessingError> {
    let format = FileFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| open_error(path, e))?;
    format.parse(&content)
}

/// Map a failure to open or read an input file onto a ProcessingError
pub(crate) fn open_error(path: &Path, error: std::io::Error) -> ProcessingError {
    match error.kind() {
        std::io::ErrorKind::NotFound => ProcessingError::file_not_found(&path.display().to_string()),
        _ => ProcessingError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), error),
        },
    }
}
