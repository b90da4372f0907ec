//! Streaming CSV input for the sync strategy
//!
//! Rows are deserialized one at a time into [`CsvRecord`] and converted by
//! `csv_format`, so a large file is never held in memory.
//!
//! ```no_run
//! use card_processor::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), card_processor::ProcessingError> {
//! for row in SyncReader::new(Path::new("transactions.csv"))? {
//!     match row {
//!         Ok(transaction) => println!("amount {}", transaction.amount),
//!         Err(e) => println!("skipped: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Opening the file is the only fatal step. Every later problem is yielded
//! as an `Err` for that row, tagged with its line number.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::io::open_error;
use crate::types::{ParsedTransaction, ProcessingError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Iterator over the transactions of one CSV file
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Open `path` for reading
    ///
    /// Fields are trimmed and short rows are allowed; their absent columns
    /// surface as missing fields on that row.
    ///
    /// # Errors
    ///
    /// `FileNotFound` or `IoError` if the file could not be opened.
    pub fn new(path: &Path) -> Result<Self, ProcessingError> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<ParsedTransaction, ProcessingError>;

    /// Read and convert the next CSV row
    ///
    /// Errors carry the 1-based file line number (the header is line 1).
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;

        Some(match row {
            Ok(csv_record) => convert_csv_record(csv_record, Some(self.line_num)),
            Err(e) => Err(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_sync_reader_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert_eq!(
            result.unwrap_err(),
            ProcessingError::file_not_found("nonexistent.csv")
        );
    }

    #[test]
    fn test_sync_reader_iterates_records() {
        let file = csv_file(
            "cardNumber,timestamp,amount\n\
             4532015112830366,2024-01-15T10:30:00Z,100.50\n\
             5555555555554444,2024-01-16 08:00:00,200.75\n",
        );

        let records: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].card_number, "4532015112830366");
        assert_eq!(records[1].amount, Decimal::new(20075, 2));
    }

    #[test]
    fn test_sync_reader_reports_line_numbers() {
        let file = csv_file(
            "cardNumber,timestamp,amount\n\
             4532015112830366,2024-01-15,1\n\
             4532015112830366,2024-01-15,abc\n\
             4532015112830366,2024-01-15\n",
        );

        let results: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1],
            Err(ProcessingError::invalid_record(Some(3), "invalid amount 'abc'"))
        );
        assert_eq!(
            results[2],
            Err(ProcessingError::missing_field(Some(4), "amount"))
        );
    }

    #[test]
    fn test_sync_reader_trims_whitespace() {
        let file = csv_file(
            "cardNumber , timestamp , amount\n  4111111111111111 ,  2024-01-15 ,  10.00  \n",
        );

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        let transaction = records[0].as_ref().unwrap();
        assert_eq!(transaction.card_number, "4111111111111111");
        assert_eq!(transaction.amount.to_string(), "10.00");
    }

    #[test]
    fn test_sync_reader_header_only() {
        let file = csv_file("cardNumber,timestamp,amount\n");
        assert_eq!(SyncReader::new(file.path()).unwrap().count(), 0);
    }
}
