//! Asynchronous CSV reader with batch interface
//!
//! Streams parsed transactions from a CSV source in batches for the async
//! processing strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of ParsedTransactions
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{ParsedTransaction, ProcessingError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use log::warn;

/// Asynchronous CSV reader
///
/// Memory use is bounded by the batch size, not the file size.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
        }
    }

    /// Read up to `batch_size` parsed transactions
    ///
    /// Rows that cannot be converted are logged and skipped, so a batch may
    /// cover more rows than it holds transactions. Returns an empty vector
    /// at end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<ParsedTransaction> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let Some(row) = records.next().await else {
                break;
            };
            self.line_num += 1;

            let converted = row
                .map_err(|e| ProcessingError::ParseError {
                    format: "CSV".to_string(),
                    line: Some(self.line_num),
                    message: e.to_string(),
                })
                .and_then(|csv_record| convert_csv_record(csv_record, Some(self.line_num)));

            match converted {
                Ok(transaction) => batch.push(transaction),
                Err(e) => warn!("Skipping CSV row: {}", e),
            }
        }

        batch
    }
}
