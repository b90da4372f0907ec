//! Error types for the card processor
//!
//! Card validation itself never fails; rejected cards are ordinary outcomes.
//! These errors cover the collaborators around it.
//!
//! # Error Categories
//!
//! - **File Errors**: File not found, unsupported format, I/O failures
//! - **Parsing Errors**: Malformed documents and individual records that cannot be read
//! - **Query Errors**: Invalid pages, date ranges or card network names
//! - **Arithmetic Errors**: Amount totals exceeding the range of `Decimal`
//! - **Output Errors**: Failures while writing reports

use thiserror::Error;

/// Main error type for the card processor
///
/// Each variant carries enough context to be printed directly to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessingError {
    /// Input file does not exist
    ///
    /// Fails the file; other input files are still processed.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error while reading input or writing output
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// No parser handles the file's extension
    #[error("No parser found for file extension: {extension}")]
    UnsupportedFormat {
        /// The extension that was not recognised (empty when the path has none)
        extension: String,
    },

    /// The document as a whole could not be parsed
    ///
    /// Fails the file. Problems with single records are `InvalidRecord` instead.
    #[error("{format} parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Input format being parsed (CSV, JSON or XML)
        format: String,
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A single record is missing a field or holds an unreadable value
    ///
    /// This is a recoverable error - the record is skipped and parsing continues.
    #[error("Invalid record{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    InvalidRecord {
        /// Line number of the record (if available)
        line: Option<u64>,
        /// What is wrong with the record
        message: String,
    },

    /// Page number or page size is zero
    #[error("Page and page size must be greater than 0 (page {page}, page size {page_size})")]
    InvalidPage { page: usize, page_size: usize },

    /// End of a date range lies before its start
    #[error("End date must be greater than or equal to start date ({start} > {end})")]
    InvalidDateRange { start: String, end: String },

    /// Date or timestamp given as a query bound could not be understood
    #[error("Invalid date '{value}'. Use YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate { value: String },

    /// Date range text could not be understood
    #[error("Invalid date range '{value}'. Use 7d, 30d, 90d, or custom format 'YYYY-MM-DD|YYYY-MM-DD'")]
    InvalidDateRangeSpec { value: String },

    /// Card network name not recognised
    #[error("Invalid card type '{value}'")]
    UnknownCardNetwork { value: String },

    /// A total of amounts left the range of `Decimal`
    ///
    /// Fails the file whose records were being totalled.
    #[error("Arithmetic overflow while totalling {operation}")]
    ArithmeticOverflow { operation: String },

    /// Report could not be written
    #[error("Output error: {message}")]
    OutputError { message: String },

    /// Async runtime could not be created or a worker failed
    #[error("Runtime error: {message}")]
    RuntimeError { message: String },
}

// Conversion from io::Error to ProcessingError
impl From<std::io::Error> for ProcessingError {
    fn from(error: std::io::Error) -> Self {
        ProcessingError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ProcessingError
impl From<csv::Error> for ProcessingError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ProcessingError::ParseError {
            format: "CSV".to_string(),
            line,
            message: error.to_string(),
        }
    }
}

// Conversion from serde_json::Error to ProcessingError
impl From<serde_json::Error> for ProcessingError {
    fn from(error: serde_json::Error) -> Self {
        let line = match error.line() {
            0 => None,
            line => Some(line as u64),
        };

        ProcessingError::ParseError {
            format: "JSON".to_string(),
            line,
            message: error.to_string(),
        }
    }
}

// Conversion from roxmltree::Error to ProcessingError
impl From<roxmltree::Error> for ProcessingError {
    fn from(error: roxmltree::Error) -> Self {
        ProcessingError::ParseError {
            format: "XML".to_string(),
            line: Some(u64::from(error.pos().row)),
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ProcessingError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: &str) -> Self {
        ProcessingError::FileNotFound {
            path: path.to_string(),
        }
    }

    /// Create an UnsupportedFormat error
    pub fn unsupported_format(extension: &str) -> Self {
        ProcessingError::UnsupportedFormat {
            extension: extension.to_string(),
        }
    }

    /// Create an InvalidRecord error
    pub fn invalid_record(line: Option<u64>, message: impl Into<String>) -> Self {
        ProcessingError::InvalidRecord {
            line,
            message: message.into(),
        }
    }

    /// Create an InvalidRecord error for a missing field
    pub fn missing_field(line: Option<u64>, field: &str) -> Self {
        Self::invalid_record(line, format!("missing {}", field))
    }

    /// Create an InvalidPage error
    pub fn invalid_page(page: usize, page_size: usize) -> Self {
        ProcessingError::InvalidPage { page, page_size }
    }

    /// Create an InvalidDateRange error
    pub fn invalid_date_range(start: impl ToString, end: impl ToString) -> Self {
        ProcessingError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Create an InvalidDate error
    pub fn invalid_date(value: &str) -> Self {
        ProcessingError::InvalidDate {
            value: value.to_string(),
        }
    }

    /// Create an InvalidDateRangeSpec error
    pub fn invalid_date_range_spec(value: &str) -> Self {
        ProcessingError::InvalidDateRangeSpec {
            value: value.to_string(),
        }
    }

    /// Create an UnknownCardNetwork error
    pub fn unknown_card_network(value: &str) -> Self {
        ProcessingError::UnknownCardNetwork {
            value: value.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        ProcessingError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create an OutputError
    pub fn output(message: impl ToString) -> Self {
        ProcessingError::OutputError {
            message: message.to_string(),
        }
    }

    /// Create a RuntimeError
    pub fn runtime(message: impl ToString) -> Self {
        ProcessingError::RuntimeError {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::file_not_found(
        ProcessingError::FileNotFound { path: "test.csv".to_string() },
        "File not found: test.csv"
    )]
    #[case::io_error(
        ProcessingError::IoError { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::unsupported_format(
        ProcessingError::UnsupportedFormat { extension: ".txt".to_string() },
        "No parser found for file extension: .txt"
    )]
    #[case::parse_error_with_line(
        ProcessingError::ParseError { format: "CSV".to_string(), line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        ProcessingError::ParseError { format: "JSON".to_string(), line: None, message: "expected array".to_string() },
        "JSON parse error: expected array"
    )]
    #[case::invalid_record(
        ProcessingError::InvalidRecord { line: Some(3), message: "missing amount".to_string() },
        "Invalid record at line 3: missing amount"
    )]
    #[case::invalid_page(
        ProcessingError::InvalidPage { page: 0, page_size: 20 },
        "Page and page size must be greater than 0 (page 0, page size 20)"
    )]
    #[case::unknown_card_network(
        ProcessingError::UnknownCardNetwork { value: "JCB".to_string() },
        "Invalid card type 'JCB'"
    )]
    #[case::invalid_date(
        ProcessingError::InvalidDate { value: "01/02/2024".to_string() },
        "Invalid date '01/02/2024'. Use YYYY-MM-DD or an RFC 3339 timestamp"
    )]
    #[case::arithmetic_overflow(
        ProcessingError::ArithmeticOverflow { operation: "accepted amounts".to_string() },
        "Arithmetic overflow while totalling accepted amounts"
    )]
    fn test_error_display(#[case] error: ProcessingError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::missing_field(
        ProcessingError::missing_field(Some(2), "amount"),
        ProcessingError::InvalidRecord { line: Some(2), message: "missing amount".to_string() }
    )]
    #[case::file_not_found(
        ProcessingError::file_not_found("a.csv"),
        ProcessingError::FileNotFound { path: "a.csv".to_string() }
    )]
    #[case::invalid_date_range(
        ProcessingError::invalid_date_range("2024-02-01", "2024-01-01"),
        ProcessingError::InvalidDateRange { start: "2024-02-01".to_string(), end: "2024-01-01".to_string() }
    )]
    fn test_helper_functions(#[case] result: ProcessingError, #[case] expected: ProcessingError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: ProcessingError = io_error.into();
        assert!(matches!(error, ProcessingError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let error: ProcessingError = json_error.into();
        assert!(matches!(error, ProcessingError::ParseError { ref format, .. } if format == "JSON"));
    }

    #[test]
    fn test_xml_error_conversion() {
        let xml_error = roxmltree::Document::parse("<open>").unwrap_err();
        let error: ProcessingError = xml_error.into();
        assert!(matches!(error, ProcessingError::ParseError { ref format, line: Some(_), .. } if format == "XML"));
    }
}
