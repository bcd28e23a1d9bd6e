//! Error types for the unavista_mifid2 library.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, mapping and writing reports.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error writing CSV output or reading the client configuration table.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Input is not well-formed XML.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// Root element is not a `Document`.
    #[error("Unrecognised XML: root element is <{root}>, expected <Document>")]
    UnrecognizedDocument { root: String },

    /// A `Tx` element carries neither `New` nor `Cxl`.
    #[error("TX block number {index} has no NEW or CXL blocks")]
    MissingTransactionVariant { index: usize },

    /// Unknown client mode.
    #[error("Invalid client mode: {0}")]
    InvalidClientMode(String),

    /// Client configuration table could not be used.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Missing required input.
    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl Error {
    /// Whether this error calls for the `INVALID_XML` diagnostic output
    /// rather than aborting the run.
    pub fn is_invalid_document(&self) -> bool {
        matches!(
            self,
            Error::XmlError(_)
                | Error::UnrecognizedDocument { .. }
                | Error::MissingTransactionVariant { .. }
        )
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlError(err.to_string())
    }
}
