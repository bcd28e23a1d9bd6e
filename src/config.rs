//! Client configuration table.
//!
//! The table is a small CSV file: a header row, then a row whose first cell
//! names the client the reports are converted for. The client name selects
//! the [`ClientMode`] handed to the record mapper.

use crate::error::{Error, Result};
use crate::types::ClientMode;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Client settings read from the configuration table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    client: String,
}

impl ClientConfig {
    /// Configuration for a known client name.
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
        }
    }

    /// Load the table from a file.
    ///
    /// Only `.csv` files are read; any other path yields an empty client.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use unavista_mifid2::config::ClientConfig;
    ///
    /// let config = ClientConfig::from_path("client.csv")?;
    /// println!("{} ({})", config.client(), config.mode().as_str());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            warn!(path = %path.display(), "Client configuration is not a .csv file, ignoring it");
            return Ok(Self::default());
        }

        let mut file = File::open(path)?;
        Self::from_read(&mut file)
    }

    /// Load the table from any source implementing `Read`.
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let record = csv_reader.records().next().transpose()?.ok_or_else(|| {
            Error::ConfigError("client configuration table has no data row".to_string())
        })?;

        let client = record.get(0).unwrap_or_default().trim().to_string();
        Ok(Self { client })
    }

    /// Client name, empty when unknown.
    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn mode(&self) -> ClientMode {
        ClientMode::for_client(&self.client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_read() {
        let mut input = "client,region\nNNIP,EU\nOTHER,US\n".as_bytes();
        let config = ClientConfig::from_read(&mut input).unwrap();
        assert_eq!(config.client(), "NNIP");
        assert_eq!(config.mode(), ClientMode::Nnip);
    }

    #[test]
    fn test_other_client_is_standard() {
        let mut input = "client\nBDB\n".as_bytes();
        let config = ClientConfig::from_read(&mut input).unwrap();
        assert_eq!(config.client(), "BDB");
        assert_eq!(config.mode(), ClientMode::Standard);
    }

    #[test]
    fn test_table_without_data_row() {
        let mut input = "client\n".as_bytes();
        let err = ClientConfig::from_read(&mut input).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();

        let table = dir.path().join("client.csv");
        let mut file = File::create(&table).unwrap();
        writeln!(file, "client").unwrap();
        writeln!(file, "nnip").unwrap();
        drop(file);
        assert_eq!(ClientConfig::from_path(&table).unwrap().mode(), ClientMode::Nnip);

        let ignored = dir.path().join("client.txt");
        std::fs::write(&ignored, "client\nNNIP\n").unwrap();
        assert_eq!(ClientConfig::from_path(&ignored).unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_path("/nonexistent/client.csv").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
