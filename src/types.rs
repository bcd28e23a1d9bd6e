//! Common types shared by the mapper, the emitter and the batch driver.

use crate::columns::{Column, NUMBER_OF_COLUMNS, REPEAT_DELIMITER};
use crate::error::Error;
use std::str::FromStr;

/// Marker written in the first cell of a diagnostic row.
pub const INVALID_XML_MARKER: &str = "INVALID_XML";

/// One fixed-width output row.
///
/// Always holds exactly [`NUMBER_OF_COLUMNS`] values; a column with no
/// extracted value holds an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    values: Vec<String>,
}

impl Default for OutputRow {
    fn default() -> Self {
        Self::blank()
    }
}

impl OutputRow {
    /// A row with every column empty.
    pub fn blank() -> Self {
        Self {
            values: vec![String::new(); NUMBER_OF_COLUMNS],
        }
    }

    /// The header row.
    pub fn header() -> Self {
        Self {
            values: Column::headers().into_iter().map(str::to_string).collect(),
        }
    }

    /// Diagnostic row: `INVALID_XML`, then the offending file on one line.
    pub fn invalid_xml(content: &str) -> Self {
        let mut row = Self::blank();
        row.values[0] = INVALID_XML_MARKER.to_string();
        row.values[1] = collapse_to_line(content);
        row
    }

    /// Value of a column.
    pub fn get(&self, column: Column) -> &str {
        &self.values[column.index()]
    }

    /// Set a single value.
    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        self.values[column.index()] = value.into();
    }

    /// Set a repeatable column from its entries in document order.
    pub fn set_list(&mut self, column: Column, entries: &[String]) {
        self.values[column.index()] = entries.join(REPEAT_DELIMITER);
    }

    /// All values in column order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Columns holding a non-empty value.
    pub fn populated(&self) -> Vec<Column> {
        Column::ALL
            .iter()
            .copied()
            .filter(|column| !self.get(*column).is_empty())
            .collect()
    }
}

/// Joins the lines of a file with surrounding whitespace removed.
pub fn collapse_to_line(content: &str) -> String {
    content.lines().map(str::trim).collect()
}

/// Kind of a transaction report entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// New transaction (`New`).
    New,
    /// Cancellation of an earlier report (`Cxl`).
    Cancellation,
}

impl ReportKind {
    /// Value of the report status column.
    pub fn status_code(&self) -> &'static str {
        match self {
            ReportKind::New => "NEWT",
            ReportKind::Cancellation => "CANC",
        }
    }

    /// Tag of the variant element under `Tx`.
    pub fn tag(&self) -> &'static str {
        match self {
            ReportKind::New => "New",
            ReportKind::Cancellation => "Cxl",
        }
    }
}

/// Per-client routing of trader and algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientMode {
    /// Identifiers go to the code columns.
    #[default]
    Standard,
    /// Identifiers go to the NP-code columns, for lookup downstream.
    Nnip,
}

impl FromStr for ClientMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nnip" => Ok(ClientMode::Nnip),
            "" | "standard" | "default" => Ok(ClientMode::Standard),
            _ => Err(Error::InvalidClientMode(s.to_string())),
        }
    }
}

impl ClientMode {
    /// Mode for a client name from the configuration table.
    pub fn for_client(client: &str) -> Self {
        if client.trim().eq_ignore_ascii_case("NNIP") {
            ClientMode::Nnip
        } else {
            ClientMode::Standard
        }
    }

    /// Short name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientMode::Standard => "standard",
            ClientMode::Nnip => "NNIP",
        }
    }
}

/// Casing used when a boolean indicator is normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagCase {
    /// `true` / `false`
    Lower,
    /// `True` / `False`
    Title,
}

impl FlagCase {
    /// Literal for a boolean in this casing.
    pub fn literal(&self, value: bool) -> &'static str {
        match (self, value) {
            (FlagCase::Lower, true) => "true",
            (FlagCase::Lower, false) => "false",
            (FlagCase::Title, true) => "True",
            (FlagCase::Title, false) => "False",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_row_has_every_column() {
        let row = OutputRow::blank();
        assert_eq!(row.values().len(), NUMBER_OF_COLUMNS);
        assert!(row.values().iter().all(String::is_empty));
        assert!(row.populated().is_empty());
    }

    #[test]
    fn test_set_and_list() {
        let mut row = OutputRow::blank();
        row.set(Column::TransRefNo, "ABC123");
        row.set_list(Column::BuyAcctIdType, &["LEI".to_string(), "NIND".to_string()]);
        row.set_list(Column::SelAcctIdType, &[]);

        assert_eq!(row.get(Column::TransRefNo), "ABC123");
        assert_eq!(row.get(Column::BuyAcctIdType), "LEI|NIND");
        assert_eq!(row.get(Column::SelAcctIdType), "");
        assert_eq!(row.populated(), vec![Column::TransRefNo, Column::BuyAcctIdType]);
    }

    #[test]
    fn test_invalid_xml_row() {
        let row = OutputRow::invalid_xml("<Foo>\n   <Bar>1</Bar>\r\n</Foo>\n");
        assert_eq!(row.values()[0], "INVALID_XML");
        assert_eq!(row.values()[1], "<Foo><Bar>1</Bar></Foo>");
        assert!(row.values()[2..].iter().all(String::is_empty));
    }

    #[test]
    fn test_client_mode_from_str() {
        assert_eq!("nnip".parse::<ClientMode>().unwrap(), ClientMode::Nnip);
        assert_eq!("NNIP".parse::<ClientMode>().unwrap(), ClientMode::Nnip);
        assert_eq!("standard".parse::<ClientMode>().unwrap(), ClientMode::Standard);
        assert!("other".parse::<ClientMode>().is_err());
    }

    #[test]
    fn test_client_mode_for_client() {
        assert_eq!(ClientMode::for_client("NNIP"), ClientMode::Nnip);
        assert_eq!(ClientMode::for_client(" nnip "), ClientMode::Nnip);
        assert_eq!(ClientMode::for_client("BDB"), ClientMode::Standard);
        assert_eq!(ClientMode::for_client(""), ClientMode::Standard);
    }

    #[test]
    fn test_report_kind_codes() {
        assert_eq!(ReportKind::New.status_code(), "NEWT");
        assert_eq!(ReportKind::Cancellation.status_code(), "CANC");
        assert_eq!(ReportKind::Cancellation.tag(), "Cxl");
    }
}
