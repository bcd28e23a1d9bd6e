//! CSV output for mapped transaction reports.
//!
//! Rows are written with the standard comma-separated record format of the
//! `csv` crate (quoting only where a value needs it). The header row is
//! written once per output file.

use crate::error::{Error, Result};
use crate::types::OutputRow;
use csv::Writer;
use std::io::Write;

/// Writes output rows to any destination implementing `Write`.
pub struct CsvEmitter<W: Write> {
    writer: Writer<W>,
    rows: usize,
}

impl<W: Write> CsvEmitter<W> {
    /// Wrap a destination.
    ///
    /// # Arguments
    ///
    /// * `writer` - Destination of the CSV records
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use unavista_mifid2::csv_format::CsvEmitter;
    /// use unavista_mifid2::types::OutputRow;
    ///
    /// let file = File::create("output.csv")?;
    /// let mut emitter = CsvEmitter::new(file);
    /// emitter.write_header()?;
    /// emitter.write_row(&OutputRow::blank())?;
    /// emitter.flush()?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(writer: W) -> Self {
        Self {
            writer: Writer::from_writer(writer),
            rows: 0,
        }
    }

    /// Write the 82-column header row.
    pub fn write_header(&mut self) -> Result<()> {
        self.writer.write_record(OutputRow::header().values())?;
        Ok(())
    }

    /// Write one data row.
    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.writer.write_record(row.values())?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the destination.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

/// Write the diagnostic output for a document that could not be mapped:
/// the header row, then `INVALID_XML` followed by the document on one line.
pub fn write_invalid_xml<W: Write>(writer: W, content: &str) -> Result<()> {
    let mut emitter = CsvEmitter::new(writer);
    emitter.write_header()?;
    emitter.write_row(&OutputRow::invalid_xml(content))?;
    emitter.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{Column, NUMBER_OF_COLUMNS};
    use pretty_assertions::assert_eq;

    fn lines(bytes: Vec<u8>) -> Vec<String> {
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_header_and_rows() {
        let mut emitter = CsvEmitter::new(Vec::new());
        emitter.write_header().unwrap();

        let mut row = OutputRow::blank();
        row.set(Column::ReportStatus, "NEWT");
        row.set(Column::TransRefNo, "ABC123");
        emitter.write_row(&row).unwrap();
        assert_eq!(emitter.rows_written(), 1);

        let output = lines(emitter.into_inner().unwrap());
        assert_eq!(output.len(), 2);
        assert!(output[0].starts_with("report_status,trans_ref_no,trans_id_code,"));
        assert!(output[0].ends_with(",elig_cycle_event"));
        assert_eq!(output[0].split(',').count(), NUMBER_OF_COLUMNS);
        assert_eq!(output[1], format!("NEWT,ABC123{}", ",".repeat(NUMBER_OF_COLUMNS - 2)));
    }

    #[test]
    fn test_values_are_quoted_when_needed() {
        let mut emitter = CsvEmitter::new(Vec::new());
        let mut row = OutputRow::blank();
        row.set(Column::InstrFullName, "BOND, 5% 2030");
        emitter.write_row(&row).unwrap();

        let output = lines(emitter.into_inner().unwrap());
        assert!(output[0].contains("\"BOND, 5% 2030\""));
    }

    #[test]
    fn test_invalid_xml_output() {
        let mut buffer = Vec::new();
        write_invalid_xml(&mut buffer, "<Foo>\n  <Bar>1</Bar>\n</Foo>\n").unwrap();

        let output = lines(buffer);
        assert_eq!(output.len(), 2);
        assert!(output[0].starts_with("report_status,"));
        assert_eq!(
            output[1],
            format!("INVALID_XML,<Foo><Bar>1</Bar></Foo>{}", ",".repeat(NUMBER_OF_COLUMNS - 2))
        );
    }
}
