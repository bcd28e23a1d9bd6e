//! Batch conversion of transaction report files into one CSV file.
//!
//! Input files are processed in the order given. Each file is read whole,
//! recognised, and its transactions are mapped and written one by one. A
//! file that is not a recognisable report, or holds a transaction with
//! neither `New` nor `Cxl` content, produces the `INVALID_XML` diagnostic
//! output instead; [`BatchPolicy`] decides what happens next.

use crate::csv_format::{write_invalid_xml, CsvEmitter};
use crate::error::{Error, Result};
use crate::mifid_format::{MapperConfig, RecordMapper};
use crate::report::TransactionReport;
use chrono::{Local, NaiveDateTime};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Executing entity used in generated file names when none is known.
const UNKNOWN_PARTY: &str = "UNKNOWN";

/// What to do once a file turns out not to be a valid report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Replace the output with the diagnostic and stop.
    #[default]
    FailFast,
    /// Write `<input-stem>.invalid.csv` next to the output and go on.
    Continue,
}

/// Where the CSV output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// An explicit file path.
    File(PathBuf),
    /// A directory; the file name is derived from the executing entity of
    /// the first transaction and the local time.
    Directory(PathBuf),
}

impl OutputTarget {
    fn resolve(&self, executing_party: Option<&str>, timestamp: &NaiveDateTime) -> PathBuf {
        match self {
            OutputTarget::File(path) => path.clone(),
            OutputTarget::Directory(dir) => dir.join(output_file_name(
                executing_party.unwrap_or(UNKNOWN_PARTY),
                timestamp,
            )),
        }
    }

    fn directory(&self) -> PathBuf {
        match self {
            OutputTarget::File(path) => path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            OutputTarget::Directory(dir) => dir.clone(),
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Data rows in the output; zero once a fail-fast stop replaced it
    /// with the diagnostic.
    pub transactions: usize,
    /// Files converted without a diagnostic.
    pub files_processed: usize,
    /// Files that produced the `INVALID_XML` diagnostic.
    pub failed_files: Vec<PathBuf>,
    /// The CSV file written (the diagnostic file after a fail-fast stop).
    pub output: PathBuf,
}

/// Output file name: `<party>_MIFID__<yyyymmdd>_<hhmmss>_NNIPOUTPUT_0000.csv`.
pub fn output_file_name(executing_party: &str, timestamp: &NaiveDateTime) -> String {
    format!(
        "{}_MIFID__{}_NNIPOUTPUT_0000.csv",
        executing_party,
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Path of the diagnostic written for `input` under [`BatchPolicy::Continue`].
pub fn invalid_output_path(input: &Path, dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    dir.join(format!("{stem}.invalid.csv"))
}

struct OpenOutput {
    path: PathBuf,
    emitter: CsvEmitter<BufWriter<File>>,
}

impl OpenOutput {
    fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path)?;
        let mut emitter = CsvEmitter::new(BufWriter::new(file));
        emitter.write_header()?;
        Ok(Self { path, emitter })
    }
}

/// Converts report files with one mapper configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchDriver {
    config: MapperConfig,
    policy: BatchPolicy,
}

impl BatchDriver {
    pub fn new(config: MapperConfig, policy: BatchPolicy) -> Self {
        Self { config, policy }
    }

    /// Convert `inputs` into a single CSV file.
    ///
    /// # Errors
    ///
    /// Fails on I/O and CSV errors, and with [`Error::MissingField`] when
    /// `inputs` is empty. Invalid documents are not errors: they are
    /// reported in [`BatchSummary::failed_files`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::PathBuf;
    /// use unavista_mifid2::batch::{BatchDriver, OutputTarget};
    ///
    /// let driver = BatchDriver::default();
    /// let summary = driver.run(&["report.xml"], &OutputTarget::File(PathBuf::from("out.csv")))?;
    /// println!("{} transactions", summary.transactions);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn run<P: AsRef<Path>>(&self, inputs: &[P], target: &OutputTarget) -> Result<BatchSummary> {
        if inputs.is_empty() {
            return Err(Error::MissingField("input files".to_string()));
        }

        let timestamp = Local::now().naive_local();
        let mut output: Option<OpenOutput> = None;
        let mut summary = BatchSummary {
            transactions: 0,
            files_processed: 0,
            failed_files: Vec::new(),
            output: PathBuf::new(),
        };

        for input in inputs {
            let input = input.as_ref();
            info!(path = %input.display(), "Processing file");
            let bytes = fs::read(input)?;

            let converted = match std::str::from_utf8(&bytes) {
                Ok(content) => self.convert(content, target, &timestamp, &mut output),
                Err(e) => Err(Error::XmlError(format!("input is not valid UTF-8: {e}"))),
            };

            match converted {
                Ok(()) => summary.files_processed += 1,
                Err(e) if e.is_invalid_document() => {
                    error!(path = %input.display(), "{}", e);
                    summary.failed_files.push(input.to_path_buf());
                    let content = String::from_utf8_lossy(&bytes);

                    match self.policy {
                        BatchPolicy::FailFast => {
                            let path = match output.take() {
                                Some(open) => open.path,
                                None => target.resolve(None, &timestamp),
                            };
                            write_invalid_xml(BufWriter::new(File::create(&path)?), &content)?;
                            error!(path = %path.display(), "Wrote INVALID_XML output");
                            summary.output = path;
                            return Ok(summary);
                        }
                        BatchPolicy::Continue => {
                            let path = invalid_output_path(input, &target.directory());
                            write_invalid_xml(BufWriter::new(File::create(&path)?), &content)?;
                            error!(path = %path.display(), "Wrote INVALID_XML output");
                        }
                    }
                }
                Err(e) => return Err(e),
            }
        }

        let mut open = match output {
            Some(open) => open,
            None => OpenOutput::create(target.resolve(None, &timestamp))?,
        };
        open.emitter.flush()?;
        summary.transactions = open.emitter.rows_written();
        summary.output = open.path;

        info!(
            transactions = summary.transactions,
            output = %summary.output.display(),
            "Number of transactions: {}",
            summary.transactions
        );
        Ok(summary)
    }

    /// Map one document, opening the output on first use. Rows are written
    /// as they are mapped, so a failing transaction leaves earlier rows of
    /// the same document in the output.
    fn convert(
        &self,
        content: &str,
        target: &OutputTarget,
        timestamp: &NaiveDateTime,
        output: &mut Option<OpenOutput>,
    ) -> Result<()> {
        let report = TransactionReport::parse(content)?;
        if report.container().is_none() {
            warn!("Document has no FinInstrmRptgTxRpt container");
        }

        let open = match output {
            Some(open) => open,
            None => {
                let party = report.first_executing_party();
                output.insert(OpenOutput::create(target.resolve(party.as_deref(), timestamp))?)
            }
        };

        let mapper = RecordMapper::for_report(&report, self.config);
        for (i, tx) in report.transactions().into_iter().enumerate() {
            let row = mapper.map_transaction(tx, i + 1)?;
            open.emitter.write_row(&row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 12, 17)
            .unwrap()
            .and_hms_opt(9, 5, 30)
            .unwrap()
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("LEI1234567890123456789", &timestamp()),
            "LEI1234567890123456789_MIFID__20221217_090530_NNIPOUTPUT_0000.csv"
        );
    }

    #[test]
    fn test_invalid_output_path() {
        assert_eq!(
            invalid_output_path(Path::new("/in/report_01.xml"), Path::new("/out")),
            PathBuf::from("/out/report_01.invalid.csv")
        );
    }

    #[test]
    fn test_target_resolution() {
        let file = OutputTarget::File(PathBuf::from("/out/result.csv"));
        assert_eq!(file.resolve(Some("LEI1"), &timestamp()), PathBuf::from("/out/result.csv"));
        assert_eq!(file.directory(), PathBuf::from("/out"));

        let dir = OutputTarget::Directory(PathBuf::from("/out"));
        assert_eq!(
            dir.resolve(Some("LEI1"), &timestamp()),
            PathBuf::from("/out/LEI1_MIFID__20221217_090530_NNIPOUTPUT_0000.csv")
        );
        assert_eq!(
            dir.resolve(None, &timestamp()),
            PathBuf::from("/out/UNKNOWN_MIFID__20221217_090530_NNIPOUTPUT_0000.csv")
        );
    }

    #[test]
    fn test_no_inputs() {
        let inputs: [&str; 0] = [];
        let err = BatchDriver::default()
            .run(&inputs, &OutputTarget::File(PathBuf::from("out.csv")))
            .unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
    }

    #[test]
    fn test_unreadable_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BatchDriver::default()
            .run(
                &[dir.path().join("missing.xml")],
                &OutputTarget::File(dir.path().join("out.csv")),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
