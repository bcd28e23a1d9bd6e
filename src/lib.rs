//! UnaVista MiFID II Converter Library
//!
//! A library for converting ISO 20022 MiFIR transaction reports
//! (`auth.016`, `FinInstrmRptgTxRpt`) into the fixed 82-column CSV layout
//! used for UnaVista submissions.
//!
//! # Features
//!
//! - Namespace-aware loading of report documents into an element tree
//! - One output row per transaction, new reports and cancellations alike
//! - Repeatable buyer/seller groups written as `|`-joined lists
//! - Client-specific routing of trader identifiers
//! - `INVALID_XML` diagnostic output for documents that cannot be mapped
//!
//! # Examples
//!
//! ## Mapping a single report
//!
//! ```no_run
//! use std::fs::File;
//! use unavista_mifid2::csv_format::CsvEmitter;
//! use unavista_mifid2::mifid_format::{MapperConfig, RecordMapper};
//! use unavista_mifid2::report::TransactionReport;
//!
//! let mut input = File::open("report.xml")?;
//! let report = TransactionReport::from_read(&mut input)?;
//! let mapper = RecordMapper::for_report(&report, MapperConfig::default());
//!
//! let mut emitter = CsvEmitter::new(File::create("output.csv")?);
//! emitter.write_header()?;
//! for (i, tx) in report.transactions().into_iter().enumerate() {
//!     emitter.write_row(&mapper.map_transaction(tx, i + 1)?)?;
//! }
//! emitter.flush()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Converting a batch of files
//!
//! ```no_run
//! use std::path::PathBuf;
//! use unavista_mifid2::batch::{BatchDriver, BatchPolicy, OutputTarget};
//! use unavista_mifid2::mifid_format::MapperConfig;
//! use unavista_mifid2::ClientMode;
//!
//! let driver = BatchDriver::new(MapperConfig::new(ClientMode::Nnip), BatchPolicy::Continue);
//! let summary = driver.run(
//!     &["a.xml", "b.xml"],
//!     &OutputTarget::Directory(PathBuf::from("out")),
//! )?;
//! println!("{} transactions written to {}", summary.transactions, summary.output.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod xml_tree;
pub mod columns;
pub mod types;
pub mod extract;
pub mod report;
pub mod mifid_format;
pub mod csv_format;
pub mod config;
pub mod batch;

// Re-export commonly used types
pub use batch::{BatchDriver, BatchPolicy, BatchSummary, OutputTarget};
pub use columns::{Column, Mapping};
pub use error::{Error, Result};
pub use types::{ClientMode, OutputRow, ReportKind};
