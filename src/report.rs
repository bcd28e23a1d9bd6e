//! Transaction reports loaded from an ISO 20022 `auth.016` document.
//!
//! A report is a `Document` element holding a single `FinInstrmRptgTxRpt`
//! container whose `Tx` children are the individual transactions. Each
//! transaction carries exactly one of a `New` or a `Cxl` sub-tree.

use crate::error::{Error, Result};
use crate::types::ReportKind;
use crate::xml_tree::{Element, Extractor, XmlDocument};
use std::io::Read;

/// Local name of the expected document element.
pub const DOCUMENT_TAG: &str = "Document";
/// Local name of the reporting container.
pub const CONTAINER_TAG: &str = "FinInstrmRptgTxRpt";
/// Local name of a transaction element.
pub const TRANSACTION_TAG: &str = "Tx";

/// A loaded and recognised transaction report.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionReport {
    document: XmlDocument,
    extractor: Extractor,
}

/// The variant sub-tree of one transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransactionRecord<'a> {
    /// `Tx/New`
    New(&'a Element),
    /// `Tx/Cxl`
    Cancellation(&'a Element),
}

impl<'a> TransactionRecord<'a> {
    /// Select the variant of a `Tx` element; `New` wins when both exist.
    ///
    /// `index` is the 1-based position of the transaction, used in the error.
    pub fn from_transaction(x: &Extractor, tx: &'a Element, index: usize) -> Result<Self> {
        if let Some(new) = x.child(tx, ReportKind::New.tag()) {
            Ok(TransactionRecord::New(new))
        } else if let Some(cxl) = x.child(tx, ReportKind::Cancellation.tag()) {
            Ok(TransactionRecord::Cancellation(cxl))
        } else {
            Err(Error::MissingTransactionVariant { index })
        }
    }

    /// Kind of the report entry.
    pub fn kind(&self) -> ReportKind {
        match self {
            TransactionRecord::New(_) => ReportKind::New,
            TransactionRecord::Cancellation(_) => ReportKind::Cancellation,
        }
    }

    /// The `New` or `Cxl` element.
    pub fn element(&self) -> &'a Element {
        match self {
            TransactionRecord::New(element) | TransactionRecord::Cancellation(element) => element,
        }
    }
}

impl TransactionReport {
    /// Load a report from any source implementing `Read`.
    ///
    /// # Arguments
    ///
    /// * `reader` - A mutable reference to a type implementing `Read`
    ///
    /// # Errors
    ///
    /// [`Error::XmlError`] when the input is not well formed and
    /// [`Error::UnrecognizedDocument`] when the root is not `Document`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use unavista_mifid2::report::TransactionReport;
    ///
    /// let mut file = File::open("report.xml")?;
    /// let report = TransactionReport::from_read(&mut file)?;
    /// println!("{} transactions", report.transactions().len());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let document = XmlDocument::from_read(reader)?;
        Self::from_document(document)
    }

    /// Load a report held in memory.
    pub fn parse(xml: &str) -> Result<Self> {
        Self::from_document(XmlDocument::parse(xml)?)
    }

    /// Recognise a parsed document; the root namespace qualifies every lookup.
    pub fn from_document(document: XmlDocument) -> Result<Self> {
        let root = document.root();
        if root.name() != DOCUMENT_TAG {
            return Err(Error::UnrecognizedDocument {
                root: root.name().to_string(),
            });
        }

        let extractor = Extractor::for_document(&document);
        Ok(TransactionReport {
            document,
            extractor,
        })
    }

    /// Namespace-qualified lookups for this document.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// The reporting container, if the document has one.
    pub fn container(&self) -> Option<&Element> {
        self.extractor.child(self.document.root(), CONTAINER_TAG)
    }

    /// Transaction elements in document order.
    pub fn transactions(&self) -> Vec<&Element> {
        self.container()
            .map(|container| self.extractor.children(container, TRANSACTION_TAG))
            .unwrap_or_default()
    }

    /// Executing entity of the first transaction, if any.
    pub fn first_executing_party(&self) -> Option<String> {
        let tx = self.transactions().into_iter().next()?;
        let record = TransactionRecord::from_transaction(&self.extractor, tx, 1).ok()?;
        let party = self.extractor.text(record.element(), "ExctgPty");
        (!party.is_empty()).then_some(party)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:iso:std:iso:20022:tech:xsd:auth.016.001.01";

    fn report(body: &str) -> TransactionReport {
        TransactionReport::parse(&format!(
            r#"<Document xmlns="{NS}"><FinInstrmRptgTxRpt>{body}</FinInstrmRptgTxRpt></Document>"#
        ))
        .unwrap()
    }

    #[test]
    fn test_transactions_in_order() {
        let report = report(
            "<Tx><New><TxId>A</TxId><ExctgPty>LEI1</ExctgPty></New></Tx>\
             <Tx><Cxl><TxId>B</TxId></Cxl></Tx>",
        );
        let x = report.extractor();
        let txs = report.transactions();
        assert_eq!(txs.len(), 2);

        let first = TransactionRecord::from_transaction(x, txs[0], 1).unwrap();
        assert_eq!(first.kind(), ReportKind::New);
        assert_eq!(x.text(first.element(), "TxId"), "A");

        let second = TransactionRecord::from_transaction(x, txs[1], 2).unwrap();
        assert_eq!(second.kind(), ReportKind::Cancellation);
        assert_eq!(x.text(second.element(), "TxId"), "B");

        assert_eq!(report.first_executing_party().as_deref(), Some("LEI1"));
    }

    #[test]
    fn test_missing_variant() {
        let report = report("<Tx><New/></Tx><Tx><Other/></Tx>");
        let txs = report.transactions();
        let err = TransactionRecord::from_transaction(report.extractor(), txs[1], 2).unwrap_err();
        assert!(matches!(err, Error::MissingTransactionVariant { index: 2 }));
    }

    #[test]
    fn test_unrecognized_root() {
        let err = TransactionReport::parse("<Report><Tx/></Report>").unwrap_err();
        assert!(matches!(err, Error::UnrecognizedDocument { ref root } if root == "Report"));
        assert!(err.is_invalid_document());
    }

    #[test]
    fn test_malformed_input() {
        let err = TransactionReport::parse("<Document><FinInstrmRptgTxRpt>").unwrap_err();
        assert!(err.is_invalid_document());
    }

    #[test]
    fn test_missing_container() {
        let report = TransactionReport::parse(&format!(r#"<Document xmlns="{NS}"/>"#)).unwrap();
        assert!(report.container().is_none());
        assert!(report.transactions().is_empty());
        assert!(report.first_executing_party().is_none());
    }

    #[test]
    fn test_unqualified_document() {
        let report = TransactionReport::parse(
            "<Document><FinInstrmRptgTxRpt><Tx><Cxl/></Tx></FinInstrmRptgTxRpt></Document>",
        )
        .unwrap();
        assert_eq!(report.transactions().len(), 1);
    }
}
