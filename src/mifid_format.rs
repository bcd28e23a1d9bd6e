//! MiFID II transaction report mapping.
//!
//! This module turns each `Tx` entry of a transaction report into one
//! fixed-width [`OutputRow`]. Mapping is a pure function of the transaction
//! element, the document namespace and the [`MapperConfig`]: every call
//! starts from a blank row, so nothing leaks from one transaction to the
//! next.

use crate::columns::Column;
use crate::error::Result;
use crate::extract::{
    normalize_flag, resolve_identity, resolve_price, resolve_trader, resolve_variant,
    signed_amount, IdentityAlternative, PendingValue, Resolved, TraderIdentity,
    ACCOUNT_OWNER_IDENTITY, DECISION_MAKER_IDENTITY, QUANTITY,
};
use crate::report::{TransactionRecord, TransactionReport};
use crate::types::{ClientMode, FlagCase, OutputRow, ReportKind};
use crate::xml_tree::{Element, Extractor};
use tracing::debug;

/// Settings injected into the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapperConfig {
    /// Routing of trader and algorithm identifiers.
    pub client_mode: ClientMode,
}

impl MapperConfig {
    pub fn new(client_mode: ClientMode) -> Self {
        Self { client_mode }
    }
}

/// One buyer/seller × account-owner/decision-maker group.
struct PartyGroup {
    party: &'static str,
    tag: &'static str,
    /// Child holding the identity; `None` when it sits on the occurrence itself.
    identity_tag: Option<&'static str>,
    alternatives: &'static [IdentityAlternative],
    id_type: Column,
    np_code: Column,
    id_code: Column,
    country: Option<Column>,
    forename: Column,
    surname: Column,
    birth_date: Column,
}

const PARTY_GROUPS: [PartyGroup; 4] = [
    PartyGroup {
        party: "Buyr",
        tag: "AcctOwnr",
        identity_tag: Some("Id"),
        alternatives: &ACCOUNT_OWNER_IDENTITY,
        id_type: Column::BuyAcctIdType,
        np_code: Column::BuyAcctNpCode,
        id_code: Column::BuyAcctIdCode,
        country: Some(Column::BuyAcctCountry),
        forename: Column::BuyAcctForename,
        surname: Column::BuyAcctSurname,
        birth_date: Column::BuyAcctBirthDt,
    },
    PartyGroup {
        party: "Buyr",
        tag: "DcsnMakr",
        identity_tag: None,
        alternatives: &DECISION_MAKER_IDENTITY,
        id_type: Column::BuyDcsnIdType,
        np_code: Column::BuyDcsnNpCode,
        id_code: Column::BuyDcsnIdCode,
        country: None,
        forename: Column::BuyDcsnForename,
        surname: Column::BuyDcsnSurname,
        birth_date: Column::BuyDcsnBirthDt,
    },
    PartyGroup {
        party: "Sellr",
        tag: "AcctOwnr",
        identity_tag: Some("Id"),
        alternatives: &ACCOUNT_OWNER_IDENTITY,
        id_type: Column::SelAcctIdType,
        np_code: Column::SelAcctNpCode,
        id_code: Column::SelAcctIdCode,
        country: Some(Column::SelAcctCountry),
        forename: Column::SelAcctForename,
        surname: Column::SelAcctSurname,
        birth_date: Column::SelAcctBirthDt,
    },
    PartyGroup {
        party: "Sellr",
        tag: "DcsnMakr",
        identity_tag: None,
        alternatives: &DECISION_MAKER_IDENTITY,
        id_type: Column::SelDcsnIdType,
        np_code: Column::SelDcsnNpCode,
        id_code: Column::SelDcsnIdCode,
        country: None,
        forename: Column::SelDcsnForename,
        surname: Column::SelDcsnSurname,
        birth_date: Column::SelDcsnBirthDt,
    },
];

/// Per-field value lists of one party group, one entry per occurrence.
#[derive(Debug, Default)]
struct GroupLists {
    id_type: Vec<String>,
    np_code: Vec<String>,
    id_code: Vec<String>,
    country: Vec<String>,
    forename: Vec<String>,
    surname: Vec<String>,
    birth_date: Vec<String>,
}

/// Type, value and currency columns of a type-tagged field.
type VariantColumns = (Column, Column, Column);

/// Columns of one trader field set.
struct TraderColumns {
    code_type: Column,
    np: Column,
    code: Column,
    country: Column,
}

const INVESTMENT_DECISION: TraderColumns = TraderColumns {
    code_type: Column::TradeInvstType,
    np: Column::TradeInvstNp,
    code: Column::TradeInvstCode,
    country: Column::TradeInvstCtry,
};

const EXECUTION: TraderColumns = TraderColumns {
    code_type: Column::TradeExecType,
    np: Column::TradeExecNp,
    code: Column::TradeExecCode,
    country: Column::TradeExecCtry,
};

/// Swap legs and the sign prefixed to their entries.
const SWAP_LEGS: [(&str, char); 2] = [("SwpIn", '+'), ("SwpOut", '-')];

/// Underlying code, index name and index term lists across swap legs.
#[derive(Debug, Default, PartialEq, Eq)]
struct UnderlyingLists {
    codes: Vec<String>,
    names: Vec<String>,
    terms: Vec<String>,
}

/// Maps transactions of one document to output rows.
#[derive(Debug, Clone)]
pub struct RecordMapper<'a> {
    x: &'a Extractor,
    config: MapperConfig,
}

impl<'a> RecordMapper<'a> {
    /// Mapper using the lookups of `x`.
    pub fn new(x: &'a Extractor, config: MapperConfig) -> Self {
        Self { x, config }
    }

    /// Mapper for a loaded report.
    pub fn for_report(report: &'a TransactionReport, config: MapperConfig) -> Self {
        Self::new(report.extractor(), config)
    }

    /// Map a `Tx` element; `index` is its 1-based position in the document.
    ///
    /// # Errors
    ///
    /// [`crate::Error::MissingTransactionVariant`] when the transaction has
    /// neither a `New` nor a `Cxl` child.
    pub fn map_transaction(&self, tx: &Element, index: usize) -> Result<OutputRow> {
        let record = TransactionRecord::from_transaction(self.x, tx, index)?;
        let row = self.map_record(record);
        debug!(
            index,
            kind = record.kind().status_code(),
            reference = row.get(Column::TransRefNo),
            "Mapped transaction"
        );
        Ok(row)
    }

    /// Map a selected `New` or `Cxl` sub-tree into a fresh row.
    pub fn map_record(&self, record: TransactionRecord<'_>) -> OutputRow {
        match record {
            TransactionRecord::New(new) => self.map_new(new),
            TransactionRecord::Cancellation(cxl) => self.map_cancellation(cxl),
        }
    }

    fn map_cancellation(&self, cxl: &Element) -> OutputRow {
        let x = self.x;
        let mut row = OutputRow::blank();
        row.set(Column::ReportStatus, ReportKind::Cancellation.status_code());
        row.set(Column::TransRefNo, x.text(cxl, "TxId"));
        row.set(Column::EntityIdCode, x.text(cxl, "ExctgPty"));
        row
    }

    fn map_new(&self, new: &Element) -> OutputRow {
        let x = self.x;
        let mut row = OutputRow::blank();
        row.set(Column::ReportStatus, ReportKind::New.status_code());
        row.set(Column::TransRefNo, x.text(new, "TxId"));
        row.set(Column::EntityIdCode, x.text(new, "ExctgPty"));
        if let Some(indicator) = x.child(new, "InvstmtPtyInd") {
            row.set(
                Column::Cover201465Eu,
                normalize_flag(indicator.text(), FlagCase::Lower),
            );
        }

        for group in &PARTY_GROUPS {
            self.map_party_group(new, group, &mut row);
        }
        self.map_transmission(new, &mut row);
        self.map_trade(new, &mut row);
        self.map_instrument(new, &mut row);
        self.map_traders(new, &mut row);
        self.map_indicators(new, &mut row);
        self.map_eligibility(new, &mut row);

        row
    }

    fn map_party_group(&self, new: &Element, group: &PartyGroup, row: &mut OutputRow) {
        let x = self.x;
        let occurrences = x
            .child(new, group.party)
            .map(|party| x.children(party, group.tag))
            .unwrap_or_default();

        let mut lists = GroupLists::default();
        for occurrence in occurrences {
            let identity = match group.identity_tag {
                Some(tag) => x
                    .child(occurrence, tag)
                    .map(|id| resolve_identity(x, id, group.alternatives))
                    .unwrap_or_default(),
                None => resolve_identity(x, occurrence, group.alternatives),
            };
            let person = identity.person.unwrap_or_default();

            lists.id_type.push(identity.code_type);
            lists.np_code.push(String::new());
            lists.id_code.push(identity.code);
            lists.country.push(x.text(occurrence, "CtryOfBrnch"));
            lists.forename.push(person.forename);
            lists.surname.push(person.surname);
            lists.birth_date.push(person.birth_date);
        }

        row.set_list(group.id_type, &lists.id_type);
        row.set_list(group.np_code, &lists.np_code);
        row.set_list(group.id_code, &lists.id_code);
        if let Some(country) = group.country {
            row.set_list(country, &lists.country);
        }
        row.set_list(group.forename, &lists.forename);
        row.set_list(group.surname, &lists.surname);
        row.set_list(group.birth_date, &lists.birth_date);
    }

    fn map_transmission(&self, new: &Element, row: &mut OutputRow) {
        let x = self.x;
        let Some(transmission) = x.child(new, "OrdrTrnsmssn") else {
            return;
        };

        if let Some(indicator) = x.child(transmission, "TrnsmssnInd") {
            row.set(
                Column::TrnsmOrderInd,
                normalize_flag(indicator.text(), FlagCase::Title),
            );
        }
        row.set(Column::TrnsmBuyIdCode, x.text(transmission, "TrnsmttgBuyr"));
        row.set(Column::TrnsmSelIdCode, x.text(transmission, "TrnsmttgSellr"));
    }

    fn map_trade(&self, new: &Element, row: &mut OutputRow) {
        let x = self.x;
        let Some(tx) = x.child(new, "Tx") else {
            return;
        };

        row.set(Column::TrnscDatetime, x.text(tx, "TradDt"));
        row.set(Column::TrnscTradeCap, x.text(tx, "TradgCpcty"));

        if let Some(quantity) = x
            .child(tx, "Qty")
            .and_then(|qty| resolve_variant(x, qty, &QUANTITY))
        {
            set_variant(
                row,
                (Column::TrnscQtyType, Column::TrnscQtyVal, Column::TrnscQtyCcy),
                quantity,
            );
        }

        row.set(Column::TrnscDrvNotion, x.text(tx, "DerivNtnlChng"));

        if let Some(price) = x
            .child(tx, "Pric")
            .and_then(|pric| resolve_price(x, pric, PendingValue::PendingOnly))
        {
            set_variant(
                row,
                (Column::TrnscPrcType, Column::TrnscPrcVal, Column::TrnscPrcCcy),
                price,
            );
        }

        row.set(Column::TrnscNetAmt, x.text(tx, "NetAmt"));
        row.set(Column::TrnscVenue, x.text(tx, "TradVn"));
        row.set(Column::TrnscBrnchCtry, x.text(tx, "CtryOfBrnch"));

        if let Some(payment) = x.child(tx, "UpFrntPmt") {
            let amount = signed_amount(x, payment);
            if !amount.value.is_empty() {
                row.set(Column::TrnscUpFrAmt, amount.value);
                row.set(Column::TrnscUpFrCcy, amount.currency);
            }
        }

        row.set(Column::TrnscCmpntId, x.text(tx, "CmplxTradCmpntId"));
    }

    fn map_instrument(&self, new: &Element, row: &mut OutputRow) {
        let x = self.x;
        let Some(instrument) = x.child(new, "FinInstrm") else {
            return;
        };

        if let Some(id) = x.child(instrument, "Id") {
            row.set(Column::InstrIdCode, id.text());
            return;
        }

        let Some(other) = x.child(instrument, "Othr") else {
            return;
        };

        if let Some(general) = x.child(other, "FinInstrmGnlAttrbts") {
            row.set(Column::InstrIdCode, x.text(general, "Id"));
            row.set(Column::InstrFullName, x.text(general, "FullNm"));
            row.set(Column::InstrClass, x.text(general, "ClssfctnTp"));
            row.set(Column::InstrNotnlCcy1, x.text(general, "NtnlCcy"));
        }

        if let Some(derivative) = x.child(other, "DerivInstrmAttrbts") {
            self.map_derivative(derivative, row);
        }
    }

    fn map_derivative(&self, derivative: &Element, row: &mut OutputRow) {
        let x = self.x;

        if let Some(asset_class) = x.child(derivative, "AsstClssSpcfcAttrbts") {
            let notional = x
                .child(asset_class, "Intrst")
                .or_else(|| x.child(asset_class, "FX"))
                .map(|attributes| x.text(attributes, "OthrNtnlCcy"))
                .unwrap_or_default();
            row.set(Column::InstrNotnlCcy2, notional);
        }

        row.set(Column::InstrPriceMult, x.text(derivative, "PricMltplr"));

        if let Some(swap) = x.path(derivative, &["UndrlygInstrm", "Swp"]) {
            let mut underlying = UnderlyingLists::default();
            for (tag, sign) in SWAP_LEGS {
                if let Some(leg) = x.child(swap, tag) {
                    collect_swap_leg(x, leg, sign, &mut underlying);
                }
            }
            row.set_list(Column::InstrUnderCode, &underlying.codes);
            row.set_list(Column::InstrUnderName, &underlying.names);
            row.set_list(Column::InstrUnderTerm, &underlying.terms);
        }

        row.set(Column::InstrOptnType, x.text(derivative, "OptnTp"));

        if let Some(strike) = x
            .child(derivative, "StrkPric")
            .and_then(|strike| resolve_price(x, strike, PendingValue::Always))
        {
            set_variant(
                row,
                (Column::InstrStrkType, Column::InstrStrkPrice, Column::InstrStrkCcy),
                strike,
            );
        }

        row.set(Column::InstrOptnExrc, x.text(derivative, "OptnExrcStyle"));
        row.set(Column::InstrMatDate, x.text(derivative, "MtrtyDt"));
        row.set(Column::InstrExpDate, x.text(derivative, "XpryDt"));
        row.set(Column::InstrDlvryType, x.text(derivative, "DlvryTp"));
    }

    fn map_traders(&self, new: &Element, row: &mut OutputRow) {
        let x = self.x;
        if let Some(decision) = x.child(new, "InvstmtDcsnPrsn") {
            self.route_trader(resolve_trader(x, decision, false), &INVESTMENT_DECISION, row);
        }
        if let Some(execution) = x.child(new, "ExctgPrsn") {
            self.route_trader(resolve_trader(x, execution, true), &EXECUTION, row);
        }
    }

    fn route_trader(&self, trader: TraderIdentity, columns: &TraderColumns, row: &mut OutputRow) {
        let identifier_column = match self.config.client_mode {
            ClientMode::Nnip => columns.np,
            ClientMode::Standard => columns.code,
        };
        row.set(columns.code_type, trader.code_type);
        row.set(identifier_column, trader.identifier);
        row.set(columns.country, trader.country);
    }

    fn map_indicators(&self, new: &Element, row: &mut OutputRow) {
        let x = self.x;
        let Some(attributes) = x.child(new, "AddtlAttrbts") else {
            return;
        };

        row.set_list(Column::TradeWaiverInd, &texts(x.children(attributes, "WvrInd")));
        row.set(Column::TradeShrtInd, x.text(attributes, "ShrtSellgInd"));
        row.set_list(Column::TradePostInd, &texts(x.children(attributes, "OTCPstTradInd")));

        if let Some(risk) = x.child(attributes, "RskRdcgTx") {
            row.set(Column::TradeDrvInd, normalize_flag(risk.text(), FlagCase::Title));
        }
        if let Some(financing) = x.child(attributes, "SctiesFincgTxInd") {
            row.set(Column::TradeSecInd, normalize_flag(financing.text(), FlagCase::Title));
        }
    }

    fn map_eligibility(&self, new: &Element, row: &mut OutputRow) {
        let x = self.x;
        let Some(eligibility) = x.child(new, "ElgbltyDtrmntnAttrbts") else {
            return;
        };

        row.set(Column::EligBranchLoc, x.text(eligibility, "BrnchLctn"));
        row.set(Column::EligTrnscType, x.text(eligibility, "TxTp"));
        row.set(Column::EligCycleEvent, x.text(eligibility, "LfcclEvnt"));
    }
}

fn set_variant(row: &mut OutputRow, columns: VariantColumns, resolved: Resolved) {
    let (type_column, value_column, currency_column) = columns;
    row.set(type_column, resolved.type_code);
    row.set(value_column, resolved.value);
    row.set(currency_column, resolved.currency);
}

fn texts(elements: Vec<&Element>) -> Vec<String> {
    elements
        .into_iter()
        .map(|element| element.text().to_string())
        .collect()
}

fn prefixed(sign: char, value: &str) -> String {
    format!("{sign}{value}")
}

/// Append the codes, index names and terms of one swap leg.
fn collect_swap_leg(x: &Extractor, leg: &Element, sign: char, lists: &mut UnderlyingLists) {
    if let Some(single) = x.child(leg, "Sngl") {
        let isin = x
            .child(single, "ISIN")
            .or_else(|| x.path(single, &["Indx", "ISIN"]));
        if let Some(isin) = isin {
            lists.codes.push(prefixed(sign, isin.text()));
        }
        if let Some(index) = x.child(single, "Indx") {
            collect_index(x, index, sign, lists);
        }
    } else if let Some(basket) = x.child(leg, "Bskt") {
        let indices = x.children(basket, "Indx");
        let isins = x.children(basket, "ISIN");
        if isins.is_empty() {
            for index in &indices {
                if let Some(isin) = x.child(index, "ISIN") {
                    lists.codes.push(prefixed(sign, isin.text()));
                }
            }
        } else {
            for isin in isins {
                lists.codes.push(prefixed(sign, isin.text()));
            }
        }
        for index in indices {
            collect_index(x, index, sign, lists);
        }
    }
}

/// Name (`Nm/RefRate/{Indx,Nm}`) and term (`Nm/Term/{Val,Unit}`) of an index.
fn collect_index(x: &Extractor, index: &Element, sign: char, lists: &mut UnderlyingLists) {
    let Some(name) = x.child(index, "Nm") else {
        return;
    };

    if let Some(rate) = x.child(name, "RefRate") {
        if let Some(rate_name) = x.child(rate, "Indx").or_else(|| x.child(rate, "Nm")) {
            lists.names.push(prefixed(sign, rate_name.text()));
        }
    }

    if let Some(term) = x.child(name, "Term") {
        if let (Some(value), Some(unit)) = (x.child(term, "Val"), x.child(term, "Unit")) {
            lists
                .terms
                .push(format!("{sign}{} {}", value.text(), unit.text()));
        }
    }
}
