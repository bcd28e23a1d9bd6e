//! Output column catalogue.
//!
//! A column is identified by its position; the header name is only a label.
//! Positions are fixed by the downstream MiFID II ingestion format and must
//! not be reordered.

/// Number of columns in every output row.
pub const NUMBER_OF_COLUMNS: usize = 82;

/// Separator for repeatable values inside a single cell.
pub const REPEAT_DELIMITER: &str = "|";

/// How a column is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    /// Populated from the report.
    Mapped,
    /// Reserved for a downstream lookup key; one empty entry per occurrence.
    Placeholder,
    /// No source path is known for the report format; always blank.
    Unmapped,
}

/// Output columns in row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    // Report details
    ReportStatus = 0,
    TransRefNo,
    TransIdCode,
    EntityIdCode,
    Cover201465Eu,

    // Buyer account owner
    BuyAcctIdType,
    BuyAcctNpCode,
    BuyAcctIdCode,
    BuyAcctCountry,
    BuyAcctForename,
    BuyAcctSurname,
    BuyAcctBirthDt,

    // Buyer decision maker
    BuyDcsnIdType,
    BuyDcsnNpCode,
    BuyDcsnIdCode,
    BuyDcsnForename,
    BuyDcsnSurname,
    BuyDcsnBirthDt,

    // Seller account owner
    SelAcctIdType,
    SelAcctNpCode,
    SelAcctIdCode,
    SelAcctCountry,
    SelAcctForename,
    SelAcctSurname,
    SelAcctBirthDt,

    // Seller decision maker
    SelDcsnIdType,
    SelDcsnNpCode,
    SelDcsnIdCode,
    SelDcsnForename,
    SelDcsnSurname,
    SelDcsnBirthDt,

    // Transmission
    TrnsmOrderInd,
    TrnsmBuyIdCode,
    TrnsmSelIdCode,

    // Transaction
    TrnscDatetime,
    TrnscTradeCap,
    TrnscQtyType,
    TrnscQtyVal,
    TrnscQtyCcy,
    TrnscDrvNotion,
    TrnscPrcType,
    TrnscPrcVal,
    TrnscPrcCcy,
    TrnscNetAmt,
    TrnscVenue,
    TrnscBrnchCtry,
    TrnscUpFrAmt,
    TrnscUpFrCcy,
    TrnscCmpntId,

    // Instrument
    InstrIdCode,
    InstrFullName,
    InstrClass,
    InstrNotnlCcy1,
    InstrNotnlCcy2,
    InstrPriceMult,
    InstrUnderCode,
    InstrUnderName,
    InstrUnderTerm,
    InstrOptnType,
    InstrStrkType,
    InstrStrkPrice,
    InstrStrkCcy,
    InstrOptnExrc,
    InstrMatDate,
    InstrExpDate,
    InstrDlvryType,

    // Traders, waivers and indicators
    TradeInvstType,
    TradeInvstNp,
    TradeInvstCode,
    TradeInvstCtry,
    TradeExecType,
    TradeExecNp,
    TradeExecCode,
    TradeExecCtry,
    TradeWaiverInd,
    TradeShrtInd,
    TradePostInd,
    TradeDrvInd,
    TradeSecInd,

    // Eligibility
    EligBranchLoc,
    EligTrnscType,
    EligCycleEvent,
}

impl Column {
    /// Every column in row order.
    pub const ALL: [Column; NUMBER_OF_COLUMNS] = [
        Column::ReportStatus,
        Column::TransRefNo,
        Column::TransIdCode,
        Column::EntityIdCode,
        Column::Cover201465Eu,
        Column::BuyAcctIdType,
        Column::BuyAcctNpCode,
        Column::BuyAcctIdCode,
        Column::BuyAcctCountry,
        Column::BuyAcctForename,
        Column::BuyAcctSurname,
        Column::BuyAcctBirthDt,
        Column::BuyDcsnIdType,
        Column::BuyDcsnNpCode,
        Column::BuyDcsnIdCode,
        Column::BuyDcsnForename,
        Column::BuyDcsnSurname,
        Column::BuyDcsnBirthDt,
        Column::SelAcctIdType,
        Column::SelAcctNpCode,
        Column::SelAcctIdCode,
        Column::SelAcctCountry,
        Column::SelAcctForename,
        Column::SelAcctSurname,
        Column::SelAcctBirthDt,
        Column::SelDcsnIdType,
        Column::SelDcsnNpCode,
        Column::SelDcsnIdCode,
        Column::SelDcsnForename,
        Column::SelDcsnSurname,
        Column::SelDcsnBirthDt,
        Column::TrnsmOrderInd,
        Column::TrnsmBuyIdCode,
        Column::TrnsmSelIdCode,
        Column::TrnscDatetime,
        Column::TrnscTradeCap,
        Column::TrnscQtyType,
        Column::TrnscQtyVal,
        Column::TrnscQtyCcy,
        Column::TrnscDrvNotion,
        Column::TrnscPrcType,
        Column::TrnscPrcVal,
        Column::TrnscPrcCcy,
        Column::TrnscNetAmt,
        Column::TrnscVenue,
        Column::TrnscBrnchCtry,
        Column::TrnscUpFrAmt,
        Column::TrnscUpFrCcy,
        Column::TrnscCmpntId,
        Column::InstrIdCode,
        Column::InstrFullName,
        Column::InstrClass,
        Column::InstrNotnlCcy1,
        Column::InstrNotnlCcy2,
        Column::InstrPriceMult,
        Column::InstrUnderCode,
        Column::InstrUnderName,
        Column::InstrUnderTerm,
        Column::InstrOptnType,
        Column::InstrStrkType,
        Column::InstrStrkPrice,
        Column::InstrStrkCcy,
        Column::InstrOptnExrc,
        Column::InstrMatDate,
        Column::InstrExpDate,
        Column::InstrDlvryType,
        Column::TradeInvstType,
        Column::TradeInvstNp,
        Column::TradeInvstCode,
        Column::TradeInvstCtry,
        Column::TradeExecType,
        Column::TradeExecNp,
        Column::TradeExecCode,
        Column::TradeExecCtry,
        Column::TradeWaiverInd,
        Column::TradeShrtInd,
        Column::TradePostInd,
        Column::TradeDrvInd,
        Column::TradeSecInd,
        Column::EligBranchLoc,
        Column::EligTrnscType,
        Column::EligCycleEvent,
    ];

    /// Zero-based position in the row.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Header label.
    pub fn header(self) -> &'static str {
        match self {
            Column::ReportStatus => "report_status",
            Column::TransRefNo => "trans_ref_no",
            Column::TransIdCode => "trans_id_code",
            Column::EntityIdCode => "entity_id_code",
            Column::Cover201465Eu => "cover_201465eu",
            Column::BuyAcctIdType => "buy_acct_id_type",
            Column::BuyAcctNpCode => "buy_acct_np_code",
            Column::BuyAcctIdCode => "buy_acct_id_code",
            Column::BuyAcctCountry => "buy_acct_country",
            Column::BuyAcctForename => "buy_acct_forename",
            Column::BuyAcctSurname => "buy_acct_surname",
            Column::BuyAcctBirthDt => "buy_acct_birthdt",
            Column::BuyDcsnIdType => "buy_dcsn_id_type",
            Column::BuyDcsnNpCode => "buy_dcsn_np_code",
            Column::BuyDcsnIdCode => "buy_dcsn_id_code",
            Column::BuyDcsnForename => "buy_dcsn_forename",
            Column::BuyDcsnSurname => "buy_dcsn_surname",
            Column::BuyDcsnBirthDt => "buy_dcsn_birthdt",
            Column::SelAcctIdType => "sel_acct_id_type",
            Column::SelAcctNpCode => "sel_acct_np_code",
            Column::SelAcctIdCode => "sel_acct_id_code",
            Column::SelAcctCountry => "sel_acct_country",
            Column::SelAcctForename => "sel_acct_forename",
            Column::SelAcctSurname => "sel_acct_surname",
            Column::SelAcctBirthDt => "sel_acct_birthdt",
            Column::SelDcsnIdType => "sel_dcsn_id_type",
            Column::SelDcsnNpCode => "sel_dcsn_np_code",
            Column::SelDcsnIdCode => "sel_dcsn_id_code",
            Column::SelDcsnForename => "sel_dcsn_forename",
            Column::SelDcsnSurname => "sel_dcsn_surname",
            Column::SelDcsnBirthDt => "sel_dcsn_birthdt",
            Column::TrnsmOrderInd => "trnsm_order_ind",
            Column::TrnsmBuyIdCode => "trnsm_buy_id_code",
            Column::TrnsmSelIdCode => "trnsm_sel_id_code",
            Column::TrnscDatetime => "trnsc_datetime",
            Column::TrnscTradeCap => "trnsc_trade_cap",
            Column::TrnscQtyType => "trnsc_qty_type",
            Column::TrnscQtyVal => "trnsc_qty_val",
            Column::TrnscQtyCcy => "trnsc_qty_ccy",
            Column::TrnscDrvNotion => "trnsc_drv_notion",
            Column::TrnscPrcType => "trnsc_prc_type",
            Column::TrnscPrcVal => "trnsc_prc_val",
            Column::TrnscPrcCcy => "trnsc_prc_ccy",
            Column::TrnscNetAmt => "trnsc_net_amt",
            Column::TrnscVenue => "trnsc_venue",
            Column::TrnscBrnchCtry => "trnsc_brnch_ctry",
            Column::TrnscUpFrAmt => "trnsc_up_fr_amt",
            Column::TrnscUpFrCcy => "trnsc_up_fr_ccy",
            Column::TrnscCmpntId => "trnsc_cmpnt_id",
            Column::InstrIdCode => "instr_id_code",
            Column::InstrFullName => "instr_full_name",
            Column::InstrClass => "instr_class",
            Column::InstrNotnlCcy1 => "instr_notnl_ccy1",
            Column::InstrNotnlCcy2 => "instr_notnl_ccy2",
            Column::InstrPriceMult => "instr_price_mult",
            Column::InstrUnderCode => "instr_under_code",
            Column::InstrUnderName => "instr_under_name",
            Column::InstrUnderTerm => "instr_under_term",
            Column::InstrOptnType => "instr_optn_type",
            Column::InstrStrkType => "instr_strk_type",
            Column::InstrStrkPrice => "instr_strk_price",
            Column::InstrStrkCcy => "instr_strk_ccy",
            Column::InstrOptnExrc => "instr_optn_exrc",
            Column::InstrMatDate => "instr_mat_date",
            Column::InstrExpDate => "instr_exp_date",
            Column::InstrDlvryType => "instr_dlvry_type",
            Column::TradeInvstType => "trade_invst_type",
            Column::TradeInvstNp => "trade_invst_np",
            Column::TradeInvstCode => "trade_invst_code",
            Column::TradeInvstCtry => "trade_invst_ctry",
            Column::TradeExecType => "trade_exec_type",
            Column::TradeExecNp => "trade_exec_np",
            Column::TradeExecCode => "trade_exec_code",
            Column::TradeExecCtry => "trade_exec_ctry",
            Column::TradeWaiverInd => "trade_waiver_ind",
            Column::TradeShrtInd => "trade_shrt_ind",
            Column::TradePostInd => "trade_post_ind",
            Column::TradeDrvInd => "trade_drv_ind",
            Column::TradeSecInd => "trade_sec_ind",
            Column::EligBranchLoc => "elig_branch_loc",
            Column::EligTrnscType => "elig_trnsc_type",
            Column::EligCycleEvent => "elig_cycle_event",
        }
    }

    /// How this column is populated.
    ///
    /// `TransIdCode` (trading venue transaction id) has no known location in
    /// the ISO report and is left unmapped rather than guessed.
    ///
    /// `TradeInvstCode` is the InvestmentDecisionWithinFirm field, which the
    /// buyer/seller decision-maker rules cross-reference as field "57"; the
    /// numbering of that cross-reference is unconfirmed.
    pub fn mapping(self) -> Mapping {
        match self {
            Column::TransIdCode => Mapping::Unmapped,
            Column::BuyAcctNpCode
            | Column::BuyDcsnNpCode
            | Column::SelAcctNpCode
            | Column::SelDcsnNpCode => Mapping::Placeholder,
            _ => Mapping::Mapped,
        }
    }

    /// Header row labels in order.
    pub fn headers() -> Vec<&'static str> {
        Self::ALL.iter().map(|column| column.header()).collect()
    }
}
