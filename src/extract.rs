//! Field extraction patterns shared by the record mapper.
//!
//! Each pattern turns one report sub-tree into plain strings: boolean
//! indicators, sign-qualified amounts, type-tagged variants (quantity,
//! price, strike price) and party/trader identities. Variant fields are
//! resolved from a fixed, ordered list of alternatives; the first present
//! alternative wins.

use crate::types::FlagCase;
use crate::xml_tree::{Element, Extractor};

/// Scheme code for a national identifier in the report.
const NATIONAL_ID_SCHEME: &str = "NIDN";
/// Code type written for a national identifier.
const NATIONAL_ID_CODE: &str = "NIND";
/// Pending price marker that is also copied into the value column.
const PENDING_PRICE: &str = "PNDG";

/// Normalise a boolean indicator: `1`/`true` and `0`/`false` become the
/// literal for `case`; anything else is passed through unchanged.
pub fn normalize_flag(raw: &str, case: FlagCase) -> String {
    match raw {
        "1" | "true" => case.literal(true).to_string(),
        "0" | "false" => case.literal(false).to_string(),
        other => other.to_string(),
    }
}

/// Whether a `Sgn` value marks a negative amount.
pub fn is_negative(sign: &str) -> bool {
    matches!(sign, "1" | "true")
}

/// An amount and its currency, both as extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Amount {
    pub value: String,
    pub currency: String,
}

/// Read a sign-qualified amount.
///
/// The node either wraps `Amt` (with an optional `Sgn` sibling) or holds
/// the amount as its own text. The currency is `Amt@Ccy`, or the node's
/// own `Ccy` attribute.
pub fn signed_amount(x: &Extractor, node: &Element) -> Amount {
    match x.child(node, "Amt") {
        Some(amt) => {
            let mut value = amt.text().to_string();
            if !value.is_empty() && is_negative(&x.text(node, "Sgn")) {
                value.insert(0, '-');
            }
            let mut currency = x.attr(node, "Amt", "Ccy");
            if currency.is_empty() {
                currency = node.attribute("Ccy").unwrap_or_default().to_string();
            }
            Amount { value, currency }
        }
        None => Amount {
            value: node.text().to_string(),
            currency: node.attribute("Ccy").unwrap_or_default().to_string(),
        },
    }
}

/// Type code, value and currency of a type-tagged field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolved {
    pub type_code: String,
    pub value: String,
    pub currency: String,
}

/// How the value of an alternative is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// Element text.
    Text,
    /// Sign-qualified amount with currency.
    Amount,
}

/// One mutually exclusive child tag of a type-tagged field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternative {
    pub tag: &'static str,
    pub type_code: &'static str,
    pub reading: Reading,
}

const fn alt(tag: &'static str, type_code: &'static str, reading: Reading) -> Alternative {
    Alternative {
        tag,
        type_code,
        reading,
    }
}

/// Quantity alternatives in priority order.
pub const QUANTITY: [Alternative; 3] = [
    alt("Unit", "UNIT", Reading::Text),
    alt("NmnlVal", "NOMI", Reading::Amount),
    alt("MntryVal", "MONE", Reading::Amount),
];

/// Price (and strike price) alternatives in priority order.
pub const PRICE: [Alternative; 4] = [
    alt("MntryVal", "MONE", Reading::Amount),
    alt("Pctg", "PERC", Reading::Text),
    alt("Yld", "YIEL", Reading::Text),
    alt("BsisPts", "BPNT", Reading::Text),
];

/// Resolve the first present alternative under `node`.
pub fn resolve_variant(
    x: &Extractor,
    node: &Element,
    alternatives: &[Alternative],
) -> Option<Resolved> {
    alternatives.iter().find_map(|alternative| {
        let found = x.child(node, alternative.tag)?;
        let resolved = match alternative.reading {
            Reading::Text => Resolved {
                type_code: alternative.type_code.to_string(),
                value: found.text().to_string(),
                currency: String::new(),
            },
            Reading::Amount => {
                let amount = signed_amount(x, found);
                Resolved {
                    type_code: alternative.type_code.to_string(),
                    value: amount.value,
                    currency: amount.currency,
                }
            }
        };
        Some(resolved)
    })
}

/// What goes into the value column for a `NoPric` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingValue {
    /// Only the `PNDG` code is copied (transaction price).
    PendingOnly,
    /// The code is always copied (strike price).
    Always,
}

/// Resolve a price-like node holding either `Pric` or `NoPric`.
///
/// `NoPric/Pdg` supplies the type code; `NoPric/Ccy` the currency.
pub fn resolve_price(x: &Extractor, node: &Element, pending: PendingValue) -> Option<Resolved> {
    if let Some(price) = x.child(node, "Pric") {
        return resolve_variant(x, price, &PRICE);
    }

    let no_price = x.child(node, "NoPric")?;
    let mut resolved = Resolved {
        currency: x.text(no_price, "Ccy"),
        ..Resolved::default()
    };
    if let Some(code) = x.child(no_price, "Pdg").map(Element::text) {
        resolved.type_code = code.to_string();
        if pending == PendingValue::Always || code == PENDING_PRICE {
            resolved.value = code.to_string();
        }
    }
    Some(resolved)
}

/// Name and birth date of a natural person.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonDetails {
    pub forename: String,
    pub surname: String,
    pub birth_date: String,
}

/// Identification of one buyer/seller account owner or decision maker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartyIdentity {
    pub code_type: String,
    pub code: String,
    pub person: Option<PersonDetails>,
}

/// Identity forms a party may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityAlternative {
    /// Legal entity identifier (`LEI`).
    Lei,
    /// Market identifier code (`MIC`).
    Mic,
    /// Natural person identified under another scheme (`Prsn/Othr`).
    Person,
    /// Raw international identifier (`Intl`); always matches.
    International,
}

/// Account owners, in priority order.
pub const ACCOUNT_OWNER_IDENTITY: [IdentityAlternative; 4] = [
    IdentityAlternative::Lei,
    IdentityAlternative::Mic,
    IdentityAlternative::Person,
    IdentityAlternative::International,
];

/// Decision makers, in priority order.
pub const DECISION_MAKER_IDENTITY: [IdentityAlternative; 2] =
    [IdentityAlternative::Lei, IdentityAlternative::Person];

impl IdentityAlternative {
    fn resolve(self, x: &Extractor, node: &Element) -> Option<PartyIdentity> {
        match self {
            IdentityAlternative::Lei => x.child(node, "LEI").map(|lei| PartyIdentity {
                code_type: "LEI".to_string(),
                code: lei.text().to_string(),
                person: None,
            }),
            IdentityAlternative::Mic => x.child(node, "MIC").map(|mic| PartyIdentity {
                code_type: "MIC".to_string(),
                code: mic.text().to_string(),
                person: None,
            }),
            IdentityAlternative::Person => x.child(node, "Prsn").map(|person| {
                PartyIdentity {
                    code_type: x
                        .child(person, "Othr")
                        .map(|other| scheme_code(x, other))
                        .unwrap_or_default(),
                    code: x.path_text(person, &["Othr", "Id"]),
                    person: Some(person_details(x, person)),
                }
            }),
            IdentityAlternative::International => {
                let intl = x.text(node, "Intl");
                Some(PartyIdentity {
                    code_type: intl.clone(),
                    code: intl,
                    person: None,
                })
            }
        }
    }
}

/// Resolve a party identity; empty when no alternative matches.
pub fn resolve_identity(
    x: &Extractor,
    node: &Element,
    alternatives: &[IdentityAlternative],
) -> PartyIdentity {
    alternatives
        .iter()
        .find_map(|alternative| alternative.resolve(x, node))
        .unwrap_or_default()
}

/// Code type of a `Prsn/Othr` identifier: `SchmeNm/Cd` (with `NIDN` read as
/// `NIND`), else `SchmeNm/Prtry`.
pub fn scheme_code(x: &Extractor, other: &Element) -> String {
    let Some(scheme) = x.child(other, "SchmeNm") else {
        return String::new();
    };

    if let Some(code) = x.child(scheme, "Cd") {
        if code.text() == NATIONAL_ID_SCHEME {
            NATIONAL_ID_CODE.to_string()
        } else {
            code.text().to_string()
        }
    } else {
        x.text(scheme, "Prtry")
    }
}

fn person_details(x: &Extractor, person: &Element) -> PersonDetails {
    PersonDetails {
        forename: x.text(person, "FrstNm"),
        surname: x.text(person, "Nm"),
        birth_date: x.text(person, "BirthDt"),
    }
}

/// Identification of the investment decision maker or executing trader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraderIdentity {
    pub code_type: String,
    pub identifier: String,
    pub country: String,
}

/// Resolve `Prsn`, then `Algo`, then (when `allow_client`) `Clnt`.
pub fn resolve_trader(x: &Extractor, node: &Element, allow_client: bool) -> TraderIdentity {
    if let Some(person) = x.child(node, "Prsn") {
        TraderIdentity {
            code_type: x
                .child(person, "Othr")
                .map(|other| scheme_code(x, other))
                .unwrap_or_default(),
            identifier: x.path_text(person, &["Othr", "Id"]),
            country: x.text(person, "CtryOfBrnch"),
        }
    } else if let Some(algo) = x.child(node, "Algo") {
        TraderIdentity {
            code_type: "ALGO".to_string(),
            identifier: algo.text().to_string(),
            country: String::new(),
        }
    } else if allow_client && x.has(node, "Clnt") {
        TraderIdentity {
            code_type: "CLIENT".to_string(),
            ..TraderIdentity::default()
        }
    } else {
        TraderIdentity::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml_tree::XmlDocument;

    fn parse(xml: &str) -> (XmlDocument, Extractor) {
        let doc = XmlDocument::parse(xml).unwrap();
        let x = Extractor::for_document(&doc);
        (doc, x)
    }

    #[test]
    fn test_normalize_flag() {
        assert_eq!(normalize_flag("1", FlagCase::Lower), "true");
        assert_eq!(normalize_flag("0", FlagCase::Lower), "false");
        assert_eq!(normalize_flag("true", FlagCase::Title), "True");
        assert_eq!(normalize_flag("false", FlagCase::Title), "False");
        assert_eq!(normalize_flag("True", FlagCase::Lower), "True");
        assert_eq!(normalize_flag("", FlagCase::Title), "");
        assert_eq!(normalize_flag("Y", FlagCase::Title), "Y");
    }

    #[test]
    fn test_signed_amount_negative() {
        let (doc, x) = parse(r#"<M><Amt Ccy="EUR">100.50</Amt><Sgn>1</Sgn></M>"#);
        let amount = signed_amount(&x, doc.root());
        assert_eq!(amount.value, "-100.50");
        assert_eq!(amount.currency, "EUR");

        let (doc, x) = parse(r#"<M><Amt Ccy="EUR">100.50</Amt><Sgn>true</Sgn></M>"#);
        assert_eq!(signed_amount(&x, doc.root()).value, "-100.50");
    }

    #[test]
    fn test_signed_amount_positive() {
        let (doc, x) = parse(r#"<M><Amt Ccy="USD">100.50</Amt></M>"#);
        assert_eq!(signed_amount(&x, doc.root()).value, "100.50");

        let (doc, x) = parse(r#"<M><Amt Ccy="USD">100.50</Amt><Sgn>0</Sgn></M>"#);
        assert_eq!(signed_amount(&x, doc.root()).value, "100.50");

        let (doc, x) = parse(r#"<M><Amt Ccy="USD">100.50</Amt><Sgn>false</Sgn></M>"#);
        assert_eq!(signed_amount(&x, doc.root()).value, "100.50");
    }

    #[test]
    fn test_signed_amount_direct_text() {
        let (doc, x) = parse(r#"<NmnlVal Ccy="GBP">5000</NmnlVal>"#);
        let amount = signed_amount(&x, doc.root());
        assert_eq!(amount, Amount { value: "5000".into(), currency: "GBP".into() });
    }

    #[test]
    fn test_signed_amount_currency_from_wrapper() {
        let (doc, x) = parse(r#"<M Ccy="JPY"><Amt>700</Amt></M>"#);
        let amount = signed_amount(&x, doc.root());
        assert_eq!(amount, Amount { value: "700".into(), currency: "JPY".into() });

        let (doc, x) = parse(r#"<M Ccy="JPY"><Amt Ccy="EUR">700</Amt></M>"#);
        assert_eq!(signed_amount(&x, doc.root()).currency, "EUR");
    }

    #[test]
    fn test_signed_amount_empty_value_not_negated() {
        let (doc, x) = parse(r#"<M><Amt Ccy="USD"/><Sgn>1</Sgn></M>"#);
        assert_eq!(signed_amount(&x, doc.root()).value, "");
    }

    #[test]
    fn test_quantity_variants() {
        let (doc, x) = parse("<Qty><Unit>1000</Unit></Qty>");
        let q = resolve_variant(&x, doc.root(), &QUANTITY).unwrap();
        assert_eq!((q.type_code.as_str(), q.value.as_str(), q.currency.as_str()), ("UNIT", "1000", ""));

        let (doc, x) = parse(r#"<Qty><MntryVal Ccy="EUR">2500.5</MntryVal></Qty>"#);
        let q = resolve_variant(&x, doc.root(), &QUANTITY).unwrap();
        assert_eq!((q.type_code.as_str(), q.value.as_str(), q.currency.as_str()), ("MONE", "2500.5", "EUR"));

        let (doc, x) = parse(r#"<Qty><NmnlVal><Amt Ccy="CHF">10</Amt></NmnlVal></Qty>"#);
        let q = resolve_variant(&x, doc.root(), &QUANTITY).unwrap();
        assert_eq!((q.type_code.as_str(), q.value.as_str(), q.currency.as_str()), ("NOMI", "10", "CHF"));
    }

    #[test]
    fn test_variant_priority_and_absence() {
        let (doc, x) = parse("<Qty><MntryVal>1</MntryVal><Unit>2</Unit></Qty>");
        assert_eq!(resolve_variant(&x, doc.root(), &QUANTITY).unwrap().type_code, "UNIT");

        let (doc, x) = parse("<Qty><Other>2</Other></Qty>");
        assert!(resolve_variant(&x, doc.root(), &QUANTITY).is_none());
    }

    #[test]
    fn test_price_variants() {
        let (doc, x) = parse(
            r#"<Pric><Pric><MntryVal><Amt Ccy="EUR">12.5</Amt><Sgn>1</Sgn></MntryVal></Pric></Pric>"#,
        );
        let p = resolve_price(&x, doc.root(), PendingValue::PendingOnly).unwrap();
        assert_eq!((p.type_code.as_str(), p.value.as_str(), p.currency.as_str()), ("MONE", "-12.5", "EUR"));

        let (doc, x) = parse("<Pric><Pric><Pctg>99.1</Pctg></Pric></Pric>");
        let p = resolve_price(&x, doc.root(), PendingValue::PendingOnly).unwrap();
        assert_eq!((p.type_code.as_str(), p.value.as_str()), ("PERC", "99.1"));

        let (doc, x) = parse("<Pric><Pric><Yld>3.2</Yld></Pric></Pric>");
        assert_eq!(resolve_price(&x, doc.root(), PendingValue::PendingOnly).unwrap().type_code, "YIEL");

        let (doc, x) = parse("<Pric><Pric><BsisPts>25</BsisPts></Pric></Pric>");
        assert_eq!(resolve_price(&x, doc.root(), PendingValue::PendingOnly).unwrap().type_code, "BPNT");
    }

    #[test]
    fn test_no_price_pending() {
        let (doc, x) = parse("<Pric><NoPric><Pdg>PNDG</Pdg><Ccy>EUR</Ccy></NoPric></Pric>");
        let p = resolve_price(&x, doc.root(), PendingValue::PendingOnly).unwrap();
        assert_eq!((p.type_code.as_str(), p.value.as_str(), p.currency.as_str()), ("PNDG", "PNDG", "EUR"));

        let (doc, x) = parse("<Pric><NoPric><Pdg>NOAP</Pdg></NoPric></Pric>");
        let p = resolve_price(&x, doc.root(), PendingValue::PendingOnly).unwrap();
        assert_eq!((p.type_code.as_str(), p.value.as_str()), ("NOAP", ""));

        let p = resolve_price(&x, doc.root(), PendingValue::Always).unwrap();
        assert_eq!((p.type_code.as_str(), p.value.as_str()), ("NOAP", "NOAP"));
    }

    #[test]
    fn test_price_absent() {
        let (doc, x) = parse("<Pric/>");
        assert!(resolve_price(&x, doc.root(), PendingValue::PendingOnly).is_none());
    }

    #[test]
    fn test_account_owner_identity_priority() {
        let (doc, x) = parse("<Id><MIC>XLON</MIC><LEI>LEI9876543210987654321</LEI></Id>");
        let id = resolve_identity(&x, doc.root(), &ACCOUNT_OWNER_IDENTITY);
        assert_eq!(id.code_type, "LEI");
        assert_eq!(id.code, "LEI9876543210987654321");
        assert!(id.person.is_none());

        let (doc, x) = parse("<Id><MIC>XLON</MIC></Id>");
        let id = resolve_identity(&x, doc.root(), &ACCOUNT_OWNER_IDENTITY);
        assert_eq!((id.code_type.as_str(), id.code.as_str()), ("MIC", "XLON"));

        let (doc, x) = parse("<Id><Intl>INTC</Intl></Id>");
        let id = resolve_identity(&x, doc.root(), &ACCOUNT_OWNER_IDENTITY);
        assert_eq!((id.code_type.as_str(), id.code.as_str()), ("INTC", "INTC"));
    }

    #[test]
    fn test_person_identity_national_id() {
        let (doc, x) = parse(
            "<Id><Prsn><FrstNm>JOHN</FrstNm><Nm>DOE</Nm><BirthDt>1980-01-02</BirthDt>\
             <Othr><Id>GB12345</Id><SchmeNm><Cd>NIDN</Cd></SchmeNm></Othr></Prsn></Id>",
        );
        let id = resolve_identity(&x, doc.root(), &ACCOUNT_OWNER_IDENTITY);
        assert_eq!(id.code_type, "NIND");
        assert_eq!(id.code, "GB12345");
        assert_eq!(
            id.person,
            Some(PersonDetails {
                forename: "JOHN".into(),
                surname: "DOE".into(),
                birth_date: "1980-01-02".into(),
            })
        );
    }

    #[test]
    fn test_person_identity_other_schemes() {
        let (doc, x) = parse("<Id><Prsn><Othr><Id>P1</Id><SchmeNm><Cd>CCPT</Cd></SchmeNm></Othr></Prsn></Id>");
        assert_eq!(resolve_identity(&x, doc.root(), &ACCOUNT_OWNER_IDENTITY).code_type, "CCPT");

        let (doc, x) = parse("<Id><Prsn><Othr><Id>P1</Id><SchmeNm><Prtry>CONCAT</Prtry></SchmeNm></Othr></Prsn></Id>");
        assert_eq!(resolve_identity(&x, doc.root(), &ACCOUNT_OWNER_IDENTITY).code_type, "CONCAT");

        let (doc, x) = parse("<Id><Prsn><Nm>DOE</Nm></Prsn></Id>");
        let id = resolve_identity(&x, doc.root(), &ACCOUNT_OWNER_IDENTITY);
        assert_eq!((id.code_type.as_str(), id.code.as_str()), ("", ""));
        assert_eq!(id.person.map(|p| p.surname), Some("DOE".to_string()));
    }

    #[test]
    fn test_decision_maker_ignores_mic_and_intl() {
        let (doc, x) = parse("<DcsnMakr><MIC>XLON</MIC><Intl>INTC</Intl></DcsnMakr>");
        let id = resolve_identity(&x, doc.root(), &DECISION_MAKER_IDENTITY);
        assert_eq!(id, PartyIdentity::default());
    }

    #[test]
    fn test_trader_identity() {
        let (doc, x) = parse(
            "<ExctgPrsn><Prsn><CtryOfBrnch>GB</CtryOfBrnch><Othr><Id>GB99</Id>\
             <SchmeNm><Cd>NIDN</Cd></SchmeNm></Othr></Prsn></ExctgPrsn>",
        );
        let t = resolve_trader(&x, doc.root(), true);
        assert_eq!(t, TraderIdentity { code_type: "NIND".into(), identifier: "GB99".into(), country: "GB".into() });

        let (doc, x) = parse("<ExctgPrsn><Algo>ALG01</Algo></ExctgPrsn>");
        let t = resolve_trader(&x, doc.root(), true);
        assert_eq!((t.code_type.as_str(), t.identifier.as_str()), ("ALGO", "ALG01"));

        let (doc, x) = parse("<ExctgPrsn><Clnt>NORE</Clnt></ExctgPrsn>");
        assert_eq!(resolve_trader(&x, doc.root(), true).code_type, "CLIENT");
        assert_eq!(resolve_trader(&x, doc.root(), false), TraderIdentity::default());
    }
}
