use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Payload layout carried by a transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Single sale with a cost and a selling price.
    Margin,
    /// Package bought once and resold as up to five numbers.
    Package,
    /// No schema yet, fields are kept as sent.
    Opaque,
}

impl Shape {
    /// Human readable label naming every type with this shape, e.g. `REG/OPR/VPN`.
    pub fn label(self) -> String {
        TransactionType::ALL
            .iter()
            .filter(|kind| kind.shape() == self)
            .map(|kind| kind.tag())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Reg,
    Opr,
    Vpn,
    Axb,
    Atx,
    Otx,
    Ujc,
    Crd,
}

impl TransactionType {
    pub const ALL: [TransactionType; 8] = [
        TransactionType::Reg,
        TransactionType::Opr,
        TransactionType::Vpn,
        TransactionType::Axb,
        TransactionType::Atx,
        TransactionType::Otx,
        TransactionType::Ujc,
        TransactionType::Crd,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            TransactionType::Reg => "REG",
            TransactionType::Opr => "OPR",
            TransactionType::Vpn => "VPN",
            TransactionType::Axb => "AXB",
            TransactionType::Atx => "ATX",
            TransactionType::Otx => "OTX",
            TransactionType::Ujc => "UJC",
            TransactionType::Crd => "CRD",
        }
    }

    /// Storage key prefix. Never shared between types, so a prefix scan only sees one type.
    pub fn prefix(self) -> &'static str {
        match self {
            TransactionType::Reg => "reg:",
            TransactionType::Opr => "opr:",
            TransactionType::Vpn => "vpn:",
            TransactionType::Axb => "axb:",
            TransactionType::Atx => "atx:",
            TransactionType::Otx => "otx:",
            TransactionType::Ujc => "ujc:",
            TransactionType::Crd => "crd:",
        }
    }

    pub fn shape(self) -> Shape {
        match self {
            TransactionType::Reg | TransactionType::Opr | TransactionType::Vpn => Shape::Margin,
            TransactionType::Axb => Shape::Package,
            TransactionType::Atx
            | TransactionType::Otx
            | TransactionType::Ujc
            | TransactionType::Crd => Shape::Opaque,
        }
    }

    pub fn key_for(self, id: &str) -> String {
        format!("{}{}", self.prefix(), id)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    /// Tags are matched after trimming and upper-casing, so `" reg"` is `REG`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_uppercase();
        TransactionType::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| LedgerError::InvalidType(s.trim().to_string()))
    }
}
