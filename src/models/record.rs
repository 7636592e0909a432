use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::amount;
use super::transaction::TransactionType;

/// Number of resold line items an AXB package carries.
pub const LINE_ITEMS: usize = 5;

/// Field names owned by the record envelope rather than the payload.
pub const ENVELOPE_FIELDS: [&str; 4] = ["id", "type", "createdAt", "month"];

/// A stored sale: the envelope plus one payload variant per transaction type.
///
/// `created_at` and `month` are optional because records written before the
/// month partition existed lack `month`, and hand-edited data may lack both.
/// A stored value that is not a string reads as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub sale: Sale,
    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

impl Record {
    pub fn kind(&self) -> TransactionType {
        self.sale.kind()
    }

    pub fn key(&self) -> String {
        self.kind().key_for(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Sale {
    #[serde(rename = "REG")]
    Reg(MarginSale),
    #[serde(rename = "OPR")]
    Opr(MarginSale),
    #[serde(rename = "VPN")]
    Vpn(MarginSale),
    #[serde(rename = "AXB")]
    Axb(PackageSale),
    #[serde(rename = "ATX")]
    Atx(Map<String, Value>),
    #[serde(rename = "OTX")]
    Otx(Map<String, Value>),
    #[serde(rename = "UJC")]
    Ujc(Map<String, Value>),
    #[serde(rename = "CRD")]
    Crd(Map<String, Value>),
}

impl Sale {
    pub fn kind(&self) -> TransactionType {
        match self {
            Sale::Reg(_) => TransactionType::Reg,
            Sale::Opr(_) => TransactionType::Opr,
            Sale::Vpn(_) => TransactionType::Vpn,
            Sale::Axb(_) => TransactionType::Axb,
            Sale::Atx(_) => TransactionType::Atx,
            Sale::Otx(_) => TransactionType::Otx,
            Sale::Ujc(_) => TransactionType::Ujc,
            Sale::Crd(_) => TransactionType::Crd,
        }
    }

    /// Profit of the sale, when the payload has one.
    pub fn keuntungan(&self) -> Option<Decimal> {
        match self {
            Sale::Reg(sale) | Sale::Opr(sale) | Sale::Vpn(sale) => Some(sale.keuntungan),
            Sale::Axb(sale) => Some(sale.keuntungan),
            Sale::Atx(_) | Sale::Otx(_) | Sale::Ujc(_) | Sale::Crd(_) => None,
        }
    }
}

/// REG, OPR and VPN sales.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarginSale {
    pub jenis_trx: String,
    #[serde(with = "amount")]
    pub harga_modal: Decimal,
    #[serde(with = "amount")]
    pub harga_jual: Decimal,
    #[serde(with = "amount")]
    pub keuntungan: Decimal,
}

impl MarginSale {
    /// Derives `keuntungan` from the two prices. `None` when the difference overflows.
    pub fn new(jenis_trx: String, harga_modal: Decimal, harga_jual: Decimal) -> Option<Self> {
        Some(Self {
            jenis_trx,
            harga_modal,
            harga_jual,
            keuntungan: harga_jual.checked_sub(harga_modal)?,
        })
    }

    pub fn amounts(&self) -> [Decimal; 3] {
        [self.harga_modal, self.harga_jual, self.keuntungan]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItem {
    pub nomor: String,
    pub harga: Decimal,
}

/// AXB sales: a package bought for `harga_paket` and resold as numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PackageSaleFields", into = "PackageSaleFields")]
pub struct PackageSale {
    pub nama_pengelola: String,
    pub nomor_pengelola: String,
    pub harga_paket: Decimal,
    pub lines: [LineItem; LINE_ITEMS],
    pub total_harga_nomor: Decimal,
    pub keuntungan: Decimal,
}

impl PackageSale {
    /// Derives the line total and `keuntungan`. `None` when either overflows.
    pub fn new(
        nama_pengelola: String,
        nomor_pengelola: String,
        harga_paket: Decimal,
        lines: [LineItem; LINE_ITEMS],
    ) -> Option<Self> {
        let total_harga_nomor = lines
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.harga))?;
        Some(Self {
            nama_pengelola,
            nomor_pengelola,
            harga_paket,
            lines,
            total_harga_nomor,
            keuntungan: total_harga_nomor.checked_sub(harga_paket)?,
        })
    }

    pub fn amounts(&self) -> impl Iterator<Item = Decimal> + '_ {
        [self.harga_paket, self.total_harga_nomor, self.keuntungan]
            .into_iter()
            .chain(self.lines.iter().map(|line| line.harga))
    }
}

/// Flat wire layout of [`PackageSale`]: line items are `nomorA1..nomorA5` / `hargaA1..hargaA5`.
#[derive(Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct PackageSaleFields {
    nama_pengelola: String,
    nomor_pengelola: String,
    #[serde(with = "amount")]
    harga_paket: Decimal,
    nomor_a1: String,
    #[serde(with = "amount")]
    harga_a1: Decimal,
    nomor_a2: String,
    #[serde(with = "amount")]
    harga_a2: Decimal,
    nomor_a3: String,
    #[serde(with = "amount")]
    harga_a3: Decimal,
    nomor_a4: String,
    #[serde(with = "amount")]
    harga_a4: Decimal,
    nomor_a5: String,
    #[serde(with = "amount")]
    harga_a5: Decimal,
    #[serde(with = "amount")]
    total_harga_nomor: Decimal,
    #[serde(with = "amount")]
    keuntungan: Decimal,
}

impl From<PackageSaleFields> for PackageSale {
    fn from(f: PackageSaleFields) -> Self {
        let line = |nomor, harga| LineItem { nomor, harga };
        Self {
            nama_pengelola: f.nama_pengelola,
            nomor_pengelola: f.nomor_pengelola,
            harga_paket: f.harga_paket,
            lines: [
                line(f.nomor_a1, f.harga_a1),
                line(f.nomor_a2, f.harga_a2),
                line(f.nomor_a3, f.harga_a3),
                line(f.nomor_a4, f.harga_a4),
                line(f.nomor_a5, f.harga_a5),
            ],
            total_harga_nomor: f.total_harga_nomor,
            keuntungan: f.keuntungan,
        }
    }
}

impl From<PackageSale> for PackageSaleFields {
    fn from(sale: PackageSale) -> Self {
        let [a1, a2, a3, a4, a5] = sale.lines;
        Self {
            nama_pengelola: sale.nama_pengelola,
            nomor_pengelola: sale.nomor_pengelola,
            harga_paket: sale.harga_paket,
            nomor_a1: a1.nomor,
            harga_a1: a1.harga,
            nomor_a2: a2.nomor,
            harga_a2: a2.harga,
            nomor_a3: a3.nomor,
            harga_a3: a3.harga,
            nomor_a4: a4.nomor,
            harga_a4: a4.harga,
            nomor_a5: a5.nomor,
            harga_a5: a5.harga,
            total_harga_nomor: sale.total_harga_nomor,
            keuntungan: sale.keuntungan,
        }
    }
}
