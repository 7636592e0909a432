//! Turns submitted form fields into a typed sale, recomputing every derived
//! field. Client supplied `keuntungan` and `totalHargaNomor` are never read.
//!
//! Every amount, submitted or derived, must survive storage unchanged; sales
//! that overflow or carry more precision than a stored number holds are
//! rejected as incomplete.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::{LedgerError, Result};
use crate::models::amount;
use crate::models::record::{ENVELOPE_FIELDS, LINE_ITEMS, LineItem, MarginSale, PackageSale, Sale};
use crate::models::transaction::TransactionType;

pub type Fields = Map<String, Value>;

pub fn build_sale(kind: TransactionType, fields: &Fields) -> Result<Sale> {
    let sale = match kind {
        TransactionType::Reg => Sale::Reg(margin_sale(kind, fields)?),
        TransactionType::Opr => Sale::Opr(margin_sale(kind, fields)?),
        TransactionType::Vpn => Sale::Vpn(margin_sale(kind, fields)?),
        TransactionType::Axb => Sale::Axb(package_sale(kind, fields)?),
        TransactionType::Atx => Sale::Atx(opaque_fields(fields)),
        TransactionType::Otx => Sale::Otx(opaque_fields(fields)),
        TransactionType::Ujc => Sale::Ujc(opaque_fields(fields)),
        TransactionType::Crd => Sale::Crd(opaque_fields(fields)),
    };
    Ok(sale)
}

/// Trimmed string value of `key`; missing or non-string values read as empty.
pub fn text(fields: &Fields, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

fn incomplete(kind: TransactionType) -> LedgerError {
    LedgerError::IncompleteData(kind.shape().label())
}

fn required_text(kind: TransactionType, fields: &Fields, key: &str) -> Result<String> {
    let value = text(fields, key);
    if value.is_empty() {
        return Err(incomplete(kind));
    }
    Ok(value)
}

fn required_amount(kind: TransactionType, fields: &Fields, key: &str) -> Result<Decimal> {
    amount::coerce(fields.get(key)).ok_or_else(|| incomplete(kind))
}

fn storable(kind: TransactionType, amounts: impl IntoIterator<Item = Decimal>) -> Result<()> {
    if amounts.into_iter().all(|a| amount::is_storable(&a)) {
        Ok(())
    } else {
        Err(incomplete(kind))
    }
}

fn margin_sale(kind: TransactionType, fields: &Fields) -> Result<MarginSale> {
    let jenis_trx = required_text(kind, fields, "jenisTrx")?;
    let harga_modal = required_amount(kind, fields, "hargaModal")?;
    let harga_jual = required_amount(kind, fields, "hargaJual")?;
    let sale = MarginSale::new(jenis_trx, harga_modal, harga_jual).ok_or_else(|| incomplete(kind))?;
    storable(kind, sale.amounts())?;
    Ok(sale)
}

fn package_sale(kind: TransactionType, fields: &Fields) -> Result<PackageSale> {
    let nama_pengelola = required_text(kind, fields, "namaPengelola")?;
    let nomor_pengelola = required_text(kind, fields, "nomorPengelola")?;
    let harga_paket = required_amount(kind, fields, "hargaPaket")?;

    // Line item prices are optional but must still be numeric when present.
    let mut lines: [LineItem; LINE_ITEMS] = Default::default();
    for (i, line) in lines.iter_mut().enumerate() {
        let n = i + 1;
        line.nomor = text(fields, &format!("nomorA{n}"));
        line.harga = required_amount(kind, fields, &format!("hargaA{n}"))?;
    }

    let sale = PackageSale::new(nama_pengelola, nomor_pengelola, harga_paket, lines)
        .ok_or_else(|| incomplete(kind))?;
    storable(kind, sale.amounts())?;
    Ok(sale)
}

/// Types without a schema keep every submitted field except the envelope.
fn opaque_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !ENVELOPE_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fields must be an object"),
        }
    }

    #[test]
    fn test_margin_sale_ignores_client_profit() {
        let input = fields(json!({
            "type": "REG",
            "jenisTrx": "  Pulsa 25k ",
            "hargaModal": 24800,
            "hargaJual": "26000",
            "keuntungan": 999999
        }));

        let sale = build_sale(TransactionType::Reg, &input).unwrap();
        let Sale::Reg(margin) = sale else {
            panic!("expected a REG sale");
        };
        assert_eq!(margin.jenis_trx, "Pulsa 25k");
        assert_eq!(margin.harga_modal, Decimal::new(24800, 0));
        assert_eq!(margin.harga_jual, Decimal::new(26000, 0));
        assert_eq!(margin.keuntungan, Decimal::new(1200, 0));
    }

    #[test]
    fn test_margin_sale_variant_follows_type() {
        let input = fields(json!({"jenisTrx": "Voucher", "hargaModal": 1, "hargaJual": 2}));

        assert!(matches!(build_sale(TransactionType::Opr, &input), Ok(Sale::Opr(_))));
        assert!(matches!(build_sale(TransactionType::Vpn, &input), Ok(Sale::Vpn(_))));
    }

    #[test]
    fn test_margin_sale_missing_amounts_are_zero() {
        let input = fields(json!({"jenisTrx": "Token"}));

        let Sale::Reg(margin) = build_sale(TransactionType::Reg, &input).unwrap() else {
            panic!("expected a REG sale");
        };
        assert_eq!(margin.keuntungan, Decimal::ZERO);
    }

    #[test]
    fn test_margin_sale_requires_jenis_trx() {
        let input = fields(json!({"jenisTrx": "   ", "hargaModal": 1, "hargaJual": 2}));

        let result = build_sale(TransactionType::Reg, &input);
        assert!(matches!(result, Err(LedgerError::IncompleteData(label)) if label == "REG/OPR/VPN"));
    }

    #[test]
    fn test_margin_sale_rejects_non_numeric_price() {
        let input = fields(json!({"jenisTrx": "Pulsa", "hargaModal": "sepuluh", "hargaJual": 2}));

        let result = build_sale(TransactionType::Vpn, &input);
        assert!(matches!(result, Err(LedgerError::IncompleteData(_))));
    }

    #[test]
    fn test_margin_sale_rejects_overflowing_profit() {
        let input = fields(json!({
            "jenisTrx": "a",
            "hargaModal": "-79228162514264337593543950335",
            "hargaJual": "79228162514264337593543950335"
        }));

        let result = build_sale(TransactionType::Reg, &input);
        assert!(matches!(result, Err(LedgerError::IncompleteData(label)) if label == "REG/OPR/VPN"));
    }

    #[test]
    fn test_margin_sale_rejects_amounts_too_precise_to_store() {
        let input = fields(json!({"jenisTrx": "a", "hargaModal": 0, "hargaJual": "0.1234567890123456789"}));

        let result = build_sale(TransactionType::Opr, &input);
        assert!(matches!(result, Err(LedgerError::IncompleteData(label)) if label == "REG/OPR/VPN"));
    }

    #[test]
    fn test_margin_sale_rejects_profit_too_precise_to_store() {
        // both prices are storable, their difference is not
        let input = fields(json!({"jenisTrx": "a", "hargaModal": "-0.5", "hargaJual": "10000000000000000"}));

        assert!(matches!(
            build_sale(TransactionType::Reg, &input),
            Err(LedgerError::IncompleteData(_))
        ));
    }

    #[test]
    fn test_margin_sale_keeps_fine_grained_amounts() {
        let input = fields(json!({"jenisTrx": "a", "hargaModal": "1000.125", "hargaJual": "1234.5678"}));

        let Sale::Reg(margin) = build_sale(TransactionType::Reg, &input).unwrap() else {
            panic!("expected a REG sale");
        };
        assert_eq!(margin.keuntungan, Decimal::new(2344428, 4));
    }

    #[test]
    fn test_package_sale_rejects_overflowing_total() {
        let input = fields(json!({
            "namaPengelola": "Sari",
            "nomorPengelola": "0812",
            "hargaPaket": 1,
            "hargaA1": "79228162514264337593543950335",
            "hargaA2": "79228162514264337593543950335"
        }));

        let result = build_sale(TransactionType::Axb, &input);
        assert!(matches!(result, Err(LedgerError::IncompleteData(label)) if label == "AXB"));
    }

    #[test]
    fn test_package_sale_sums_line_items() {
        let input = fields(json!({
            "namaPengelola": "Sari",
            "nomorPengelola": "081200000000",
            "hargaPaket": "150000",
            "nomorA1": "0811", "hargaA1": 40000,
            "nomorA2": "0812", "hargaA2": "45000",
            "nomorA4": "0814", "hargaA4": 50000.5,
            "totalHargaNomor": 1,
            "keuntungan": 1
        }));

        let Sale::Axb(package) = build_sale(TransactionType::Axb, &input).unwrap() else {
            panic!("expected an AXB sale");
        };
        assert_eq!(package.total_harga_nomor, Decimal::new(1350005, 1));
        assert_eq!(package.keuntungan, Decimal::new(-149995, 1));
        assert_eq!(package.lines[2], LineItem::default());
        assert_eq!(package.lines[3].nomor, "0814");
    }

    #[test]
    fn test_package_sale_requires_manager() {
        let input = fields(json!({"namaPengelola": "Sari", "hargaPaket": 1}));

        let result = build_sale(TransactionType::Axb, &input);
        assert!(matches!(result, Err(LedgerError::IncompleteData(label)) if label == "AXB"));
    }

    #[test]
    fn test_package_sale_rejects_non_numeric_line_price() {
        let input = fields(json!({
            "namaPengelola": "Sari",
            "nomorPengelola": "0812",
            "hargaPaket": 1,
            "hargaA3": "x"
        }));

        assert!(build_sale(TransactionType::Axb, &input).is_err());
    }

    #[test]
    fn test_opaque_sale_keeps_payload_without_envelope() {
        let input = fields(json!({
            "id": "client-id",
            "type": "ATX",
            "createdAt": "2020-01-01T00:00:00Z",
            "month": "2020-01",
            "catatan": "free form",
            "nilai": 12
        }));

        let Sale::Atx(extra) = build_sale(TransactionType::Atx, &input).unwrap() else {
            panic!("expected an ATX sale");
        };
        assert_eq!(extra.len(), 2);
        assert_eq!(extra["catatan"], json!("free form"));
        assert_eq!(extra["nilai"], json!(12));
    }
}
