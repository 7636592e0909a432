//! Money amounts: coercion from loosely typed JSON and the number-shaped
//! serde representation used in stored records.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Reads an amount the way form submissions arrive.
///
/// Absent, `null` and blank strings count as zero. Numbers are taken as they
/// are, strings are trimmed and parsed (plain or scientific notation).
/// Returns `None` for anything that is not a number.
pub fn coerce(value: Option<&Value>) -> Option<Decimal> {
    match value {
        None | Some(Value::Null) => Some(Decimal::ZERO),
        Some(Value::Number(n)) => parse(&n.to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => Some(Decimal::ZERO),
        Some(Value::String(s)) => parse(s.trim()),
        Some(_) => None,
    }
}

fn parse(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// The JSON number an amount is stored as: an integer when whole and within
/// `i64`, a float otherwise.
fn to_number(amount: &Decimal) -> Option<Number> {
    if amount.fract().is_zero() {
        if let Some(whole) = amount.to_i64() {
            return Some(whole.into());
        }
    }
    // parsed from text: str -> f64 is correctly rounded, Decimal::to_f64 is not
    amount.to_string().parse::<f64>().ok().and_then(Number::from_f64)
}

/// Whether the amount reads back unchanged after being stored.
///
/// Amounts past `i64` or with a fraction are stored as floats, which carry
/// about 17 significant digits. Anything finer than that is not storable.
pub fn is_storable(amount: &Decimal) -> bool {
    to_number(amount).and_then(|n| parse(&n.to_string())) == Some(*amount)
}

pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match to_number(amount) {
        Some(number) => number.serialize(serializer),
        None => serializer.serialize_str(&amount.to_string()),
    }
}

/// Stored amounts that are not numeric (older writers stored `null` for NaN) read as zero.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce(Some(&value)).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_missing_and_blank_are_zero() {
        assert_eq!(coerce(None), Some(Decimal::ZERO));
        assert_eq!(coerce(Some(&Value::Null)), Some(Decimal::ZERO));
        assert_eq!(coerce(Some(&json!(""))), Some(Decimal::ZERO));
        assert_eq!(coerce(Some(&json!("   "))), Some(Decimal::ZERO));
    }

    #[test]
    fn test_coerce_numbers_and_numeric_strings() {
        assert_eq!(coerce(Some(&json!(1500))), Some(Decimal::new(1500, 0)));
        assert_eq!(coerce(Some(&json!(1750.5))), Some(Decimal::new(17505, 1)));
        assert_eq!(coerce(Some(&json!(" 12000 "))), Some(Decimal::new(12000, 0)));
        assert_eq!(coerce(Some(&json!("-2.25"))), Some(Decimal::new(-225, 2)));
        assert_eq!(coerce(Some(&json!("1e3"))), Some(Decimal::new(1000, 0)));
    }

    #[test]
    fn test_coerce_rejects_non_numeric() {
        assert_eq!(coerce(Some(&json!("abc"))), None);
        assert_eq!(coerce(Some(&json!("12abc"))), None);
        assert_eq!(coerce(Some(&json!(true))), None);
        assert_eq!(coerce(Some(&json!([1]))), None);
        assert_eq!(coerce(Some(&json!({"v": 1}))), None);
    }

    #[test]
    fn test_storable_amounts() {
        assert!(is_storable(&Decimal::new(1500, 0)));
        assert!(is_storable(&Decimal::new(-225, 2)));
        assert!(is_storable(&Decimal::new(123456789, 4)));
        assert!(is_storable(&Decimal::from_str("100000000000000000000").unwrap()));
    }

    #[test]
    fn test_too_precise_amounts_are_not_storable() {
        assert!(!is_storable(&Decimal::from_str("0.1234567890123456789").unwrap()));
        assert!(!is_storable(&Decimal::from_str("10000000000000000.5").unwrap()));
        assert!(!is_storable(&Decimal::MAX));
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Wrapper {
        #[serde(with = "crate::models::amount")]
        amount: Decimal,
    }

    #[test]
    fn test_serialize_whole_amounts_as_integers() {
        let whole = serde_json::to_string(&Wrapper { amount: Decimal::new(1500, 0) }).unwrap();
        assert_eq!(whole, r#"{"amount":1500}"#);

        let fractional = serde_json::to_string(&Wrapper { amount: Decimal::new(15005, 1) }).unwrap();
        assert_eq!(fractional, r#"{"amount":1500.5}"#);
    }

    #[test]
    fn test_deserialize_null_reads_as_zero() {
        let wrapper: Wrapper = serde_json::from_str(r#"{"amount":null}"#).unwrap();
        assert_eq!(wrapper.amount, Decimal::ZERO);

        let wrapper: Wrapper = serde_json::from_str(r#"{"amount":2500.25}"#).unwrap();
        assert_eq!(wrapper.amount, Decimal::new(250025, 2));
    }

    #[test]
    fn test_storable_amount_reads_back_exactly() {
        let amount = Decimal::from_str("98765.4321").unwrap();
        assert!(is_storable(&amount));

        let json = serde_json::to_string(&Wrapper { amount }).unwrap();
        let wrapper: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(wrapper.amount, amount);
    }
}
