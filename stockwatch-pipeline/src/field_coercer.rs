//! Raw string to typed value coercion for the known numeric columns.
//!
//! Numbers are read the lenient way spreadsheet exports need: thousands
//! separators are stripped and the longest leading numeric prefix is used
//! ("12 pcs" reads as 12). Anything without a numeric prefix becomes 0.

use std::collections::BTreeMap;

use crate::csv_parser::RawRow;
use crate::types::{fields, is_numeric_field, FieldValue};

/// Coerce one raw cell according to its header.
pub fn coerce_value(header: &str, raw: &str) -> FieldValue {
    if !is_numeric_field(header) {
        return FieldValue::Text(raw.to_string());
    }

    let cleaned = raw.replace(',', "");
    match header {
        fields::ROW_NUMBER => FieldValue::Integer(parse_leading_int(&cleaned).unwrap_or(0)),
        fields::STOCK_OUT => FieldValue::Float(parse_leading_float(&cleaned).unwrap_or(0.0).abs()),
        _ => FieldValue::Float(parse_leading_float(&cleaned).unwrap_or(0.0)),
    }
}

/// Coerce every cell of a raw row, preserving all fields.
pub fn coerce_row(row: &RawRow) -> BTreeMap<String, FieldValue> {
    row.fields
        .iter()
        .map(|(header, raw)| (header.clone(), coerce_value(header, raw)))
        .collect()
}

/// Longest prefix of `s` (after leading whitespace) that reads as a decimal
/// float: optional sign, digits, optional fraction, optional exponent.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Longest leading base-10 integer prefix of `s`.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fields_pass_through() {
        assert_eq!(
            coerce_value(fields::ITEM_NAME, "Bearing, 6204"),
            FieldValue::Text("Bearing, 6204".into())
        );
        assert_eq!(coerce_value("Lokasi", ""), FieldValue::Text(String::new()));
    }

    #[test]
    fn thousands_separators_are_stripped() {
        assert_eq!(
            coerce_value(fields::UNIT_PRICE, "1,250,000.50"),
            FieldValue::Float(1_250_000.5)
        );
    }

    #[test]
    fn unparseable_numbers_become_zero() {
        assert_eq!(coerce_value(fields::CURRENT_STOCK, "n/a"), FieldValue::Float(0.0));
        assert_eq!(coerce_value(fields::CURRENT_STOCK, ""), FieldValue::Float(0.0));
        assert_eq!(coerce_value(fields::CURRENT_STOCK, "NaN"), FieldValue::Float(0.0));
        assert_eq!(coerce_value(fields::ROW_NUMBER, "x"), FieldValue::Integer(0));
    }

    #[test]
    fn leading_numeric_prefix_is_used() {
        assert_eq!(coerce_value(fields::CURRENT_STOCK, "12 pcs"), FieldValue::Float(12.0));
        assert_eq!(coerce_value(fields::STOCK_AGE_DAYS, ".5"), FieldValue::Float(0.5));
        assert_eq!(coerce_value(fields::STOCK_AGE_DAYS, "1e2x"), FieldValue::Float(100.0));
        assert_eq!(coerce_value(fields::STOCK_AGE_DAYS, "3e"), FieldValue::Float(3.0));
    }

    #[test]
    fn row_number_is_integer() {
        assert_eq!(coerce_value(fields::ROW_NUMBER, "12.7"), FieldValue::Integer(12));
        assert_eq!(coerce_value(fields::ROW_NUMBER, "1,024"), FieldValue::Integer(1024));
    }

    #[test]
    fn stock_out_is_absolute() {
        assert_eq!(coerce_value(fields::STOCK_OUT, "-15"), FieldValue::Float(15.0));
        assert_eq!(coerce_value(fields::STOCK_OUT, "7"), FieldValue::Float(7.0));
    }

    #[test]
    fn coerce_row_keeps_every_field() {
        let row = RawRow {
            line: 2,
            fields: vec![
                (fields::ROW_NUMBER.to_string(), "3".to_string()),
                (fields::ITEM_NAME.to_string(), "Seal".to_string()),
                (fields::CURRENT_STOCK.to_string(), "4".to_string()),
            ],
        };
        let coerced = coerce_row(&row);
        assert_eq!(coerced.len(), 3);
        assert_eq!(coerced[fields::ROW_NUMBER], FieldValue::Integer(3));
        assert_eq!(coerced[fields::ITEM_NAME], FieldValue::Text("Seal".into()));
        assert_eq!(coerced[fields::CURRENT_STOCK], FieldValue::Float(4.0));
    }
}
