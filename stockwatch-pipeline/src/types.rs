use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field_coercer::parse_leading_float;
use crate::thresholds::{classify_stock, StockStatus};

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Column names of the spare-parts export.
pub mod fields {
    pub const ROW_NUMBER: &str = "No.";
    pub const ITEM_CODE: &str = "Kode Barang";
    pub const ITEM_NAME: &str = "Nama Barang";
    pub const CATEGORY: &str = "Kategori";
    pub const MODEL: &str = "Model";
    pub const UNIT: &str = "Satuan";
    pub const PREVIOUS_STOCK: &str = "Stock Sebelumnya";
    pub const CURRENT_STOCK: &str = "Stock Sekarang";
    pub const STOCK_OUT: &str = "Stock Keluar";
    pub const UNIT_PRICE: &str = "Harga Satuan";
    pub const STOCK_OUT_VALUE: &str = "Total Harga Stock Keluar";
    pub const CURRENT_STOCK_VALUE: &str = "Total Harga Stock Sekarang";
    pub const STOCK_AGE_DAYS: &str = "Umur Stock (Dalam Hari)";
    /// Computed during ingestion, never read from the source file.
    pub const MIN_STOCK_THRESHOLD: &str = "MinStockThreshold";
}

/// Fields coerced to numbers during ingestion.
pub const KNOWN_NUMERIC_FIELDS: [&str; 8] = [
    fields::ROW_NUMBER,
    fields::PREVIOUS_STOCK,
    fields::CURRENT_STOCK,
    fields::UNIT_PRICE,
    fields::STOCK_OUT_VALUE,
    fields::CURRENT_STOCK_VALUE,
    fields::STOCK_AGE_DAYS,
    fields::STOCK_OUT,
];

/// Fixed leading columns of the canonical header order.
pub const CANONICAL_HEADER_ORDER: [&str; 13] = [
    fields::ROW_NUMBER,
    fields::ITEM_CODE,
    fields::ITEM_NAME,
    fields::CATEGORY,
    fields::MODEL,
    fields::UNIT,
    fields::PREVIOUS_STOCK,
    fields::CURRENT_STOCK,
    fields::UNIT_PRICE,
    fields::STOCK_OUT_VALUE,
    fields::CURRENT_STOCK_VALUE,
    fields::STOCK_AGE_DAYS,
    fields::MIN_STOCK_THRESHOLD,
];

/// Bucket name for records without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

pub fn is_numeric_field(name: &str) -> bool {
    KNOWN_NUMERIC_FIELDS.contains(&name)
}

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A single typed cell of an inventory record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric value of an `Integer` or `Float` cell. Text is never converted.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(_) => None,
        }
    }

    /// Numeric value of any cell. Text is read by its leading numeric
    /// prefix, so `"12 pcs"` gives 12 and `"n/a"` gives `None`.
    pub fn parse_number(&self) -> Option<f64> {
        match self {
            FieldValue::Text(s) => parse_leading_float(s),
            other => other.as_number().filter(|v| v.is_finite()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldValue::Text(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One normalized inventory item.
///
/// `key` is the item code when the row carries one, otherwise a generated
/// identifier. It is not part of `fields`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub key: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl InventoryRecord {
    pub fn new(key: impl Into<String>, fields: BTreeMap<String, FieldValue>) -> Self {
        Self {
            key: key.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Text cell, treating an empty string as absent.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
    }

    /// Strictly numeric cell (coerced during ingestion).
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// Numeric cell or text that parses as a number.
    pub fn parse_number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::parse_number)
    }

    pub fn item_name(&self) -> Option<&str> {
        self.text(fields::ITEM_NAME)
    }

    pub fn item_code(&self) -> Option<&str> {
        self.text(fields::ITEM_CODE)
    }

    /// Category name, or [`UNCATEGORIZED`] when missing or blank.
    pub fn category(&self) -> &str {
        self.text(fields::CATEGORY).unwrap_or(UNCATEGORIZED)
    }

    pub fn current_stock(&self) -> Option<f64> {
        self.number(fields::CURRENT_STOCK)
    }

    pub fn min_stock_threshold(&self) -> Option<u64> {
        match self.get(fields::MIN_STOCK_THRESHOLD)? {
            FieldValue::Integer(i) if *i >= 0 => Some(*i as u64),
            FieldValue::Float(f) if *f >= 0.0 => Some(*f as u64),
            _ => None,
        }
    }

    /// Stock status, or `None` when current stock or threshold is unknown.
    pub fn stock_status(&self) -> Option<StockStatus> {
        let current = self.current_stock()?;
        let threshold = self.min_stock_threshold()?;
        Some(classify_stock(current, threshold))
    }
}

// ---------------------------------------------------------------------------
// Record sets
// ---------------------------------------------------------------------------

/// Immutable snapshot of the current record set and its canonical headers.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RecordSet {
    pub records: Vec<InventoryRecord>,
    pub headers: Vec<String>,
}

impl RecordSet {
    pub fn from_records(records: Vec<InventoryRecord>) -> Self {
        let headers = canonical_headers(&records);
        Self { records, headers }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Every field name observed across `records`, fixed columns first, the rest
/// in case-insensitive lexical order.
pub fn canonical_headers(records: &[InventoryRecord]) -> Vec<String> {
    let observed: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.fields.keys().map(String::as_str))
        .collect();
    sort_headers(observed)
}

/// Order arbitrary header names canonically.
pub fn sort_headers<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Vec<String> {
    let mut headers: Vec<&str> = names.into_iter().collect();
    headers.sort_by(|a, b| compare_headers(a, b));
    headers.dedup();
    headers.into_iter().map(String::from).collect()
}

fn compare_headers(a: &str, b: &str) -> Ordering {
    let pos = |name: &str| CANONICAL_HEADER_ORDER.iter().position(|h| *h == name);
    match (pos(a), pos(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}
