//! Minimum-stock threshold heuristic and stock-status classification.
//!
//! The threshold is recomputed for every record at ingestion time and stored
//! as `MinStockThreshold`. The status is derived on demand from the current
//! stock and that threshold; it is never persisted.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::{fields, FieldValue};

/// Lowest threshold ever assigned, regardless of stock movement.
pub const MIN_BASE_STOCK: u64 = 2;

/// Share of current stock kept as a floor.
pub const CURRENT_STOCK_RATE: f64 = 0.10;

/// Share of recorded outflow added to the threshold.
pub const OUTFLOW_RATE: f64 = 0.25;

/// Share of the drop from previous to current stock added to the threshold.
pub const DROP_IMPACT_RATE: f64 = 0.10;

/// Largest threshold that fits the stored integer field.
pub const MAX_THRESHOLD: u64 = i64::MAX as u64;

/// Minimum-stock threshold for current stock `current`, previous stock
/// `previous` and outflow `outflow` (already non-negative).
///
/// Saturates at [`MAX_THRESHOLD`].
pub fn min_stock_threshold(current: f64, previous: f64, outflow: f64) -> u64 {
    let raw = if current == 0.0 {
        OUTFLOW_RATE * outflow
    } else {
        let base_component = CURRENT_STOCK_RATE * current;
        let outflow_component = OUTFLOW_RATE * outflow;
        let drop = (previous - current).max(0.0);
        base_component + outflow_component + drop * DROP_IMPACT_RATE
    };
    let ceiled = raw.ceil();
    if ceiled.is_nan() || ceiled <= MIN_BASE_STOCK as f64 {
        MIN_BASE_STOCK
    } else {
        // float-to-int casts saturate, infinity included
        (ceiled as u64).min(MAX_THRESHOLD)
    }
}

/// Compute and store `MinStockThreshold` on a coerced field map.
///
/// Missing or non-numeric inputs count as zero.
pub fn apply_threshold(row: &mut BTreeMap<String, FieldValue>) -> u64 {
    let read = |name: &str| {
        row.get(name)
            .and_then(FieldValue::parse_number)
            .unwrap_or(0.0)
    };
    let current = read(fields::CURRENT_STOCK);
    let previous = read(fields::PREVIOUS_STOCK);
    let outflow = read(fields::STOCK_OUT).abs();

    let threshold = min_stock_threshold(current, previous, outflow);
    row.insert(
        fields::MIN_STOCK_THRESHOLD.to_string(),
        FieldValue::Integer(threshold as i64),
    );
    threshold
}

/// Stock level relative to the computed threshold.
///
/// Variant order is the urgency ranking used when sorting by status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    SufficientStock,
}

impl StockStatus {
    /// Sort rank; unknown statuses rank after every known one.
    pub fn rank(status: Option<StockStatus>) -> u8 {
        match status {
            Some(StockStatus::OutOfStock) => 0,
            Some(StockStatus::LowStock) => 1,
            Some(StockStatus::SufficientStock) => 2,
            None => u8::MAX,
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::OutOfStock => write!(f, "Out of Stock"),
            StockStatus::LowStock => write!(f, "Low Stock"),
            StockStatus::SufficientStock => write!(f, "Sufficient Stock"),
        }
    }
}

/// Classify current stock against a threshold.
///
/// Negative stock is not low: only `0 < current <= threshold` is.
pub fn classify_stock(current: f64, threshold: u64) -> StockStatus {
    if current == 0.0 {
        StockStatus::OutOfStock
    } else if current > 0.0 && current <= threshold as f64 {
        StockStatus::LowStock
    } else {
        StockStatus::SufficientStock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_shelf_uses_outflow_only() {
        // max(2, ceil(0.25 * 20)) = 5
        assert_eq!(min_stock_threshold(0.0, 100.0, 20.0), 5);
        assert_eq!(min_stock_threshold(0.0, 0.0, 0.0), MIN_BASE_STOCK);
        // ceil(0.25 * 9) = 3
        assert_eq!(min_stock_threshold(0.0, 0.0, 9.0), 3);
    }

    #[test]
    fn stocked_item_combines_components() {
        // 0.10*10 + 0.25*4 + 0.10*(20-10) = 3
        assert_eq!(min_stock_threshold(10.0, 20.0, 4.0), 3);
        // no drop when stock grew: 0.10*50 + 0.25*10 = 7.5 -> 8
        assert_eq!(min_stock_threshold(50.0, 10.0, 10.0), 8);
    }

    #[test]
    fn small_inputs_clamp_to_base() {
        assert_eq!(min_stock_threshold(1.0, 1.0, 0.0), MIN_BASE_STOCK);
        assert_eq!(min_stock_threshold(-5.0, 0.0, 0.0), MIN_BASE_STOCK);
    }

    #[test]
    fn huge_stock_saturates_instead_of_wrapping() {
        assert_eq!(min_stock_threshold(1e20, 0.0, 0.0), MAX_THRESHOLD);
        assert_eq!(min_stock_threshold(0.0, 0.0, f64::INFINITY), MAX_THRESHOLD);

        let mut row = BTreeMap::new();
        row.insert(fields::CURRENT_STOCK.to_string(), FieldValue::Float(1e20));
        apply_threshold(&mut row);
        assert_eq!(
            row.get(fields::MIN_STOCK_THRESHOLD),
            Some(&FieldValue::Integer(i64::MAX))
        );
    }

    #[test]
    fn threshold_is_deterministic() {
        let a = min_stock_threshold(37.0, 80.0, 12.0);
        let b = min_stock_threshold(37.0, 80.0, 12.0);
        assert_eq!(a, b);
    }

    #[test]
    fn apply_threshold_defaults_missing_inputs() {
        let mut row = BTreeMap::new();
        row.insert(fields::CURRENT_STOCK.to_string(), FieldValue::Float(10.0));
        row.insert(fields::PREVIOUS_STOCK.to_string(), FieldValue::Float(20.0));
        row.insert(fields::STOCK_OUT.to_string(), FieldValue::Float(-4.0));
        assert_eq!(apply_threshold(&mut row), 3);
        assert_eq!(
            row.get(fields::MIN_STOCK_THRESHOLD),
            Some(&FieldValue::Integer(3))
        );

        let mut empty = BTreeMap::new();
        assert_eq!(apply_threshold(&mut empty), MIN_BASE_STOCK);
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify_stock(0.0, 5), StockStatus::OutOfStock);
        assert_eq!(classify_stock(5.0, 5), StockStatus::LowStock);
        assert_eq!(classify_stock(6.0, 5), StockStatus::SufficientStock);
        assert_eq!(classify_stock(-3.0, 5), StockStatus::SufficientStock);
    }

    #[test]
    fn rank_orders_most_urgent_first() {
        let mut statuses = vec![
            None,
            Some(StockStatus::SufficientStock),
            Some(StockStatus::OutOfStock),
            Some(StockStatus::LowStock),
        ];
        statuses.sort_by_key(|s| StockStatus::rank(*s));
        assert_eq!(
            statuses,
            vec![
                Some(StockStatus::OutOfStock),
                Some(StockStatus::LowStock),
                Some(StockStatus::SufficientStock),
                None,
            ]
        );
        assert_eq!(StockStatus::LowStock.to_string(), "Low Stock");
    }
}
