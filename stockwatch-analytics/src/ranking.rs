//! Top-N rankings: stock comparison, top-sold products, longest stock age.
//!
//! Each ranking scores candidates, keeps a stable descending order and
//! truncates to its limit through [`TopN`].

use std::cmp::Ordering;

use stockwatch_pipeline::selector::Selector;
use stockwatch_pipeline::{fields, InventoryRecord};

use crate::buckets::Buckets;
use crate::datasets::{ProductSales, StockAgePoint, StockComparisonPoint};
use crate::labels::{display_name, truncate_label, UNKNOWN_PRODUCT};
use crate::limits::{LONGEST_STOCK_AGE_LIMIT, STOCK_COMPARISON_LIMIT, TOP_SOLD_LIMIT};

/// A candidate paired with its ranking score.
pub type Scored<T> = (f64, T);

/// Descending selector over scored candidates.
///
/// Equal scores keep input order, `-0.0` and `0.0` included. NaN scores sort
/// after every number.
pub struct TopN {
    pub limit: Option<usize>,
}

impl TopN {
    pub fn new(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    pub fn unbounded() -> Self {
        Self { limit: None }
    }

    /// Rank `candidates` and drop their scores.
    pub fn rank<T: Send + Sync>(&self, candidates: Vec<Scored<T>>) -> Vec<T> {
        self.select(&(), candidates)
            .into_iter()
            .map(|(_, item)| item)
            .collect()
    }
}

impl<T: Send + Sync> Selector<(), Scored<T>> for TopN {
    fn compare(&self, _query: &(), a: &Scored<T>, b: &Scored<T>) -> Ordering {
        match (a.0.is_nan(), b.0.is_nan()) {
            (false, false) => b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal),
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
        }
    }

    fn size(&self) -> Option<usize> {
        self.limit
    }
}

fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v >= 0.0)
}

/// Items with the most current stock, alongside their previous stock.
///
/// Only records where both stock levels are non-negative numbers qualify.
pub fn stock_comparison(records: &[InventoryRecord]) -> Vec<StockComparisonPoint> {
    let scored = records
        .iter()
        .filter_map(|record| {
            let current = non_negative(record.number(fields::CURRENT_STOCK))?;
            let previous = non_negative(record.number(fields::PREVIOUS_STOCK))?;
            let full_name = display_name(record).to_string();
            Some((
                current,
                StockComparisonPoint {
                    name: truncate_label(&full_name),
                    full_name,
                    previous_stock: previous,
                    current_stock: current,
                },
            ))
        })
        .collect();
    TopN::new(STOCK_COMPARISON_LIMIT).rank(scored)
}

/// Products with the largest total outflow, summed per item name.
pub fn top_sold_products(records: &[InventoryRecord]) -> Vec<ProductSales> {
    let mut totals: Buckets<f64> = Buckets::new();
    for record in records {
        let name = record.item_name().unwrap_or(UNKNOWN_PRODUCT);
        let sold = record.number(fields::STOCK_OUT).unwrap_or(0.0).abs();
        *totals.entry(name) += sold;
    }
    let scored = totals
        .into_entries()
        .into_iter()
        .map(|(name, quantity_sold)| {
            (
                quantity_sold,
                ProductSales {
                    name,
                    quantity_sold,
                },
            )
        })
        .collect();
    TopN::new(TOP_SOLD_LIMIT).rank(scored)
}

/// In-stock items that have been held the longest.
pub fn longest_stock_age(records: &[InventoryRecord]) -> Vec<StockAgePoint> {
    let scored = records
        .iter()
        .filter(|record| record.current_stock().is_some_and(|c| c > 0.0))
        .filter_map(|record| {
            let age = non_negative(record.number(fields::STOCK_AGE_DAYS))?;
            let full_name = display_name(record).to_string();
            Some((
                age,
                StockAgePoint {
                    name: truncate_label(&full_name),
                    full_name,
                    age_days: age,
                },
            ))
        })
        .collect();
    TopN::new(LONGEST_STOCK_AGE_LIMIT).rank(scored)
}
