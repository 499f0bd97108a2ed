//! Per-category datasets.

use stockwatch_pipeline::{fields, InventoryRecord};

use crate::buckets::Buckets;
use crate::datasets::{CategoryAverage, CategoryCount, CategoryValue};
use crate::ranking::TopN;

/// Number of records per category, in order of first appearance.
pub fn category_distribution(records: &[InventoryRecord]) -> Vec<CategoryCount> {
    let mut counts: Buckets<usize> = Buckets::new();
    for record in records {
        *counts.entry(record.category()) += 1;
    }
    counts
        .into_entries()
        .into_iter()
        .map(|(name, value)| CategoryCount { name, value })
        .collect()
}

#[derive(Default)]
struct AgeSum {
    total: f64,
    count: usize,
}

/// Mean non-negative stock age per category, highest first.
///
/// Categories without a single valid age are left out.
pub fn average_age_by_category(records: &[InventoryRecord]) -> Vec<CategoryAverage> {
    let mut sums: Buckets<AgeSum> = Buckets::new();
    for record in records {
        let Some(age) = record.number(fields::STOCK_AGE_DAYS).filter(|a| *a >= 0.0) else {
            continue;
        };
        let sum = sums.entry(record.category());
        sum.total += age;
        sum.count += 1;
    }
    let scored = sums
        .into_entries()
        .into_iter()
        .map(|(name, sum)| {
            let average_age = sum.total / sum.count as f64;
            (average_age, CategoryAverage { name, average_age })
        })
        .collect();
    TopN::unbounded().rank(scored)
}

/// Total value of current stock (stock x unit price) per category, highest first.
pub fn stock_value_by_category(records: &[InventoryRecord]) -> Vec<CategoryValue> {
    let mut totals: Buckets<f64> = Buckets::new();
    for record in records {
        let stock = record.current_stock().unwrap_or(0.0);
        let price = record.number(fields::UNIT_PRICE).unwrap_or(0.0);
        *totals.entry(record.category()) += stock * price;
    }
    let scored = totals
        .into_entries()
        .into_iter()
        .map(|(name, value)| (value, CategoryValue { name, value }))
        .collect();
    TopN::unbounded().rank(scored)
}
