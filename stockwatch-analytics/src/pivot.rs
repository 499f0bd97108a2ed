//! User-chosen field pair aggregation.

use stockwatch_pipeline::types::{is_numeric_field, UNCATEGORIZED};
use stockwatch_pipeline::{fields, InventoryRecord};

use crate::buckets::Buckets;
use crate::datasets::PivotPoint;

/// Sum `value_field` per distinct value of `category_field`.
///
/// Text values count by their leading numeric prefix. Rows without one are
/// skipped with a warning.
/// Rows without a category land in the "Uncategorized" bucket. Output keeps
/// the order in which categories first appear.
pub fn custom_pivot(
    records: &[InventoryRecord],
    category_field: &str,
    value_field: &str,
) -> Vec<PivotPoint> {
    let mut sums: Buckets<f64> = Buckets::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(value) = record.parse_number(value_field) else {
            skipped += 1;
            continue;
        };
        let category = record
            .get(category_field)
            .map(ToString::to_string)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        *sums.entry(&category) += value;
    }

    if skipped > 0 {
        log::warn!(
            "pivot {} by {}: skipped {} rows with non-numeric values",
            value_field,
            category_field,
            skipped
        );
    }

    sums.into_entries()
        .into_iter()
        .map(|(category, value)| PivotPoint { category, value })
        .collect()
}

/// Headers usable as the pivot's value axis.
pub fn numeric_fields(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .filter(|h| is_value_field(h))
        .cloned()
        .collect()
}

/// Headers usable as the pivot's category axis.
pub fn category_fields(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .filter(|h| !is_value_field(h))
        .cloned()
        .collect()
}

fn is_value_field(header: &str) -> bool {
    is_numeric_field(header) || header == fields::MIN_STOCK_THRESHOLD
}
