use std::cmp::Ordering;

use crate::selector::Selector;
use crate::table_view::{SortDirection, SortKey, TableQuery};
use crate::thresholds::StockStatus;
use crate::types::{fields, FieldValue, InventoryRecord};

/// Sorts table rows by the column and direction in the query.
///
/// Equal keys keep their input order in both directions. Rows missing the
/// sort value go last when ascending.
pub struct ColumnSorter;

impl<'r> Selector<TableQuery, &'r InventoryRecord> for ColumnSorter {
    fn enable(&self, query: &TableQuery) -> bool {
        query.sort.is_some()
    }

    fn compare(
        &self,
        query: &TableQuery,
        a: &&'r InventoryRecord,
        b: &&'r InventoryRecord,
    ) -> Ordering {
        let Some(spec) = query.sort else {
            return Ordering::Equal;
        };
        let ordering = match spec.key {
            SortKey::RowNumber => missing_last(row_number(a), row_number(b), |x, y| x.cmp(y)),
            SortKey::ItemName => name_key(a).cmp(&name_key(b)),
            SortKey::CurrentStock => {
                missing_last(a.current_stock(), b.current_stock(), |x, y| {
                    x.partial_cmp(y).unwrap_or(Ordering::Equal)
                })
            }
            SortKey::Status => StockStatus::rank(a.stock_status())
                .cmp(&StockStatus::rank(b.stock_status())),
        };
        match spec.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

fn row_number(record: &InventoryRecord) -> Option<i64> {
    match record.get(fields::ROW_NUMBER)? {
        FieldValue::Integer(i) => Some(*i),
        FieldValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        FieldValue::Float(_) => None,
        FieldValue::Text(s) => s.trim().parse().ok(),
    }
}

fn name_key(record: &InventoryRecord) -> String {
    record.item_name().unwrap_or_default().to_lowercase()
}

fn missing_last<T, F>(a: Option<T>, b: Option<T>, cmp: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
