use crate::filter::{Filter, FilterResult};
use crate::table_view::TableQuery;
use crate::types::{fields, InventoryRecord};

/// Keeps records whose category equals the selected one, ignoring case.
/// Records without a category never match a non-empty selection.
pub struct CategoryFilter;

impl<'r> Filter<TableQuery, &'r InventoryRecord> for CategoryFilter {
    fn enable(&self, query: &TableQuery) -> bool {
        !query.category.is_empty()
    }

    fn filter(
        &self,
        query: &TableQuery,
        candidates: Vec<&'r InventoryRecord>,
    ) -> FilterResult<&'r InventoryRecord> {
        let wanted = query.category.to_lowercase();
        FilterResult::partition(candidates, |record| {
            record
                .text(fields::CATEGORY)
                .is_some_and(|c| c.to_lowercase() == wanted)
        })
    }
}
