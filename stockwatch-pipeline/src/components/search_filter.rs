use crate::filter::{Filter, FilterResult};
use crate::table_view::TableQuery;
use crate::types::InventoryRecord;
use crate::util::contains_ignore_case;

/// Keeps records whose item name or item code contains the search term,
/// ignoring case. Disabled when the term is empty.
pub struct SearchFilter;

impl<'r> Filter<TableQuery, &'r InventoryRecord> for SearchFilter {
    fn enable(&self, query: &TableQuery) -> bool {
        !query.search.is_empty()
    }

    fn filter(
        &self,
        query: &TableQuery,
        candidates: Vec<&'r InventoryRecord>,
    ) -> FilterResult<&'r InventoryRecord> {
        FilterResult::partition(candidates, |record| {
            let matches = |value: Option<&str>| {
                value.is_some_and(|v| contains_ignore_case(v, &query.search))
            };
            matches(record.item_name()) || matches(record.item_code())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fields;

    fn record(code: &str, name: &str) -> InventoryRecord {
        let mut r = InventoryRecord::new(code, Default::default());
        r.insert(fields::ITEM_CODE, code);
        r.insert(fields::ITEM_NAME, name);
        r
    }

    #[test]
    fn matches_name_or_code_case_insensitively() {
        let records = vec![
            record("SP-001", "Oil Filter"),
            record("BR-6204", "Bearing"),
            record("SP-002", "Belt"),
        ];
        let query = TableQuery {
            search: "br-62".into(),
            ..TableQuery::default()
        };
        let FilterResult { kept, removed } = SearchFilter.filter(&query, records.iter().collect());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].key, "BR-6204");
        assert_eq!(removed.len(), 2);

        let query = TableQuery {
            search: "FILTER".into(),
            ..TableQuery::default()
        };
        let result = SearchFilter.filter(&query, records.iter().collect());
        assert_eq!(result.kept[0].key, "SP-001");
    }

    #[test]
    fn empty_term_disables_stage() {
        assert!(!SearchFilter.enable(&TableQuery::default()));
    }
}
