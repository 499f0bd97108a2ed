//! Filterable, sortable, groupable inventory table.
//!
//! Stages run in a fixed order: filters, then the sorter, then optional
//! grouping by category. Each stage is skipped when its `enable` says so,
//! which makes an empty query the identity view.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::components::category_filter::CategoryFilter;
use crate::components::column_sorter::ColumnSorter;
use crate::components::search_filter::SearchFilter;
use crate::filter::Filter;
use crate::selector::Selector;
use crate::thresholds::StockStatus;
use crate::types::{fields, InventoryRecord};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    RowNumber,
    ItemName,
    CurrentStock,
    Status,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "no" | "no." | "row" | "row_number" => Ok(SortKey::RowNumber),
            "name" | "item_name" => Ok(SortKey::ItemName),
            "stock" | "current_stock" => Ok(SortKey::CurrentStock),
            "status" => Ok(SortKey::Status),
            other => Err(format!(
                "Unsupported sort key: '{}'. Supported: no, name, stock, status",
                other
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Table configuration chosen by the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableQuery {
    /// Substring matched against item name and code; empty matches all.
    pub search: String,
    /// Category to match exactly (ignoring case); empty matches all.
    pub category: String,
    /// `None` keeps the record-set order.
    pub sort: Option<SortSpec>,
    pub group_by_category: bool,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: String::new(),
            sort: Some(SortSpec::default()),
            group_by_category: false,
        }
    }
}

/// A record as displayed in the table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableRow<'a> {
    pub record: &'a InventoryRecord,
    pub threshold: Option<u64>,
    pub status: Option<StockStatus>,
}

impl<'a> TableRow<'a> {
    pub fn new(record: &'a InventoryRecord) -> Self {
        Self {
            record,
            threshold: record.min_stock_threshold(),
            status: record.stock_status(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryGroup<'a> {
    pub category: String,
    pub rows: Vec<TableRow<'a>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "layout", content = "content", rename_all = "snake_case")]
pub enum TableView<'a> {
    Flat(Vec<TableRow<'a>>),
    Grouped(Vec<CategoryGroup<'a>>),
}

impl<'a> TableView<'a> {
    /// All rows in display order, groups flattened.
    pub fn rows(&self) -> Vec<&TableRow<'a>> {
        match self {
            TableView::Flat(rows) => rows.iter().collect(),
            TableView::Grouped(groups) => groups.iter().flat_map(|g| g.rows.iter()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TableView::Flat(rows) => rows.len(),
            TableView::Grouped(groups) => groups.iter().map(|g| g.rows.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Open/closed state of category groups. Owned by the caller; groups start
/// closed.
#[derive(Clone, Debug, Default)]
pub struct GroupState {
    open: HashMap<String, bool>,
}

impl GroupState {
    pub fn is_open(&self, category: &str) -> bool {
        self.open.get(category).copied().unwrap_or(false)
    }

    pub fn set_open(&mut self, category: &str, open: bool) {
        self.open.insert(category.to_string(), open);
    }

    /// Flip a group and return its new state.
    pub fn toggle(&mut self, category: &str) -> bool {
        let open = !self.is_open(category);
        self.set_open(category, open);
        open
    }
}

type RecordFilter = Box<dyn for<'r> Filter<TableQuery, &'r InventoryRecord>>;

pub struct TableViewEngine {
    filters: Vec<RecordFilter>,
    sorter: ColumnSorter,
}

impl Default for TableViewEngine {
    fn default() -> Self {
        Self {
            filters: vec![Box::new(SearchFilter), Box::new(CategoryFilter)],
            sorter: ColumnSorter,
        }
    }
}

impl TableViewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the query to `records` without modifying them.
    pub fn render<'a>(&self, records: &'a [InventoryRecord], query: &TableQuery) -> TableView<'a> {
        let mut candidates: Vec<&'a InventoryRecord> = records.iter().collect();

        for filter in &self.filters {
            if !filter.enable(query) {
                continue;
            }
            let result = filter.filter(query, candidates);
            log::debug!(
                "{} kept {} removed {}",
                filter.name(),
                result.kept.len(),
                result.removed.len()
            );
            candidates = result.kept;
        }

        if self.sorter.enable(query) {
            candidates = self.sorter.select(query, candidates);
        }

        let rows: Vec<TableRow<'a>> = candidates.into_iter().map(TableRow::new).collect();
        if query.group_by_category {
            TableView::Grouped(group_by_category(rows))
        } else {
            TableView::Flat(rows)
        }
    }
}

/// Partition rows by category, groups in lexical order of category name,
/// rows keeping their order within each group.
pub fn group_by_category(rows: Vec<TableRow<'_>>) -> Vec<CategoryGroup<'_>> {
    let mut groups: BTreeMap<String, Vec<TableRow<'_>>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(row.record.category().to_string())
            .or_default()
            .push(row);
    }
    groups
        .into_iter()
        .map(|(category, rows)| CategoryGroup { category, rows })
        .collect()
}

/// Distinct non-empty categories, lower-cased and sorted, for a category picker.
pub fn category_options(records: &[InventoryRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.text(fields::CATEGORY))
        .map(str::to_lowercase)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Capitalize the first letter of every space-separated word.
pub fn title_case(label: &str) -> String {
    label
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
