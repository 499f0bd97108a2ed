use serde::Serialize;
use stockwatch_pipeline::{InventoryRecord, RecordSet};

use crate::category::{average_age_by_category, category_distribution, stock_value_by_category};
use crate::datasets::{
    CategoryAverage, CategoryCount, CategoryValue, HistogramBin, PivotPoint, ProductSales,
    StockAgePoint, StockComparisonPoint,
};
use crate::histogram::stock_age_histogram;
use crate::pivot::{category_fields, custom_pivot, numeric_fields};
use crate::ranking::{longest_stock_age, stock_comparison, top_sold_products};

/// Every fixed chart dataset for one record set.
///
/// Built on demand from an immutable snapshot; rebuild after each ingestion
/// instead of patching.
///
/// Datasets:
/// 1. category distribution
/// 2. current vs previous stock (top 25)
/// 3. stock-age histogram
/// 4. average stock age per category
/// 5. top-sold products (top 25)
/// 6. stock value per category
/// 7. longest stock age (top 15)
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub category_distribution: Vec<CategoryCount>,
    pub stock_comparison: Vec<StockComparisonPoint>,
    pub stock_age_histogram: Vec<HistogramBin>,
    pub average_age_by_category: Vec<CategoryAverage>,
    pub top_sold_products: Vec<ProductSales>,
    pub stock_value_by_category: Vec<CategoryValue>,
    pub longest_stock_age: Vec<StockAgePoint>,
    /// Candidate value axes for [`Dashboard::pivot`].
    pub numeric_fields: Vec<String>,
    /// Candidate category axes for [`Dashboard::pivot`].
    pub category_fields: Vec<String>,
}

impl Dashboard {
    pub fn from_set(set: &RecordSet) -> Self {
        let mut dashboard = Self::build(&set.records);
        dashboard.numeric_fields = numeric_fields(&set.headers);
        dashboard.category_fields = category_fields(&set.headers);
        dashboard
    }

    /// Compute the fixed datasets. Pivot axes are left empty; use
    /// [`Dashboard::from_set`] to fill them from the header list.
    pub fn build(records: &[InventoryRecord]) -> Self {
        let dashboard = Self {
            category_distribution: category_distribution(records),
            stock_comparison: stock_comparison(records),
            stock_age_histogram: stock_age_histogram(records),
            average_age_by_category: average_age_by_category(records),
            top_sold_products: top_sold_products(records),
            stock_value_by_category: stock_value_by_category(records),
            longest_stock_age: longest_stock_age(records),
            numeric_fields: Vec::new(),
            category_fields: Vec::new(),
        };
        log::debug!(
            "dashboard built from {} records: {} categories, {} age bins",
            records.len(),
            dashboard.category_distribution.len(),
            dashboard.stock_age_histogram.len()
        );
        dashboard
    }

    /// Sum `value_field` per value of `category_field`.
    pub fn pivot(
        records: &[InventoryRecord],
        category_field: &str,
        value_field: &str,
    ) -> Vec<PivotPoint> {
        custom_pivot(records, category_field, value_field)
    }

    pub fn is_empty(&self) -> bool {
        self.category_distribution.is_empty()
    }
}
