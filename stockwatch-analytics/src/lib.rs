//! Chart datasets derived from an inventory record set.
//!
//! Every function here is pure and total: it reads a record slice, never
//! mutates it, and returns an empty dataset for empty input.

mod buckets;

pub mod category;
pub mod dashboard;
pub mod datasets;
pub mod histogram;
pub mod labels;
pub mod limits;
pub mod pivot;
pub mod ranking;

pub use category::{average_age_by_category, category_distribution, stock_value_by_category};
pub use dashboard::Dashboard;
pub use datasets::{
    CategoryAverage, CategoryCount, CategoryValue, HistogramBin, PivotPoint, ProductSales,
    StockAgePoint, StockComparisonPoint,
};
pub use histogram::stock_age_histogram;
pub use labels::{display_name, truncate_label};
pub use pivot::{category_fields, custom_pivot, numeric_fields};
pub use ranking::{longest_stock_age, stock_comparison, top_sold_products, TopN};
