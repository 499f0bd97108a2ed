use serde::Serialize;

// ---------------------------------------------------------------------------
// Category datasets
// ---------------------------------------------------------------------------

/// Number of records in one category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: usize,
}

/// Mean stock age (days) of one category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryAverage {
    pub name: String,
    pub average_age: f64,
}

/// Total stock value (current stock x unit price) of one category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryValue {
    pub name: String,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Ranked datasets
// ---------------------------------------------------------------------------

/// One bar pair of the stock comparison chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockComparisonPoint {
    /// Display name, truncated for the axis.
    pub name: String,
    /// Untruncated name for the tooltip.
    pub full_name: String,
    pub previous_stock: f64,
    pub current_stock: f64,
}

/// Total outflow of one product.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductSales {
    pub name: String,
    pub quantity_sold: f64,
}

/// One bar of the longest-stock-age chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockAgePoint {
    pub name: String,
    pub full_name: String,
    pub age_days: f64,
}

// ---------------------------------------------------------------------------
// Histogram and pivot
// ---------------------------------------------------------------------------

/// One non-empty stock-age bin.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    /// `"{start}-{end}"` label.
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Sum of a numeric field for one value of a category field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PivotPoint {
    pub category: String,
    pub value: f64,
}
