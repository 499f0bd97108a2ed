//! Centralized sizes for the dashboard datasets.
//!
//! Changing a value here changes both the dataset builders and the
//! dashboard snapshot that bundles them.

/// Items shown in the current-vs-previous stock comparison.
pub const STOCK_COMPARISON_LIMIT: usize = 25;

/// Products shown in the top-sold ranking.
pub const TOP_SOLD_LIMIT: usize = 25;

/// Items shown in the longest-stock-age ranking.
pub const LONGEST_STOCK_AGE_LIMIT: usize = 15;

/// Display names longer than this many characters are truncated.
pub const LABEL_MAX_CHARS: usize = 20;

/// Characters kept from a truncated display name, before the ellipsis.
pub const LABEL_KEEP_CHARS: usize = 17;

/// Target number of stock-age histogram bins.
pub const HISTOGRAM_TARGET_BINS: f64 = 10.0;
