use stockwatch_pipeline::InventoryRecord;

use crate::limits::{LABEL_KEEP_CHARS, LABEL_MAX_CHARS};

/// Display name for records with neither a name nor a code.
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Grouping name for sales of records without a name.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Item name, falling back to the item code.
pub fn display_name(record: &InventoryRecord) -> &str {
    record
        .item_name()
        .or_else(|| record.item_code())
        .unwrap_or(UNKNOWN_ITEM)
}

/// Shorten names over `LABEL_MAX_CHARS` characters to `LABEL_KEEP_CHARS`
/// characters plus an ellipsis.
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let kept: String = name.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{}...", kept)
    } else {
        name.to_string()
    }
}
