pub mod category_filter;
pub mod column_sorter;
pub mod search_filter;
