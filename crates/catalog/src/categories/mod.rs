//! Per-game category taxonomy: cached CSV reference table and id lookup

pub mod cache;
pub mod table;

pub use cache::{ensure_category_cache, CacheEntry};
pub use table::{
    read_category_entries, write_category_table, CategoryEntry, CategoryTable, UNKNOWN_CATEGORY,
};
