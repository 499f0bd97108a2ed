//! Spare-parts inventory ingestion and table view.
//!
//! Raw CSV text goes through the parser, the field coercer and the threshold
//! calculator, and the resulting record set replaces the contents of a
//! [`RecordStore`] namespace. The table view engine turns a record set into
//! filtered, sorted and optionally grouped rows without modifying it.

pub mod components;
pub mod config;
pub mod csv_parser;
pub mod error;
pub mod export;
pub mod field_coercer;
pub mod filter;
pub mod ingestion;
pub mod progress;
pub mod selector;
pub mod store;
pub mod table_view;
pub mod thresholds;
pub mod types;
pub mod util;

pub use config::{IdentityFallback, IngestConfig};
pub use csv_parser::{parse_csv, CsvDocument, ParsedCsv, RawRow, SkippedRow};
pub use error::{ExportError, IngestError, IngestResult, StoreError, StoreResult};
pub use export::{export_csv, export_csv_file};
pub use ingestion::{IngestReport, IngestionPipeline};
pub use progress::{LogProgress, ProgressObserver};
pub use store::{replace_all, MemoryStore, RecordStore};
pub use table_view::{
    category_options, title_case, GroupState, SortDirection, SortKey, SortSpec, TableQuery,
    TableRow, TableView, TableViewEngine,
};
pub use thresholds::{classify_stock, min_stock_threshold, StockStatus};
pub use types::{canonical_headers, fields, FieldValue, InventoryRecord, RecordSet};
