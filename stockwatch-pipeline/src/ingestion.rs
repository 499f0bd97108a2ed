//! CSV ingestion: parse, coerce, derive thresholds, replace the store.
//!
//! Pipeline flow:
//! 1. `CsvDocument` splits the text and reads the header (fatal if empty)
//! 2. each data line is read, coerced and given a `MinStockThreshold`
//! 3. records are keyed by item code, or a generated key
//! 4. the namespace is cleared and every record written (replace-all)
//!
//! Nothing touches the store until every line has been processed.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::config::IngestConfig;
use crate::csv_parser::{CsvDocument, LineOutcome, SkippedRow};
use crate::error::IngestResult;
use crate::field_coercer::coerce_row;
use crate::progress::ProgressObserver;
use crate::store::{replace_all, RecordStore};
use crate::thresholds::apply_threshold;
use crate::types::{canonical_headers, fields, FieldValue, InventoryRecord};

/// Outcome of a successful ingestion run.
#[derive(Clone, Debug, Serialize)]
pub struct IngestReport {
    pub namespace: String,
    /// Rows accepted and written (duplicates included).
    pub records_written: usize,
    /// Rows dropped for a field-count mismatch.
    pub skipped_rows: Vec<SkippedRow>,
    /// Item codes that appeared more than once; the last row wins.
    pub duplicate_keys: Vec<String>,
    /// Rows keyed by the identity fallback.
    pub generated_keys: usize,
    /// Canonical headers of the derived record set.
    pub headers: Vec<String>,
}

impl IngestReport {
    pub fn distinct_records(&self) -> usize {
        self.records_written - self.duplicate_keys.len()
    }
}

/// Records derived from one CSV document, before persistence.
#[derive(Clone, Debug, Default)]
pub struct DerivedBatch {
    pub records: Vec<InventoryRecord>,
    pub skipped_rows: Vec<SkippedRow>,
    pub duplicate_keys: Vec<String>,
    pub generated_keys: usize,
}

pub struct IngestionPipeline<S: RecordStore> {
    store: Arc<S>,
    config: IngestConfig,
    observers: Vec<Box<dyn ProgressObserver>>,
}

impl<S: RecordStore> IngestionPipeline<S> {
    pub fn new(store: Arc<S>, config: IngestConfig) -> Self {
        Self {
            store,
            config,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Ingest `csv_text`, replacing the configured namespace.
    ///
    /// Only one ingestion per namespace should run at a time; the pipeline
    /// does not lock the store.
    pub async fn ingest(&self, csv_text: &str) -> IngestResult<IngestReport> {
        let document = CsvDocument::parse(csv_text)?;
        let batch = self.derive(&document).await;

        if !batch.skipped_rows.is_empty() {
            log::warn!(
                "{} of {} data lines skipped for field-count mismatch",
                batch.skipped_rows.len(),
                document.data_line_count()
            );
        }

        let namespace = &self.config.store_namespace;
        let written = replace_all(self.store.as_ref(), namespace, &batch.records).await?;

        Ok(IngestReport {
            namespace: namespace.clone(),
            records_written: written,
            headers: canonical_headers(&batch.records),
            skipped_rows: batch.skipped_rows,
            duplicate_keys: batch.duplicate_keys,
            generated_keys: batch.generated_keys,
        })
    }

    /// Read every data line of `document` into records, reporting progress
    /// and yielding to the scheduler between lines.
    pub async fn derive(&self, document: &CsvDocument<'_>) -> DerivedBatch {
        let total = document.data_line_count();
        let mut keys = self.config.key_generator();
        let mut seen = HashSet::new();
        let mut batch = DerivedBatch::default();

        for index in 0..total {
            for observer in &self.observers {
                observer.on_progress(index + 1, total);
            }
            tokio::task::yield_now().await;

            let row = match document.read_line(index) {
                LineOutcome::Row(row) => row,
                LineOutcome::Skipped(skipped) => {
                    batch.skipped_rows.push(skipped);
                    continue;
                }
                LineOutcome::Blank => continue,
            };

            let mut values = coerce_row(&row);
            apply_threshold(&mut values);

            let key = match values.get(fields::ITEM_CODE).map(FieldValue::to_string) {
                Some(code) if !code.is_empty() => code,
                _ => {
                    batch.generated_keys += 1;
                    keys.next_key(row.line)
                }
            };
            if !seen.insert(key.clone()) {
                log::warn!("line {}: duplicate item code '{}' overwrites earlier row", row.line, key);
                batch.duplicate_keys.push(key.clone());
            }

            batch.records.push(InventoryRecord::new(key, values));
        }

        batch
    }
}
