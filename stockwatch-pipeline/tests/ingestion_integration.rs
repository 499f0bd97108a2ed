use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use stockwatch_pipeline::error::StoreResult;
use stockwatch_pipeline::{
    export_csv, fields, IdentityFallback, IngestConfig, IngestError, IngestionPipeline,
    InventoryRecord, MemoryStore, RecordStore, SortDirection, SortKey, SortSpec, StockStatus,
    StoreError, TableQuery, TableView, TableViewEngine,
};

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

const NAMESPACE: &str = "it/spare-parts";

/// Six parts across three categories: two quoted prices, one part without
/// an item code, one short row.
const INVENTORY_CSV: &str = "\
No.,Kode Barang,Nama Barang,Kategori,Satuan,Stock Sebelumnya,Stock Sekarang,Stock Keluar,Harga Satuan\r
1,SP-001,Oil Filter,Filter,pcs,20,10,-4,\"25,000\"\r
2,SP-002,Air Filter,filter,pcs,8,8,0,\"40,000\"\r
\r
3,SP-003,V-Belt,Drive,pcs,5,0,20,15000\r
4,,Gasket Set,Seal,set,3,2,1,5000\r
5,SP-005,Bearing 6205,Drive,pcs\r
6,SP-006,\"Bearing 6206, sealed\",Drive,pcs,12,30,6,30000\r
";

fn config() -> IngestConfig {
    IngestConfig {
        store_namespace: NAMESPACE.into(),
        identity_fallback: IdentityFallback::Random,
        identity_seed: Some(7),
    }
}

/// Memory store that fails the `fail_on`-th write (1-based).
struct FlakyStore {
    inner: MemoryStore,
    puts: AtomicUsize,
    fail_on: usize,
}

impl FlakyStore {
    fn new(fail_on: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            puts: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn clear(&self, namespace: &str) -> StoreResult<usize> {
        self.inner.clear(namespace).await
    }

    async fn put(&self, namespace: &str, key: &str, record: InventoryRecord) -> StoreResult<()> {
        let n = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_on {
            return Err(StoreError::WriteFailed {
                key: key.to_string(),
                reason: "quota exceeded".into(),
            });
        }
        self.inner.put(namespace, key, record).await
    }

    async fn load(&self, namespace: &str) -> StoreResult<Vec<InventoryRecord>> {
        self.inner.load(namespace).await
    }
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ingest_replaces_namespace_with_derived_records() {
    let store = Arc::new(MemoryStore::new());
    let mut stale = InventoryRecord::new("OLD-1", Default::default());
    stale.insert(fields::ITEM_NAME, "Discontinued");
    store.put(NAMESPACE, "OLD-1", stale).await.unwrap();

    let pipeline = IngestionPipeline::new(Arc::clone(&store), config());
    let report = pipeline.ingest(INVENTORY_CSV).await.unwrap();

    assert_eq!(report.records_written, 5);
    assert_eq!(report.generated_keys, 1);
    assert_eq!(report.skipped_rows.len(), 1);
    assert_eq!(report.skipped_rows[0].expected, 9);
    assert_eq!(report.skipped_rows[0].found, 5);

    let set = store.snapshot(NAMESPACE).await.unwrap();
    assert_eq!(set.len(), 5);
    assert!(set.records.iter().all(|r| r.key != "OLD-1"));
    assert!(set
        .records
        .iter()
        .all(|r| r.min_stock_threshold().is_some()));

    let generated = &set.records[3];
    assert_eq!(generated.item_name(), Some("Gasket Set"));
    assert_eq!(generated.key.len(), 20);

    let bearing = &set.records[4];
    assert_eq!(bearing.item_name(), Some("Bearing 6206, sealed"));
    assert_eq!(bearing.number(fields::UNIT_PRICE), Some(30_000.0));

    // fixed columns first, unknown ones after
    assert_eq!(
        set.headers[..4],
        [fields::ROW_NUMBER, fields::ITEM_CODE, fields::ITEM_NAME, fields::CATEGORY]
    );
    assert_eq!(set.headers[8], fields::MIN_STOCK_THRESHOLD);
    assert_eq!(set.headers.last().map(String::as_str), Some(fields::STOCK_OUT));
}

#[tokio::test]
async fn seeded_fallback_keys_are_reproducible() {
    let first = IngestionPipeline::new(Arc::new(MemoryStore::new()), config());
    let second = IngestionPipeline::new(Arc::new(MemoryStore::new()), config());
    first.ingest(INVENTORY_CSV).await.unwrap();
    second.ingest(INVENTORY_CSV).await.unwrap();

    let a = first.store().snapshot(NAMESPACE).await.unwrap();
    let b = second.store().snapshot(NAMESPACE).await.unwrap();
    assert_eq!(a.records[3].key, b.records[3].key);
}

#[tokio::test]
async fn header_only_input_is_fatal_and_leaves_store_alone() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = IngestionPipeline::new(Arc::clone(&store), config());
    pipeline.ingest(INVENTORY_CSV).await.unwrap();

    let err = pipeline
        .ingest("\n\nNo.,Kode Barang,Nama Barang\n  \n")
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::EmptyOrMalformedInput(_)));
    assert_eq!(store.count(NAMESPACE).await, 5);
}

#[tokio::test]
async fn write_failure_is_surfaced_after_partial_replace() {
    let store = Arc::new(FlakyStore::new(8));
    let pipeline = IngestionPipeline::new(Arc::clone(&store), config());
    pipeline.ingest(INVENTORY_CSV).await.unwrap();

    // the third write of the second run fails
    let err = pipeline.ingest(INVENTORY_CSV).await.unwrap_err();
    match err {
        IngestError::Persistence(StoreError::WriteFailed { key, .. }) => assert_eq!(key, "SP-003"),
        other => panic!("unexpected error: {other}"),
    }
    // previous records were cleared and not restored
    assert_eq!(store.inner.count(NAMESPACE).await, 2);
}

// ---------------------------------------------------------------------------
// Table view over ingested data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn table_view_over_ingested_snapshot() {
    let store = Arc::new(MemoryStore::new());
    IngestionPipeline::new(Arc::clone(&store), config())
        .ingest(INVENTORY_CSV)
        .await
        .unwrap();
    let set = store.snapshot(NAMESPACE).await.unwrap();
    let engine = TableViewEngine::new();

    let by_status = TableQuery {
        sort: Some(SortSpec {
            key: SortKey::Status,
            direction: SortDirection::Ascending,
        }),
        ..TableQuery::default()
    };
    let view = engine.render(&set.records, &by_status);
    let statuses: Vec<StockStatus> = view.rows().iter().filter_map(|r| r.status).collect();
    assert_eq!(statuses[0], StockStatus::OutOfStock);
    assert!(statuses.windows(2).all(|w| w[0] <= w[1]));

    let filters = TableQuery {
        category: "Filter".into(),
        group_by_category: true,
        ..TableQuery::default()
    };
    let TableView::Grouped(groups) = engine.render(&set.records, &filters) else {
        panic!("expected grouped view");
    };
    let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(names, vec!["Filter", "filter"]);

    // grouping then flattening keeps every filtered row
    let flat = engine.render(
        &set.records,
        &TableQuery {
            group_by_category: false,
            ..filters.clone()
        },
    );
    let grouped = engine.render(&set.records, &filters);
    let mut flat_keys: Vec<_> = flat.rows().iter().map(|r| r.record.key.clone()).collect();
    let mut grouped_keys: Vec<_> = grouped.rows().iter().map(|r| r.record.key.clone()).collect();
    flat_keys.sort();
    grouped_keys.sort();
    assert_eq!(flat_keys, grouped_keys);
}

#[tokio::test]
async fn export_round_trips_through_ingestion() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = IngestionPipeline::new(Arc::clone(&store), config());
    pipeline.ingest(INVENTORY_CSV).await.unwrap();
    let set = store.snapshot(NAMESPACE).await.unwrap();

    let mut buffer = Vec::new();
    export_csv(&set, &mut buffer).unwrap();
    let exported = String::from_utf8(buffer).unwrap();
    assert!(exported.contains("\"Bearing 6206, sealed\""));

    let again = IngestionPipeline::new(Arc::new(MemoryStore::new()), config());
    let report = again.ingest(&exported).await.unwrap();
    assert_eq!(report.records_written, 5);
    assert!(report.skipped_rows.is_empty());

    let reloaded = again.store().snapshot(NAMESPACE).await.unwrap();
    let thresholds: Vec<_> = reloaded
        .records
        .iter()
        .map(|r| r.min_stock_threshold())
        .collect();
    let original: Vec<_> = set.records.iter().map(|r| r.min_stock_threshold()).collect();
    assert_eq!(thresholds, original);
}
