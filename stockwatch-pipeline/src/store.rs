//! Persistence port for the current record set.
//!
//! The store is an external collaborator: ingestion only needs a way to
//! clear a namespace, write keyed records and read them back. Replace-all
//! is delete-then-write and is not transactional.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::types::{InventoryRecord, RecordSet};
use crate::util;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Delete every record in `namespace`. Returns how many were removed.
    async fn clear(&self, namespace: &str) -> StoreResult<usize>;

    /// Write `record` under `key`, overwriting any existing record.
    async fn put(&self, namespace: &str, key: &str, record: InventoryRecord) -> StoreResult<()>;

    /// All records in `namespace`.
    async fn load(&self, namespace: &str) -> StoreResult<Vec<InventoryRecord>>;

    /// Current records with their canonical header list.
    async fn snapshot(&self, namespace: &str) -> StoreResult<RecordSet> {
        Ok(RecordSet::from_records(self.load(namespace).await?))
    }

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

/// Replace the contents of `namespace` with `records`.
///
/// Best effort: a failure part way through leaves the namespace partially
/// written and already-deleted records are not restored.
pub async fn replace_all<S: RecordStore + ?Sized>(
    store: &S,
    namespace: &str,
    records: &[InventoryRecord],
) -> StoreResult<usize> {
    let removed = store.clear(namespace).await?;
    log::info!(
        "{}: cleared {} existing records from '{}'",
        store.name(),
        removed,
        namespace
    );

    for record in records {
        store.put(namespace, &record.key, record.clone()).await?;
    }
    log::info!(
        "{}: wrote {} records to '{}'",
        store.name(),
        records.len(),
        namespace
    );
    Ok(records.len())
}

#[derive(Default)]
struct Collection {
    order: Vec<String>,
    docs: HashMap<String, InventoryRecord>,
}

/// In-process store keeping records per namespace in first-write order.
#[derive(Default)]
pub struct MemoryStore {
    namespaces: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .await
            .get(namespace)
            .map(|c| c.order.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn clear(&self, namespace: &str) -> StoreResult<usize> {
        let removed = self.namespaces.write().await.remove(namespace);
        Ok(removed.map(|c| c.order.len()).unwrap_or(0))
    }

    async fn put(&self, namespace: &str, key: &str, record: InventoryRecord) -> StoreResult<()> {
        let mut namespaces = self.namespaces.write().await;
        let collection = namespaces.entry(namespace.to_string()).or_default();
        if collection.docs.insert(key.to_string(), record).is_none() {
            collection.order.push(key.to_string());
        }
        Ok(())
    }

    async fn load(&self, namespace: &str) -> StoreResult<Vec<InventoryRecord>> {
        let namespaces = self.namespaces.read().await;
        let Some(collection) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };
        collection
            .order
            .iter()
            .map(|key| {
                collection.docs.get(key).cloned().ok_or_else(|| {
                    StoreError::Unavailable(format!("index out of sync for key '{}'", key))
                })
            })
            .collect()
    }
}
