//! In-memory record store with simulated latency.
//!
//! Backs a collection with a plain `Vec` seeded from fixture data; every
//! operation sleeps its latency class first so view code exercises the same
//! loading states it would against the remote service.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::sleep;

use super::{Record, RecordId, RecordStore, StoreError};
use crate::config;

#[derive(Debug)]
pub struct MemoryStore<R: Record> {
    records: Mutex<Vec<R>>,
    read_latency: Duration,
    write_latency: Duration,
}

impl<R: Record> MemoryStore<R> {
    /// An empty store with the default simulated latency.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// A store seeded from fixture records, default simulated latency.
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
            read_latency: Duration::from_millis(config::MOCK_READ_LATENCY_MS),
            write_latency: Duration::from_millis(config::MOCK_WRITE_LATENCY_MS),
        }
    }

    /// A seeded store with zero latency, for tests and previews.
    pub fn instant(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
            read_latency: Duration::ZERO,
            write_latency: Duration::ZERO,
        }
    }

    /// New id = max existing + 1, or 1 when the collection is empty.
    fn next_id(records: &[R]) -> RecordId {
        records.iter().map(Record::id).max().unwrap_or(0) + 1
    }

    fn lock(&self) -> MutexGuard<'_, Vec<R>> {
        // Single logical thread; a poisoned lock only means a panicking test.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> for MemoryStore<R> {
    async fn get_all(&self) -> Result<Vec<R>, StoreError> {
        sleep(self.read_latency).await;
        Ok(self.lock().clone())
    }

    async fn get_by_id(&self, id: RecordId) -> Result<R, StoreError> {
        sleep(self.read_latency).await;
        self.lock()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: R::ENTITY,
                id,
            })
    }

    async fn create(&self, mut record: R) -> Result<R, StoreError> {
        sleep(self.write_latency).await;
        let mut records = self.lock();
        record.set_id(Self::next_id(&records));
        records.push(record.clone());
        tracing::info!(entity = R::ENTITY, id = record.id(), "record created");
        Ok(record)
    }

    async fn update(&self, id: RecordId, mut record: R) -> Result<R, StoreError> {
        sleep(self.write_latency).await;
        let mut records = self.lock();
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound {
                entity: R::ENTITY,
                id,
            })?;
        // Id is immutable; the addressed id wins over whatever came in.
        record.set_id(id);
        *slot = record.clone();
        tracing::debug!(entity = R::ENTITY, id, "record updated");
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        sleep(self.write_latency).await;
        let mut records = self.lock();
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound {
                entity: R::ENTITY,
                id,
            })?;
        records.remove(index);
        tracing::info!(entity = R::ENTITY, id, "record deleted");
        Ok(true)
    }
}
