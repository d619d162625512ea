//! Record store boundary.
//!
//! Each collection is fetched wholesale and filtered in memory; the store
//! only does CRUD plus id assignment. Two interchangeable backings implement
//! the same contract: a seeded in-memory store with simulated latency
//! ([`MemoryStore`]) and a remote record-service client ([`RemoteStore`]).

pub mod memory;
pub mod remote;

pub use memory::MemoryStore;
pub use remote::{BatchFailure, BatchOutcome, RemoteRecord, RemoteStore};

use thiserror::Error;

/// Store-assigned record identifier: unique per collection, monotonically
/// increasing, never reused within a session.
pub type RecordId = u32;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("invalid value for {field}: {value}")]
    InvalidField { field: String, value: String },

    #[error("record service request failed: {0}")]
    Backend(String),

    #[error("record service rejected {entity}: {reason}")]
    Rejected {
        entity: &'static str,
        reason: String,
    },
}

/// One record in a tracked collection.
pub trait Record: Clone + Send + Sync + 'static {
    /// Entity label used in errors and logs.
    const ENTITY: &'static str;

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);
}

/// CRUD contract shared by every backing, per collection.
///
/// `create` assigns the next id (caller-supplied ids are ignored); `update`
/// keeps the stored id regardless of what `record` carries; reads return
/// clones, so callers never observe internal mutation.
#[allow(async_fn_in_trait)]
pub trait RecordStore<R: Record> {
    async fn get_all(&self) -> Result<Vec<R>, StoreError>;

    async fn get_by_id(&self, id: RecordId) -> Result<R, StoreError>;

    async fn create(&self, record: R) -> Result<R, StoreError>;

    async fn update(&self, id: RecordId, record: R) -> Result<R, StoreError>;

    async fn delete(&self, id: RecordId) -> Result<bool, StoreError>;
}
