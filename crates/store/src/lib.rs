use async_trait::async_trait;
use model::{CounterRecord, Error};
use std::fmt::{Display, Formatter};

/// Read and write the counter record in the backing document store.
///
/// Fetching distinguishes "no record yet" from a backend failure: the first
/// visit finding nothing is an expected outcome, never an error.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn fetch(&self, counter_id: &str) -> Result<CounterFetch, StoreError>;

    /// Insert a record which must not already exist.
    async fn create(&self, record: &CounterRecord) -> Result<(), StoreError>;

    /// Insert-or-overwrite write used to persist an incremented count.
    async fn upsert(&self, record: &CounterRecord) -> Result<(), StoreError>;
}

/// Outcome of fetching the counter record.
#[derive(Debug)]
pub enum CounterFetch {
    Found(CounterRecord),
    NotFound,
}

/// Errors arising from the backing store.
#[derive(Debug)]
pub struct StoreError {
    pub counter_id: String,

    pub operation: StoreOperation,
    pub reason: StoreErrorReason,
}

#[derive(Debug, Clone)]
pub enum StoreOperation {
    Fetch,
    Create,
    Upsert,
}

#[derive(Debug)]
pub enum StoreErrorReason {
    // The stored item was not of the expected shape
    BadRecord(String),
    // An error from the underlying store
    BackendFailure(Error),
}

impl StoreError {
    pub fn new(counter_id: String, operation: StoreOperation, reason: StoreErrorReason) -> Self {
        StoreError {
            counter_id,
            operation,
            reason,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("{:?}", self).as_str())
    }
}

impl std::error::Error for StoreError {}
