use async_trait::async_trait;
use model::CounterRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use store::StoreErrorReason::BackendFailure;
use store::StoreOperation::Create;
use store::{CounterFetch, CounterStore, StoreError};

/// Counter storage backed by a map, for tests and local runs.
pub struct InMemoryCounterStore {
    records: Arc<Mutex<HashMap<String, CounterRecord>>>,
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        InMemoryCounterStore {
            records: Arc::new(Mutex::new(Default::default())),
        }
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn fetch(&self, counter_id: &str) -> Result<CounterFetch, StoreError> {
        let guard = self.records.lock().unwrap();

        let fetch: CounterFetch = match guard.get(counter_id) {
            Some(record) => CounterFetch::Found(record.clone()),
            None => CounterFetch::NotFound,
        };

        Ok(fetch)
    }

    async fn create(&self, record: &CounterRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().unwrap();

        // Mirrors the conditional insert of the real backend
        if guard.contains_key(&record.id) {
            return Err(StoreError::new(
                record.id.clone(),
                Create,
                BackendFailure("record already exists".into()),
            ));
        }

        guard.insert(record.id.clone(), record.clone());

        Ok(())
    }

    async fn upsert(&self, record: &CounterRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::COUNTER_ID;

    #[tokio::test]
    async fn fetch_of_missing_record_is_not_found() {
        let store: InMemoryCounterStore = InMemoryCounterStore::default();

        let fetch: CounterFetch = store.fetch(COUNTER_ID).await.unwrap();

        assert!(matches!(fetch, CounterFetch::NotFound));
    }

    #[tokio::test]
    async fn created_record_can_be_fetched() {
        let store: InMemoryCounterStore = InMemoryCounterStore::default();
        let record: CounterRecord = CounterRecord::first(COUNTER_ID);

        store.create(&record).await.unwrap();

        match store.fetch(COUNTER_ID).await.unwrap() {
            CounterFetch::Found(found) => assert_eq!(record, found),
            CounterFetch::NotFound => panic!("Expected the created record"),
        }
    }

    #[tokio::test]
    async fn create_fails_for_existing_record() {
        let store: InMemoryCounterStore = InMemoryCounterStore::default();
        let record: CounterRecord = CounterRecord::first(COUNTER_ID);

        store.create(&record).await.unwrap();

        store
            .create(&record)
            .await
            .expect_err("A second insert should fail");
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_record() {
        let store: InMemoryCounterStore = InMemoryCounterStore::default();

        store.create(&CounterRecord::first(COUNTER_ID)).await.unwrap();
        store
            .upsert(&CounterRecord {
                id: COUNTER_ID.to_string(),
                count: 9,
            })
            .await
            .unwrap();

        match store.fetch(COUNTER_ID).await.unwrap() {
            CounterFetch::Found(found) => assert_eq!(9, found.count),
            CounterFetch::NotFound => panic!("Expected the overwritten record"),
        }
    }
}
