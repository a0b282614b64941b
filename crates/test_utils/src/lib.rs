use async_trait::async_trait;
use aws_lambda_events::apigw::ApiGatewayV2httpRequest;
use aws_sdk_dynamodb::operation::get_item::GetItemOutput;
use aws_sdk_dynamodb::operation::put_item::PutItemOutput;
use aws_smithy_mocks::{Rule, RuleMode, mock, mock_client};
use lambda_runtime::{Context, LambdaEvent};
use model::CounterRecord;
use model::env::COUNTER_TABLE_NAME;
use std::env;
use store::StoreErrorReason::BackendFailure;
use store::{CounterFetch, CounterStore, StoreError};
use store_in_memory::InMemoryCounterStore;

/// Test table value
pub const TEST_TABLE: &str = "counters_test";

/// Setup default environment variables used in testing
pub fn setup_default_env() {
    unsafe {
        env::set_var(COUNTER_TABLE_NAME, TEST_TABLE);
    }
}

/// Create a dummy inbound event for the counter route
pub fn view_counter_event() -> LambdaEvent<ApiGatewayV2httpRequest> {
    LambdaEvent::new(ApiGatewayV2httpRequest::default(), Context::default())
}

/// A default mock DynamoDB client: reads find nothing, writes are accepted
pub fn create_mock_dynamodb_client() -> aws_sdk_dynamodb::Client {
    let get_item_rule: Rule = mock!(aws_sdk_dynamodb::Client::get_item)
        .match_requests(|_| true)
        .sequence()
        .output(|| GetItemOutput::builder().build())
        .repeatedly()
        .build();

    let put_item_rule: Rule = mock!(aws_sdk_dynamodb::Client::put_item)
        .match_requests(|_| true)
        .sequence()
        .output(|| PutItemOutput::builder().build())
        .repeatedly()
        .build();

    mock_client!(
        aws_sdk_dynamodb,
        RuleMode::MatchAny,
        [&get_item_rule, &put_item_rule]
    )
}

/// A counter store with injectable failures, wrapping an in-memory store.
/// Operations not selected for failure pass through, so tests can still
/// observe what was (or was not) persisted.
pub struct FailingCounterStore {
    inner: InMemoryCounterStore,
    fail_fetch: bool,
    fail_writes: bool,
}

impl FailingCounterStore {
    /// Fails every fetch, as when the backend is unreachable at read time
    pub fn failing_fetch() -> Self {
        FailingCounterStore {
            inner: InMemoryCounterStore::default(),
            fail_fetch: true,
            fail_writes: false,
        }
    }

    /// Fails every write while leaving reads working
    pub fn failing_writes() -> Self {
        FailingCounterStore {
            inner: InMemoryCounterStore::default(),
            fail_fetch: false,
            fail_writes: true,
        }
    }

    /// The wrapped store, for seeding and inspecting records directly
    pub fn inner(&self) -> &InMemoryCounterStore {
        &self.inner
    }

    fn injected(counter_id: &str, operation: store::StoreOperation) -> StoreError {
        StoreError::new(
            counter_id.to_string(),
            operation,
            BackendFailure("injected backend failure".into()),
        )
    }
}

#[async_trait]
impl CounterStore for FailingCounterStore {
    async fn fetch(&self, counter_id: &str) -> Result<CounterFetch, StoreError> {
        if self.fail_fetch {
            return Err(Self::injected(counter_id, store::StoreOperation::Fetch));
        }

        self.inner.fetch(counter_id).await
    }

    async fn create(&self, record: &CounterRecord) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(Self::injected(&record.id, store::StoreOperation::Create));
        }

        self.inner.create(record).await
    }

    async fn upsert(&self, record: &CounterRecord) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(Self::injected(&record.id, store::StoreOperation::Upsert));
        }

        self.inner.upsert(record).await
    }
}
