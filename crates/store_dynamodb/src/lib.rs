use async_trait::async_trait;
use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::get_item::{GetItemError, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemError, PutItemOutput};
use aws_sdk_dynamodb::types::AttributeValue;
use model::CounterRecord;
use model::env::{COUNTER_TABLE_NAME, DEFAULT_COUNTER_TABLE};
use std::collections::HashMap;
use store::StoreErrorReason::{BackendFailure, BadRecord};
use store::StoreOperation::{Create, Fetch, Upsert};
use store::{CounterFetch, CounterStore, StoreError};

/// Partition key attribute of the counter table.
const ID_KEY: &str = "id";

/// Guard used on first-visit writes so an insert never clobbers a record
/// created by another invocation in the meantime.
const NOT_EXISTS_CONDITION: &str = "attribute_not_exists(id)";

pub struct DynamoDbCounterStore {
    table_name: String,
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl DynamoDbCounterStore {
    pub fn new(dynamodb_client: aws_sdk_dynamodb::Client, table_name: String) -> Self {
        DynamoDbCounterStore {
            table_name,
            dynamodb_client,
        }
    }

    /// Resolve the table name from the environment, falling back to the
    /// default. Table existence is only discovered on the first operation.
    pub fn from_env(dynamodb_client: aws_sdk_dynamodb::Client) -> Self {
        let table_name: String = std::env::var(COUNTER_TABLE_NAME)
            .unwrap_or_else(|_| DEFAULT_COUNTER_TABLE.to_string());

        Self::new(dynamodb_client, table_name)
    }

    async fn get_item(
        &self,
        counter_id: &str,
    ) -> Result<GetItemOutput, SdkError<GetItemError, HttpResponse>> {
        self.dynamodb_client
            .get_item()
            .table_name(self.table_name.as_str())
            .key(ID_KEY, AttributeValue::S(counter_id.to_string()))
            .send()
            .await
    }

    async fn put_item(
        &self,
        item: HashMap<String, AttributeValue>,
        condition_expression: Option<&str>,
    ) -> Result<PutItemOutput, SdkError<PutItemError, HttpResponse>> {
        self.dynamodb_client
            .put_item()
            .table_name(self.table_name.as_str())
            .set_item(Some(item))
            .set_condition_expression(condition_expression.map(String::from))
            .send()
            .await
    }
}

#[async_trait]
impl CounterStore for DynamoDbCounterStore {
    async fn fetch(&self, counter_id: &str) -> Result<CounterFetch, StoreError> {
        let output: GetItemOutput = self.get_item(counter_id).await.map_err(|err| {
            StoreError::new(counter_id.to_string(), Fetch, BackendFailure(err.into()))
        })?;

        // A missing item is the expected first-visit outcome. A missing
        // table surfaces above as an SDK error instead.
        let item: HashMap<String, AttributeValue> = match output.item {
            Some(item) => item,
            None => return Ok(CounterFetch::NotFound),
        };

        let record: CounterRecord = serde_dynamo::from_item(item).map_err(|err| {
            StoreError::new(counter_id.to_string(), Fetch, BadRecord(err.to_string()))
        })?;

        Ok(CounterFetch::Found(record))
    }

    async fn create(&self, record: &CounterRecord) -> Result<(), StoreError> {
        let item: HashMap<String, AttributeValue> = serde_dynamo::to_item(record)
            .map_err(|err| StoreError::new(record.id.clone(), Create, BadRecord(err.to_string())))?;

        self.put_item(item, Some(NOT_EXISTS_CONDITION))
            .await
            .map_err(|err| {
                StoreError::new(record.id.clone(), Create, BackendFailure(err.into()))
            })?;

        Ok(())
    }

    async fn upsert(&self, record: &CounterRecord) -> Result<(), StoreError> {
        let item: HashMap<String, AttributeValue> = serde_dynamo::to_item(record)
            .map_err(|err| StoreError::new(record.id.clone(), Upsert, BadRecord(err.to_string())))?;

        self.put_item(item, None).await.map_err(|err| {
            StoreError::new(record.id.clone(), Upsert, BackendFailure(err.into()))
        })?;

        Ok(())
    }
}
