use aws_lambda_events::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use aws_lambda_events::encodings::Body;
use aws_lambda_events::http::{HeaderMap, HeaderValue, header};
use lambda_runtime::{LambdaEvent, tracing};
use model::{COUNTER_ID, CountResponse, CounterRecord, Error, ErrorResponse};
use serde::Serialize;
use store::{CounterFetch, CounterStore, StoreError};

/// Message returned to callers on any store failure.
/// The underlying error stays in the logs.
const DATABASE_ERROR: &str = "Database error";

/// Handles `GET /api/view-counter`.
///
/// Reads the current page-view count from the backing store, increments it
/// by 1, persists the new value and returns it as JSON. Store failures map
/// to a 500 with a generic body rather than failing the invocation, so the
/// platform does not retry.
pub async fn handle_view_count(
    store: &dyn CounterStore,
    _event: LambdaEvent<ApiGatewayV2httpRequest>,
) -> Result<ApiGatewayV2httpResponse, Error> {
    tracing::info!("Handling view counter request");

    match increment(store).await {
        Ok(count) => {
            tracing::info!("View count updated to {count}");

            json_response(200, &CountResponse { count })
        }
        Err(err) => {
            tracing::error!("Store error incrementing view count: {err}");

            json_response(
                500,
                &ErrorResponse {
                    error: DATABASE_ERROR.to_string(),
                },
            )
        }
    }
}

/// Read-increment-write against the single counter record.
///
/// The write is not conditional on the value read: two concurrent
/// invocations can read the same count and both persist the same
/// incremented value, dropping one increment.
async fn increment(store: &dyn CounterStore) -> Result<u64, StoreError> {
    match store.fetch(COUNTER_ID).await? {
        CounterFetch::Found(record) => {
            let record: CounterRecord = record.incremented();
            store.upsert(&record).await?;

            Ok(record.count)
        }
        CounterFetch::NotFound => {
            // First-ever visit: self-initialize so the table never needs
            // manual seeding
            tracing::info!("Counter record not found, initializing at 1");

            let record: CounterRecord = CounterRecord::first(COUNTER_ID);
            store.create(&record).await?;

            Ok(record.count)
        }
    }
}

fn json_response<T: Serialize>(
    status_code: i64,
    body: &T,
) -> Result<ApiGatewayV2httpResponse, Error> {
    let mut headers: HeaderMap = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Ok(ApiGatewayV2httpResponse {
        status_code,
        headers,
        body: Some(Body::Text(serde_json::to_string(body)?)),
        ..Default::default()
    })
}
