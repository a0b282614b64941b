use aws_config::BehaviorVersion;
use aws_lambda_events::apigw::ApiGatewayV2httpRequest;
use handler::handle_view_count;
use lambda_runtime::{LambdaEvent, service_fn, tracing};
use model::Error;
use store_dynamodb::DynamoDbCounterStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    // Constructed once at startup and shared across warm invocations, so
    // the connection pool is reused instead of rebuilt per request
    let dynamodb_client: aws_sdk_dynamodb::Client = aws_sdk_dynamodb::Client::new(
        &aws_config::load_defaults(BehaviorVersion::latest()).await,
    );
    let store: DynamoDbCounterStore = DynamoDbCounterStore::from_env(dynamodb_client);

    lambda_runtime::run(service_fn(
        async |event: LambdaEvent<ApiGatewayV2httpRequest>| {
            handle_view_count(&store, event).await
        },
    ))
    .await
}
