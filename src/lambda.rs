use aws_config::BehaviorVersion;
use aws_lambda_events::event::sqs::{BatchItemFailure, SqsBatchResponse, SqsEvent};
use aws_sdk_sqs::Client as SqsClient;
use catalog_sync::adapters::QueuePublisher;
use catalog_sync::core::message::QueueMessage;
use catalog_sync::utils::{logger, validation::Validate};
use catalog_sync::{
    CatalogIqClient, CatalogPipeline, HttpImageFetcher, OdooClient, SyncConfig, SyncEngine,
    SyncError,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

async fn function_handler(
    sqs: &SqsClient,
    event: LambdaEvent<SqsEvent>,
) -> Result<SqsBatchResponse, Error> {
    tracing::info!(
        "Starting catalog sync for {} message(s)",
        event.payload.records.len()
    );

    let config = SyncConfig::from_env()?;
    config.validate()?;

    let publisher = QueuePublisher::new(sqs.clone(), config.queue_url.as_deref());

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(SyncError::from)?;
    let source = CatalogIqClient::from_config(http.clone(), &config);
    let odoo = OdooClient::from_config(http, &config).await?;
    let images = HttpImageFetcher::new(config.image_timeout)?;

    let engine = SyncEngine::new(CatalogPipeline::new(
        source, odoo, images, publisher, config,
    ));

    let messages: Vec<QueueMessage<'_>> = event
        .payload
        .records
        .iter()
        .map(|record| QueueMessage {
            id: record.message_id.as_deref().unwrap_or_default(),
            body: record.body.as_deref(),
        })
        .collect();
    let outcome = engine.run_batch(&messages).await;

    tracing::info!(
        synced = outcome.reports.len(),
        failed = outcome.failed_message_ids.len(),
        "Catalog sync completed"
    );

    let mut response = SqsBatchResponse::default();
    for id in outcome.failed_message_ids {
        let mut failure = BatchItemFailure::default();
        failure.item_identifier = id;
        response.batch_item_failures.push(failure);
    }
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let sqs = SqsClient::new(&aws_config);
    let sqs = &sqs;

    run(service_fn(move |event: LambdaEvent<SqsEvent>| async move {
        function_handler(sqs, event).await
    }))
    .await
}
