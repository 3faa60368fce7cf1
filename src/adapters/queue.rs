use crate::domain::ports::OffsetPublisher;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Publisher used when nothing should be enqueued: the CLI follows the
/// offset chain itself, and a function without a queue URL stops after one page.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

#[async_trait]
impl OffsetPublisher for NoopPublisher {
    async fn publish(&self, offset: u64) -> Result<()> {
        tracing::debug!("No queue configured, not publishing offset {}", offset);
        Ok(())
    }
}

#[cfg(feature = "lambda")]
pub use sqs::{QueuePublisher, SqsPublisher};

#[cfg(feature = "lambda")]
mod sqs {
    use super::NoopPublisher;
    use crate::core::message::encode_offset_message;
    use crate::domain::ports::OffsetPublisher;
    use crate::utils::error::{Result, SyncError};
    use async_trait::async_trait;
    use aws_sdk_sqs::error::DisplayErrorContext;
    use aws_sdk_sqs::Client as SqsClient;

    /// Sends the next offset back onto the queue that triggered the function.
    #[derive(Debug, Clone)]
    pub struct SqsPublisher {
        client: SqsClient,
        queue_url: String,
    }

    impl SqsPublisher {
        pub fn new(client: SqsClient, queue_url: String) -> Self {
            Self { client, queue_url }
        }
    }

    #[async_trait]
    impl OffsetPublisher for SqsPublisher {
        async fn publish(&self, offset: u64) -> Result<()> {
            self.client
                .send_message()
                .queue_url(&self.queue_url)
                .message_body(encode_offset_message(offset))
                .send()
                .await
                .map_err(|e| SyncError::PublishError {
                    offset,
                    message: DisplayErrorContext(&e).to_string(),
                })?;

            tracing::info!("📨 Published next offset {}", offset);
            Ok(())
        }
    }

    /// Next-offset publisher chosen per invocation from the configured queue URL.
    #[derive(Debug, Clone)]
    pub enum QueuePublisher {
        Sqs(SqsPublisher),
        Disabled(NoopPublisher),
    }

    impl QueuePublisher {
        pub fn new(client: SqsClient, queue_url: Option<&str>) -> Self {
            match queue_url {
                Some(url) => QueuePublisher::Sqs(SqsPublisher::new(client, url.to_string())),
                None => {
                    tracing::warn!("SYNC_QUEUE_URL is not set, the offset chain stops after this run");
                    QueuePublisher::Disabled(NoopPublisher)
                }
            }
        }
    }

    #[async_trait]
    impl OffsetPublisher for QueuePublisher {
        async fn publish(&self, offset: u64) -> Result<()> {
            match self {
                QueuePublisher::Sqs(publisher) => publisher.publish(offset).await,
                QueuePublisher::Disabled(publisher) => publisher.publish(offset).await,
            }
        }
    }

}
