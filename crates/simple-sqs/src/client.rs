//! Queue client and the service capability it delegates to.

use crate::error::{Operation, ProviderError, QueueError};
use crate::message::{
    InboundMessage, MessageId, QueueUrl, ReceiveMessageRequest, SendMessageRequest,
};
use crate::provider::{ProviderType, QueueConfig};
use crate::providers::AwsSqsService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use tracing::{debug, info, instrument, warn};

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Narrow capability interface over a managed queue service.
///
/// Each method maps to exactly one service request.
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Create the named queue, or fetch its URL if it already exists
    async fn create_queue(&self, queue_name: &str) -> Result<QueueUrl, ProviderError>;

    /// Submit a single message
    async fn send_message(&self, request: SendMessageRequest) -> Result<MessageId, ProviderError>;

    /// Receive up to `request.max_messages` messages
    async fn receive_messages(
        &self,
        request: ReceiveMessageRequest,
    ) -> Result<Vec<InboundMessage>, ProviderError>;

    fn provider_type(&self) -> ProviderType;
}

/// Client bound to a single queue.
///
/// A `QueueClient` only exists once initialization has validated the
/// configuration, established a session and resolved the queue URL.
pub struct QueueClient {
    config: QueueConfig,
    queue_url: QueueUrl,
    service: Box<dyn QueueService>,
}

impl QueueClient {
    /// Validate `config`, establish an AWS SQS session and ensure the queue exists.
    ///
    /// Missing configuration is reported before any network call.
    #[instrument(skip(config), fields(region = %config.region, queue = %config.queue_name))]
    pub async fn init(config: QueueConfig) -> Result<Self, QueueError> {
        config.validate()?;

        let service = with_timeout(&config, Operation::Connect, AwsSqsService::connect(&config))
            .await?;

        Self::create(config, Box::new(service)).await
    }

    /// Same as [`QueueClient::init`], but with a caller-supplied service session.
    #[instrument(skip(config, service), fields(queue = %config.queue_name))]
    pub async fn init_with_service(
        config: QueueConfig,
        service: Box<dyn QueueService>,
    ) -> Result<Self, QueueError> {
        config.validate()?;
        Self::create(config, service).await
    }

    async fn create(config: QueueConfig, service: Box<dyn QueueService>) -> Result<Self, QueueError> {
        let queue_url = with_timeout(
            &config,
            Operation::CreateQueue,
            service.create_queue(&config.queue_name),
        )
        .await?;

        info!(
            provider = %service.provider_type(),
            queue_url = %queue_url,
            "Queue ready"
        );

        Ok(Self {
            config,
            queue_url,
            service,
        })
    }

    pub fn queue_url(&self) -> &QueueUrl {
        &self.queue_url
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn provider_type(&self) -> ProviderType {
        self.service.provider_type()
    }

    /// Send `body` with optional string attributes, returning the provider message id.
    ///
    /// When `attributes` is empty the request carries no attribute field at all.
    #[instrument(skip(self, body, attributes), fields(queue = %self.config.queue_name, attribute_count = attributes.len()))]
    pub async fn send_message(
        &self,
        body: &str,
        attributes: &HashMap<String, String>,
    ) -> Result<MessageId, QueueError> {
        let request = SendMessageRequest::new(self.queue_url.clone(), body, attributes);

        let message_id = with_timeout(
            &self.config,
            Operation::SendMessage,
            self.service.send_message(request),
        )
        .await?;

        debug!(message_id = %message_id, body_len = body.len(), "Message sent");
        Ok(message_id)
    }

    /// Receive up to `max_messages` messages without waiting for more to arrive.
    ///
    /// Messages stay hidden from other receivers for 20 seconds.
    #[instrument(skip(self), fields(queue = %self.config.queue_name))]
    pub async fn receive_message(
        &self,
        max_messages: u32,
    ) -> Result<Vec<InboundMessage>, QueueError> {
        let request = ReceiveMessageRequest::new(self.queue_url.clone(), max_messages)?;
        let limit = request.limit();

        let mut messages = with_timeout(
            &self.config,
            Operation::ReceiveMessage,
            self.service.receive_messages(request),
        )
        .await?;

        if messages.len() > limit {
            warn!(
                received = messages.len(),
                limit, "Provider returned more messages than requested; truncating"
            );
            messages.truncate(limit);
        }

        debug!(count = messages.len(), "Messages received");
        Ok(messages)
    }

    /// Receive up to `max_messages` message bodies, discarding other metadata
    pub async fn receive_bodies(&self, max_messages: u32) -> Result<Vec<String>, QueueError> {
        let messages = self.receive_message(max_messages).await?;
        Ok(messages.into_iter().map(InboundMessage::into_body).collect())
    }
}

impl std::fmt::Debug for QueueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueClient")
            .field("config", &self.config)
            .field("queue_url", &self.queue_url)
            .field("provider", &self.service.provider_type())
            .finish()
    }
}

/// Run a provider call, bounded by the configured operation timeout if any
async fn with_timeout<T, F>(
    config: &QueueConfig,
    operation: Operation,
    call: F,
) -> Result<T, QueueError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    let result = match config.operation_timeout() {
        Some(duration) => tokio::time::timeout(duration, call)
            .await
            .map_err(|_| QueueError::Timeout {
                operation,
                duration,
            })?,
        None => call.await,
    };

    result.map_err(|source| {
        warn!(operation = %operation, error = %source, "Queue operation failed");
        QueueError::provider(operation, source)
    })
}
