//! In-memory queue service for testing and development.
//!
//! This module provides a fully functional in-process queue that:
//! - Creates queues idempotently and hands out stable queue URLs
//! - Delivers messages in FIFO order and honours visibility timeouts
//! - Returns only the message and system attributes a receive asks for
//! - Records every request for inspection and can inject one-shot failures
//!
//! Clones share the same storage, so a test can keep one handle while the
//! other is owned by a `QueueClient`.

use crate::client::QueueService;
use crate::error::{Operation, ProviderError};
use crate::message::{
    InboundMessage, MessageAttributeValue, MessageId, QueueUrl, ReceiptHandle,
    ReceiveMessageRequest, SendMessageRequest, Timestamp, ALL_MESSAGE_ATTRIBUTES,
    SENT_TIMESTAMP_ATTRIBUTE,
};
use crate::provider::ProviderType;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use tracing::debug;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

/// URL prefix of every in-memory queue
pub const QUEUE_URL_PREFIX: &str = "https://sqs.in-memory.local/000000000000/";

/// Error code reported for sends and receives against an unknown queue URL
pub const NON_EXISTENT_QUEUE_CODE: &str = "AWS.SimpleQueueService.NonExistentQueue";

/// Error code reported for failures injected with [`InMemoryQueueService::fail_next`]
pub const INJECTED_FAILURE_CODE: &str = "InjectedFailure";

// ============================================================================
// Internal Storage Structures
// ============================================================================

#[derive(Default)]
struct QueueStorage {
    /// Queues keyed by URL
    queues: HashMap<String, InMemoryQueue>,
    calls: RecordedCalls,
    failures: HashMap<Operation, String>,
}

impl QueueStorage {
    /// Consume a pending injected failure for `operation`
    fn take_failure(&mut self, operation: Operation) -> Result<(), ProviderError> {
        match self.failures.remove(&operation) {
            Some(message) => Err(provider_error(message).with_code(Some(INJECTED_FAILURE_CODE))),
            None => Ok(()),
        }
    }

    fn queue_mut(&mut self, queue_url: &QueueUrl) -> Result<&mut InMemoryQueue, ProviderError> {
        self.queues.get_mut(queue_url.as_str()).ok_or_else(|| {
            provider_error(format!(
                "The specified queue does not exist: {queue_url}"
            ))
            .with_code(Some(NON_EXISTENT_QUEUE_CODE))
        })
    }
}

struct InMemoryQueue {
    messages: VecDeque<StoredMessage>,
}

/// A message stored in the queue with its delivery state
struct StoredMessage {
    message_id: MessageId,
    body: String,
    attributes: HashMap<String, MessageAttributeValue>,
    sent_at: Timestamp,
    visible_at: Timestamp,
}

impl StoredMessage {
    fn is_visible(&self, now: &Timestamp) -> bool {
        *now >= self.visible_at
    }
}

/// Every request the in-memory service has received, in arrival order
#[derive(Debug, Clone, Default)]
pub struct RecordedCalls {
    pub create_queue: Vec<String>,
    pub send_message: Vec<SendMessageRequest>,
    pub receive_messages: Vec<ReceiveMessageRequest>,
}

impl RecordedCalls {
    pub fn total(&self) -> usize {
        self.create_queue.len() + self.send_message.len() + self.receive_messages.len()
    }
}

// ============================================================================
// InMemoryQueueService
// ============================================================================

/// In-process implementation of [`QueueService`]
///
/// Messages are never removed: there is no delete operation, so received
/// messages return to the queue once their visibility timeout lapses. Storage
/// grows with every send and each receive scans the whole queue. Intended for
/// tests and short-lived local runs, not as a long-lived queue.
#[derive(Clone, Default)]
pub struct InMemoryQueueService {
    storage: Arc<RwLock<QueueStorage>>,
}

impl InMemoryQueueService {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL the service assigns to `queue_name`
    pub fn queue_url_for(queue_name: &str) -> String {
        format!("{QUEUE_URL_PREFIX}{queue_name}")
    }

    /// Snapshot of every request received so far
    pub fn calls(&self) -> RecordedCalls {
        match self.storage.read() {
            Ok(storage) => storage.calls.clone(),
            Err(poisoned) => poisoned.into_inner().calls.clone(),
        }
    }

    /// Make the next call of `operation` fail with `message`
    pub fn fail_next(&self, operation: Operation, message: impl Into<String>) {
        let mut storage = match self.storage.write() {
            Ok(storage) => storage,
            Err(poisoned) => poisoned.into_inner(),
        };
        storage.failures.insert(operation, message.into());
    }

    /// Number of stored messages (visible or in flight) in the named queue
    pub fn queue_depth(&self, queue_name: &str) -> Option<usize> {
        let storage = match self.storage.read() {
            Ok(storage) => storage,
            Err(poisoned) => poisoned.into_inner(),
        };
        storage
            .queues
            .get(&Self::queue_url_for(queue_name))
            .map(|queue| queue.messages.len())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, QueueStorage>, ProviderError> {
        self.storage
            .write()
            .map_err(|_| provider_error("in-memory storage lock poisoned"))
    }
}

#[async_trait]
impl QueueService for InMemoryQueueService {
    async fn create_queue(&self, queue_name: &str) -> Result<QueueUrl, ProviderError> {
        let mut storage = self.write()?;
        storage.calls.create_queue.push(queue_name.to_string());
        storage.take_failure(Operation::CreateQueue)?;

        let url = Self::queue_url_for(queue_name);
        storage
            .queues
            .entry(url.clone())
            .or_insert_with(|| InMemoryQueue {
                messages: VecDeque::new(),
            });

        QueueUrl::new(url).map_err(|e| provider_error(e.to_string()))
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<MessageId, ProviderError> {
        let mut storage = self.write()?;
        storage.calls.send_message.push(request.clone());
        storage.take_failure(Operation::SendMessage)?;

        let queue = storage.queue_mut(&request.queue_url)?;
        let message_id = MessageId::new(uuid::Uuid::new_v4().to_string());
        let now = Timestamp::now();
        let visible_at = Timestamp::from_datetime(
            now.as_datetime() + chrono::Duration::seconds(i64::from(request.delay_seconds)),
        );

        queue.messages.push_back(StoredMessage {
            message_id: message_id.clone(),
            body: request.body,
            attributes: request.message_attributes.unwrap_or_default(),
            sent_at: now,
            visible_at,
        });

        debug!(message_id = %message_id, queue_url = %request.queue_url, "Stored message");
        Ok(message_id)
    }

    async fn receive_messages(
        &self,
        request: ReceiveMessageRequest,
    ) -> Result<Vec<InboundMessage>, ProviderError> {
        let mut storage = self.write()?;
        storage.calls.receive_messages.push(request.clone());
        storage.take_failure(Operation::ReceiveMessage)?;

        let limit = request.limit();
        let include_sent_timestamp = request
            .system_attribute_names
            .iter()
            .any(|name| name == SENT_TIMESTAMP_ATTRIBUTE || name == ALL_MESSAGE_ATTRIBUTES);

        let queue = storage.queue_mut(&request.queue_url)?;
        let now = Timestamp::now();
        let hidden_until = Timestamp::from_datetime(
            now.as_datetime() + chrono::Duration::seconds(i64::from(request.visibility_timeout)),
        );

        let mut received = Vec::new();
        for stored in queue.messages.iter_mut() {
            if received.len() >= limit {
                break;
            }
            if !stored.is_visible(&now) {
                continue;
            }

            stored.visible_at = hidden_until.clone();

            received.push(InboundMessage {
                message_id: Some(stored.message_id.clone()),
                receipt_handle: Some(ReceiptHandle::new(uuid::Uuid::new_v4().to_string())),
                body: stored.body.clone(),
                sent_timestamp: include_sent_timestamp.then(|| stored.sent_at.clone()),
                attributes: select_attributes(&stored.attributes, &request.message_attribute_names),
            });
        }

        Ok(received)
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::InMemory
    }
}

/// Keep only the attributes named in `requested`; `All` keeps everything
fn select_attributes(
    attributes: &HashMap<String, MessageAttributeValue>,
    requested: &[String],
) -> HashMap<String, MessageAttributeValue> {
    if requested.iter().any(|name| name == ALL_MESSAGE_ATTRIBUTES) {
        return attributes.clone();
    }

    attributes
        .iter()
        .filter(|(name, _)| requested.contains(*name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn provider_error(message: impl Into<String>) -> ProviderError {
    ProviderError::new(ProviderType::InMemory.as_str(), message)
}
