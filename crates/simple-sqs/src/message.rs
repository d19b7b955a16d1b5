//! Message types for queue operations including core domain identifiers.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// The only attribute data type this crate produces
pub const STRING_DATA_TYPE: &str = "String";

/// System attribute requested on every receive
pub const SENT_TIMESTAMP_ATTRIBUTE: &str = "SentTimestamp";

/// Message attribute name selecting every custom attribute
pub const ALL_MESSAGE_ATTRIBUTES: &str = "All";

// ============================================================================
// Core Domain Identifiers
// ============================================================================

/// URL identifying a provider-managed queue. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueUrl(String);

impl QueueUrl {
    pub fn new(url: String) -> Result<Self, ValidationError> {
        if url.is_empty() {
            return Err(ValidationError::Required {
                field: "queue_url".to_string(),
            });
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QueueUrl {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Provider-assigned message identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for a single delivery of a message, required to acknowledge it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptHandle(String);

impl ReceiptHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReceiptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp wrapper for consistent time handling
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse an epoch-milliseconds string, the format SQS uses for `SentTimestamp`
    pub fn from_epoch_millis_str(value: &str) -> Option<Self> {
        let millis = value.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

// ============================================================================
// Message Attributes
// ============================================================================

/// A typed message attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttributeValue {
    pub data_type: String,
    pub string_value: Option<String>,
}

impl MessageAttributeValue {
    /// Create a `String` typed attribute
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: STRING_DATA_TYPE.to_string(),
            string_value: Some(value.into()),
        }
    }
}

/// Convert plain string attributes into `String` typed message attributes.
///
/// An empty mapping converts to an empty mapping.
pub fn convert_attributes(
    attributes: &HashMap<String, String>,
) -> HashMap<String, MessageAttributeValue> {
    attributes
        .iter()
        .map(|(name, value)| (name.clone(), MessageAttributeValue::string(value.as_str())))
        .collect()
}

// ============================================================================
// Requests
// ============================================================================

/// Exact parameters of a single send call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub queue_url: QueueUrl,
    pub body: String,
    pub delay_seconds: i32,
    /// `None` when the caller supplied no attributes; an empty map is never sent
    pub message_attributes: Option<HashMap<String, MessageAttributeValue>>,
}

impl SendMessageRequest {
    pub const DELAY_SECONDS: i32 = 0;

    pub fn new(queue_url: QueueUrl, body: &str, attributes: &HashMap<String, String>) -> Self {
        let message_attributes = if attributes.is_empty() {
            None
        } else {
            Some(convert_attributes(attributes))
        };

        Self {
            queue_url,
            body: body.to_string(),
            delay_seconds: Self::DELAY_SECONDS,
            message_attributes,
        }
    }
}

/// Exact parameters of a single receive call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveMessageRequest {
    pub queue_url: QueueUrl,
    pub max_messages: i32,
    pub visibility_timeout: i32,
    pub wait_time_seconds: i32,
    pub system_attribute_names: Vec<String>,
    pub message_attribute_names: Vec<String>,
}

impl ReceiveMessageRequest {
    pub const VISIBILITY_TIMEOUT_SECONDS: i32 = 20;
    pub const WAIT_TIME_SECONDS: i32 = 0;

    pub fn new(queue_url: QueueUrl, max_messages: u32) -> Result<Self, ValidationError> {
        if max_messages == 0 {
            return Err(ValidationError::OutOfRange {
                field: "max_messages".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let max_messages = i32::try_from(max_messages).map_err(|_| ValidationError::OutOfRange {
            field: "max_messages".to_string(),
            message: format!("must not exceed {}", i32::MAX),
        })?;

        Ok(Self {
            queue_url,
            max_messages,
            visibility_timeout: Self::VISIBILITY_TIMEOUT_SECONDS,
            wait_time_seconds: Self::WAIT_TIME_SECONDS,
            system_attribute_names: vec![SENT_TIMESTAMP_ATTRIBUTE.to_string()],
            message_attribute_names: vec![ALL_MESSAGE_ATTRIBUTES.to_string()],
        })
    }

    /// Upper bound on messages this request may yield
    pub fn limit(&self) -> usize {
        self.max_messages.max(0) as usize
    }
}

// ============================================================================
// Received Messages
// ============================================================================

/// A message received from the queue with its per-delivery metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub message_id: Option<MessageId>,
    pub receipt_handle: Option<ReceiptHandle>,
    pub body: String,
    pub sent_timestamp: Option<Timestamp>,
    pub attributes: HashMap<String, MessageAttributeValue>,
}

impl InboundMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            message_id: None,
            receipt_handle: None,
            body: body.into(),
            sent_timestamp: None,
            attributes: HashMap::new(),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Get the string value of a custom attribute
    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|value| value.string_value.as_deref())
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
