//! # Simple SQS
//!
//! Minimal client for a managed message queue (AWS SQS).
//!
//! This library provides:
//! - Queue initialization: validate configuration, establish a session and
//!   create (or look up) the named queue
//! - Sending text messages with optional string attributes
//! - Receiving up to N messages with their full per-message metadata
//! - An in-memory service for tests and local development
//!
//! ## Module Organization
//!
//! - [`error`] - Error types for all queue operations
//! - [`message`] - Identifiers, attributes, requests and received messages
//! - [`provider`] - Provider types and configuration
//! - [`client`] - The `QueueService` capability trait and `QueueClient`
//! - [`providers`] - AWS SQS and in-memory services
//!
//! ## Example
//!
//! ```no_run
//! use simple_sqs::{QueueClient, QueueConfig};
//! use std::collections::HashMap;
//!
//! # async fn example() -> Result<(), simple_sqs::QueueError> {
//! let client = QueueClient::init(QueueConfig::new("us-east-1", "testQueue")).await?;
//!
//! let attributes = HashMap::from([("bucket".to_string(), "testBucket".to_string())]);
//! client.send_message("hello", &attributes).await?;
//!
//! for message in client.receive_message(1).await? {
//!     println!("{}", message.body);
//! }
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod client;
pub mod error;
pub mod message;
pub mod provider;
pub mod providers;

// Re-export commonly used types at crate root for convenience
pub use client::{QueueClient, QueueService};
pub use error::{ConfigurationError, Operation, ProviderError, QueueError, ValidationError};
pub use message::{
    convert_attributes, InboundMessage, MessageAttributeValue, MessageId, QueueUrl,
    ReceiptHandle, ReceiveMessageRequest, SendMessageRequest, Timestamp,
};
pub use provider::{ProviderType, QueueConfig};
pub use providers::{AwsSqsService, InMemoryQueueService};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
