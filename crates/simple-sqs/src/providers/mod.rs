//! Queue service implementations.
//!
//! This module contains concrete implementations of the `QueueService` trait
//! for different queue backends.

pub mod aws;
pub mod memory;

pub use aws::AwsSqsService;
pub use memory::{InMemoryQueueService, RecordedCalls};
