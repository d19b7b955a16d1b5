//! Live tests against a real SQS endpoint.
//!
//! Ignored by default. Run with `cargo test -- --ignored` and either AWS
//! credentials in the default chain, or `SIMPLE_SQS__ENDPOINT_URL` pointing at
//! LocalStack. Region and queue name come from `SIMPLE_SQS__REGION` and
//! `SIMPLE_SQS__QUEUE_NAME`, defaulting to `us-east-1` and `testQueue`.

use simple_sqs::{QueueClient, QueueConfig};
use std::collections::HashMap;

fn live_config() -> QueueConfig {
    let mut config = QueueConfig::load(None).expect("load configuration from environment");
    if config.region.is_empty() {
        config.region = "us-east-1".to_string();
    }
    if config.queue_name.is_empty() {
        config.queue_name = "testQueue".to_string();
    }
    config
}

#[tokio::test]
#[ignore = "requires a live SQS endpoint"]
async fn test_live_init() {
    let client = QueueClient::init(live_config()).await.unwrap();
    assert!(!client.queue_url().as_str().is_empty());
}

#[tokio::test]
#[ignore = "requires a live SQS endpoint"]
async fn test_live_send_and_receive() {
    let client = QueueClient::init(live_config()).await.unwrap();
    let attributes = HashMap::from([("bucket".to_string(), "testBucket".to_string())]);

    client.send_message("hello", &attributes).await.unwrap();
    let messages = client.receive_message(1).await.unwrap();

    assert!(messages.len() <= 1);
    if let Some(message) = messages.first() {
        assert!(message.receipt_handle.is_some());
    }
}
