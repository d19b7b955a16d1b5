//! Tests for the simple-sqs library module.

use super::*;
use std::collections::HashMap;

#[test]
fn test_crate_root_exports() {
    let config = QueueConfig::new("us-east-1", "testQueue");
    assert!(config.validate().is_ok());

    let converted = convert_attributes(&HashMap::from([(
        "bucket".to_string(),
        "testBucket".to_string(),
    )]));
    assert_eq!(converted["bucket"], MessageAttributeValue::string("testBucket"));
}

#[test]
fn test_queue_client_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<QueueClient>();
    assert_send_sync::<InMemoryQueueService>();
    assert_send_sync::<AwsSqsService>();
}

#[tokio::test]
async fn test_independent_clients_do_not_share_sessions() {
    let first_service = InMemoryQueueService::new();
    let second_service = InMemoryQueueService::new();

    let first = QueueClient::init_with_service(
        QueueConfig::new("us-east-1", "testQueue"),
        Box::new(first_service.clone()),
    )
    .await
    .unwrap();
    let second = QueueClient::init_with_service(
        QueueConfig::new("eu-west-1", "testQueue"),
        Box::new(second_service.clone()),
    )
    .await
    .unwrap();

    first.send_message("only-first", &HashMap::new()).await.unwrap();

    assert_eq!(first_service.queue_depth("testQueue"), Some(1));
    assert_eq!(second_service.queue_depth("testQueue"), Some(0));
    assert!(second.receive_message(10).await.unwrap().is_empty());
}
