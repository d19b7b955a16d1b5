//! Tests for error types.

use super::*;
use std::error::Error as _;

#[test]
fn test_error_transience() {
    assert!(!QueueError::Configuration(ConfigurationError::Missing {
        key: "region".to_string(),
    })
    .is_transient());

    assert!(!QueueError::Validation(ValidationError::Required {
        field: "queue_url".to_string(),
    })
    .is_transient());

    assert!(QueueError::provider(
        Operation::SendMessage,
        ProviderError::new("AwsSqs", "throttled"),
    )
    .is_transient());

    assert!(QueueError::Timeout {
        operation: Operation::ReceiveMessage,
        duration: Duration::from_secs(5),
    }
    .is_transient());
}

#[test]
fn test_missing_configuration_names_the_field() {
    let error = ConfigurationError::Missing {
        key: "region".to_string(),
    };

    assert_eq!(error.key(), Some("region"));
    assert_eq!(error.to_string(), "No region specified. region is required.");
}

#[test]
fn test_provider_error_display_includes_operation_and_code() {
    let error = QueueError::provider(
        Operation::CreateQueue,
        ProviderError::new("AwsSqs", "access denied").with_code(Some("AccessDenied")),
    );

    assert_eq!(error.operation(), Some(Operation::CreateQueue));
    assert_eq!(
        error.to_string(),
        "Provider error during create_queue: AwsSqs [AccessDenied]: access denied"
    );
}

#[test]
fn test_provider_error_without_code() {
    let error = ProviderError::new("InMemory", "queue missing").with_code(None::<String>);
    assert_eq!(error.to_string(), "InMemory: queue missing");
}

#[test]
fn test_provider_error_preserves_source_chain() {
    let cause = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
    let error = QueueError::provider(
        Operation::ReceiveMessage,
        ProviderError::new("AwsSqs", "dispatch failure").with_source(cause),
    );

    let provider = error.source().expect("provider error is the source");
    let root = provider.source().expect("io error is the root cause");
    assert_eq!(root.to_string(), "reset by peer");
}

#[test]
fn test_configuration_errors_have_no_operation() {
    let error = QueueError::from(ConfigurationError::Loading {
        message: "bad file".to_string(),
    });
    assert_eq!(error.operation(), None);
}
