//! AWS SQS service implementation using the AWS SDK.
//!
//! Session establishment follows the usual SDK rules:
//! - **Static credentials**: used when `access_key_id` is non-empty, together
//!   with `secret_access_key` and the optional `session_token`
//! - **Default provider chain**: environment, shared config files, container
//!   and instance metadata, resolved by `aws-config` for the configured region
//!
//! Every [`QueueService`] method issues exactly one SQS request. Retry and
//! backoff remain whatever the SDK applies by default.

use crate::client::QueueService;
use crate::error::ProviderError;
use crate::message::{
    InboundMessage, MessageAttributeValue, MessageId, QueueUrl, ReceiptHandle,
    ReceiveMessageRequest, SendMessageRequest, Timestamp,
};
use crate::provider::{ProviderType, QueueConfig};
use async_trait::async_trait;
use aws_sdk_sqs::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::types::{
    Message as SqsMessage, MessageAttributeValue as SqsAttributeValue,
    MessageSystemAttributeName,
};
use aws_sdk_sqs::Client as SqsClient;
use std::collections::HashMap;
use tracing::{debug, instrument};

#[cfg(test)]
#[path = "aws_tests.rs"]
mod tests;

/// Name reported for static credentials in SDK diagnostics
const CREDENTIALS_PROVIDER_NAME: &str = "simple-sqs";

/// AWS SQS session owned by a single queue client
#[derive(Debug, Clone)]
pub struct AwsSqsService {
    client: SqsClient,
}

impl AwsSqsService {
    /// Establish an SQS session scoped to `config.region`.
    ///
    /// # Errors
    ///
    /// Returns an error if static credentials are not configured and the
    /// default provider chain yields no credentials provider.
    #[instrument(skip(config), fields(region = %config.region, static_credentials = config.has_static_credentials()))]
    pub async fn connect(config: &QueueConfig) -> Result<Self, ProviderError> {
        let region = Region::new(config.region.clone());
        let mut builder = aws_sdk_sqs::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(region.clone());

        if config.has_static_credentials() {
            let credentials = Credentials::new(
                config.access_key_id.clone().unwrap_or_default(),
                config.secret_access_key.clone().unwrap_or_default(),
                config.session_token.clone(),
                None,
                CREDENTIALS_PROVIDER_NAME,
            );
            builder = builder.credentials_provider(credentials);
        } else {
            let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            let credentials_provider = shared_config
                .credentials_provider()
                .ok_or_else(|| {
                    ProviderError::new(
                        ProviderType::AwsSqs.as_str(),
                        "No AWS credentials provider available. Set access_key_id/secret_access_key \
                         or configure the default credential chain.",
                    )
                    .with_code(Some("NoCredentialsProvider"))
                })?
                .clone();
            builder = builder.credentials_provider(credentials_provider);
        }

        if let Some(endpoint_url) = config.endpoint_url.as_deref() {
            builder = builder.endpoint_url(endpoint_url);
        }

        debug!("SQS session established");
        Ok(Self::from_client(SqsClient::from_conf(builder.build())))
    }

    /// Wrap an existing SDK client
    pub fn from_client(client: SqsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueueService for AwsSqsService {
    async fn create_queue(&self, queue_name: &str) -> Result<QueueUrl, ProviderError> {
        let output = self
            .client
            .create_queue()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(sdk_error)?;

        let queue_url = output
            .queue_url()
            .ok_or_else(|| missing_field("CreateQueue", "QueueUrl"))?;

        QueueUrl::new(queue_url.to_string()).map_err(|e| {
            ProviderError::new(ProviderType::AwsSqs.as_str(), e.to_string()).with_source(e)
        })
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<MessageId, ProviderError> {
        let mut call = self
            .client
            .send_message()
            .queue_url(request.queue_url.as_str())
            .message_body(request.body)
            .delay_seconds(request.delay_seconds);

        if let Some(attributes) = request.message_attributes {
            let attributes = attributes
                .into_iter()
                .map(|(name, value)| to_sdk_attribute(value).map(|value| (name, value)))
                .collect::<Result<HashMap<_, _>, _>>()?;
            call = call.set_message_attributes(Some(attributes));
        }

        let output = call.send().await.map_err(sdk_error)?;

        output
            .message_id()
            .map(MessageId::new)
            .ok_or_else(|| missing_field("SendMessage", "MessageId"))
    }

    async fn receive_messages(
        &self,
        request: ReceiveMessageRequest,
    ) -> Result<Vec<InboundMessage>, ProviderError> {
        let system_attribute_names = request
            .system_attribute_names
            .iter()
            .map(|name| MessageSystemAttributeName::from(name.as_str()))
            .collect();

        let output = self
            .client
            .receive_message()
            .queue_url(request.queue_url.as_str())
            .max_number_of_messages(request.max_messages)
            .visibility_timeout(request.visibility_timeout)
            .wait_time_seconds(request.wait_time_seconds)
            .set_message_system_attribute_names(Some(system_attribute_names))
            .set_message_attribute_names(Some(request.message_attribute_names))
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(output.messages().iter().map(from_sdk_message).collect())
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::AwsSqs
    }
}

/// Convert an attribute into its SDK form
fn to_sdk_attribute(value: MessageAttributeValue) -> Result<SqsAttributeValue, ProviderError> {
    SqsAttributeValue::builder()
        .data_type(value.data_type)
        .set_string_value(value.string_value)
        .build()
        .map_err(|e| {
            ProviderError::new(ProviderType::AwsSqs.as_str(), e.to_string()).with_source(e)
        })
}

/// Map an SDK message into an [`InboundMessage`], keeping all per-delivery metadata
fn from_sdk_message(message: &SqsMessage) -> InboundMessage {
    let sent_timestamp = message
        .attributes()
        .and_then(|attributes| attributes.get(&MessageSystemAttributeName::SentTimestamp))
        .and_then(|value| Timestamp::from_epoch_millis_str(value));

    let attributes = message
        .message_attributes()
        .map(|attributes| {
            attributes
                .iter()
                .map(|(name, value)| {
                    (
                        name.clone(),
                        MessageAttributeValue {
                            data_type: value.data_type().to_string(),
                            string_value: value.string_value().map(str::to_string),
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    InboundMessage {
        message_id: message.message_id().map(MessageId::new),
        receipt_handle: message.receipt_handle().map(ReceiptHandle::new),
        body: message.body().unwrap_or_default().to_string(),
        sent_timestamp,
        attributes,
    }
}

fn sdk_error<E, R>(error: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let code = error
        .as_service_error()
        .and_then(|service_error| service_error.code())
        .map(str::to_string);
    let message = DisplayErrorContext(&error).to_string();

    ProviderError::new(ProviderType::AwsSqs.as_str(), message)
        .with_code(code)
        .with_source(error)
}

fn missing_field(operation: &str, field: &str) -> ProviderError {
    ProviderError::new(
        ProviderType::AwsSqs.as_str(),
        format!("{operation} response did not include {field}"),
    )
}
