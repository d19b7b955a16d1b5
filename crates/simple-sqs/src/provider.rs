//! Provider types and configuration.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Prefix for environment variable configuration (`SIMPLE_SQS__REGION`, ...)
pub const ENV_PREFIX: &str = "SIMPLE_SQS";

/// Maximum length of an SQS queue name, including any `.fifo` suffix
const MAX_QUEUE_NAME_LEN: usize = 80;

/// Enumeration of supported queue providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderType {
    AwsSqs,
    InMemory,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwsSqs => "AwsSqs",
            Self::InMemory => "InMemory",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection parameters for a queue client.
///
/// `region` and `queue_name` are required. Static credentials are used when
/// `access_key_id` is non-empty; otherwise the default AWS provider chain
/// resolves credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default, alias = "secret_key_id")]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub queue_name: String,
    /// Custom service endpoint (LocalStack, ElasticMQ, ...)
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Per-operation timeout in milliseconds
    #[serde(default)]
    pub operation_timeout_ms: Option<u64>,
}

impl QueueConfig {
    pub fn new(region: impl Into<String>, queue_name: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            queue_name: queue_name.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self.session_token = session_token;
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Bound every operation by `timeout`, rounded up to whole milliseconds
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.operation_timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    /// Load configuration from an optional file and `SIMPLE_SQS__*` environment variables.
    ///
    /// Environment variables override file values. The file format is inferred
    /// from its extension. The result is not validated; see [`QueueConfig::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .and_then(|cfg| cfg.try_deserialize::<QueueConfig>())
            .map_err(|e| ConfigurationError::Loading {
                message: e.to_string(),
            })
    }

    /// Check required fields before any network call is made.
    ///
    /// Region is checked before the queue name. A zero operation timeout is
    /// rejected since it would fail every call.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.region.is_empty() {
            return Err(ConfigurationError::Missing {
                key: "region".to_string(),
            });
        }

        if self.queue_name.is_empty() {
            return Err(ConfigurationError::Missing {
                key: "queue_name".to_string(),
            });
        }

        validate_queue_name(&self.queue_name)?;

        if self.operation_timeout_ms == Some(0) {
            return Err(ConfigurationError::Invalid {
                key: "operation_timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// True when explicit static credentials should be used
    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }

    /// Per-operation timeout, if one is configured
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }
}

impl fmt::Debug for QueueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueConfig")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("region", &self.region)
            .field("queue_name", &self.queue_name)
            .field("endpoint_url", &self.endpoint_url)
            .field("operation_timeout_ms", &self.operation_timeout_ms)
            .finish()
    }
}

/// SQS queue names: 1-80 ASCII alphanumerics, hyphens or underscores, optional `.fifo` suffix
fn validate_queue_name(name: &str) -> Result<(), ConfigurationError> {
    if name.len() > MAX_QUEUE_NAME_LEN {
        return Err(ConfigurationError::Invalid {
            key: "queue_name".to_string(),
            message: format!("must be at most {MAX_QUEUE_NAME_LEN} characters"),
        });
    }

    let base = name.strip_suffix(".fifo").unwrap_or(name);
    if base.is_empty()
        || !base
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigurationError::Invalid {
            key: "queue_name".to_string(),
            message: "only ASCII alphanumeric, hyphens, and underscores allowed".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
