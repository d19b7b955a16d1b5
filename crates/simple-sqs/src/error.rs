//! Error types for queue operations.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Boxed underlying cause carried by a [`ProviderError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Comprehensive error type for all queue client operations
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Provider error during {operation}: {source}")]
    Provider {
        operation: Operation,
        #[source]
        source: ProviderError,
    },

    #[error("Operation {operation} timed out after {duration:?}")]
    Timeout {
        operation: Operation,
        duration: Duration,
    },
}

impl QueueError {
    /// Wrap a provider failure with the operation that produced it
    pub fn provider(operation: Operation, source: ProviderError) -> Self {
        Self::Provider { operation, source }
    }

    /// Check if error is transient. Informational only, nothing in this crate retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Configuration(_) => false,
            Self::Validation(_) => false,
            Self::Provider { .. } => true,
            Self::Timeout { .. } => true,
        }
    }

    /// Operation that failed, when the failure came from the provider or a timeout
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Provider { operation, .. } | Self::Timeout { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Service operations issued by the queue client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Session establishment (credential and client setup)
    Connect,
    CreateQueue,
    SendMessage,
    ReceiveMessage,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::CreateQueue => "create_queue",
            Self::SendMessage => "send_message",
            Self::ReceiveMessage => "receive_message",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a queue service or its transport
#[derive(Debug, Error)]
#[error("{provider}{}: {message}", code_suffix(.code))]
pub struct ProviderError {
    pub provider: String,
    pub code: Option<String>,
    pub message: String,
    #[source]
    pub source: Option<BoxError>,
}

impl ProviderError {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the service error code, if the service reported one
    pub fn with_code(mut self, code: Option<impl Into<String>>) -> Self {
        self.code = code.map(Into::into);
        self
    }

    /// Attach the underlying cause
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" [{c}]"))
        .unwrap_or_default()
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("No {key} specified. {key} is required.")]
    Missing { key: String },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("Configuration loading failed: {message}")]
    Loading { message: String },
}

impl ConfigurationError {
    /// Name of the offending configuration field, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Missing { key } | Self::Invalid { key, .. } => Some(key),
            Self::Loading { .. } => None,
        }
    }
}

/// Validation errors for operation arguments
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
