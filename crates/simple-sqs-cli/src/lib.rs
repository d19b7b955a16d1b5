//! # simple-sqs CLI
//!
//! Command-line interface for sending messages to and receiving messages from
//! a named SQS queue.
//!
//! Configuration is layered: an optional file (`--config` or
//! `SIMPLE_SQS_CONFIG`), then `SIMPLE_SQS__*` environment variables, then
//! command-line flags.

use clap::{Parser, Subcommand};
use simple_sqs::{ConfigurationError, InboundMessage, QueueClient, QueueConfig, QueueError};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ============================================================================
// CLI Structure
// ============================================================================

/// simple-sqs - send and receive messages on an SQS queue
#[derive(Parser, Debug)]
#[command(name = "simple-sqs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Send and receive messages on an SQS queue")]
#[command(
    long_about = "Creates the named queue if needed, then sends a message or receives up to N messages"
)]
pub struct Cli {
    /// Configuration file path (TOML, YAML or JSON)
    #[arg(short, long, env = "SIMPLE_SQS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// AWS region
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Queue name
    #[arg(short, long, global = true)]
    pub queue_name: Option<String>,

    /// Custom SQS endpoint, e.g. LocalStack
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Per-operation timeout in seconds
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Logging level
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Send one message and print its message id
    Send {
        /// Message body
        body: String,

        /// String attribute to attach, repeatable
        #[arg(short, long = "attribute", value_name = "KEY=VALUE", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
    },

    /// Receive up to N messages without waiting
    Receive {
        /// Maximum number of messages to receive
        #[arg(short, long, default_value_t = 1)]
        max_messages: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One message body per line
    Text,
    /// Full message metadata as JSON
    Json,
}

/// Parse a `KEY=VALUE` attribute argument
pub fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{raw}`"))?;

    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{raw}`"));
    }

    Ok((key.to_string(), value.to_string()))
}

// ============================================================================
// CLI Error Types
// ============================================================================

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("{0}")]
    Queue(#[from] QueueError),

    #[error("Invalid argument: {arg} - {message}")]
    InvalidArgument { arg: String, message: String },

    #[error("Logging initialization failed: {message}")]
    Logging { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Queue(QueueError::Configuration(_)) => 1,
            Self::Queue(QueueError::Provider { .. }) => 2,
            Self::Queue(QueueError::Timeout { .. }) => 3,
            Self::InvalidArgument { .. } | Self::Queue(QueueError::Validation(_)) => 4,
            Self::Logging { .. } | Self::Io(_) | Self::Json(_) => 5,
        }
    }

    /// True when the error happened before a log subscriber was installed
    pub fn precedes_logging(&self) -> bool {
        match self {
            Self::Logging { .. } => true,
            Self::InvalidArgument { arg, .. } => arg == "log-level",
            _ => false,
        }
    }
}

// ============================================================================
// Command Execution
// ============================================================================

/// Parse arguments, initialize logging and run the selected command
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    initialize_logging(&cli.log_level, cli.json_logs)?;

    let mut stdout = std::io::stdout();
    execute(cli, &mut stdout).await
}

/// Initialize the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn initialize_logging(level: &str, json: bool) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| CliError::InvalidArgument {
            arg: "log-level".to_string(),
            message: e.to_string(),
        })?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}

/// Build the effective configuration: file and environment, then flags
pub fn resolve_config(cli: &Cli) -> Result<QueueConfig, CliError> {
    let mut config = QueueConfig::load(cli.config.as_deref())?;

    if let Some(region) = &cli.region {
        config.region = region.clone();
    }
    if let Some(queue_name) = &cli.queue_name {
        config.queue_name = queue_name.clone();
    }
    if let Some(endpoint_url) = &cli.endpoint_url {
        config.endpoint_url = Some(endpoint_url.clone());
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        if timeout_secs == 0 {
            return Err(CliError::InvalidArgument {
                arg: "timeout".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }
        config = config.with_operation_timeout(Duration::from_secs(timeout_secs));
    }

    Ok(config)
}

/// Initialize a client from the parsed arguments and run the command
pub async fn execute<W: Write>(cli: Cli, out: &mut W) -> Result<(), CliError> {
    let config = resolve_config(&cli)?;
    let client = QueueClient::init(config).await?;

    run_command(&client, cli.command, out).await
}

/// Run a single command against an initialized client
pub async fn run_command<W: Write>(
    client: &QueueClient,
    command: Commands,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        Commands::Send { body, attributes } => {
            let attributes: HashMap<String, String> = attributes.into_iter().collect();
            let message_id = client.send_message(&body, &attributes).await?;

            info!(message_id = %message_id, queue = %client.queue_url(), "Message sent");
            writeln!(out, "{message_id}")?;
        }
        Commands::Receive {
            max_messages,
            format,
        } => {
            let messages = client.receive_message(max_messages).await?;

            info!(count = messages.len(), queue = %client.queue_url(), "Messages received");
            write_messages(&messages, format, out)?;
        }
    }

    Ok(())
}

fn write_messages<W: Write>(
    messages: &[InboundMessage],
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => {
            for message in messages {
                writeln!(out, "{}", message.body)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, messages)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
