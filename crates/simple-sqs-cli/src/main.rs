use simple_sqs_cli::run_cli;
use tracing::error;

#[tokio::main]
async fn main() {
    // Run CLI and handle errors
    if let Err(e) = run_cli().await {
        if e.precedes_logging() {
            eprintln!("simple-sqs error: {}", e);
        } else {
            error!("simple-sqs error: {}", e);
        }

        std::process::exit(e.exit_code());
    }
}
