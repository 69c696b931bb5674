//! # SimuVida - Device Life-Cycle Tracker
//!
//! The main binary for SimuVida.
//!
//! This application provides:
//! - HTTP JSON API server (axum-based)
//! - CLI interface for managing the device document offline
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  apps/simuvida (THE BINARY)               │
//! │                                                           │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐   │
//! │   │    CLI      │    │  HTTP API   │    │   Config    │   │
//! │   │   (clap)    │    │   (axum)    │    │   (toml)    │   │
//! │   └──────┬──────┘    └──────┬──────┘    └──────┬──────┘   │
//! │          └──────────────────┼──────────────────┘          │
//! │                             ▼                             │
//! │                    ┌─────────────────┐                    │
//! │                    │  simuvida-core  │                    │
//! │                    │   (THE LOGIC)   │                    │
//! │                    └─────────────────┘                    │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! simuvida server --host 0.0.0.0 --port 5000
//!
//! # CLI operations
//! simuvida create laptop
//! simuvida list
//! simuvida add-stage 1 --name Repair --co2 2.5 --water 10 --waste 0.3
//! ```

use clap::Parser;
use simuvida::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // SIMUVIDA_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SIMUVIDA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "simuvida=info,simuvida_core=info,tower_http=debug".into());

    // Logs go to stderr so `--json-mode` output on stdout stays parseable.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the SimuVida startup banner.
fn print_banner() {
    println!(
        r#"
  ░█▀▀░▀█▀░█▄█░█░█░█░█░▀█▀░█▀▄░█▀█
  ░▀▀█░░█░░█░█░█░█░▀▄▀░░█░░█░█░█▀█
  ░▀▀▀░▀▀▀░▀░▀░▀▀▀░░▀░░▀▀▀░▀▀░░▀░▀

  Device Life-Cycle Tracker v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
