//! # trackgeo
//!
//! The main binary for the trackgeo placement-geometry engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │             apps/trackgeo (THE BINARY)            │
//! │                                                   │
//! │   ┌──────────────┐         ┌──────────────────┐   │
//! │   │  CLI (clap)  │ ──────▶ │ config (toml)    │   │
//! │   └──────┬───────┘         └──────────────────┘   │
//! │          ▼                                        │
//! │   ┌──────────────────────────────┐                │
//! │   │        trackgeo-core         │                │
//! │   │  load ▸ Topology ▸ execute   │                │
//! │   └──────────────────────────────┘                │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! trackgeo -i station.ppxml status
//! trackgeo -i station.ppxml distance --from S1 --to S5
//! trackgeo -i station.ppxml search --from S1 --type Signal --nearest
//! trackgeo -i station.ppxml snapshot -o station.tgeo
//! ```

use clap::Parser;
use trackgeo::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // TRACKGEO_LOG_FORMAT=json enables machine-parseable logs. Logs go to
    // stderr; stdout carries only results.
    let log_format = std::env::var("TRACKGEO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.quiet { "trackgeo=warn" } else { "trackgeo=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    match cli::execute(&cli).and_then(|report| report.render(cli.json_mode)) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
