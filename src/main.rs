//! Twilio webhook server.
//!
//! Serves the webhook routes behind request validation, reloading the
//! validation policy whenever the config file changes.
//!
//! # Architecture Overview
//!
//! ```text
//!     Twilio webhook        ┌──────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ net ──▶ http ──▶ validation ──▶ handler    │
//!                           │            │          │  403                  │
//!                           │            │          ▼                       │
//!                           │            │      security (HMAC-SHA1)        │
//!                           │            │          ▲                       │
//!                           │  config ───┴──▶ PolicyStore ◀── watcher       │
//!                           │  observability · lifecycle                    │
//!                           └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "twilio-axum")]
#[command(about = "Serve Twilio webhooks behind request validation", long_about = None)]
struct Args {
    /// TOML config file, watched for changes. Without one, the auth token
    /// is read from TWILIO_AUTH_TOKEN and all other settings use defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    twilio_axum::lifecycle::startup::run(args.config.as_deref()).await
}
