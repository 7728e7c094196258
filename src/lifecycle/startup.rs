//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging, metrics and the validation policy
//! - Start the config watcher and signal listener
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: a missing auth token or bad config is fatal
//! - Listener starts last (traffic only when ready)

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::watcher::ConfigWatcher;
use crate::config::{load_config, AppConfig, ConfigError, PolicyStore};
use crate::config::loader::{apply_env_fallback, AUTH_TOKEN_ENV};
use crate::config::validation::validate_config;
use crate::http::WebhookServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_listener;
use crate::observability::{logging, metrics};

/// Load the config file, or build one from defaults and the environment.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = AppConfig::default();
            apply_env_fallback(&mut config, std::env::var(AUTH_TOKEN_ENV).ok());
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// Start the webhook server and run until a stop signal.
pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(config_path)?;
    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.server.bind_address,
        allow_local = config.twilio.request_validation.allow_local,
        base_url_override = ?config.twilio.request_validation.base_url_override,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let store = PolicyStore::from_config(&config)?;

    // Keep the watcher alive for the lifetime of the server.
    let (config_updates, _watcher) = match config_path {
        Some(path) => {
            let (watcher, rx) = ConfigWatcher::new(path, &config);
            (rx, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_listener(shutdown.clone());

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = WebhookServer::new(store, &config.server);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
