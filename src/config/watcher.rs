//! Config file watcher for live validation changes.
//!
//! # Responsibilities
//! - Reload the file when it changes on disk
//! - Forward only reloads that change how webhooks are validated
//! - Name the validation settings that changed, never their secret values
//!
//! Server and observability settings are read once at startup; edits to them
//! take effect on restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::AppConfig;

/// Watches the config file and sends reloaded configs to the server.
pub struct ConfigWatcher {
    path: PathBuf,
    current: AppConfig,
    update_tx: mpsc::UnboundedSender<AppConfig>,
}

impl ConfigWatcher {
    /// Watch `path`, starting from the config the server is running with.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path, current: &AppConfig) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                current: current.clone(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            mut current,
            update_tx,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    let reloaded = match load_config(&path) {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::error!(
                                path = ?path,
                                "Failed to reload config: {}. Keeping current validation policy.",
                                e
                            );
                            return;
                        }
                    };

                    let changed = validation_changes(&current, &reloaded);
                    if changed.is_empty() {
                        tracing::debug!(path = ?path, "Config reloaded, validation settings unchanged");
                        return;
                    }

                    tracing::info!(changed = ?changed, "Validation settings changed, applying");
                    if update_tx.send(reloaded.clone()).is_ok() {
                        current = reloaded;
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watched, "Config watcher started");
        Ok(watcher)
    }
}

/// Names of the validation settings that differ between two configs.
///
/// The auth token is compared after fallback, so moving the same token between
/// `twilio.auth_token` and `twilio.request_validation.auth_token` is no change.
pub fn validation_changes(old: &AppConfig, new: &AppConfig) -> Vec<&'static str> {
    let (a, b) = (&old.twilio.request_validation, &new.twilio.request_validation);
    let mut changed = Vec::new();

    if old.validation_auth_token() != new.validation_auth_token() {
        changed.push("auth_token");
    }
    if a.allow_local != b.allow_local {
        changed.push("allow_local");
    }
    if a.base_url_override != b.base_url_override {
        changed.push("base_url_override");
    }
    if a.url_override != b.url_override {
        changed.push("url_override");
    }
    changed
}
