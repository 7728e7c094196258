//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use twilio_axum::config::{AppConfig, PolicyStore};
use twilio_axum::http::WebhookServer;
use twilio_axum::lifecycle::Shutdown;

pub const AUTH_TOKEN: &str = "thisisafakeauthtoken";

/// Signature computed the way the platform documents it, independent of the crate.
pub fn calculate_signature(url: &str, auth_token: &str, form: &[(&str, &str)]) -> String {
    let mut sorted = form.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let mut value = url.to_string();
    for (key, val) in sorted {
        value.push_str(key);
        value.push_str(val);
    }

    let mut mac = Hmac::<Sha1>::new_from_slice(auth_token.as_bytes()).unwrap();
    mac.update(value.as_bytes());
    general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Config validating with `AUTH_TOKEN`.
pub fn config(allow_local: bool, base_url_override: Option<&str>) -> AppConfig {
    let mut config = AppConfig::default();
    config.twilio.auth_token = Some(AUTH_TOKEN.to_string());
    config.twilio.request_validation.allow_local = allow_local;
    config.twilio.request_validation.base_url_override = base_url_override.map(str::to_string);
    config
}

/// A running webhook server on an ephemeral loopback port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: PolicyStore,
    pub config_tx: mpsc::UnboundedSender<AppConfig>,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub async fn start(config: AppConfig) -> Self {
        let store = PolicyStore::from_config(&config).unwrap();
        let server = WebhookServer::new(store.clone(), &config.server);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (config_tx, config_rx) = mpsc::unbounded_channel();
        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();

        tokio::spawn(async move {
            let _ = server.run(listener, config_rx, server_shutdown).await;
        });

        Self {
            addr,
            store,
            config_tx,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Encode a form body the same way the signature expects its values.
pub fn form_body(form: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish()
}
