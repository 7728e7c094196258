//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the webhook handlers
//! - Guard every webhook route with request validation
//! - Wire up middleware (tracing, timeout, request ID)
//! - Apply configuration reloads to the live policy
//! - Serve until the shutdown signal fires

use std::time::Duration;

use axum::{
    http::{HeaderName, StatusCode},
    middleware,
    routing::post,
    Form, Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, PolicyStore, ServerConfig};
use crate::http::middleware::{validate_twilio_request, TwilioValidation};
use crate::net::ConnectionAddrs;
use crate::webhook::{SmsRequest, SmsStatusCallbackRequest, StatusCallbackRequest, VoiceRequest};

const X_REQUEST_ID: &str = "x-request-id";

/// HTTP server receiving validated webhooks.
pub struct WebhookServer {
    router: Router,
    store: PolicyStore,
}

impl WebhookServer {
    /// Create a new server validating against the given policy store.
    pub fn new(store: PolicyStore, config: &ServerConfig) -> Self {
        let validation = TwilioValidation::live(store.clone()).with_max_body_bytes(config.max_body_bytes);
        let router = Self::build_router(config, validation);
        Self { router, store }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, validation: TwilioValidation) -> Router {
        let x_request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/sms", post(incoming_sms))
            .route("/sms/status", post(sms_status))
            .route("/voice", post(incoming_call))
            .route("/voice/status", post(call_status))
            .layer(middleware::from_fn_with_state(validation, validate_twilio_request))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(x_request_id))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
            )
    }

    /// Handle to the policy this server validates against.
    pub fn policy_store(&self) -> &PolicyStore {
        &self.store
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Config updates received while running replace the validation policy;
    /// updates that fail to resolve are logged and ignored.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Webhook server starting");

        let store = self.store.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                let _ = store.apply(&config);
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<ConnectionAddrs>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn incoming_sms(Form(sms): Form<SmsRequest>) -> StatusCode {
    tracing::info!(
        message_sid = ?sms.message_sid,
        from = ?sms.common.from,
        num_media = sms.num_media,
        "Incoming message"
    );
    StatusCode::OK
}

async fn sms_status(Form(status): Form<SmsStatusCallbackRequest>) -> StatusCode {
    tracing::info!(
        message_sid = ?status.message.message_sid,
        status = ?status.message.message_status,
        error_code = ?status.error_code,
        "Message status update"
    );
    StatusCode::OK
}

async fn incoming_call(Form(call): Form<VoiceRequest>) -> StatusCode {
    tracing::info!(
        call_sid = ?call.call_sid,
        from = ?call.common.from,
        direction = ?call.direction,
        "Incoming call"
    );
    StatusCode::OK
}

async fn call_status(Form(status): Form<StatusCallbackRequest>) -> StatusCode {
    tracing::info!(
        call_sid = ?status.call.call_sid,
        status = ?status.call.call_status,
        duration_secs = status.call_duration,
        "Call status update"
    );
    StatusCode::OK
}
