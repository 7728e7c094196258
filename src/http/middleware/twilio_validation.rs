//! Webhook validation middleware.
//! Rejects requests that did not come from Twilio with `403 Forbidden`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::PolicyStore;
use crate::http::extract::validation_request;
use crate::observability::metrics;
use crate::security::{evaluate, Decision, ValidationPolicy};

/// Default cap on buffered form bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Where the middleware gets its policy from.
#[derive(Clone, Debug)]
pub enum PolicySource {
    /// A policy fixed at startup.
    Fixed(Arc<ValidationPolicy>),
    /// A policy that follows configuration reloads.
    Live(PolicyStore),
}

/// State for [`validate_twilio_request`].
///
/// Route-level overrides take precedence over the policy's own settings,
/// so one shared policy can guard routes published under different URLs.
#[derive(Clone, Debug)]
pub struct TwilioValidation {
    source: PolicySource,
    url_override: Option<String>,
    allow_local: Option<bool>,
    max_body_bytes: usize,
}

impl TwilioValidation {
    /// Validate against a fixed policy.
    pub fn new(policy: ValidationPolicy) -> Self {
        Self::from_source(PolicySource::Fixed(Arc::new(policy)))
    }

    /// Validate against whatever policy the store holds at request time.
    pub fn live(store: PolicyStore) -> Self {
        Self::from_source(PolicySource::Live(store))
    }

    fn from_source(source: PolicySource) -> Self {
        Self {
            source,
            url_override: None,
            allow_local: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Sign against this exact URL on the routes this state guards.
    pub fn with_url_override(mut self, url: impl Into<String>) -> Self {
        self.url_override = Some(url.into()).filter(|u| !u.is_empty());
        self
    }

    pub fn with_allow_local(mut self, allow_local: bool) -> Self {
        self.allow_local = Some(allow_local);
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Policy snapshot for one request, with route overrides applied.
    pub fn policy(&self) -> Arc<ValidationPolicy> {
        let snapshot = match &self.source {
            PolicySource::Fixed(policy) => Arc::clone(policy),
            PolicySource::Live(store) => store.snapshot(),
        };

        if self.url_override.is_none() && self.allow_local.is_none() {
            return snapshot;
        }

        let mut policy = (*snapshot).clone();
        if let Some(url) = &self.url_override {
            policy.url_override = Some(url.clone());
        }
        if let Some(allow_local) = self.allow_local {
            policy.allow_local = allow_local;
        }
        Arc::new(policy)
    }
}

pub async fn validate_twilio_request(
    State(state): State<TwilioValidation>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let policy = state.policy();
    let (validation, req) = validation_request(req, state.max_body_bytes).await;

    // The form body was lost; the handler must not see a truncated request.
    let Some(req) = req else {
        metrics::record_validation(Decision::Rejected);
        tracing::warn!(
            method = %validation.method,
            path = %validation.path,
            limit = state.max_body_bytes,
            "Rejected webhook request with unreadable form body"
        );
        return StatusCode::FORBIDDEN.into_response();
    };

    let decision = evaluate(&validation, &policy);
    metrics::record_validation(decision);

    match decision {
        Decision::LocalBypass => {
            tracing::debug!(path = %validation.path, "Local request, skipping signature validation");
            next.run(req).await
        }
        Decision::Verified => next.run(req).await,
        Decision::Rejected => {
            tracing::warn!(
                method = %validation.method,
                path = %validation.path,
                remote = ?validation.remote_addr,
                forwarded = validation.forwarded_for,
                "Rejected webhook request with invalid signature"
            );
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::ConnectionAddrs;
    use axum::{extract::ConnectInfo, middleware, routing::post, Router};
    use tower::ServiceExt;

    const TOKEN: &str = "My Twilio:RequestValidation:AuthToken";
    const BASE_URL: &str = "https://example.localhost";

    fn app(state: TwilioValidation) -> Router {
        Router::new()
            .route("/sms", post(|body: String| async move { body }))
            .layer(middleware::from_fn_with_state(state, validate_twilio_request))
    }

    fn sign(url: &str, params: &[(&str, &str)]) -> String {
        let params: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        crate::security::RequestSigner::new(TOKEN).unwrap().sign(url, &params)
    }

    fn sms_request(signature: &str, remote: &str) -> Request<Body> {
        let mut req = Request::builder()
            .method("POST")
            .uri("/sms")
            .header("Host", "example.com")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("X-Twilio-Signature", signature)
            .body(Body::from("From=%2B1234567890&Body=Ahoy%21"))
            .unwrap();
        req.extensions_mut().insert(ConnectInfo(ConnectionAddrs {
            remote: remote.parse().unwrap(),
            local: Some("10.0.0.2:8080".parse().unwrap()),
        }));
        req
    }

    fn policy() -> ValidationPolicy {
        ValidationPolicy::new(TOKEN)
            .unwrap()
            .with_allow_local(false)
            .with_base_url_override(Some(BASE_URL))
    }

    #[tokio::test]
    async fn test_valid_request_passes_with_body_intact() {
        let signature = sign(
            &format!("{}/sms", BASE_URL),
            &[("From", "+1234567890"), ("Body", "Ahoy!")],
        );
        let response = app(TwilioValidation::new(policy()))
            .oneshot(sms_request(&signature, "203.0.113.9:5555"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"From=%2B1234567890&Body=Ahoy%21");
    }

    #[tokio::test]
    async fn test_invalid_request_forbidden() {
        let signature = sign("https://example.com/sms", &[("From", "+1234567890"), ("Body", "Ahoy!")]);
        let response = app(TwilioValidation::new(policy()))
            .oneshot(sms_request(&signature, "203.0.113.9:5555"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_route_url_override() {
        let signature = sign("https://hooks.example.com/custom", &[("From", "+1234567890"), ("Body", "Ahoy!")]);
        let state = TwilioValidation::new(policy()).with_url_override("https://hooks.example.com/custom");
        let response = app(state)
            .oneshot(sms_request(&signature, "203.0.113.9:5555"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_route_allow_local_override() {
        // Peer equals the local address, so it is a local request.
        let state = TwilioValidation::new(policy()).with_allow_local(true);
        let response = app(state)
            .oneshot(sms_request("", "10.0.0.2:60000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(TwilioValidation::new(policy()))
            .oneshot(sms_request("", "10.0.0.2:60000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_live_policy_follows_store() {
        let store = PolicyStore::new(policy());
        let state = TwilioValidation::live(store.clone());

        let response = app(state.clone())
            .oneshot(sms_request("", "10.0.0.2:60000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        store.store(policy().with_allow_local(true));
        let response = app(state)
            .oneshot(sms_request("", "10.0.0.2:60000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unreadable_body_never_reaches_handler() {
        // Local bypass would let it through, but the body is over the limit.
        let state = TwilioValidation::new(policy())
            .with_allow_local(true)
            .with_max_body_bytes(8);
        let response = app(state)
            .oneshot(sms_request("", "10.0.0.2:60000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_signed_form_forbidden() {
        let signature = sign(
            &format!("{}/sms", BASE_URL),
            &[("From", "+1234567890"), ("Body", "Ahoy!")],
        );
        let state = TwilioValidation::new(policy()).with_max_body_bytes(8);
        let response = app(state)
            .oneshot(sms_request(&signature, "203.0.113.9:5555"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_url_only_signature_with_oversized_body_forbidden() {
        let signature = sign(&format!("{}/sms", BASE_URL), &[]);
        let state = TwilioValidation::new(policy()).with_max_body_bytes(8);
        let response = app(state)
            .oneshot(sms_request(&signature, "203.0.113.9:5555"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_policy_without_overrides_is_shared() {
        let state = TwilioValidation::new(policy());
        assert!(Arc::ptr_eq(&state.policy(), &state.policy()));
    }
}
