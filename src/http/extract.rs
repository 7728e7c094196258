//! Build a [`ValidationRequest`] from an axum request.
//!
//! # Responsibilities
//! - Read URL parts, signature header and proxy headers
//! - Buffer and parse form bodies of POST requests
//! - Give the body back so downstream extractors still see it
//!
//! # Design Decisions
//! - Body is only buffered for `application/x-www-form-urlencoded` POSTs
//! - A body that cannot be read (too large, transport error) means "no form",
//!   and the request is not handed back since its bytes are gone

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request},
};

use crate::net::peer_ips;
use crate::security::{FormParameters, ValidationRequest, X_TWILIO_SIGNATURE};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Split a request into its validation description and a replayable request.
///
/// The request comes back as `None` when its form body could not be read.
pub async fn validation_request(
    request: Request<Body>,
    max_body_bytes: usize,
) -> (ValidationRequest, Option<Request<Body>>) {
    let (parts, body) = request.into_parts();

    let scheme = parts.uri.scheme_str().unwrap_or("http").to_string();
    let host = parts
        .uri
        .authority()
        .map(|a| a.as_str().rsplit('@').next().unwrap_or_default().to_string())
        .or_else(|| header_str(&parts.headers, header::HOST.as_str()).map(str::to_string))
        .unwrap_or_default();

    let (remote, local) = peer_ips(&parts.extensions);

    let mut validation = ValidationRequest::new(
        parts.method.as_str(),
        scheme,
        host,
        parts.uri.path(),
    )
    .with_peer(remote, local)
    .with_forwarded_for(is_forwarded(&parts.headers));
    validation.query = parts.uri.query().map(str::to_string);
    validation.signature = header_str(&parts.headers, X_TWILIO_SIGNATURE).map(str::to_string);

    if parts.method != Method::POST || !is_form(&parts.headers) {
        return (validation, Some(Request::from_parts(parts, body)));
    }

    match axum::body::to_bytes(body, max_body_bytes).await {
        Ok(bytes) => {
            validation.form = Some(FormParameters::from_urlencoded(&bytes));
            (validation, Some(Request::from_parts(parts, Body::from(bytes))))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Could not read form body, validating without parameters");
            (validation, None)
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// A proxy touched this request.
fn is_forwarded(headers: &HeaderMap) -> bool {
    ["x-forwarded-for", header::FORWARDED.as_str()]
        .iter()
        .flat_map(|name| headers.get_all(*name))
        .any(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
}

fn is_form(headers: &HeaderMap) -> bool {
    header_str(headers, header::CONTENT_TYPE.as_str())
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(FORM_URLENCODED))
        .unwrap_or(false)
}
