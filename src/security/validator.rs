//! Request-origin validation.
//!
//! # Responsibilities
//! - Apply the local-request bypass
//! - Rebuild the URL the platform signed (or use the configured override)
//! - Verify the claimed signature over URL and POSTed form fields
//!
//! # Design Decisions
//! - Stateless: every input arrives in the request or the policy snapshot
//! - Rejection never says why; callers only see ALLOW or REJECT

use crate::security::locality;
use crate::security::policy::ValidationPolicy;
use crate::security::request::ValidationRequest;

/// Outcome of validating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request came from this machine and local requests are allowed.
    LocalBypass,
    /// Signature matched.
    Verified,
    /// Signature missing or wrong.
    Rejected,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        !matches!(self, Decision::Rejected)
    }

    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::LocalBypass => "local_bypass",
            Decision::Verified => "verified",
            Decision::Rejected => "rejected",
        }
    }
}

/// Returns true if the request may proceed.
pub fn is_valid(request: &ValidationRequest, policy: &ValidationPolicy) -> bool {
    evaluate(request, policy).is_allowed()
}

/// Decide whether a request genuinely came from the platform.
pub fn evaluate(request: &ValidationRequest, policy: &ValidationPolicy) -> Decision {
    if policy.allow_local
        && locality::is_local(request.remote_addr, request.local_addr, request.forwarded_for)
    {
        return Decision::LocalBypass;
    }

    let url = canonical_url(request, policy);
    let params: &[(String, String)] = match &request.form {
        Some(form) if request.method.eq_ignore_ascii_case("POST") => form.pairs(),
        _ => &[],
    };

    if policy.signer().verify(&url, params, request.claimed_signature()) {
        Decision::Verified
    } else {
        Decision::Rejected
    }
}

/// The URL the platform is expected to have signed.
///
/// An exact `url_override` wins. A `base_url_override` replaces scheme and
/// host, with trailing `/`s dropped so it joins the path without a double slash.
/// Otherwise the URL is rebuilt from the request; https URLs are signed
/// without an explicit port.
pub fn canonical_url(request: &ValidationRequest, policy: &ValidationPolicy) -> String {
    if let Some(url) = &policy.url_override {
        return url.clone();
    }

    let query = request.query_string();
    if let Some(base) = &policy.base_url_override {
        let base = base.trim_end_matches('/');
        return format!("{}{}{}", base, request.path, query);
    }

    let host = if request.scheme.eq_ignore_ascii_case("https") {
        strip_port(&request.host)
    } else {
        request.host.as_str()
    };
    format!("{}://{}{}{}", request.scheme, host, request.path, query)
}

/// Remove a trailing `:port` from a host, leaving IPv6 literals intact.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}
