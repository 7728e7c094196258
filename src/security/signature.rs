//! Webhook signature computation and verification.
//!
//! The platform signs the full request URL followed by every POSTed form
//! field, sorted by name, with each name and value appended directly
//! (no delimiters). The digest is HMAC-SHA1 keyed with the account's auth
//! token, sent Base64-encoded in `X-Twilio-Signature`.

use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::security::policy::PolicyError;

type HmacSha1 = Hmac<Sha1>;

/// HMAC-SHA1 signer keyed with an auth token.
#[derive(Clone)]
pub struct RequestSigner {
    mac: HmacSha1,
}

impl RequestSigner {
    /// Key a signer with the given auth token.
    pub fn new(auth_token: &str) -> Result<Self, PolicyError> {
        if auth_token.is_empty() {
            return Err(PolicyError::MissingAuthToken);
        }
        let mac = HmacSha1::new_from_slice(auth_token.as_bytes())
            .map_err(|_| PolicyError::InvalidAuthToken)?;
        Ok(Self { mac })
    }

    /// Compute the Base64 signature for a URL and its form parameters.
    pub fn sign(&self, url: &str, params: &[(String, String)]) -> String {
        let mut mac = self.mac.clone();
        mac.update(signing_payload(url, params).as_bytes());
        general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Check a claimed signature against the URL and form parameters.
    ///
    /// The claim must be the canonical padded Base64 form of the digest;
    /// the digest itself is compared in constant time.
    pub fn verify(&self, url: &str, params: &[(String, String)], claimed: &str) -> bool {
        let claimed = match general_purpose::STANDARD.decode(claimed) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        let mut mac = self.mac.clone();
        mac.update(signing_payload(url, params).as_bytes());
        mac.verify_slice(&claimed).is_ok()
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestSigner { auth_token: \"<redacted>\" }")
    }
}

/// Build the exact string the platform signs.
///
/// Keys are ordered by byte-wise comparison; the sort is stable so repeated
/// names keep their arrival order.
pub fn signing_payload(url: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut payload = String::with_capacity(
        url.len() + params.iter().map(|(k, v)| k.len() + v.len()).sum::<usize>(),
    );
    payload.push_str(url);
    for (key, value) in sorted {
        payload.push_str(key);
        payload.push_str(value);
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn reference_signature(token: &str, data: &str) -> String {
        let mut mac = HmacSha1::new_from_slice(token.as_bytes()).unwrap();
        mac.update(data.as_bytes());
        general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_payload_sorts_and_concatenates() {
        let params = pairs(&[("From", "whatsapp:+1234567890"), ("Body", "Hello World")]);
        let payload = signing_payload("https://example.com/webhook", &params);
        assert_eq!(
            payload,
            "https://example.com/webhookBodyHello WorldFromwhatsapp:+1234567890"
        );
    }

    #[test]
    fn test_payload_uses_ordinal_order() {
        // Uppercase sorts before lowercase byte-wise.
        let params = pairs(&[("b", "1"), ("B", "2"), ("a", "3"), ("A", "4")]);
        assert_eq!(signing_payload("u", &params), "uA4B2a3b1");
    }

    #[test]
    fn test_payload_without_params() {
        assert_eq!(
            signing_payload("https://example.com/webhook", &[]),
            "https://example.com/webhook"
        );
    }

    #[test]
    fn test_sign_matches_reference_hmac() {
        let signer = RequestSigner::new("thisisafakeauthtoken").unwrap();
        let url = "https://api.example.com/webhook";
        assert_eq!(
            signer.sign(url, &[]),
            reference_signature("thisisafakeauthtoken", url)
        );

        let params = pairs(&[("key2", "value2"), ("key1", "value1")]);
        assert_eq!(
            signer.sign(url, &params),
            reference_signature("thisisafakeauthtoken", &format!("{}key1value1key2value2", url))
        );
    }

    #[test]
    fn test_verify_roundtrip_and_tamper() {
        let signer = RequestSigner::new("secret").unwrap();
        let url = "https://example.com/sms";
        let params = pairs(&[("Body", "Ahoy!"), ("From", "+1234567890")]);
        let signature = signer.sign(url, &params);

        assert!(signer.verify(url, &params, &signature));
        assert!(!signer.verify("https://example.com/sms/", &params, &signature));
        assert!(!signer.verify(url, &pairs(&[("Body", "Ahoy?"), ("From", "+1234567890")]), &signature));
        assert!(!signer.verify(url, &params, ""));
        assert!(!signer.verify(url, &params, "not base64!"));
        assert!(!signer.verify(url, &params, &signature.to_lowercase()));
    }

    #[test]
    fn test_verify_rejects_unpadded_claim() {
        let signer = RequestSigner::new("secret").unwrap();
        let signature = signer.sign("https://example.com/", &[]);
        assert!(signature.ends_with('='));
        let unpadded = signature.trim_end_matches('=');
        assert!(!signer.verify("https://example.com/", &[], unpadded));
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            RequestSigner::new(""),
            Err(PolicyError::MissingAuthToken)
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let signer = RequestSigner::new("super-secret-token").unwrap();
        let rendered = format!("{:?}", signer);
        assert!(!rendered.contains("super-secret-token"));
    }
}
