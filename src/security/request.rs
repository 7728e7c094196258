//! Framework-independent description of an inbound webhook request.

use std::net::IpAddr;

/// Form fields in arrival order.
///
/// Repeated field names collapse into a single entry whose values are joined
/// with `,`, so each name appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParameters {
    pairs: Vec<(String, String)>,
}

impl FormParameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` body.
    ///
    /// Parsing is lossy rather than fallible: invalid UTF-8 is replaced, and
    /// anything the parser cannot split simply yields fewer pairs.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        let mut params = Self::new();
        for (name, value) in url::form_urlencoded::parse(body) {
            params.append(name.into_owned(), value.into_owned());
        }
        params
    }

    /// Add a field, joining onto an existing entry with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&value);
            }
            None => self.pairs.push((name, value)),
        }
    }

    /// Value of a field, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in arrival order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl<K, V> FromIterator<(K, V)> for FormParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.append(name, value);
        }
        params
    }
}

/// Everything the validator needs to know about one inbound request.
///
/// Built fresh per request by the http layer (or by hand in tests) and
/// discarded once a decision has been made.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    pub method: String,
    pub scheme: String,
    pub host: String,
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    /// `None` when the request carried no readable form body.
    pub form: Option<FormParameters>,
    /// Value of `X-Twilio-Signature`; `None` is treated as empty.
    pub signature: Option<String>,
    pub remote_addr: Option<IpAddr>,
    pub local_addr: Option<IpAddr>,
    /// A forwarded-for style header was present.
    pub forwarded_for: bool,
}

impl ValidationRequest {
    /// Start a request description from its method and absolute URL parts.
    pub fn new(
        method: impl Into<String>,
        scheme: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            scheme: scheme.into(),
            host: host.into(),
            path: path.into(),
            query: None,
            form: None,
            signature: None,
            remote_addr: None,
            local_addr: None,
            forwarded_for: false,
        }
    }

    /// Describe a request from an absolute URL such as `https://host/path?q=1`.
    ///
    /// Returns `None` when the URL cannot be parsed or has no host.
    pub fn from_url(method: impl Into<String>, raw: &str) -> Option<Self> {
        let parsed = url::Url::parse(raw).ok()?;
        let host = match parsed.port() {
            Some(port) => format!("{}:{}", parsed.host_str()?, port),
            None => parsed.host_str()?.to_string(),
        };
        let mut request = Self::new(method, parsed.scheme(), host, parsed.path());
        request.query = parsed.query().map(str::to_string);
        Some(request)
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_form(mut self, form: FormParameters) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_peer(mut self, remote: Option<IpAddr>, local: Option<IpAddr>) -> Self {
        self.remote_addr = remote;
        self.local_addr = local;
        self
    }

    pub fn with_forwarded_for(mut self, forwarded_for: bool) -> Self {
        self.forwarded_for = forwarded_for;
        self
    }

    /// Query string as it appears in a URL: `?a=b`, or empty.
    pub fn query_string(&self) -> String {
        match self.query.as_deref() {
            Some(q) if !q.is_empty() => format!("?{}", q),
            _ => String::new(),
        }
    }

    /// Claimed signature, empty when the header was absent.
    pub fn claimed_signature(&self) -> &str {
        self.signature.as_deref().unwrap_or_default()
    }
}
