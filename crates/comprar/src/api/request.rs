//! Fluent HTTP request builder for API checks.
//!
//! Builders are created per call-site, configured through chained calls,
//! and executed by [`Request::send`]. Configuration is pure in-memory
//! mutation; network I/O happens only at `send`, which may be re-issued:
//! each call re-sends the same method/URL/body built from current state.
//! Each send is an independent, synchronous, blocking call with a fixed
//! timeout; callers that need retries wrap it themselves.

use crate::config::Config;
use crate::result::{ComprarError, ComprarResult};
use serde::Serialize;
use std::time::Duration;

/// Fixed per-request timeout (30 seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
    /// PATCH request
    Patch,
}

impl Method {
    /// Canonical method name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body: JSON XOR form-encoded, setting one clears the other
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// No body
    None,
    /// JSON payload
    Json(serde_json::Value),
    /// Form-encoded pairs
    Form(Vec<(String, String)>),
}

/// A mutable request builder
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    domain: String,
    path: String,
    headers: Vec<(String, String)>,
    params: Vec<(String, String)>,
    body: Body,
    cookies: Vec<(String, String)>,
    allow_redirects: bool,
}

impl Request {
    /// Create a request against an explicit domain.
    ///
    /// The domain may omit the scheme; `https://` is assumed.
    #[must_use]
    pub fn new(method: Method, domain: impl Into<String>) -> Self {
        Self {
            method,
            domain: domain.into(),
            path: String::new(),
            headers: Vec::new(),
            params: Vec::new(),
            body: Body::None,
            cookies: Vec::new(),
            allow_redirects: true,
        }
    }

    /// Create a request against the configured base address
    #[must_use]
    pub fn from_config(method: Method, config: &Config) -> Self {
        Self::new(method, config.base_address.clone())
    }

    /// Set the request path
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Replace all headers
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Append one header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add the default JSON content type header
    #[must_use]
    pub fn default_headers(self) -> Self {
        self.header("Content-Type", "application/json")
    }

    /// Set a bearer token
    #[must_use]
    pub fn auth(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    /// Set query parameters
    #[must_use]
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Set a JSON body, clearing any form body
    #[must_use]
    pub fn json(mut self, body: impl Serialize) -> Self {
        self.body = Body::Json(serde_json::to_value(body).unwrap_or(serde_json::Value::Null));
        self
    }

    /// Set a form-encoded body, clearing any JSON body
    #[must_use]
    pub fn form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Body::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Add a cookie
    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Follow redirects (default true)
    #[must_use]
    pub const fn allow_redirects(mut self, allow: bool) -> Self {
        self.allow_redirects = allow;
        self
    }

    /// The method this request will use
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// The request body as currently configured
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Resolve the final absolute URL: domain + path, `https://` assumed
    /// when the domain has no scheme.
    #[must_use]
    pub fn url(&self) -> String {
        let domain = self.domain.trim();
        let base = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", domain.trim_end_matches('/'))
        };
        if self.path.is_empty() {
            base
        } else {
            format!("{base}/{}", self.path.trim_start_matches('/'))
        }
    }

    /// Issue the HTTP call.
    ///
    /// Certificate validation is disabled: the harness also runs against
    /// staging hosts with self-signed certificates.
    pub fn send(&self) -> ComprarResult<ApiResponse> {
        let redirect = if self.allow_redirects {
            reqwest::redirect::Policy::default()
        } else {
            reqwest::redirect::Policy::none()
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_certs(true)
            .redirect(redirect)
            .build()?;

        let url = self.url();
        tracing::info!(method = %self.method, url, "api request");

        let mut builder = client.request(self.method.to_reqwest(), &url);
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header("Cookie", cookie);
        }
        if !self.params.is_empty() {
            builder = builder.query(&self.params);
        }
        builder = match &self.body {
            Body::None => builder,
            Body::Json(value) => builder.json(value),
            Body::Form(pairs) => builder.form(pairs),
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.text()?;
        tracing::debug!(status, bytes = body.len(), "api response");
        Ok(ApiResponse::new(status, headers, body))
    }
}

/// A received HTTP response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl ApiResponse {
    /// Create a response (also used by tests)
    #[must_use]
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// HTTP status code
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Raw response text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Header value, case-insensitive name match
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decode the body as JSON.
    ///
    /// Decoding is deferred to this call; malformed JSON surfaces here, not
    /// at `send`.
    pub fn json(&self) -> ComprarResult<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The numeric `responseCode` field the API reports inside its JSON
    /// body. Callers branch on this rather than solely on the HTTP status.
    pub fn response_code(&self) -> ComprarResult<i64> {
        let value = self.json()?;
        let code = value.get("responseCode").ok_or(ComprarError::FieldAbsent {
            field: "responseCode".to_string(),
        })?;
        code.as_i64()
            .or_else(|| code.as_str().and_then(|s| s.parse().ok()))
            .ok_or(ComprarError::FieldAbsent {
                field: "responseCode".to_string(),
            })
    }

    /// The `message` field from the JSON body, if present
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.json()
            .ok()?
            .get("message")
            .and_then(|m| m.as_str())
            .map(ToString::to_string)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod builder_tests {
        use super::*;

        #[test]
        fn test_url_joins_domain_and_path() {
            let req = Request::new(Method::Get, "https://shop.test").path("/api/productsList");
            assert_eq!(req.url(), "https://shop.test/api/productsList");
        }

        #[test]
        fn test_url_auto_prefixes_https() {
            let req = Request::new(Method::Get, "shop.test").path("api/brandsList");
            assert_eq!(req.url(), "https://shop.test/api/brandsList");
        }

        #[test]
        fn test_url_without_path() {
            let req = Request::new(Method::Get, "https://shop.test/");
            assert_eq!(req.url(), "https://shop.test");
        }

        #[test]
        fn test_json_and_form_are_mutually_exclusive() {
            let req = Request::new(Method::Post, "shop.test")
                .json(serde_json::json!({"a": 1}))
                .form([("b", "2")]);
            assert_eq!(
                *req.body(),
                Body::Form(vec![("b".to_string(), "2".to_string())])
            );

            let req = Request::new(Method::Post, "shop.test")
                .form([("b", "2")])
                .json(serde_json::json!({"a": 1}));
            assert_eq!(*req.body(), Body::Json(serde_json::json!({"a": 1})));
        }

        #[test]
        fn test_auth_sets_bearer_header() {
            let req = Request::new(Method::Get, "shop.test").auth("tok123");
            assert!(req
                .headers
                .iter()
                .any(|(k, v)| k == "Authorization" && v == "Bearer tok123"));
        }

        #[test]
        fn test_default_headers_add_json_content_type() {
            let req = Request::new(Method::Post, "shop.test").default_headers();
            assert!(req
                .headers
                .iter()
                .any(|(k, v)| k == "Content-Type" && v == "application/json"));
        }

        #[test]
        fn test_repeated_resolution_is_stable() {
            // Re-issuing `send` re-sends identical method/URL/body; the
            // parts it is built from must not drift between calls.
            let req = Request::new(Method::Post, "shop.test")
                .path("/api/verifyLogin")
                .form([("email", "a@b.c"), ("password", "pw")]);
            assert_eq!(req.url(), req.url());
            assert_eq!(req.body(), req.body());
            assert_eq!(req.method(), Method::Post);
        }

        #[test]
        fn test_method_names() {
            assert_eq!(Method::Get.as_str(), "GET");
            assert_eq!(Method::Delete.to_string(), "DELETE");
        }
    }

    mod response_tests {
        use super::*;

        #[test]
        fn test_json_decode_is_deferred() {
            let response = ApiResponse::new(200, vec![], "<html>not json</html>");
            // Construction succeeds; only the JSON view fails.
            assert_eq!(response.status(), 200);
            assert!(response.json().is_err());
        }

        #[test]
        fn test_response_code_numeric() {
            let response =
                ApiResponse::new(200, vec![], r#"{"responseCode": 404, "message": "Not found!"}"#);
            assert_eq!(response.response_code().unwrap(), 404);
            assert_eq!(response.message().unwrap(), "Not found!");
        }

        #[test]
        fn test_response_code_numeric_string() {
            let response = ApiResponse::new(200, vec![], r#"{"responseCode": "405"}"#);
            assert_eq!(response.response_code().unwrap(), 405);
        }

        #[test]
        fn test_response_code_absent_is_fatal() {
            let response = ApiResponse::new(200, vec![], r#"{"products": []}"#);
            assert!(matches!(
                response.response_code(),
                Err(ComprarError::FieldAbsent { .. })
            ));
        }

        #[test]
        fn test_header_lookup_case_insensitive() {
            let response = ApiResponse::new(
                405,
                vec![("Content-Type".to_string(), "application/json".to_string())],
                "{}",
            );
            assert_eq!(response.header("content-type"), Some("application/json"));
            assert_eq!(response.header("X-Missing"), None);
        }
    }
}
