// Course API HTTP client
//
// Wraps `reqwest::Client` with URL assembly, bearer auth and response
// classification. Endpoint helpers (courses, auth) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Error body shape: `{"message": "..."}`. Anything else falls back to a
/// generic `HTTP <status>` message.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Raw HTTP client for the course API.
///
/// Stateless with respect to authentication: the bearer token is passed
/// into every call by the caller, so one client can serve any session.
#[derive(Debug, Clone)]
pub struct CourseClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CourseClient {
    /// Create a new client from a base URL (e.g. `http://localhost:3000`)
    /// and a transport config.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for the JSON default headers; the bearer
    /// token is still attached per request.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL.
    ///
    /// Each segment is percent-encoded on its own, so an identifier such as
    /// `a/b` stays one segment. Any path prefix on the base URL is kept.
    pub fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Issue an authenticated request and classify the response.
    ///
    /// Attaches `Authorization: Bearer <token>`, serializes `body` as JSON
    /// when present and returns the decoded JSON payload. An empty 2xx body
    /// decodes to `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
        token: &SecretString,
    ) -> Result<Value, Error> {
        let url = self.url(segments)?;
        debug!("{method} {url}");

        let builder = self.http.request(method, url);
        let builder = Self::bearer(builder, token)?;
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };

        Self::send(builder).await
    }

    /// Issue an unauthenticated JSON request (login).
    pub(crate) async fn request_anonymous(
        &self,
        method: Method,
        segments: &[&str],
        body: &Value,
    ) -> Result<Value, Error> {
        let url = self.url(segments)?;
        debug!("{method} {url}");

        Self::send(self.http.request(method, url).json(body)).await
    }

    /// Decode a JSON payload into a typed response.
    pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
        let body = value.to_string();
        serde_json::from_value(value).map_err(|e| {
            let preview = &body[..floor_char_boundary(&body, 200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    fn bearer(builder: RequestBuilder, token: &SecretString) -> Result<RequestBuilder, Error> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::InvalidToken)?;
        value.set_sensitive(true);
        Ok(builder.header(AUTHORIZATION, value))
    }

    async fn send(builder: RequestBuilder) -> Result<Value, Error> {
        let resp = builder.send().await.map_err(Error::Transport)?;
        Self::classify(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Classify a response into a JSON payload or an [`Error`].
    ///
    /// - non-2xx: `Error::Status`, message from the body's `message` field
    ///   or `HTTP <status>`
    /// - 2xx, empty body: `Value::Null`
    /// - 2xx, non-JSON content type: `Error::UnexpectedContentType`
    /// - 2xx, JSON: the parsed value
    async fn classify(resp: Response) -> Result<Value, Error> {
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            trace!(status = status.as_u16(), "error response body received");
            return Err(Error::Status {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &raw),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        if !content_type.as_deref().is_some_and(is_json_content_type) {
            return Err(Error::UnexpectedContentType {
                status: status.as_u16(),
                content_type: content_type.unwrap_or_else(|| "no content type".into()),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..floor_char_boundary(&body, 200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

/// Extract `message` from a JSON error body, falling back to `HTTP <status>`.
fn error_message(status: u16, raw: &str) -> String {
    serde_json::from_str::<ErrorBody>(raw)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

/// `application/json`, `application/problem+json`, with or without params.
fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

/// Largest index `<= max` that falls on a char boundary.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CourseClient {
        CourseClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn url_appends_segments_to_root() {
        let c = client("http://localhost:3000");
        let url = c.url(&["api", "courses"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/courses");
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let c = client("https://example.com/backend/");
        let url = c.url(&["api", "courses", "42"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/backend/api/courses/42");
    }

    #[test]
    fn url_encodes_identifier_as_single_segment() {
        let c = client("http://localhost:3000");
        let url = c.url(&["api", "courses", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/courses/a%2Fb%20c");
    }

    #[test]
    fn cannot_be_a_base_url_is_rejected() {
        let result = CourseClient::with_client(
            reqwest::Client::new(),
            Url::parse("mailto:someone@example.com").unwrap(),
        );
        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }

    #[test]
    fn error_message_prefers_body_message() {
        assert_eq!(
            error_message(400, r#"{"message":"Course not found"}"#),
            "Course not found"
        );
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(error_message(500, "<html>oops</html>"), "HTTP 500");
        assert_eq!(error_message(502, ""), "HTTP 502");
        assert_eq!(error_message(400, r#"{"error":"bad"}"#), "HTTP 400");
        assert_eq!(error_message(400, r#"{"message":""}"#), "HTTP 400");
    }

    #[test]
    fn json_content_type_detection() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("text/html; charset=utf-8"));
        assert!(!is_json_content_type("text/plain"));
    }

    #[test]
    fn char_boundary_never_splits_codepoints() {
        let s = "é".repeat(150);
        let idx = floor_char_boundary(&s, 200);
        assert!(s.is_char_boundary(idx));
        assert!(idx <= 200);
    }
}
