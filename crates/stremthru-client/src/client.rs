//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, PROXY_AUTHORIZATION};
use reqwest::Method;
use url::Url;

use crate::api::{HealthApi, StoreApi};
use crate::error::{ApiError, Error, Result};
use crate::types::{Response, ResponseMeta};

/// Base user agent; an optional suffix from the configuration is appended.
const USER_AGENT: &str = concat!("stremthru:sdk:rust/", env!("CARGO_PKG_VERSION"));

const HEADER_STORE_NAME: HeaderName = HeaderName::from_static("x-stremthru-store-name");
const HEADER_STORE_AUTHORIZATION: HeaderName =
    HeaderName::from_static("x-stremthru-store-authorization");

/// StremThru API client.
///
/// Provides typed access to the store endpoints of a StremThru server.
///
/// # Example
///
/// ```no_run
/// use stremthru_client::{Auth, StremThruClient};
///
/// # async fn example() -> stremthru_client::Result<()> {
/// let client = StremThruClient::builder()
///     .base_url("https://stremthru.example.com")
///     .auth(Auth::StoreToken {
///         store: "realdebrid".to_string(),
///         token: "secret".to_string(),
///     })
///     .build()?;
///
/// let user = client.store().get_user().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StremThruClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones, immutable after build).
struct ClientInner {
    /// HTTP client, carrying the default headers (user agent, auth).
    http: reqwest::Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Request timeout; no client-side timeout when unset.
    timeout: Option<Duration>,
    /// Client IP forwarded on link-producing store calls.
    client_ip: Option<String>,
}

/// Authentication modes accepted by the service.
///
/// Exactly one mode is active per client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Pre-built credential. Emitted as `Proxy-Authorization: Basic <value>`;
    /// base64-encoded first when it contains a `:` separator.
    Credential(String),
    /// Username/password pair, normalized to `user:pass` and base64-encoded.
    Basic { user: String, pass: String },
    /// Store name plus API token, emitted as the
    /// `X-StremThru-Store-Name` / `X-StremThru-Store-Authorization` pair.
    StoreToken { store: String, token: String },
}

impl Auth {
    /// Insert the headers for this authentication mode.
    fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        match self {
            Auth::Credential(raw) => {
                let credential = encode_credential(raw);
                headers.insert(
                    PROXY_AUTHORIZATION,
                    header_value(&format!("Basic {credential}"), "auth credential")?,
                );
            }
            Auth::Basic { user, pass } => {
                let credential = encode_credential(&format!("{user}:{pass}"));
                headers.insert(
                    PROXY_AUTHORIZATION,
                    header_value(&format!("Basic {credential}"), "auth credential")?,
                );
            }
            Auth::StoreToken { store, token } => {
                headers.insert(HEADER_STORE_NAME, header_value(store, "store name")?);
                headers.insert(
                    HEADER_STORE_AUTHORIZATION,
                    header_value(&format!("Bearer {token}"), "store token")?,
                );
            }
        }
        Ok(())
    }
}

impl From<&str> for Auth {
    fn from(credential: &str) -> Self {
        Auth::Credential(credential.to_string())
    }
}

impl From<String> for Auth {
    fn from(credential: String) -> Self {
        Auth::Credential(credential)
    }
}

/// Base64-encode a credential that still carries the `user:pass` separator.
/// Already-encoded credentials pass through unchanged.
fn encode_credential(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains(':') {
        BASE64.encode(trimmed)
    } else {
        trimmed.to_string()
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| Error::Config(format!("Invalid {what}")))
}

/// Request body accepted by [`StremThruClient::request`].
#[derive(Debug, Clone)]
pub enum Body {
    /// Sent as `application/json`.
    Json(serde_json::Value),
    /// Sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

/// Options for a single request.
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// HTTP method. `Method::default()` is GET.
    pub method: Method,
    /// Optional request body.
    pub body: Option<Body>,
    /// Query parameters appended to the endpoint URL.
    pub query: Vec<(String, String)>,
    /// Extra headers, overriding the client defaults for this call.
    pub headers: HeaderMap,
}

impl StremThruClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Access the store API.
    pub fn store(&self) -> StoreApi {
        StoreApi::new(self.clone())
    }

    /// Access the health API.
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    /// `client_ip` query pair for endpoints that forward it, when configured.
    pub(crate) fn client_ip_query(&self) -> Vec<(String, String)> {
        match &self.inner.client_ip {
            Some(ip) => vec![("client_ip".to_string(), ip.clone())],
            None => Vec::new(),
        }
    }

    /// Perform one HTTP round trip against the service.
    ///
    /// Resolves `endpoint` against the base URL, applies the configured
    /// timeout and per-call options, and decodes the response. Success (2xx)
    /// yields the `data` field of the JSON body plus response metadata;
    ///"every success body wraps its payload under `data`" is a contract of
    /// the service, not something the client validates. Any other status
    /// yields [`Error::Api`]. Transport failures surface as [`Error::Http`]
    /// unchanged.
    pub async fn request<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Response<T>> {
        let mut url = self.inner.base_url.join(endpoint)?;
        if !options.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(options.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        tracing::debug!(method = %options.method, url = %url, "dispatching request");

        let mut req = self.inner.http.request(options.method, url);
        if let Some(timeout) = self.inner.timeout {
            req = req.timeout(timeout);
        }
        if !options.headers.is_empty() {
            req = req.headers(options.headers);
        }
        match options.body {
            Some(Body::Json(ref json)) => req = req.json(json),
            Some(Body::Form(ref pairs)) => req = req.form(pairs),
            None => {}
        }

        let res = req.send().await?;
        self.handle_response(res).await
    }

    /// Decode a response into `Response<T>` or an [`ApiError`].
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        res: reqwest::Response,
    ) -> Result<Response<T>> {
        let status = res.status();
        let headers = res.headers().clone();
        let status_text = status.canonical_reason().unwrap_or("").to_string();

        let is_json = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        let meta = ResponseMeta {
            headers,
            status_code: status,
            status_text,
        };

        let text = res.text().await?;
        let parsed: Option<serde_json::Value> = if is_json {
            Some(serde_json::from_str(&text)?)
        } else {
            None
        };

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "request failed");
            let err = match parsed {
                Some(body) => ApiError::from_json(body, meta),
                None => ApiError::from_text(text, meta),
            };
            return Err(err.into());
        }

        let data = match parsed {
            Some(mut body) => body
                .get_mut("data")
                .map(serde_json::Value::take)
                .unwrap_or(serde_json::Value::Null),
            None => serde_json::Value::Null,
        };

        Ok(Response {
            data: serde_json::from_value(data)?,
            meta,
        })
    }
}

/// Builder for creating a [`StremThruClient`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    auth: Option<Auth>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    client_ip: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the StremThru server. Required.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the authentication mode.
    pub fn auth(mut self, auth: impl Into<Auth>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Set the request timeout. No client-side timeout applies when unset.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Append a suffix to the default user agent.
    pub fn user_agent(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent = Some(suffix.into());
        self
    }

    /// Set the client IP forwarded on link-producing store calls.
    pub fn client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<StremThruClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        // Default headers carried on every request
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        if let Some(auth) = &self.auth {
            auth.apply(&mut headers)?;
        }

        let user_agent = match self.user_agent {
            Some(suffix) => format!("{USER_AGENT} {suffix}"),
            None => USER_AGENT.to_string(),
        };

        // The gzip/deflate features make reqwest advertise
        // `Accept-Encoding: gzip, deflate` and decompress transparently.
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(StremThruClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                client_ip: self.client_ip,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8080")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");

        let client = ClientBuilder::new()
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_basic_auth_is_normalized_and_encoded() {
        let mut headers = HeaderMap::new();
        let auth = Auth::Basic {
            user: "a".to_string(),
            pass: "b".to_string(),
        };
        auth.apply(&mut headers).unwrap();

        // base64("a:b")
        assert_eq!(headers[PROXY_AUTHORIZATION], "Basic YTpi");
    }

    #[test]
    fn test_credential_with_separator_is_encoded() {
        let mut headers = HeaderMap::new();
        Auth::from(" a:b ").apply(&mut headers).unwrap();

        assert_eq!(headers[PROXY_AUTHORIZATION], "Basic YTpi");
    }

    #[test]
    fn test_pre_encoded_credential_passes_through() {
        let mut headers = HeaderMap::new();
        Auth::from("YTpi").apply(&mut headers).unwrap();

        assert_eq!(headers[PROXY_AUTHORIZATION], "Basic YTpi");
    }

    #[test]
    fn test_store_token_auth_headers() {
        let mut headers = HeaderMap::new();
        let auth = Auth::StoreToken {
            store: "realdebrid".to_string(),
            token: "secret".to_string(),
        };
        auth.apply(&mut headers).unwrap();

        assert_eq!(headers["x-stremthru-store-name"], "realdebrid");
        assert_eq!(headers["x-stremthru-store-authorization"], "Bearer secret");
        assert!(!headers.contains_key(PROXY_AUTHORIZATION));
    }
}
